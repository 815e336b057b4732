pub mod candidate;
pub mod list;
pub mod login;
pub mod session;
pub mod theme;
pub mod watch;

// Internal "interpreter" for `Action`.
mod run;

use crate::{
    cli::globals::GlobalArgs,
    session::{require, Access, GuardError, SessionManager},
};
use anyhow::{bail, Result};

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Logout(GlobalArgs),
    Whoami(GlobalArgs),
    List(list::Args),
    Candidate(candidate::Args),
    Theme(theme::Args),
    Watch(watch::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

pub(crate) const LOGIN_HINT: &str = "run `hrdesk login` to sign in";

/// Restores the stored session and checks it grants `access`.
async fn authorized(globals: &GlobalArgs, access: Access) -> Result<SessionManager> {
    let manager = globals.session_manager()?;
    manager.initialize().await;

    match require(&manager, access) {
        Ok(()) => Ok(manager),
        Err(GuardError::NotAuthenticated | GuardError::Loading) => {
            bail!("not logged in, {LOGIN_HINT}")
        }
        Err(GuardError::Forbidden) => bail!("this command requires a superadmin account"),
    }
}

/// Turns an access layer failure into a user-facing error.
fn api_failure(err: crate::api::Error) -> anyhow::Error {
    if err.is_rejected() {
        anyhow::anyhow!("{err}; the session was cleared, {LOGIN_HINT}")
    } else {
        anyhow::Error::new(err)
    }
}
