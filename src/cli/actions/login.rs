use crate::{cli::globals::GlobalArgs, session::Error};
use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub username: String,
    pub password: SecretString,
}

/// Execute the login action.
/// # Errors
/// Returns an error if the backend refuses the credentials or cannot be reached.
pub async fn execute(args: Args) -> Result<()> {
    debug!(api_url = %args.globals.api_url, "logging in");

    let manager = args.globals.session_manager()?;
    manager.initialize().await;

    let identity = match manager.login(&args.username, &args.password).await {
        Ok(identity) => identity,
        Err(Error::Api(err)) if err.is_unreachable() => {
            return Err(err).context("login failed, check --api-url");
        }
        Err(err) => return Err(err).context("login failed"),
    };

    let role = identity.role.map_or("none", |role| role.as_str());
    println!("Logged in as {} ({role})", identity.username);

    Ok(())
}
