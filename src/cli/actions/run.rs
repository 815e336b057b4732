use crate::cli::actions::{candidate, list, login, session, theme, watch, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => login::execute(args).await,
        Action::Logout(globals) => session::logout(&globals).await,
        Action::Whoami(globals) => session::whoami(&globals).await,
        Action::List(args) => list::execute(args).await,
        Action::Candidate(args) => candidate::execute(args).await,
        Action::Theme(args) => theme::execute(&args),
        Action::Watch(args) => watch::execute(args).await,
    }
}
