use crate::{
    cli::globals::GlobalArgs,
    session::{Access, LogoutReason, Phase},
};
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub quiet: bool,
}

/// Keep the restored session live, reporting transitions until it ends or Ctrl-C.
/// # Errors
/// Returns an error if there is no session to watch.
pub async fn execute(args: Args) -> Result<()> {
    let manager = super::authorized(&args.globals, Access::Authenticated).await?;
    let mut updates = manager.subscribe();

    if !args.quiet {
        if let Some(identity) = manager.identity() {
            println!("watching session of {}", identity.username);
        }
    }

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }

                let session = updates.borrow_and_update().clone();
                debug!(phase = %session.phase, "session transition");

                if session.phase == Phase::Unauthenticated {
                    let reason = session.last_logout.unwrap_or(LogoutReason::UserRequested);
                    println!("{reason}, {}", super::LOGIN_HINT);
                    break;
                }

                if !args.quiet {
                    println!("session: {}", session.phase);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    manager.shutdown();
    Ok(())
}
