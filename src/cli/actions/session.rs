use crate::{cli::globals::GlobalArgs, session::Phase};
use anyhow::Result;

/// Discard the stored session.
/// # Errors
/// Returns an error if the session manager cannot be built.
pub async fn logout(globals: &GlobalArgs) -> Result<()> {
    let manager = globals.session_manager()?;
    manager.initialize().await;
    manager.logout();
    println!("Logged out");
    Ok(())
}

/// Print the restored session.
/// # Errors
/// Returns an error if the session manager cannot be built.
pub async fn whoami(globals: &GlobalArgs) -> Result<()> {
    let manager = globals.session_manager()?;
    let session = manager.initialize().await;

    println!("session: {}", session.phase);

    if let (Phase::Authenticated, Some(identity)) = (session.phase, &session.identity) {
        println!("id: {}", identity.id);
        println!("username: {}", identity.username);
        println!(
            "role: {}",
            identity.role.map_or("none", |role| role.as_str())
        );
        println!("admin: {}", session.is_admin());
        println!("superadmin: {}", session.is_super_admin());
    } else if let Some(reason) = session.last_logout {
        println!("reason: {reason}");
    }

    Ok(())
}
