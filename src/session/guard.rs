//! Capability checks for protected entry points, the headless counterpart of protected
//! and super-admin-only routes.

use super::SessionManager;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    SuperAdmin,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("session is still loading")]
    Loading,
    /// The consumer should send the user to the login entry point.
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("insufficient role")]
    Forbidden,
}

/// # Errors
/// Returns a [`GuardError`] describing why access is not granted.
pub fn require(manager: &SessionManager, access: Access) -> Result<(), GuardError> {
    let session = manager.session();
    if session.is_loading() {
        return Err(GuardError::Loading);
    }
    if !session.is_authenticated() {
        return Err(GuardError::NotAuthenticated);
    }
    match access {
        Access::Authenticated => Ok(()),
        Access::SuperAdmin if session.is_super_admin() => Ok(()),
        Access::SuperAdmin => Err(GuardError::Forbidden),
    }
}
