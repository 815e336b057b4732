use crate::identity::Identity;
use secrecy::SecretString;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Uninitialized,
    Initializing,
    Unauthenticated,
    Authenticated,
}

impl fmt::Display for Phase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Initializing => "initializing",
            Phase::Unauthenticated => "unauthenticated",
            Phase::Authenticated => "authenticated",
        })
    }
}

/// Why the last authenticated session ended. Informational only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogoutReason {
    UserRequested,
    /// Periodic revalidation found the credential expired or unreadable.
    Expired,
    /// The backend answered `401`/`403`.
    Rejected,
    /// The durable record found at startup was incomplete, unreadable or expired.
    InvalidStoredSession,
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            LogoutReason::UserRequested => "logged out",
            LogoutReason::Expired => "session expired",
            LogoutReason::Rejected => "session rejected by the server",
            LogoutReason::InvalidStoredSession => "stored session was invalid",
        })
    }
}

/// Snapshot of who is currently authenticated.
///
/// `identity` and `credential` are both present exactly when `phase` is
/// [`Phase::Authenticated`].
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub phase: Phase,
    pub identity: Option<Identity>,
    pub credential: Option<SecretString>,
    pub last_logout: Option<LogoutReason>,
}

impl Session {
    pub(crate) fn authenticated(identity: Identity, credential: SecretString) -> Self {
        Self {
            phase: Phase::Authenticated,
            identity: Some(identity),
            credential: Some(credential),
            last_logout: None,
        }
    }

    pub(crate) fn unauthenticated(reason: Option<LogoutReason>) -> Self {
        Self {
            phase: Phase::Unauthenticated,
            identity: None,
            credential: None,
            last_logout: reason,
        }
    }

    /// True until startup restoration has finished; no other field is meaningful yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Uninitialized | Phase::Initializing)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase == Phase::Authenticated && self.identity.is_some() && self.credential.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.identity.as_ref().is_some_and(Identity::is_admin)
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.is_authenticated()
            && self
                .identity
                .as_ref()
                .is_some_and(Identity::is_super_admin)
    }
}
