use crate::{api, credential, storage};
use thiserror::Error;

/// Login failures, surfaced to the caller so a form can render them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("server issued an unreadable credential: {0}")]
    InvalidCredentialFormat(#[source] credential::Error),
    #[error("server issued an already expired credential")]
    ExpiredOnIssue,
    #[error("{0}")]
    LoginFailed(String),
    #[error(transparent)]
    Api(#[from] api::Error),
    #[error("failed to persist session: {0}")]
    Storage(#[from] storage::Error),
}

/// Why a durable record could not be restored. Never leaves the session module;
/// the outcome is always a purge.
#[derive(Debug, Error)]
pub(crate) enum RestoreError {
    #[error("incomplete session record")]
    Partial,
    #[error("stored credential is invalid: {0}")]
    Credential(#[from] credential::Error),
    #[error("stored identity is unreadable: {0}")]
    Identity(#[source] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] storage::Error),
    #[error("session restore was interrupted: {0}")]
    Interrupted(String),
}
