use thiserror::Error;

/// Access layer failures. Each variant maps to a distinct user-facing message so the
/// console can tell "backend unreachable" from "credentials rejected" from "field X is
/// required".
#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    /// `401`/`403`; the credential has already been torn down when this is returned.
    #[error("authentication rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// Backend-reported field or business-rule rejection.
    #[error("{}", .errors.first().map_or("Request failed.", String::as_str))]
    Validation { status: u16, errors: Vec<String> },
    #[error("request failed ({status}): {message}")]
    Http { status: u16, message: String },
    /// Refused locally before any request was sent.
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("failed to build request: {0}")]
    Request(String),
}

impl Error {
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Error::Rejected { .. })
    }

    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::Unreachable(_) | Error::Timeout(_))
    }

    /// All backend-provided messages, most specific first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Error::Validation { errors, .. } => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}
