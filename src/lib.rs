//! # HRDesk (HR Administration Console Client)
//!
//! `hrdesk` is the client side of an HR administration console: candidate intake and
//! review, employee roster, department/position catalogs, salary/position history and
//! user administration. The REST backend is consumed as given.
//!
//! ## Session Lifecycle
//!
//! The crate is built around two cooperating components:
//!
//! - [`api::ApiClient`] (the access layer) owns the single shared HTTP client. It attaches
//!   the current bearer credential to every request and tears the credential down when the
//!   backend answers `401`/`403`.
//! - [`session::SessionManager`] owns the authenticated/unauthenticated state machine. It
//!   restores a session from durable storage on startup, performs `login`/`logout`, and
//!   runs a background task that re-checks credential expiry every five minutes.
//!
//! Leaves first: [`credential`] (stateless decode/expiry check) -> [`storage`] (durable
//! string key/value record) -> [`api`] -> [`session`] -> consumers (the `hrdesk` CLI).
//!
//! ## Credential Handling
//!
//! Credentials are three-segment bearer tokens whose payload carries `exp` and identity
//! claims. The client only decodes the payload; it never verifies signatures and never
//! refreshes tokens. Credentials are kept in `SecretString` and must never be logged.

pub mod api;
pub mod cli;
pub mod clock;
pub mod credential;
pub mod identity;
pub mod preferences;
pub mod session;
pub mod storage;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
