//! Durable client-side key/value storage.
//!
//! The session survives a restart through two string records: the raw credential and
//! the serialized identity. Only the session manager writes them; the access layer may
//! clear them when the backend rejects a credential. The theme preference lives in the
//! same store and is never touched by either.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::{fmt::Debug, io, path::PathBuf};
use thiserror::Error;

/// Raw credential string.
pub const CREDENTIAL_KEY: &str = "token";
/// Serialized [`crate::identity::Identity`].
pub const IDENTITY_KEY: &str = "user";
/// `"light"` or `"dark"`.
pub const THEME_KEY: &str = "themeMode";

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("state file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait Storage: Debug + Send + Sync {
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// # Errors
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), Error>;
}
