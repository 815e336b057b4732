use crate::{
    api::{ApiClient, ClientConfig},
    session::SessionManager,
    storage::{FileStorage, Storage},
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub state_file: PathBuf,
    pub timeout: Duration,
    pub revalidate_interval: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, state_file: PathBuf) -> Self {
        Self {
            api_url,
            state_file,
            timeout: crate::api::DEFAULT_TIMEOUT,
            revalidate_interval: crate::session::DEFAULT_REVALIDATE_INTERVAL,
        }
    }

    /// `<platform data dir>/hrdesk/state.json`
    ///
    /// # Errors
    /// Returns an error if the platform has no data directory.
    pub fn default_state_file() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("state.json"))
            .context("cannot determine the data directory, use --state-file")
    }

    #[must_use]
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::new(FileStorage::new(&self.state_file))
    }

    /// Wires storage, access layer and session manager together. The session is not
    /// initialized yet.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn session_manager(&self) -> Result<SessionManager> {
        let storage = self.storage();
        let config = ClientConfig {
            base_url: self.api_url.clone(),
            timeout: self.timeout,
        };
        let api = ApiClient::new(&config, Arc::clone(&storage))?;

        Ok(SessionManager::with_clock(
            api,
            storage,
            Arc::new(crate::clock::SystemClock),
            self.revalidate_interval,
        ))
    }
}
