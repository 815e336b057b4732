//! Session manager: the authenticated/unauthenticated state machine.
//!
//! ```text
//! Uninitialized -> Initializing -> Authenticated | Unauthenticated
//! Unauthenticated --login--> Authenticated
//! Authenticated --logout | expiry | rejection--> Unauthenticated
//! ```
//!
//! The current [`Session`] is published on a `watch` channel; consumers read or
//! subscribe to it and never mutate it. Every way out of `Authenticated` goes through a
//! single teardown path that bumps a generation counter, so a revalidation task or a
//! rejection belonging to an older session can never end a newer one. Rejections are
//! matched to a session through the credential epoch the access layer hands out.
//!
//! `login()` is not guarded against concurrent invocation; callers must not start a
//! second login while one is outstanding.

mod error;
pub mod guard;
mod revalidate;
mod state;

pub use error::Error;
pub use guard::{require, Access, GuardError};
pub use state::{LogoutReason, Phase, Session};

use crate::{
    api::{ApiClient, Rejection},
    clock::{Clock, SystemClock},
    credential,
    identity::Identity,
    storage::{self, Storage, CREDENTIAL_KEY, IDENTITY_KEY},
};
use error::RestoreError;
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use std::{fmt, sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, info, instrument, warn};

/// Interval between local expiry checks of a live session.
pub const DEFAULT_REVALIDATE_INTERVAL: Duration = Duration::from_secs(300);

/// Cheap to clone; clones share one session. The revalidation task is cancelled when the
/// last clone is dropped or on [`SessionManager::shutdown`].
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

pub(crate) struct Inner {
    api: ApiClient,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    revalidate_every: Duration,
    state: watch::Sender<Session>,
    lifecycle: Mutex<Lifecycle>,
}

#[derive(Default)]
struct Lifecycle {
    generation: u64,
    credential_epoch: Option<u64>,
    revalidator: Option<JoinHandle<()>>,
    initialized: bool,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionManager")
            .field("phase", &self.inner.state.borrow().phase)
            .field("revalidate_every", &self.inner.revalidate_every)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    #[must_use]
    pub fn new(api: ApiClient, storage: Arc<dyn Storage>) -> Self {
        Self::with_clock(
            api,
            storage,
            Arc::new(SystemClock),
            DEFAULT_REVALIDATE_INTERVAL,
        )
    }

    /// Builds a manager with an explicit clock and revalidation interval, and subscribes
    /// it to the access layer's rejection events.
    #[must_use]
    pub fn with_clock(
        api: ApiClient,
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        revalidate_every: Duration,
    ) -> Self {
        let (state, _) = watch::channel(Session::default());

        let inner = Arc::new(Inner {
            api,
            storage,
            clock,
            revalidate_every,
            state,
            lifecycle: Mutex::new(Lifecycle::default()),
        });

        let weak = Arc::downgrade(&inner);
        inner.api.on_rejected(move |rejection| {
            if let Some(inner) = weak.upgrade() {
                inner.rejected(rejection);
            }
        });

        Self { inner }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Restores a session from the durable record. Runs once; later calls return the
    /// current snapshot. Never fails: any problem with the record purges it and ends in
    /// [`Phase::Unauthenticated`].
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Session {
        {
            let mut lifecycle = self.inner.lifecycle.lock();
            if lifecycle.initialized {
                return self.session();
            }
            lifecycle.initialized = true;
        }

        self.inner.state.send_if_modified(|session| {
            if session.phase == Phase::Uninitialized {
                session.phase = Phase::Initializing;
                true
            } else {
                false
            }
        });

        let storage = Arc::clone(&self.inner.storage);
        let now = self.inner.clock.now_unix();
        let restored = tokio::task::spawn_blocking(move || read_record(storage.as_ref(), now))
            .await
            .unwrap_or_else(|err| Err(RestoreError::Interrupted(err.to_string())));

        match restored {
            Ok(Some((credential, identity))) => {
                Inner::begin_session(&self.inner, credential, identity);
                info!("Session restored");
            }
            Ok(None) => {
                self.inner.state.send_if_modified(|session| {
                    if session.is_loading() {
                        *session = Session::unauthenticated(None);
                        true
                    } else {
                        false
                    }
                });
                debug!("No stored session");
            }
            Err(err) => {
                warn!("Discarding stored session: {err}");
                self.inner.end_session(None, LogoutReason::InvalidStoredSession);
            }
        }

        self.session()
    }

    /// Exchanges username and password for a credential and starts a session.
    ///
    /// # Errors
    /// Returns [`Error::LoginFailed`] with the backend's first message when the backend
    /// refuses, [`Error::InvalidCredentialFormat`] or [`Error::ExpiredOnIssue`] when the
    /// issued credential is unusable, and transport failures as [`Error::Api`]. No
    /// session state changes on failure; a failed write restores the previous record.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Identity, Error> {
        let envelope = self.inner.api.login(username, password).await?;

        if !envelope.success {
            let message = envelope.first_error().unwrap_or("Login failed").to_string();
            return Err(Error::LoginFailed(message));
        }

        let token = envelope
            .data
            .map(|data| data.token)
            .ok_or(Error::InvalidCredentialFormat(credential::Error::TokenFormat))?;

        let claims = credential::decode(&token).map_err(Error::InvalidCredentialFormat)?;
        if claims.is_expired(self.inner.clock.now_unix()) {
            return Err(Error::ExpiredOnIssue);
        }

        let identity = claims.identity();
        let credential = SecretString::from(token);

        self.inner.persist(&credential, &identity)?;

        Inner::begin_session(&self.inner, credential, identity.clone());
        info!(role = ?identity.role, "Logged in");

        Ok(identity)
    }

    /// Ends the session from any state. Idempotent.
    pub fn logout(&self) {
        self.inner.end_session(None, LogoutReason::UserRequested);
    }

    /// Cancels the revalidation task without touching the session or the durable record.
    pub fn shutdown(&self) {
        if let Some(handle) = self.inner.lifecycle.lock().revalidator.take() {
            handle.abort();
            debug!("revalidation cancelled");
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Receives every transition. The receiver's first value is the current snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity.clone()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().is_admin()
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.inner.state.borrow().is_super_admin()
    }
}

impl Inner {
    fn begin_session(this: &Arc<Self>, credential: SecretString, identity: Identity) {
        let mut lifecycle = this.lifecycle.lock();
        lifecycle.generation += 1;
        if let Some(handle) = lifecycle.revalidator.take() {
            handle.abort();
        }

        lifecycle.credential_epoch = Some(this.api.set_credential(credential.clone()));
        this.state.send_replace(Session::authenticated(identity, credential));

        lifecycle.revalidator = Some(revalidate::spawn(
            Arc::downgrade(this),
            lifecycle.generation,
            this.revalidate_every,
        ));
    }

    /// The single teardown path shared by logout, expiry and rejection. With
    /// `expected_generation` set, only that session may be ended.
    fn end_session(&self, expected_generation: Option<u64>, reason: LogoutReason) -> bool {
        let mut lifecycle = self.lifecycle.lock();
        if expected_generation.is_some_and(|generation| generation != lifecycle.generation) {
            return false;
        }

        lifecycle.generation += 1;
        lifecycle.credential_epoch = None;
        if let Some(handle) = lifecycle.revalidator.take() {
            handle.abort();
        }

        self.purge();
        self.api.clear_credential();

        let changed = self.state.send_if_modified(|session| {
            if session.phase == Phase::Unauthenticated {
                return false;
            }
            *session = Session::unauthenticated(Some(reason));
            true
        });

        if changed {
            info!(%reason, "Session ended");
        }
        true
    }

    /// Ends the session only when the rejected request carried its credential.
    fn rejected(&self, rejection: &Rejection) {
        let generation = {
            let lifecycle = self.lifecycle.lock();
            if lifecycle.credential_epoch != Some(rejection.epoch) {
                debug!(status = rejection.status, "rejection does not belong to this session");
                return;
            }
            lifecycle.generation
        };

        debug!(status = rejection.status, "rejection reported to session");
        self.end_session(Some(generation), LogoutReason::Rejected);
    }

    /// Periodic check; returns whether the session is still live.
    fn revalidate(&self, generation: u64) -> bool {
        let credential = self.state.borrow().credential.clone();
        let Some(credential) = credential else {
            return false;
        };

        match credential::validate(credential.expose_secret(), self.clock.now_unix()) {
            Ok(_) => {
                debug!("credential still valid");
                true
            }
            Err(err) => {
                warn!("Credential failed revalidation: {err}");
                self.end_session(Some(generation), LogoutReason::Expired);
                false
            }
        }
    }

    /// Writes both records. On failure the records this call already replaced are put
    /// back, so a live session keeps its durable record.
    fn persist(&self, credential: &SecretString, identity: &Identity) -> Result<(), storage::Error> {
        let identity = serde_json::to_string(identity)?;
        let mut replaced = Vec::with_capacity(2);

        for (key, value) in [
            (CREDENTIAL_KEY, credential.expose_secret()),
            (IDENTITY_KEY, identity.as_str()),
        ] {
            let written = self.storage.get(key).and_then(|previous| {
                self.storage.set(key, value)?;
                Ok(previous)
            });
            match written {
                Ok(previous) => replaced.push((key, previous)),
                Err(err) => {
                    self.restore(&replaced);
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn restore(&self, records: &[(&str, Option<String>)]) {
        for (key, previous) in records {
            let restored = match previous {
                Some(value) => self.storage.set(key, value),
                None => self.storage.remove(key),
            };
            if let Err(err) = restored {
                error!("Failed to restore stored {key}: {err}");
            }
        }
    }

    fn purge(&self) {
        for key in [CREDENTIAL_KEY, IDENTITY_KEY] {
            if let Err(err) = self.storage.remove(key) {
                error!("Failed to remove stored {key}: {err}");
            }
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.lifecycle.get_mut().revalidator.take() {
            handle.abort();
        }
    }
}

/// Reads and validates the durable record. `Ok(None)` when neither key is present.
fn read_record(
    storage: &dyn Storage,
    now_unix: i64,
) -> Result<Option<(SecretString, Identity)>, RestoreError> {
    let credential = storage.get(CREDENTIAL_KEY)?;
    let identity = storage.get(IDENTITY_KEY)?;

    let (credential, identity) = match (credential, identity) {
        (None, None) => return Ok(None),
        (Some(credential), Some(identity)) => (credential, identity),
        _ => return Err(RestoreError::Partial),
    };

    credential::validate(&credential, now_unix)?;
    let identity: Identity = serde_json::from_str(&identity).map_err(RestoreError::Identity)?;

    Ok(Some((SecretString::from(credential), identity)))
}
