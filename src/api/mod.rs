//! Access layer: the single shared HTTP client of the backend.
//!
//! Every request passes through two interception points:
//!
//! - before sending, the current bearer credential (if any) is attached as
//!   `Authorization: Bearer <credential>`; without one the request goes out
//!   unauthenticated and the backend decides.
//! - after receiving, a `401`/`403` tears the session down immediately: the credential
//!   slot is cleared, both durable session records are removed, and registered rejection
//!   listeners (the session manager) are notified. The caller still receives the error.
//!
//! Every change of the credential slot starts a new epoch, and each request remembers
//! the epoch it was sent under. A rejection of a request sent under a replaced
//! credential is only returned to its caller; the current credential stays in place.
//!
//! Endpoint methods are thin wrappers; they live next to this module grouped by resource.

mod candidates;
mod departments;
mod employees;
mod envelope;
mod error;
mod history;
mod positions;
pub mod types;
mod users;

pub use envelope::Envelope;
pub use error::Error;

use crate::{
    storage::{Storage, CREDENTIAL_KEY, IDENTITY_KEY},
    APP_USER_AGENT,
};
use parking_lot::RwLock;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, RequestBuilder, Response, StatusCode,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, error, info_span, warn, Instrument};
use types::{LoginData, LoginRequest};

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;
const LOGIN_PATH: &str = "/api/v1/api/v1/users/login";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A `401`/`403` observed by the response interceptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub status: u16,
    pub path: String,
    /// Credential epoch the rejected request was sent under.
    pub epoch: u64,
}

type RejectionListener = Arc<dyn Fn(&Rejection) + Send + Sync>;

/// Cheap to clone; clones share the credential slot and listeners.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    base_url: String,
    credential: RwLock<CredentialSlot>,
    storage: Arc<dyn Storage>,
    listeners: RwLock<Vec<RejectionListener>>,
}

#[derive(Default)]
struct CredentialSlot {
    epoch: u64,
    credential: Option<SecretString>,
}

impl CredentialSlot {
    fn replace(&mut self, credential: Option<SecretString>) -> u64 {
        self.epoch += 1;
        self.credential = credential;
        self.epoch
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("has_credential", &self.has_credential())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, storage: Arc<dyn Storage>) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|err| Error::Request(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.base_url.trim().trim_end_matches('/').to_string(),
                credential: RwLock::new(CredentialSlot::default()),
                storage,
                listeners: RwLock::new(Vec::new()),
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Installs the credential attached to every subsequent request and returns the
    /// epoch it starts. Rejections carry the epoch of the request they answer.
    pub fn set_credential(&self, credential: SecretString) -> u64 {
        self.inner.credential.write().replace(Some(credential))
    }

    pub fn clear_credential(&self) {
        self.inner.credential.write().replace(None);
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.inner.credential.read().credential.is_some()
    }

    /// Registers a callback run after a `401`/`403` has torn the credential down.
    /// Listeners run without any client lock held.
    pub fn on_rejected(&self, listener: impl Fn(&Rejection) + Send + Sync + 'static) {
        self.inner.listeners.write().push(Arc::new(listener));
    }

    /// Exchanges username and password for a credential. The raw envelope is returned so
    /// the caller can tell a backend-reported failure from a transport one.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached or answers with an error status.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Envelope<LoginData>, Error> {
        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };
        self.post_json(LOGIN_PATH, &body).await
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, Error> {
        let builder = self.inner.http.get(self.url(path));
        self.send(path, builder).await
    }

    pub(crate) async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>, Error> {
        let builder = self.inner.http.get(self.url(path)).query(query);
        self.send(path, builder).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, Error> {
        let builder = self.inner.http.post(self.url(path)).json(body);
        self.send(path, builder).await
    }

    pub(crate) async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, Error> {
        let builder = self.inner.http.patch(self.url(path)).json(body);
        self.send(path, builder).await
    }

    pub(crate) async fn patch_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, Error> {
        let builder = self.inner.http.patch(self.url(path));
        self.send(path, builder).await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, Error> {
        let builder = self.inner.http.delete(self.url(path));
        self.send(path, builder).await
    }

    fn url(&self, path: &str) -> String {
        build_url_with_base(&self.inner.base_url, path)
    }

    /// Request interceptor. Returns the epoch the request is sent under.
    fn authorize(&self, builder: RequestBuilder) -> (RequestBuilder, u64) {
        let slot = self.inner.credential.read();
        let builder = match slot.credential.as_ref() {
            Some(credential) => builder.bearer_auth(credential.expose_secret()),
            None => builder,
        };
        (builder, slot.epoch)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<Envelope<T>, Error> {
        let (builder, epoch) = self.authorize(builder);
        let request = builder
            .build()
            .map_err(|err| Error::Request(err.to_string()))?;

        let span = info_span!("api.request", http.method = %request.method(), path = %path);

        async {
            let response = self
                .inner
                .http
                .execute(request)
                .await
                .map_err(|err| self.map_request_error(&err))?;

            let response = self.intercept_response(path, epoch, response).await?;

            response
                .json::<Envelope<T>>()
                .await
                .map_err(|err| Error::Decode(err.to_string()))
        }
        .instrument(span)
        .await
    }

    /// Response interceptor.
    async fn intercept_response(
        &self,
        path: &str,
        epoch: u64,
        response: Response,
    ) -> Result<Response, Error> {
        let status = response.status();
        debug!(status = status.as_u16(), "response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let messages = error_messages(&body);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.reject(&Rejection {
                status: status.as_u16(),
                path: path.to_string(),
                epoch,
            });
            return Err(Error::Rejected {
                status: status.as_u16(),
                message: messages.join("; "),
            });
        }

        if status.is_client_error() {
            Err(Error::Validation {
                status: status.as_u16(),
                errors: messages,
            })
        } else {
            Err(Error::Http {
                status: status.as_u16(),
                message: messages.join("; "),
            })
        }
    }

    fn reject(&self, rejection: &Rejection) {
        {
            let mut slot = self.inner.credential.write();
            if slot.epoch != rejection.epoch {
                debug!(
                    status = rejection.status,
                    path = %rejection.path,
                    "rejection answers a replaced credential, keeping session"
                );
                return;
            }
            slot.replace(None);
        }

        warn!(
            status = rejection.status,
            path = %rejection.path,
            "Backend rejected the credential, clearing session"
        );

        for key in [CREDENTIAL_KEY, IDENTITY_KEY] {
            if let Err(err) = self.inner.storage.remove(key) {
                error!("Failed to remove stored {key}: {err}");
            }
        }

        let listeners = self.inner.listeners.read().clone();
        for listener in listeners {
            listener(rejection);
        }
    }

    fn map_request_error(&self, err: &reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(format!(
                "No response from {} within the request timeout.",
                self.inner.base_url
            ))
        } else if err.is_connect() {
            Error::Unreachable(format!(
                "Cannot connect to backend server at {}. Please check that the server is running.",
                self.inner.base_url
            ))
        } else if err.is_builder() {
            Error::Request(err.to_string())
        } else {
            Error::Unreachable(format!("Unable to reach the server: {err}"))
        }
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Extracts user-facing messages from an error body: `errors[]`, then `message`
/// (string or list), then the sanitized raw body.
fn error_messages(body: &str) -> Vec<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for field in ["errors", "message"] {
            let messages = strings(value.get(field));
            if !messages.is_empty() {
                return messages;
            }
        }
    }

    let sanitized = sanitize_body(body);
    if sanitized.is_empty() {
        vec!["Request failed.".to_string()]
    } else {
        vec![sanitized]
    }
}

fn strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(message)) if !message.trim().is_empty() => vec![message.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Trims and truncates error bodies to keep user messages concise.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= MAX_ERROR_CHARS {
        return trimmed.to_string();
    }

    let mut truncated: String = trimmed.chars().take(MAX_ERROR_CHARS).collect();
    truncated.push('…');
    truncated
}
