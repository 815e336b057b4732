#![allow(clippy::unwrap_used)]

use anyhow::{bail, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use hrdesk::{
    api::{ApiClient, ClientConfig},
    clock::ManualClock,
    identity::Role,
    session::{self, LogoutReason, Phase, SessionManager, DEFAULT_REVALIDATE_INTERVAL},
    storage::{self, MemoryStorage, Storage, CREDENTIAL_KEY, IDENTITY_KEY},
};
use secrecy::SecretString;
use serde_json::json;
use std::{
    io,
    net::TcpListener,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const NOW: i64 = 1_700_000_000;

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn token(claims: &serde_json::Value) -> String {
    let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

fn setup(base_url: &str, storage: &Arc<MemoryStorage>, clock: &Arc<ManualClock>) -> SessionManager {
    let config = ClientConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(2),
    };
    let api = ApiClient::new(&config, storage.clone()).unwrap();
    SessionManager::with_clock(api, storage.clone(), clock.clone(), DEFAULT_REVALIDATE_INTERVAL)
}

/// Memory storage whose identity writes can be made to fail.
#[derive(Debug, Default)]
struct FlakyStorage {
    entries: MemoryStorage,
    fail_identity_writes: AtomicBool,
}

impl Storage for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, storage::Error> {
        self.entries.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), storage::Error> {
        if key == IDENTITY_KEY && self.fail_identity_writes.load(Ordering::SeqCst) {
            return Err(storage::Error::Io {
                path: PathBuf::from("state.json"),
                source: io::Error::other("disk full"),
            });
        }
        self.entries.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), storage::Error> {
        self.entries.remove(key)
    }
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v1/api/v1/users/login"))
        .and(body_json(json!({ "username": "alice", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "status": "ok", "token": token }
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_authenticates_and_persists() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    let issued = token(&json!({
        "id": "64f1c0",
        "username": "alice",
        "role": "admin",
        "exp": NOW + 3600
    }));
    mount_login(&server, &issued).await;

    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(NOW);
    let manager = setup(&server.uri(), &storage, &clock);
    manager.initialize().await;

    let identity = manager
        .login("alice", &SecretString::from("secret"))
        .await?;

    assert_eq!(identity.id, "64f1c0");
    assert_eq!(identity.role, Some(Role::Admin));
    assert!(manager.is_authenticated());
    assert!(manager.is_admin());
    assert!(!manager.is_super_admin());
    assert_eq!(storage.get(CREDENTIAL_KEY)?.as_deref(), Some(issued.as_str()));

    let Some(stored) = storage.get(IDENTITY_KEY)? else {
        bail!("identity record missing after login");
    };
    let stored: serde_json::Value = serde_json::from_str(&stored)?;
    assert_eq!(stored["_id"], "64f1c0");
    assert_eq!(stored["username"], "alice");
    assert_eq!(stored["role"], "admin");
    Ok(())
}

#[tokio::test]
async fn test_next_request_carries_issued_credential() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    let issued = token(&json!({ "id": "1", "username": "alice", "role": "superadmin", "exp": NOW + 3600 }));
    mount_login(&server, &issued).await;

    let bearer = format!("Bearer {issued}");
    Mock::given(method("GET"))
        .and(path("/api/v1/employee"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "employees": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(NOW);
    let manager = setup(&server.uri(), &storage, &clock);
    manager.initialize().await;
    manager
        .login("alice", &SecretString::from("secret"))
        .await?;

    let employees = manager.api().list_employees().await?.into_data()?;
    assert!(employees.employees.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_login_failure_changes_nothing() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/api/v1/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": null,
            "errors": ["Invalid username or password"]
        })))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(NOW);
    let manager = setup(&server.uri(), &storage, &clock);
    manager.initialize().await;

    let err = manager
        .login("alice", &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, session::Error::LoginFailed(_)));
    assert_eq!(err.to_string(), "Invalid username or password");
    assert_eq!(manager.session().phase, Phase::Unauthenticated);
    assert!(storage.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_login_rejects_unusable_credentials() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/api/v1/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "status": "ok", "token": "garbage" }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let expired = token(&json!({ "id": "1", "exp": NOW - 1 }));
    Mock::given(method("POST"))
        .and(path("/api/v1/api/v1/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "status": "ok", "token": expired }
        })))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(NOW);
    let manager = setup(&server.uri(), &storage, &clock);
    manager.initialize().await;

    let err = manager
        .login("alice", &SecretString::from("secret"))
        .await
        .unwrap_err();
    assert!(matches!(err, session::Error::InvalidCredentialFormat(_)));

    let err = manager
        .login("alice", &SecretString::from("secret"))
        .await
        .unwrap_err();
    assert!(matches!(err, session::Error::ExpiredOnIssue));

    assert!(!manager.is_authenticated());
    assert!(storage.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_forbidden_response_ends_session_immediately() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/departments"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": ["Token revoked"]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/departments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "data": [] }
        })))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(NOW);
    storage.set(
        CREDENTIAL_KEY,
        &token(&json!({ "id": "1", "username": "alice", "role": "admin", "exp": NOW + 3600 })),
    )?;
    storage.set(IDENTITY_KEY, r#"{"_id":"1","username":"alice","role":"admin"}"#)?;

    let manager = setup(&server.uri(), &storage, &clock);
    assert!(manager.initialize().await.is_authenticated());

    let err = manager.api().list_departments().await.unwrap_err();
    assert!(err.is_rejected());

    let session = manager.session();
    assert_eq!(session.phase, Phase::Unauthenticated);
    assert_eq!(session.last_logout, Some(LogoutReason::Rejected));
    assert!(storage.is_empty());

    manager.api().list_departments().await?;

    let requests = server.received_requests().await.unwrap_or_default();
    let Some(last) = requests.last() else {
        bail!("expected recorded requests");
    };
    assert!(!last.headers.contains_key("authorization"));
    Ok(())
}

#[tokio::test]
async fn test_expired_record_at_startup_is_purged() -> Result<()> {
    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(NOW);
    storage.set(
        CREDENTIAL_KEY,
        &token(&json!({ "id": "1", "username": "alice", "role": "admin", "exp": NOW - 10 })),
    )?;
    storage.set(IDENTITY_KEY, r#"{"_id":"1","username":"alice","role":"admin"}"#)?;

    let manager = setup("http://127.0.0.1:9", &storage, &clock);
    let session = manager.initialize().await;

    assert!(!session.is_authenticated());
    assert!(!manager.is_loading());
    assert!(storage.is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_expiry_mid_session_logs_out_within_one_tick() -> Result<()> {
    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(NOW);
    storage.set(
        CREDENTIAL_KEY,
        &token(&json!({ "id": "1", "username": "alice", "role": "admin", "exp": NOW + 30 })),
    )?;
    storage.set(IDENTITY_KEY, r#"{"_id":"1","username":"alice","role":"admin"}"#)?;

    let manager = setup("http://127.0.0.1:9", &storage, &clock);
    manager.initialize().await;
    let mut updates = manager.subscribe();
    updates.borrow_and_update();

    clock.advance(31);
    tokio::time::timeout(DEFAULT_REVALIDATE_INTERVAL + Duration::from_secs(1), updates.changed())
        .await??;

    let session = updates.borrow_and_update().clone();
    assert_eq!(session.phase, Phase::Unauthenticated);
    assert_eq!(session.last_logout, Some(LogoutReason::Expired));
    assert!(storage.is_empty());
    assert!(!manager.api().has_credential());

    tokio::time::sleep(DEFAULT_REVALIDATE_INTERVAL * 4).await;
    assert!(!updates.has_changed()?);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_logout_cancels_revalidation_of_old_session() -> Result<()> {
    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(NOW);
    storage.set(
        CREDENTIAL_KEY,
        &token(&json!({ "id": "1", "username": "alice", "role": "admin", "exp": NOW + 30 })),
    )?;
    storage.set(IDENTITY_KEY, r#"{"_id":"1","username":"alice","role":"admin"}"#)?;

    let manager = setup("http://127.0.0.1:9", &storage, &clock);
    manager.initialize().await;
    manager.logout();
    manager.logout();

    let mut updates = manager.subscribe();
    updates.borrow_and_update();

    clock.advance(3600);
    tokio::time::sleep(DEFAULT_REVALIDATE_INTERVAL * 2).await;

    assert!(!updates.has_changed()?);
    assert_eq!(
        manager.session().last_logout,
        Some(LogoutReason::UserRequested)
    );
    Ok(())
}

#[tokio::test]
async fn test_late_rejection_from_earlier_session_keeps_new_session() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/departments"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "success": false, "errors": ["jwt expired"] })),
        )
        .mount(&server)
        .await;

    let renewed = token(&json!({ "id": "2", "username": "alice", "role": "admin", "exp": NOW + 3600 }));
    mount_login(&server, &renewed).await;

    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(NOW);
    storage.set(
        CREDENTIAL_KEY,
        &token(&json!({ "id": "1", "username": "alice", "role": "admin", "exp": NOW + 3600 })),
    )?;
    storage.set(IDENTITY_KEY, r#"{"_id":"1","username":"alice","role":"admin"}"#)?;

    let manager = setup(&server.uri(), &storage, &clock);
    assert!(manager.initialize().await.is_authenticated());

    let pending = {
        let api = manager.api().clone();
        tokio::spawn(async move { api.list_departments().await })
    };
    tokio::time::timeout(Duration::from_secs(2), async {
        while server.received_requests().await.unwrap_or_default().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await?;

    manager.logout();
    manager
        .login("alice", &SecretString::from("secret"))
        .await?;

    let err = pending.await?.unwrap_err();
    assert!(err.is_rejected());

    assert!(manager.is_authenticated());
    assert!(manager.api().has_credential());
    assert_eq!(manager.identity().map(|identity| identity.id), Some("2".to_string()));
    assert_eq!(storage.get(CREDENTIAL_KEY)?.as_deref(), Some(renewed.as_str()));
    assert!(storage.get(IDENTITY_KEY)?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_failed_persist_keeps_live_session_record() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    let renewed = token(&json!({ "id": "2", "username": "alice", "role": "admin", "exp": NOW + 3600 }));
    mount_login(&server, &renewed).await;

    let current = token(&json!({ "id": "1", "username": "alice", "role": "admin", "exp": NOW + 3600 }));
    let current_identity = r#"{"_id":"1","username":"alice","role":"admin"}"#;
    let storage = Arc::new(FlakyStorage::default());
    storage.set(CREDENTIAL_KEY, &current)?;
    storage.set(IDENTITY_KEY, current_identity)?;

    let config = ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(2),
    };
    let api = ApiClient::new(&config, storage.clone())?;
    let manager = SessionManager::with_clock(
        api,
        storage.clone(),
        ManualClock::new(NOW),
        DEFAULT_REVALIDATE_INTERVAL,
    );
    assert!(manager.initialize().await.is_authenticated());

    storage.fail_identity_writes.store(true, Ordering::SeqCst);
    let err = manager
        .login("alice", &SecretString::from("secret"))
        .await
        .unwrap_err();
    assert!(matches!(err, session::Error::Storage(_)));

    assert!(manager.is_authenticated());
    assert_eq!(manager.identity().map(|identity| identity.id), Some("1".to_string()));
    assert_eq!(storage.get(CREDENTIAL_KEY)?.as_deref(), Some(current.as_str()));
    assert_eq!(storage.get(IDENTITY_KEY)?.as_deref(), Some(current_identity));
    Ok(())
}
