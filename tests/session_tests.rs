//! Integration tests for the session lifecycle against a mock server.
//!
//! Covers the login/logout/initialize contract: state, persisted token,
//! and the outbound bearer header move together on success and stay
//! untouched on failure.

use std::sync::Arc;

use planpay::api::ApiClient;
use planpay::auth::SessionManager;
use planpay::storage::{FileTokenStore, MemoryTokenStore, TokenStore};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager(base_url: String, store: Arc<dyn TokenStore>) -> SessionManager {
    let api = ApiClient::new(base_url).expect("client should build");
    SessionManager::new(api, store).expect("manager should build")
}

#[tokio::test]
async fn successful_login_updates_state_store_and_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "a@x.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok123",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = manager(server.uri(), store.clone());

    session
        .login("a@x.com", "pw")
        .await
        .expect("login should succeed");

    assert!(session.is_authenticated());
    assert_eq!(session.token().as_deref(), Some("tok123"));
    assert_eq!(store.load().expect("load").as_deref(), Some("tok123"));
    assert_eq!(
        session.api().authorization_header().as_deref(),
        Some("Bearer tok123")
    );
    assert!(session.user().is_none());
}

#[tokio::test]
async fn failed_login_leaves_everything_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "bad credentials"})),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = manager(server.uri(), store.clone());

    let err = session
        .login("a@x.com", "wrong")
        .await
        .expect_err("login should fail");
    assert_eq!(err.message(), "bad credentials");
    assert_eq!(err.to_string(), "bad credentials");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));

    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert!(store.load().expect("load").is_none());
    assert!(session.api().authorization_header().is_none());
}

#[tokio::test]
async fn failed_login_preserves_an_existing_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("old-tok"));
    let session = manager(server.uri(), store.clone());
    session.initialize();

    let err = session
        .login("a@x.com", "pw")
        .await
        .expect_err("login should fail");
    // Non-JSON body carries no detail, so the generic message applies
    assert_eq!(err.message(), "Login failed");

    assert_eq!(session.token().as_deref(), Some("old-tok"));
    assert_eq!(store.load().expect("load").as_deref(), Some("old-tok"));
    assert_eq!(
        session.api().authorization_header().as_deref(),
        Some("Bearer old-tok")
    );
}

#[tokio::test]
async fn logout_clears_state_store_and_header() {
    let store = Arc::new(MemoryTokenStore::with_token("tok"));
    let session = manager("http://localhost:9".to_string(), store.clone());
    session.initialize();
    assert!(session.is_authenticated());
    assert!(session.api().authorization_header().is_some());

    session.logout().expect("logout should succeed");

    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert!(store.load().expect("load").is_none());
    assert!(session.api().authorization_header().is_none());

    // Logging out of a cleared session is fine
    session.logout().expect("second logout should succeed");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let store = Arc::new(MemoryTokenStore::with_token("tok42"));
    let session = manager("http://localhost:9".to_string(), store);

    // Construction restores the token but does not arm the header
    assert!(session.is_authenticated());
    assert!(session.api().authorization_header().is_none());

    session.initialize();
    let armed = session.api().authorization_header();
    assert_eq!(armed.as_deref(), Some("Bearer tok42"));

    for _ in 0..5 {
        session.initialize();
    }
    assert_eq!(session.api().authorization_header(), armed);
}

#[tokio::test]
async fn initialize_without_a_token_is_a_noop() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = manager("http://localhost:9".to_string(), store);

    session.initialize();
    session.initialize();

    assert!(!session.is_authenticated());
    assert!(session.api().authorization_header().is_none());
}

#[tokio::test]
async fn login_then_fresh_manager_restores_the_same_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "persisted-tok",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    let dir = std::env::temp_dir().join(format!("planpay-roundtrip-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    {
        let store = Arc::new(FileTokenStore::new(dir.clone()));
        let session = manager(server.uri(), store);
        session.login("a@x.com", "pw").await.expect("login");
        assert_eq!(
            session.api().authorization_header().as_deref(),
            Some("Bearer persisted-tok")
        );
    }

    // Simulate a restart: fresh client and manager over the same directory
    let store = Arc::new(FileTokenStore::new(dir.clone()));
    let session = manager(server.uri(), store);
    assert!(session.is_authenticated());
    assert!(session.api().authorization_header().is_none());

    session.initialize();
    assert_eq!(
        session.api().authorization_header().as_deref(),
        Some("Bearer persisted-tok")
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn register_success_does_not_log_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "name": "Ada",
            "email": "ada@x.com",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "ada@x.com",
            "name": "Ada",
            "created_at": "2024-05-01T10:30:00"
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = manager(server.uri(), store.clone());

    session
        .register("Ada", "ada@x.com", "pw")
        .await
        .expect("register should succeed");

    assert!(!session.is_authenticated());
    assert!(store.load().expect("load").is_none());
    assert!(session.api().authorization_header().is_none());
}

#[tokio::test]
async fn register_failure_without_detail_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "nope"})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = manager(server.uri(), store);

    let err = session
        .register("Ada", "ada@x.com", "pw")
        .await
        .expect_err("register should fail");
    assert_eq!(err.message(), "Registration failed");
}

#[tokio::test]
async fn register_failure_uses_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Email already registered"})),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = manager(server.uri(), store);

    let err = session
        .register("Ada", "ada@x.com", "pw")
        .await
        .expect_err("register should fail");
    assert_eq!(err.message(), "Email already registered");
}
