mod common;

use axum::http::StatusCode;
use common::{client_for, MockBackend};
use dental_api::error::{
    CONNECTIVITY_ERROR_MESSAGE, INVALID_RESPONSE_MESSAGE, SERVER_ERROR_MESSAGE,
    UNEXPECTED_ERROR_MESSAGE,
};
use dental_api::{
    handle_api_error, ApiError, ClientError, CredentialStore, MemoryCredentialStore, Session,
    StoreError,
};
use dental_types::Acknowledgement;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn session_with_token(token: &str) -> Arc<Session> {
    Arc::new(Session::new(MemoryCredentialStore::with_token(token)))
}

#[tokio::test]
async fn bearer_token_is_attached_when_stored() {
    let backend = MockBackend::fixed(StatusCode::OK, json!([])).await;
    let client = backend.client(session_with_token("tok-123"));

    client.patients().list().await.expect("list patients");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].header("authorization"), Some("Bearer tok-123"));
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let backend = MockBackend::fixed(StatusCode::OK, json!([])).await;
    let client = backend.client(Arc::new(Session::in_memory()));

    client.appointments().today().await.expect("today");

    assert_eq!(backend.requests()[0].header("authorization"), None);
}

#[tokio::test]
async fn token_is_read_at_dispatch_time() {
    let backend = MockBackend::fixed(StatusCode::OK, json!([])).await;
    let session = Arc::new(Session::in_memory());
    let client = backend.client(session.clone());

    client.users().list().await.expect("anonymous call");
    session.set_token("fresh").expect("store token");
    client.users().list().await.expect("authenticated call");

    let requests = backend.requests();
    assert_eq!(requests[0].header("authorization"), None);
    assert_eq!(requests[1].header("authorization"), Some("Bearer fresh"));
}

#[tokio::test]
async fn requests_carry_json_content_type() {
    let backend = MockBackend::fixed(StatusCode::OK, json!({ "message": "ok" })).await;
    let client = backend.client(Arc::new(Session::in_memory()));

    client.patients().delete(4).await.expect("delete");

    assert_eq!(
        backend.requests()[0].header("content-type"),
        Some("application/json")
    );
}

#[tokio::test]
async fn unauthorized_clears_session_redirects_and_still_fails() {
    let backend =
        MockBackend::fixed(StatusCode::UNAUTHORIZED, json!({ "error": "Token expirado" })).await;
    let session = session_with_token("stale");
    let redirects = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen = redirects.clone();
    let client = backend
        .client(session.clone())
        .with_unauthorized_handler(move |login: &str| {
            seen.lock().expect("redirect lock").push(login.to_owned())
        });

    let err = client.patients().list().await.expect_err("401 propagates");

    assert!(err.is_unauthorized());
    assert_eq!(
        handle_api_error(&err),
        ApiError::new("Token expirado", 401)
    );
    assert_eq!(session.token().expect("read session"), None);
    assert_eq!(*redirects.lock().expect("redirect lock"), vec!["/login"]);

    client.patients().list().await.expect_err("still 401");
    assert_eq!(backend.requests()[1].header("authorization"), None);
}

#[tokio::test]
async fn other_error_statuses_leave_the_session_alone() {
    let backend =
        MockBackend::fixed(StatusCode::FORBIDDEN, json!({ "error": "Sin permiso" })).await;
    let session = session_with_token("tok");
    let redirected = Arc::new(Mutex::new(false));
    let flag = redirected.clone();
    let client = backend
        .client(session.clone())
        .with_unauthorized_handler(move |_: &str| *flag.lock().expect("flag lock") = true);

    let err = client.users().doctors().await.expect_err("403");

    assert_eq!(err.status(), Some(403));
    assert_eq!(session.token().expect("read").as_deref(), Some("tok"));
    assert!(!*redirected.lock().expect("flag lock"));
}

#[tokio::test]
async fn server_error_normalises_to_payload_message() {
    let backend =
        MockBackend::fixed(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" })).await;
    let client = backend.client(Arc::new(Session::in_memory()));

    let err = client.history().get(3).await.expect_err("500");

    assert_eq!(handle_api_error(&err), ApiError::new("boom", 500));
}

#[tokio::test]
async fn server_error_without_text_uses_fallback() {
    let backend = MockBackend::fixed(StatusCode::BAD_GATEWAY, serde_json::Value::Null).await;
    let client = backend.client(Arc::new(Session::in_memory()));

    let err = client.patients().get(1).await.expect_err("502");

    assert_eq!(
        handle_api_error(&err),
        ApiError::new(SERVER_ERROR_MESSAGE, 502)
    );
}

#[tokio::test]
async fn unreachable_backend_normalises_to_connectivity_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve port");
        listener.local_addr().expect("addr").port()
    };
    let client = client_for(
        &format!("http://127.0.0.1:{port}/api"),
        Arc::new(Session::in_memory()),
    );

    let err = client.patients().list().await.expect_err("no backend");

    assert!(matches!(err, ClientError::Network(_)), "got {err:?}");
    assert_eq!(
        handle_api_error(&err),
        ApiError::new(CONNECTIVITY_ERROR_MESSAGE, 0)
    );
}

struct BrokenStore;

impl CredentialStore for BrokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn save(&self, _token: &str) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }

    fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }
}

#[tokio::test]
async fn credential_store_failure_aborts_before_dispatch() {
    let backend = MockBackend::fixed(StatusCode::OK, json!([])).await;
    let client = backend.client(Arc::new(Session::new(BrokenStore)));

    let err = client.patients().list().await.expect_err("store failure");

    assert!(matches!(err, ClientError::Credentials(_)));
    assert_eq!(
        handle_api_error(&err),
        ApiError::new(UNEXPECTED_ERROR_MESSAGE, -1)
    );
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn search_text_is_sent_as_given() {
    let backend = MockBackend::fixed(StatusCode::OK, json!([])).await;
    let client = backend.client(Arc::new(Session::in_memory()));

    client.patients().search(" Ana ").await.expect("padded query");
    client.patients().search("").await.expect("empty query");
    client.history().search("  ").await.expect("blank term");

    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].query, vec![("q".to_string(), " Ana ".to_string())]);
    assert_eq!(requests[0].raw_query.as_deref(), Some("q=%20Ana%20"));
    assert_eq!(requests[1].query, vec![("q".to_string(), String::new())]);
    assert_eq!(requests[2].path, "/api/historial/buscar/%20%20");
}

#[tokio::test]
async fn empty_history_term_is_rejected_without_a_request() {
    let backend = MockBackend::fixed(StatusCode::OK, json!([])).await;
    let client = backend.client(Arc::new(Session::in_memory()));

    let err = client.history().search("").await.expect_err("empty term");

    assert!(matches!(err, ClientError::InvalidInput(_)));
    assert_eq!(handle_api_error(&err).status, -1);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn empty_success_body_decodes_as_acknowledgement() {
    let backend = MockBackend::fixed(StatusCode::NO_CONTENT, serde_json::Value::Null).await;
    let client = backend.client(Arc::new(Session::in_memory()));

    let ack = client.appointments().delete(12).await.expect("delete");

    assert_eq!(ack, Acknowledgement::default());
}

#[tokio::test]
async fn mismatched_success_body_is_a_decode_error() {
    let backend = MockBackend::fixed(StatusCode::OK, json!({ "unexpected": true })).await;
    let client = backend.client(Arc::new(Session::in_memory()));

    let err = client.patients().list().await.expect_err("object is not a list");

    assert!(matches!(err, ClientError::Decode { status: 200, .. }));
    assert_eq!(
        handle_api_error(&err),
        ApiError::new(INVALID_RESPONSE_MESSAGE, 200)
    );
}
