//! In-process mock backend for client tests.
//!
//! Every request is recorded and answered by a caller-supplied responder. The server binds
//! `127.0.0.1:0` and lives until the test's runtime shuts down.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use dental_api::{ApiClient, ClientConfig, Session};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Captured {
    pub method: Method,
    /// Raw (still percent-encoded) request path.
    pub path: String,
    /// Raw (still percent-encoded) query string.
    pub raw_query: Option<String>,
    /// Decoded query pairs.
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn route(&self) -> (String, String) {
        (self.method.to_string(), self.path.clone())
    }
}

type Responder = Arc<dyn Fn(&Captured) -> (StatusCode, Value) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    captured: Arc<Mutex<Vec<Captured>>>,
    responder: Responder,
}

pub struct MockBackend {
    pub base_url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockBackend {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Captured) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            captured: captured.clone(),
            responder: Arc::new(responder),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            captured,
        }
    }

    /// Backend answering every request with `status` and `body`.
    pub async fn fixed(status: StatusCode, body: Value) -> Self {
        Self::start(move |_| (status, body.clone())).await
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().expect("captured lock").clone()
    }

    pub fn routes(&self) -> Vec<(String, String)> {
        self.requests().iter().map(Captured::route).collect()
    }

    pub fn client(&self, session: Arc<Session>) -> ApiClient {
        client_for(&self.base_url, session)
    }
}

pub fn client_for(base_url: &str, session: Arc<Session>) -> ApiClient {
    let config = ClientConfig::new(base_url)
        .expect("mock base url")
        .with_timeout(Duration::from_secs(5));
    ApiClient::new(config, session).expect("build client")
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let query = reqwest::Url::parse(&format!("http://mock{uri}"))
        .map(|url| url.query_pairs().into_owned().collect())
        .unwrap_or_default();
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };

    let captured = Captured {
        method,
        path: uri.path().to_string(),
        raw_query: uri.query().map(str::to_owned),
        query,
        headers,
        body,
    };
    let (status, reply) = (state.responder)(&captured);
    state.captured.lock().expect("captured lock").push(captured);

    if reply.is_null() {
        status.into_response()
    } else {
        (status, Json(reply)).into_response()
    }
}
