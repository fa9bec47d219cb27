//! Shared transport and request interception.
//!
//! [`ApiClient`] owns one `reqwest::Client` configured once with the base URL, timeout and a
//! JSON content type. Each call goes through the same pipeline:
//!
//! 1. build the URL from percent-encoded path segments and query pairs (`%20` for spaces)
//! 2. outbound interception: read the session token and attach `Authorization: Bearer` to this
//!    request only (a store failure aborts before dispatch)
//! 3. dispatch once; no retries
//! 4. inbound interception: pass successes through; on 401 clear the session and invoke the
//!    [`UnauthorizedHandler`], then return the failure like any other error status

use crate::config::ClientConfig;
use crate::endpoints::{AppointmentsApi, AuthApi, HistoryApi, PatientsApi, UsersApi};
use crate::error::{ClientError, ClientResult};
use crate::session::Session;
use crate::unauthorized::{LogUnauthorized, UnauthorizedHandler};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A single backend call: method, path segments, query pairs and optional JSON body.
#[derive(Clone, Debug)]
pub(crate) struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| (*s).to_owned()).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn get(segments: &[&str]) -> Self {
        Self::new(Method::GET, segments)
    }

    pub(crate) fn post(segments: &[&str]) -> Self {
        Self::new(Method::POST, segments)
    }

    pub(crate) fn put(segments: &[&str]) -> Self {
        Self::new(Method::PUT, segments)
    }

    pub(crate) fn delete(segments: &[&str]) -> Self {
        Self::new(Method::DELETE, segments)
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub(crate) fn json(mut self, body: &impl Serialize) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body).map_err(ClientError::Encode)?);
        Ok(self)
    }

    /// Unencoded path for logging.
    fn display_path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// HTTP client for the clinic backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    session: Arc<Session>,
    on_unauthorized: Arc<dyn UnauthorizedHandler>,
}

impl ApiClient {
    /// Build the shared transport.
    ///
    /// Unauthorised responses are only logged until a handler is installed with
    /// [`ApiClient::with_unauthorized_handler`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] if the TLS backend cannot be initialised.
    pub fn new(config: ClientConfig, session: Arc<Session>) -> ClientResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(config),
            session,
            on_unauthorized: Arc::new(LogUnauthorized),
        })
    }

    pub fn with_unauthorized_handler(
        mut self,
        handler: impl UnauthorizedHandler + 'static,
    ) -> Self {
        self.on_unauthorized = Arc::new(handler);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn patients(&self) -> PatientsApi<'_> {
        PatientsApi::new(self)
    }

    pub fn appointments(&self) -> AppointmentsApi<'_> {
        AppointmentsApi::new(self)
    }

    pub fn history(&self) -> HistoryApi<'_> {
        HistoryApi::new(self)
    }

    /// Dispatch `request` and decode a JSON body into `T`.
    ///
    /// An empty success body decodes as `{}`.
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let response = self.dispatch(request).await?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ClientError::Network)?;

        let decoded = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(Value::Object(serde_json::Map::new()))
        } else {
            serde_json::from_slice(&bytes)
        };
        decoded.map_err(|source| ClientError::Decode {
            status: status.as_u16(),
            source,
        })
    }

    async fn dispatch(&self, request: ApiRequest) -> ClientResult<Response> {
        let url = self.endpoint_url(&request)?;
        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let builder = self.authorize(builder)?;

        tracing::debug!(
            method = %request.method,
            path = %request.display_path(),
            "dispatching request"
        );
        let response = builder.send().await.map_err(ClientError::from_transport)?;
        self.intercept_response(response).await
    }

    fn endpoint_url(&self, request: &ApiRequest) -> ClientResult<Url> {
        let mut url = self.config.base_url().clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidInput(format!(
                    "base URL {} cannot carry a path",
                    self.config.base_url()
                ))
            })?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            let query = request
                .query
                .iter()
                .map(|(key, value)| {
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
                })
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    /// Outbound interceptor: attach the session token, if any, to this request only.
    fn authorize(&self, builder: RequestBuilder) -> ClientResult<RequestBuilder> {
        match self.session.token()? {
            Some(token) => Ok(builder.header(AUTHORIZATION, format!("Bearer {token}"))),
            None => Ok(builder),
        }
    }

    /// Inbound interceptor: successes pass through, error statuses become
    /// [`ClientError::Server`]; 401 additionally ends the session.
    async fn intercept_response(&self, response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.bytes().await {
            Ok(bytes) => error_body(&bytes),
            Err(err) => {
                tracing::debug!("failed to read error body for status {status}: {err}");
                Value::Null
            }
        };

        if status == StatusCode::UNAUTHORIZED {
            self.end_session();
        }

        Err(ClientError::Server {
            status: status.as_u16(),
            body,
        })
    }

    fn end_session(&self) {
        // The transport carries no default authorization header; the session is the only
        // place the token lives.
        if let Err(err) = self.session.clear() {
            tracing::warn!("failed to clear stored credentials after 401: {err}");
        }
        let login_path = self.config.login_path();
        tracing::warn!("backend rejected the session; redirecting to {login_path}");
        self.on_unauthorized.on_unauthorized(login_path);
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url().as_str())
            .field("timeout", &self.config.timeout())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

fn error_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
