//! Client errors and their normalised form.
//!
//! Every failed call lands in exactly one of three classes:
//! - the backend answered with a non-2xx status (or a body that could not be decoded)
//! - the request went out but no response arrived (connection refused, timeout, reset)
//! - the request was never sent (bad input, encoding failure, credential store failure)
//!
//! [`handle_api_error`] folds any [`ClientError`] into the flat [`ApiError`] shape used by
//! callers that only want a message and a status.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when the backend sends an error status without an `error` text.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Message used when a request was sent but no response came back.
pub const CONNECTIVITY_ERROR_MESSAGE: &str =
    "Connection error. Check your network connection and try again.";

/// Message used when a request could not be built or sent at all.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error";

/// Message used when a successful response carried a body of the wrong shape.
pub const INVALID_RESPONSE_MESSAGE: &str = "Unexpected response from server";

/// Status reported when no response arrived.
pub const NO_RESPONSE_STATUS: i32 = 0;

/// Status reported when the request was never sent.
pub const NOT_SENT_STATUS: i32 = -1;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with a non-success status. `body` is the decoded JSON payload, a
    /// JSON string for non-JSON text, or `null` when empty.
    #[error("server responded with status {status}")]
    Server { status: u16, body: Value },

    /// The backend answered with success but the body did not match the expected shape.
    #[error("failed to decode response with status {status}: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The request was dispatched and no response arrived.
    #[error("no response received: {0}")]
    Network(#[source] reqwest::Error),

    /// The transport refused to build or send the request.
    #[error("request could not be sent: {0}")]
    Request(#[source] reqwest::Error),

    /// The request body could not be serialised.
    #[error("failed to serialize request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Caller input was rejected before building the request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The session could not be read or updated; nothing was dispatched.
    #[error("credential store error: {0}")]
    Credentials(#[from] crate::session::StoreError),
}

impl ClientError {
    /// Classify a transport error: builder failures were never sent, everything else was.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ClientError::Request(err)
        } else {
            ClientError::Network(err)
        }
    }

    /// HTTP status of the response, when one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } | ClientError::Decode { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Whether the backend rejected the session.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn to_api_error(&self) -> ApiError {
        handle_api_error(self)
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Normalised failure: a human-readable message and a status.
///
/// `status` is the HTTP status when the backend answered, [`NO_RESPONSE_STATUS`] when nothing
/// came back and [`NOT_SENT_STATUS`] when the request never left the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (status {status})")]
pub struct ApiError {
    pub message: String,
    pub status: i32,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: i32) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }
}

impl From<&ClientError> for ApiError {
    fn from(err: &ClientError) -> Self {
        handle_api_error(err)
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        handle_api_error(&err)
    }
}

/// Fold a failed call into an [`ApiError`].
pub fn handle_api_error(err: &ClientError) -> ApiError {
    match err {
        ClientError::Server { status, body } => ApiError::new(
            server_message(body).unwrap_or(SERVER_ERROR_MESSAGE),
            i32::from(*status),
        ),
        ClientError::Decode { status, .. } => {
            ApiError::new(INVALID_RESPONSE_MESSAGE, i32::from(*status))
        }
        ClientError::Network(_) => ApiError::new(CONNECTIVITY_ERROR_MESSAGE, NO_RESPONSE_STATUS),
        ClientError::Request(_)
        | ClientError::Encode(_)
        | ClientError::InvalidInput(_)
        | ClientError::Credentials(_) => ApiError::new(UNEXPECTED_ERROR_MESSAGE, NOT_SENT_STATUS),
    }
}

/// The backend reports failures as `{"error": "..."}`; some routes use `message` instead.
fn server_message(body: &Value) -> Option<&str> {
    ["error", "message"]
        .into_iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
}
