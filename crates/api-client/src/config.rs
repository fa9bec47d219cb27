//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and handed to [`crate::ApiClient`]. The
//! client never reads environment variables while dispatching requests; the `*_from_env_value`
//! helpers let binaries turn optional environment strings into typed settings up front.

use reqwest::Url;
use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Per-request timeout applied by the shared transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Location handed to the unauthorised handler when the backend rejects the session.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("base URL {0:?} cannot carry a path")]
    OpaqueBaseUrl(String),
    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
    login_path: String,
}

impl ClientConfig {
    /// Create a configuration for `base_url` with the default timeout and login path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `base_url` does not parse or is not hierarchical
    /// (for example `mailto:`), since endpoint paths are appended to it.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::OpaqueBaseUrl(base_url.to_owned()));
        }

        Ok(Self {
            base_url: parsed,
            timeout: DEFAULT_TIMEOUT,
            login_path: LOGIN_PATH.to_owned(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build a [`ClientConfig`] from an optional base URL string.
///
/// `None` or an empty/whitespace value selects [`DEFAULT_BASE_URL`].
pub fn config_from_env_value(value: Option<String>) -> Result<ClientConfig, ConfigError> {
    match non_empty(value) {
        Some(url) => ClientConfig::new(&url),
        None => ClientConfig::new(DEFAULT_BASE_URL),
    }
}

/// Parse a timeout given in whole seconds.
///
/// `None` or an empty/whitespace value selects [`DEFAULT_TIMEOUT`]; zero is rejected.
pub fn timeout_from_env_value(value: Option<String>) -> Result<Duration, ConfigError> {
    let Some(raw) = non_empty(value) else {
        return Ok(DEFAULT_TIMEOUT);
    };

    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw)),
    }
}
