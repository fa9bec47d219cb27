//! # Dental API
//!
//! REST client for the dental clinic backend.
//!
//! Handles:
//! - One shared HTTP transport (base URL, 10 s timeout, JSON content type)
//! - Bearer-token injection from an explicit [`Session`] on every request
//! - 401 handling: clear the session, hand the login location to an [`UnauthorizedHandler`],
//!   and still return the failure to the caller
//! - Endpoint groups for auth, users, patients, appointments and clinical history
//! - Normalising any failure into [`ApiError`] via [`handle_api_error`]
//!
//! ```no_run
//! use std::sync::Arc;
//! use dental_api::{ApiClient, ClientConfig, Session};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("http://localhost:3000/api")?;
//! let client = ApiClient::new(config, Arc::new(Session::in_memory()))?
//!     .with_unauthorized_handler(|login: &str| eprintln!("please sign in at {login}"));
//!
//! match client.patients().search("Garcia").await {
//!     Ok(patients) => println!("{} matches", patients.len()),
//!     Err(err) => eprintln!("{}", dental_api::handle_api_error(&err)),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(rust_2018_idioms)]

mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod session;
mod unauthorized;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use endpoints::{AppointmentsApi, AuthApi, HistoryApi, PatientsApi, UsersApi};
pub use error::{handle_api_error, ApiError, ClientError, ClientResult};
pub use session::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, Session, StoreError,
};
pub use unauthorized::{LogUnauthorized, UnauthorizedHandler};
