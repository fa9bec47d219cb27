//! Endpoint groups, one per backend resource.
//!
//! Each function issues exactly one request and returns its decoded result or the failure.
//! Nothing here retries, caches or batches.

mod appointments;
mod auth;
mod history;
mod patients;
mod users;

pub use appointments::AppointmentsApi;
pub use auth::AuthApi;
pub use history::HistoryApi;
pub use patients::PatientsApi;
pub use users::UsersApi;

use crate::error::{ClientError, ClientResult};

/// Free text placed in a path segment. An empty segment would address a different route.
fn path_term<'t>(input: &'t str, what: &str) -> ClientResult<&'t str> {
    if input.is_empty() {
        return Err(ClientError::InvalidInput(format!("{what} cannot be empty")));
    }
    Ok(input)
}

/// Calendar dates travel as `YYYY-MM-DD` path segments.
fn date_segment(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
