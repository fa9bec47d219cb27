//! # Dental Types
//!
//! Shared domain and wire types for the dental clinic client.
//!
//! Contains:
//! - [`PatientIdentificationRecord`] and its partial/field companions, used by the intake form
//!   and embedded in patient resources
//! - Wire models for the backend resources (users, patients, appointments, clinical history)
//! - [`NonEmptyText`] for identifiers and search terms that must carry content
//!
//! Field names on the wire follow the backend (Spanish) naming; Rust field names are English
//! and mapped with `serde(rename)`.

mod identification;
mod models;
mod text;

pub use identification::{
    FieldKind, FieldValue, IdentificationField, PartialIdentification,
    PatientIdentificationRecord,
};
pub use models::{
    Acknowledgement, Appointment, AppointmentDraft, AppointmentStatus, AvailableHours,
    ClinicalHistoryEntry, Credentials, LoginResponse, PasswordChange, Patient, RecordId, Role,
    StatusUpdate, User, UserDraft,
};
pub use text::NonEmptyText;

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors raised when addressing identification fields by name or value kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The name does not match any identification field.
    #[error("unknown identification field: {0}")]
    UnknownField(String),

    /// A checkbox value was given for a text field, or the reverse.
    #[error("field {field} expects a {expected} value")]
    KindMismatch {
        field: IdentificationField,
        expected: FieldKind,
    },
}
