//! # Dental Intake
//!
//! State controller for the patient identification section of the intake form.
//!
//! This crate owns no storage and performs no I/O:
//! - [`merge_identification`] seeds a record from defaults, known patient info and saved data
//! - [`IdentificationForm`] holds the current record, applies single-field edits and forwards
//!   every edit to a [`RecordOwner`]
//! - [`format_calendar_date`] normalises the birth date for display
//!
//! **No API concerns**: submitting the record belongs to `dental-api`.

mod date;
mod form;
mod merge;

pub use date::format_calendar_date;
pub use form::{IdentificationForm, RecordOwner};
pub use merge::{default_identification, merge_identification};

pub use dental_types::{
    FieldKind, FieldValue, IdentificationField, PartialIdentification,
    PatientIdentificationRecord,
};

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("invalid field change: {0}")]
    Field(#[from] dental_types::FieldError),
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;
