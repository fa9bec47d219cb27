//! Wire models for the clinic backend resources.
//!
//! Every response model keeps unrecognised keys in a flattened `extra` map so a record fetched
//! from the backend can be sent back without dropping data this crate does not model.

use crate::{NonEmptyText, PatientIdentificationRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend identifier for users, patients, appointments and history entries.
pub type RecordId = i64;

fn default_true() -> bool {
    true
}

// ============================================================================
// Auth
// ============================================================================

/// Login request body.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "usuario")]
    pub username: NonEmptyText,
    pub password: String,
}

impl Credentials {
    pub fn new(username: NonEmptyText, password: impl Into<String>) -> Self {
        Self {
            username,
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login: the bearer token plus the authenticated user when the backend sends it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Change-password request body for the signed-in user.
#[derive(Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    #[serde(rename = "password_actual")]
    pub current_password: String,
    #[serde(rename = "password_nuevo")]
    pub new_password: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "doctor")]
    Doctor,
    #[serde(rename = "recepcion")]
    Receptionist,
    #[serde(other, rename = "otro")]
    Other,
}

/// A staff account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "usuario", default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "activo", default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for creating a staff account.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "usuario")]
    pub username: NonEmptyText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "rol")]
    pub role: Role,
    pub password: String,
}

impl std::fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDraft")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Patients
// ============================================================================

/// A patient resource: backend id plus the identification record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: RecordId,
    #[serde(flatten)]
    pub identification: PatientIdentificationRecord,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Appointments
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "programada")]
    Scheduled,
    #[serde(rename = "confirmada")]
    Confirmed,
    #[serde(rename = "en_curso")]
    InProgress,
    #[serde(rename = "completada")]
    Completed,
    #[serde(rename = "cancelada")]
    Cancelled,
    #[serde(rename = "no_asistio")]
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 6] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "programada",
            AppointmentStatus::Confirmed => "confirmada",
            AppointmentStatus::InProgress => "en_curso",
            AppointmentStatus::Completed => "completada",
            AppointmentStatus::Cancelled => "cancelada",
            AppointmentStatus::NoShow => "no_asistio",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.wire_name() == s)
            .ok_or_else(|| format!("unknown appointment status: {s}"))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    #[serde(rename = "paciente_id")]
    pub patient_id: RecordId,
    pub doctor_id: RecordId,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "estado")]
    pub status: AppointmentStatus,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for booking an appointment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    #[serde(rename = "paciente_id")]
    pub patient_id: RecordId,
    pub doctor_id: RecordId,
    /// Calendar date, `YYYY-MM-DD`.
    #[serde(rename = "fecha")]
    pub date: String,
    /// Start time, `HH:MM`.
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "motivo", default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body for `PUT /citas/{id}/estado`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(rename = "estado")]
    pub status: AppointmentStatus,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Free start times (`HH:MM`) for one doctor on one date.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailableHours(pub Vec<String>);

impl AvailableHours {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

// ============================================================================
// Clinical history
// ============================================================================

/// One clinical history note. `id` is absent when creating.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalHistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "paciente_id")]
    pub patient_id: RecordId,
    #[serde(rename = "fecha", default)]
    pub date: String,
    #[serde(rename = "motivo_consulta", default)]
    pub reason: String,
    #[serde(rename = "diagnostico", default)]
    pub diagnosis: String,
    #[serde(rename = "tratamiento", default)]
    pub treatment: String,
    #[serde(rename = "observaciones", default)]
    pub notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Generic
// ============================================================================

/// Response of mutations: an optional message and, for creations, the new record's id.
///
/// Empty bodies decode to the default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(
        default,
        alias = "mensaje",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
