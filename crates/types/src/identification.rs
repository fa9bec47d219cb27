//! Patient identification record and its field addressing.
//!
//! The record is the state behind the intake form's identification section. It is always fully
//! populated: missing input falls back to `""` for text fields and `false` for the insurance
//! flag. [`PartialIdentification`] carries the same fields as options and is what callers
//! supply when seeding the record.

use crate::FieldError;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Field addressing
// ============================================================================

/// Input kind of an identification field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text (including select-style inputs such as sex).
    Text,
    /// Calendar date carried as text.
    Date,
    /// Checkbox; the value is the checked state.
    Checkbox,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Checkbox => "checkbox",
        })
    }
}

/// One named field of [`PatientIdentificationRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentificationField {
    Name,
    PaternalSurname,
    MaternalSurname,
    Sex,
    BirthDate,
    Birthplace,
    Origin,
    EthnicGroup,
    Religion,
    TaxId,
    Address,
    Phone,
    Mobile,
    Email,
    Insured,
    Institution,
    AffiliationNumber,
}

impl IdentificationField {
    /// Every field, in form order.
    pub const ALL: [IdentificationField; 17] = [
        IdentificationField::Name,
        IdentificationField::PaternalSurname,
        IdentificationField::MaternalSurname,
        IdentificationField::Sex,
        IdentificationField::BirthDate,
        IdentificationField::Birthplace,
        IdentificationField::Origin,
        IdentificationField::EthnicGroup,
        IdentificationField::Religion,
        IdentificationField::TaxId,
        IdentificationField::Address,
        IdentificationField::Phone,
        IdentificationField::Mobile,
        IdentificationField::Email,
        IdentificationField::Insured,
        IdentificationField::Institution,
        IdentificationField::AffiliationNumber,
    ];

    /// Name used on the wire and by form input events.
    pub fn wire_name(self) -> &'static str {
        match self {
            IdentificationField::Name => "nombre",
            IdentificationField::PaternalSurname => "apellido_paterno",
            IdentificationField::MaternalSurname => "apellido_materno",
            IdentificationField::Sex => "sexo",
            IdentificationField::BirthDate => "fecha_nacimiento",
            IdentificationField::Birthplace => "lugar_nacimiento",
            IdentificationField::Origin => "originario",
            IdentificationField::EthnicGroup => "grupo_etnico",
            IdentificationField::Religion => "religion",
            IdentificationField::TaxId => "rfc",
            IdentificationField::Address => "domicilio",
            IdentificationField::Phone => "telefono",
            IdentificationField::Mobile => "celular",
            IdentificationField::Email => "email",
            IdentificationField::Insured => "derecho_habiente",
            IdentificationField::Institution => "institucion",
            IdentificationField::AffiliationNumber => "numero_filiacion",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            IdentificationField::Insured => FieldKind::Checkbox,
            IdentificationField::BirthDate => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    /// Fields shown only while the patient has insurance affiliation.
    pub fn requires_insurance(self) -> bool {
        matches!(
            self,
            IdentificationField::Institution | IdentificationField::AffiliationNumber
        )
    }
}

impl std::fmt::Display for IdentificationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl std::str::FromStr for IdentificationField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdentificationField::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_owned()))
    }
}

/// Value carried by a field change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// String value of a text/date/select input.
    Text(String),
    /// Checked state of a checkbox input.
    Checked(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Checked(value)
    }
}

// ============================================================================
// Records
// ============================================================================

/// Fully populated patient identification data.
///
/// Missing keys and JSON `null` both decode to the field's default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientIdentificationRecord {
    #[serde(rename = "nombre", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "apellido_paterno", deserialize_with = "null_as_default")]
    pub paternal_surname: String,
    #[serde(rename = "apellido_materno", deserialize_with = "null_as_default")]
    pub maternal_surname: String,
    #[serde(rename = "sexo", deserialize_with = "null_as_default")]
    pub sex: String,
    #[serde(rename = "fecha_nacimiento", deserialize_with = "null_as_default")]
    pub birth_date: String,
    #[serde(rename = "lugar_nacimiento", deserialize_with = "null_as_default")]
    pub birthplace: String,
    #[serde(rename = "originario", deserialize_with = "null_as_default")]
    pub origin: String,
    #[serde(rename = "grupo_etnico", deserialize_with = "null_as_default")]
    pub ethnic_group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub religion: String,
    #[serde(rename = "rfc", deserialize_with = "null_as_default")]
    pub tax_id: String,
    #[serde(rename = "domicilio", deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(rename = "telefono", deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(rename = "celular", deserialize_with = "null_as_default")]
    pub mobile: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(rename = "derecho_habiente", deserialize_with = "null_as_default")]
    pub insured: bool,
    #[serde(rename = "institucion", deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(rename = "numero_filiacion", deserialize_with = "null_as_default")]
    pub affiliation_number: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PatientIdentificationRecord {
    /// Read a field as a [`FieldValue`].
    pub fn get(&self, field: IdentificationField) -> FieldValue {
        match field {
            IdentificationField::Insured => FieldValue::Checked(self.insured),
            other => FieldValue::Text(self.text(other).to_owned()),
        }
    }

    /// Replace a single field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::KindMismatch`] when a checkbox value targets a text field or a text
    /// value targets the insurance checkbox. The record is unchanged in that case.
    pub fn set(&mut self, field: IdentificationField, value: FieldValue) -> Result<(), FieldError> {
        match (field, value) {
            (IdentificationField::Insured, FieldValue::Checked(checked)) => {
                self.insured = checked;
                Ok(())
            }
            (IdentificationField::Insured, FieldValue::Text(_)) => Err(FieldError::KindMismatch {
                field,
                expected: FieldKind::Checkbox,
            }),
            (other, FieldValue::Checked(_)) => Err(FieldError::KindMismatch {
                field: other,
                expected: other.kind(),
            }),
            (other, FieldValue::Text(text)) => {
                if let Some(slot) = self.text_mut(other) {
                    *slot = text;
                }
                Ok(())
            }
        }
    }

    /// A copy of this record with `field` replaced.
    pub fn with_field(
        &self,
        field: IdentificationField,
        value: FieldValue,
    ) -> Result<Self, FieldError> {
        let mut next = self.clone();
        next.set(field, value)?;
        Ok(next)
    }

    /// Overwrite every field present in `partial`; absent fields keep their current value.
    pub fn apply(&mut self, partial: &PartialIdentification) {
        fn take(slot: &mut String, incoming: &Option<String>) {
            if let Some(value) = incoming {
                slot.clone_from(value);
            }
        }

        take(&mut self.name, &partial.name);
        take(&mut self.paternal_surname, &partial.paternal_surname);
        take(&mut self.maternal_surname, &partial.maternal_surname);
        take(&mut self.sex, &partial.sex);
        take(&mut self.birth_date, &partial.birth_date);
        take(&mut self.birthplace, &partial.birthplace);
        take(&mut self.origin, &partial.origin);
        take(&mut self.ethnic_group, &partial.ethnic_group);
        take(&mut self.religion, &partial.religion);
        take(&mut self.tax_id, &partial.tax_id);
        take(&mut self.address, &partial.address);
        take(&mut self.phone, &partial.phone);
        take(&mut self.mobile, &partial.mobile);
        take(&mut self.email, &partial.email);
        if let Some(insured) = partial.insured {
            self.insured = insured;
        }
        take(&mut self.institution, &partial.institution);
        take(&mut self.affiliation_number, &partial.affiliation_number);
    }

    /// Whether the institution / affiliation-number fields are part of the visible form.
    pub fn insurance_fields_visible(&self) -> bool {
        self.insured
    }

    /// Copy suitable for sending to the backend.
    ///
    /// Hiding the insurance fields never clears them in the form state, so a user who unticks
    /// the flag can tick it again without retyping. Submissions must not carry those stale
    /// values, so they are blanked here when the flag is off.
    pub fn for_submission(&self) -> Self {
        let mut submitted = self.clone();
        if !submitted.insured {
            submitted.institution.clear();
            submitted.affiliation_number.clear();
        }
        submitted
    }

    fn text(&self, field: IdentificationField) -> &str {
        match field {
            IdentificationField::Name => &self.name,
            IdentificationField::PaternalSurname => &self.paternal_surname,
            IdentificationField::MaternalSurname => &self.maternal_surname,
            IdentificationField::Sex => &self.sex,
            IdentificationField::BirthDate => &self.birth_date,
            IdentificationField::Birthplace => &self.birthplace,
            IdentificationField::Origin => &self.origin,
            IdentificationField::EthnicGroup => &self.ethnic_group,
            IdentificationField::Religion => &self.religion,
            IdentificationField::TaxId => &self.tax_id,
            IdentificationField::Address => &self.address,
            IdentificationField::Phone => &self.phone,
            IdentificationField::Mobile => &self.mobile,
            IdentificationField::Email => &self.email,
            IdentificationField::Institution => &self.institution,
            IdentificationField::AffiliationNumber => &self.affiliation_number,
            IdentificationField::Insured => "",
        }
    }

    fn text_mut(&mut self, field: IdentificationField) -> Option<&mut String> {
        let slot = match field {
            IdentificationField::Name => &mut self.name,
            IdentificationField::PaternalSurname => &mut self.paternal_surname,
            IdentificationField::MaternalSurname => &mut self.maternal_surname,
            IdentificationField::Sex => &mut self.sex,
            IdentificationField::BirthDate => &mut self.birth_date,
            IdentificationField::Birthplace => &mut self.birthplace,
            IdentificationField::Origin => &mut self.origin,
            IdentificationField::EthnicGroup => &mut self.ethnic_group,
            IdentificationField::Religion => &mut self.religion,
            IdentificationField::TaxId => &mut self.tax_id,
            IdentificationField::Address => &mut self.address,
            IdentificationField::Phone => &mut self.phone,
            IdentificationField::Mobile => &mut self.mobile,
            IdentificationField::Email => &mut self.email,
            IdentificationField::Institution => &mut self.institution,
            IdentificationField::AffiliationNumber => &mut self.affiliation_number,
            IdentificationField::Insured => return None,
        };
        Some(slot)
    }
}

/// Identification data where every field may be absent.
///
/// A JSON `null` is treated the same as a missing key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialIdentification {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "apellido_paterno", skip_serializing_if = "Option::is_none")]
    pub paternal_surname: Option<String>,
    #[serde(rename = "apellido_materno", skip_serializing_if = "Option::is_none")]
    pub maternal_surname: Option<String>,
    #[serde(rename = "sexo", skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(rename = "fecha_nacimiento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "lugar_nacimiento", skip_serializing_if = "Option::is_none")]
    pub birthplace: Option<String>,
    #[serde(rename = "originario", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(rename = "grupo_etnico", skip_serializing_if = "Option::is_none")]
    pub ethnic_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(rename = "rfc", skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(rename = "domicilio", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "celular", skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "derecho_habiente", skip_serializing_if = "Option::is_none")]
    pub insured: Option<bool>,
    #[serde(rename = "institucion", skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(rename = "numero_filiacion", skip_serializing_if = "Option::is_none")]
    pub affiliation_number: Option<String>,
}

impl PartialIdentification {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<PatientIdentificationRecord> for PartialIdentification {
    fn from(record: PatientIdentificationRecord) -> Self {
        Self {
            name: Some(record.name),
            paternal_surname: Some(record.paternal_surname),
            maternal_surname: Some(record.maternal_surname),
            sex: Some(record.sex),
            birth_date: Some(record.birth_date),
            birthplace: Some(record.birthplace),
            origin: Some(record.origin),
            ethnic_group: Some(record.ethnic_group),
            religion: Some(record.religion),
            tax_id: Some(record.tax_id),
            address: Some(record.address),
            phone: Some(record.phone),
            mobile: Some(record.mobile),
            email: Some(record.email),
            insured: Some(record.insured),
            institution: Some(record.institution),
            affiliation_number: Some(record.affiliation_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_deserialise_to_defaults() {
        let record: PatientIdentificationRecord =
            serde_json::from_str(r#"{"nombre":"Ana"}"#).expect("parse record");
        assert_eq!(record.name, "Ana");
        assert_eq!(record.email, "");
        assert!(!record.insured);
    }

    #[test]
    fn null_values_deserialise_to_defaults() {
        let json = r#"{
            "nombre": "Ana",
            "apellido_materno": null,
            "derecho_habiente": null,
            "institucion": null
        }"#;
        let record: PatientIdentificationRecord =
            serde_json::from_str(json).expect("parse record with nulls");
        assert_eq!(record.name, "Ana");
        assert_eq!(record.maternal_surname, "");
        assert!(!record.insured);
        assert_eq!(record.institution, "");
    }

    #[test]
    fn serialises_every_key() {
        let json = serde_json::to_value(PatientIdentificationRecord::default()).expect("json");
        let object = json.as_object().expect("object");
        for field in IdentificationField::ALL {
            assert!(object.contains_key(field.wire_name()), "missing {field}");
        }
        assert_eq!(object["derecho_habiente"], serde_json::Value::Bool(false));
    }

    #[test]
    fn field_names_parse_from_wire_names() {
        for field in IdentificationField::ALL {
            assert_eq!(field.wire_name().parse::<IdentificationField>(), Ok(field));
        }
        assert_eq!(
            "apodo".parse::<IdentificationField>(),
            Err(FieldError::UnknownField("apodo".into()))
        );
    }

    #[test]
    fn set_rejects_mismatched_kinds_without_mutating() {
        let mut record = PatientIdentificationRecord::default();
        let err = record
            .set(IdentificationField::Name, FieldValue::Checked(true))
            .expect_err("checkbox into text");
        assert_eq!(
            err,
            FieldError::KindMismatch {
                field: IdentificationField::Name,
                expected: FieldKind::Text
            }
        );

        record
            .set(IdentificationField::Insured, "true".into())
            .expect_err("text into checkbox");
        assert_eq!(record, PatientIdentificationRecord::default());
    }

    #[test]
    fn apply_only_overwrites_present_fields() {
        let mut record = PatientIdentificationRecord {
            name: "Ana".into(),
            phone: "555-0101".into(),
            ..Default::default()
        };
        record.apply(&PartialIdentification {
            phone: Some("555-0199".into()),
            insured: Some(true),
            ..Default::default()
        });

        assert_eq!(record.name, "Ana");
        assert_eq!(record.phone, "555-0199");
        assert!(record.insured);
    }

    #[test]
    fn null_in_partial_counts_as_absent() {
        let partial: PartialIdentification =
            serde_json::from_str(r#"{"nombre":null,"rfc":"GOAA900101"}"#).expect("parse");
        assert_eq!(partial.name, None);
        assert_eq!(partial.tax_id.as_deref(), Some("GOAA900101"));
    }

    #[test]
    fn submission_blanks_insurance_fields_only_when_uninsured() {
        let record = PatientIdentificationRecord {
            insured: false,
            institution: "IMSS".into(),
            affiliation_number: "12345".into(),
            ..Default::default()
        };
        let submitted = record.for_submission();
        assert_eq!(submitted.institution, "");
        assert_eq!(submitted.affiliation_number, "");
        assert_eq!(record.institution, "IMSS");

        let insured = PatientIdentificationRecord {
            insured: true,
            ..record
        };
        assert_eq!(insured.for_submission().institution, "IMSS");
    }
}
