//! Identification form state.
//!
//! The form holds a single in-memory record. It is seeded from three sources (see
//! [`merge_identification`]) and then edited one field at a time. Every edit replaces exactly
//! one key and is pushed synchronously to the [`RecordOwner`], which is responsible for keeping
//! the data; the form itself never persists anything.

use crate::merge::{default_identification, merge_identification};
use crate::{format_calendar_date, IntakeResult};
use dental_types::{
    FieldValue, IdentificationField, PartialIdentification, PatientIdentificationRecord,
};

/// Receives the full record after every field change.
pub trait RecordOwner {
    fn record_changed(&mut self, record: &PatientIdentificationRecord);
}

impl<F> RecordOwner for F
where
    F: FnMut(&PatientIdentificationRecord),
{
    fn record_changed(&mut self, record: &PatientIdentificationRecord) {
        self(record)
    }
}

/// Controller for the patient identification section.
#[derive(Debug)]
pub struct IdentificationForm<O> {
    defaults: PatientIdentificationRecord,
    known: PartialIdentification,
    saved: PartialIdentification,
    record: PatientIdentificationRecord,
    owner: O,
}

impl<O: RecordOwner> IdentificationForm<O> {
    /// Seed the form from the built-in defaults, known patient info and previously saved data.
    pub fn mount(known: PartialIdentification, saved: PartialIdentification, owner: O) -> Self {
        Self::with_defaults(default_identification(), known, saved, owner)
    }

    /// Like [`IdentificationForm::mount`] with caller-supplied defaults.
    pub fn with_defaults(
        defaults: PatientIdentificationRecord,
        known: PartialIdentification,
        saved: PartialIdentification,
        owner: O,
    ) -> Self {
        let record = merge_identification(&defaults, &known, &saved);
        Self {
            defaults,
            known,
            saved,
            record,
            owner,
        }
    }

    pub fn record(&self) -> &PatientIdentificationRecord {
        &self.record
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn into_owner(self) -> O {
        self.owner
    }

    /// Feed new external sources to the form.
    ///
    /// When either source differs from the one the record was seeded with, the record is
    /// recomputed from scratch and local edits are replaced. Identical sources leave the current
    /// record untouched. The owner is not notified; it supplied the data.
    ///
    /// Returns `true` when the record was recomputed.
    pub fn update_sources(
        &mut self,
        known: PartialIdentification,
        saved: PartialIdentification,
    ) -> bool {
        if known == self.known && saved == self.saved {
            return false;
        }

        self.known = known;
        self.saved = saved;
        self.record = merge_identification(&self.defaults, &self.known, &self.saved);
        tracing::debug!("identification record recomputed from updated sources");
        true
    }

    /// Apply a single field edit and notify the owner with the full updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the value kind does not match the field (a checkbox state for a
    /// text field or the reverse); the record and owner are left untouched.
    pub fn handle_change(
        &mut self,
        field: IdentificationField,
        value: impl Into<FieldValue>,
    ) -> IntakeResult<&PatientIdentificationRecord> {
        let next = self.record.with_field(field, value.into())?;
        self.record = next;
        self.owner.record_changed(&self.record);
        Ok(&self.record)
    }

    /// [`IdentificationForm::handle_change`] addressed by the input's wire name.
    pub fn handle_input(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> IntakeResult<&PatientIdentificationRecord> {
        let field = name.parse::<IdentificationField>()?;
        self.handle_change(field, value)
    }

    /// Fields currently shown, in form order.
    ///
    /// Institution and affiliation number are only shown while the insurance flag is set.
    /// Hiding them does not clear their stored values.
    pub fn visible_fields(&self) -> Vec<IdentificationField> {
        IdentificationField::ALL
            .into_iter()
            .filter(|field| self.is_visible(*field))
            .collect()
    }

    pub fn is_visible(&self, field: IdentificationField) -> bool {
        !field.requires_insurance() || self.record.insurance_fields_visible()
    }

    /// Birth date as shown in the form (`YYYY-MM-DD`, or empty).
    pub fn display_birth_date(&self) -> String {
        format_calendar_date(Some(self.record.birth_date.as_str()))
    }
}
