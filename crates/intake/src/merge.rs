use dental_types::{PartialIdentification, PatientIdentificationRecord};

/// Built-in starting point for a new record: every text field empty, not insured.
pub fn default_identification() -> PatientIdentificationRecord {
    PatientIdentificationRecord::default()
}

/// Seed a record from three sources in increasing precedence.
///
/// For every field `k` the result holds `saved[k]` if present, else `known[k]` if present, else
/// `defaults[k]`. The merge is shallow and key-by-key; a source never clears a field it does
/// not mention.
pub fn merge_identification(
    defaults: &PatientIdentificationRecord,
    known: &PartialIdentification,
    saved: &PartialIdentification,
) -> PatientIdentificationRecord {
    let mut record = defaults.clone();
    record.apply(known);
    record.apply(saved);
    record
}
