//! `dental intake`: drive the identification form from the command line.

use crate::{api, print_json};
use anyhow::{bail, Context};
use clap::Args;
use dental_api::ApiClient;
use dental_intake::{
    FieldKind, FieldValue, IdentificationField, IdentificationForm, PartialIdentification,
    PatientIdentificationRecord,
};
use dental_types::RecordId;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct IntakeArgs {
    /// JSON file with patient information already known to the clinic
    #[arg(long)]
    known: Option<PathBuf>,
    /// JSON file with previously saved form data
    #[arg(long)]
    saved: Option<PathBuf>,
    /// Field edit as `field=value`, applied in order (e.g. `--set derecho_habiente=true`)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    edits: Vec<String>,
    /// Existing patient to load as saved data and update on submit
    #[arg(long)]
    patient_id: Option<RecordId>,
    /// Send the record to the backend
    #[arg(long)]
    submit: bool,
}

pub async fn run(client: &ApiClient, args: IntakeArgs) -> anyhow::Result<()> {
    let known = read_partial(args.known.as_deref())?;
    let saved = match (args.saved.as_deref(), args.patient_id) {
        (Some(path), _) => read_partial(Some(path))?,
        (None, Some(id)) => api(client.patients().get(id).await)?.identification.into(),
        (None, None) => PartialIdentification::default(),
    };

    let mut changes = 0usize;
    let (record, visible, birth_date) = {
        let mut form =
            IdentificationForm::mount(known, saved, |record: &PatientIdentificationRecord| {
                tracing::debug!(name = %record.name, "identification record updated");
                changes += 1;
            });

        for edit in &args.edits {
            let (field, value) = parse_edit(edit)?;
            form.handle_change(field, value)
                .with_context(|| format!("cannot apply `{edit}`"))?;
        }

        let visible: Vec<&str> = form
            .visible_fields()
            .into_iter()
            .map(IdentificationField::wire_name)
            .collect();
        (form.record().clone(), visible, form.display_birth_date())
    };

    print_json(&serde_json::json!({
        "record": record,
        "visible_fields": visible,
        "fecha_nacimiento": birth_date,
        "changes": changes,
    }))?;

    if args.submit {
        let submission = record.for_submission();
        let ack = match args.patient_id {
            Some(id) => api(client.patients().update(id, &submission).await)?,
            None => api(client.patients().create(&submission).await)?,
        };
        print_json(&ack)?;
    }

    Ok(())
}

fn read_partial(path: Option<&Path>) -> anyhow::Result<PartialIdentification> {
    let Some(path) = path else {
        return Ok(PartialIdentification::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid identification data in {}", path.display()))
}

/// Parse `field=value`, typing the value by the field's input kind.
fn parse_edit(edit: &str) -> anyhow::Result<(IdentificationField, FieldValue)> {
    let Some((name, value)) = edit.split_once('=') else {
        bail!("expected FIELD=VALUE, got `{edit}`");
    };
    let field: IdentificationField = name.trim().parse()?;
    let value = match field.kind() {
        FieldKind::Checkbox => match value.trim() {
            "true" | "1" | "si" | "yes" => FieldValue::Checked(true),
            "false" | "0" | "no" => FieldValue::Checked(false),
            other => bail!("{field} is a checkbox, expected true or false, got `{other}`"),
        },
        FieldKind::Text | FieldKind::Date => FieldValue::Text(value.to_owned()),
    };
    Ok((field, value))
}
