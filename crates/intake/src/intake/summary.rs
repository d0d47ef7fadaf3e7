use serde::Serialize;

use super::catalog::FieldCatalog;
use super::contract::Masking;
use super::domain::{FieldValue, FormState, IntakeStep};
use super::visibility;

/// Placeholder prefix for masked identifiers; the trailing four characters
/// of the original value follow it.
pub const IDENTIFIER_MASK_PREFIX: &str = "XXXX XXXX ";

/// Constant-length placeholder for credential fields, independent of the
/// real value's length.
pub const CREDENTIAL_MASK: &str = "••••••••";

const ABSENT_PLACEHOLDER: &str = "—";

/// One masked, display-ready line of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub display: String,
}

/// All entries for one step, in contract order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarySection {
    pub step: IntakeStep,
    pub step_label: &'static str,
    pub entries: Vec<SummaryEntry>,
}

/// Display-safe projection of the form. Inactive conditional fields are
/// omitted entirely so no stale or irrelevant value is ever shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeSummary {
    pub sections: Vec<SummarySection>,
}

impl IntakeSummary {
    pub fn section(&self, step: IntakeStep) -> Option<&SummarySection> {
        self.sections.iter().find(|section| section.step == step)
    }
}

/// Compile the review summary. A pure projection: the form state is read,
/// masked where the contract demands it, and never mutated.
pub fn summarize(catalog: &FieldCatalog, form: &FormState) -> IntakeSummary {
    let sections = IntakeStep::ordered()
        .into_iter()
        .filter(|step| !step.is_summary())
        .map(|step| SummarySection {
            step,
            step_label: step.label(),
            entries: visibility::active_step_fields(catalog, step, form)
                .into_iter()
                .map(|contract| SummaryEntry {
                    key: contract.key,
                    label: contract.label,
                    display: display_value(contract.masking, form.get(contract.key)),
                })
                .collect(),
        })
        .collect();

    IntakeSummary { sections }
}

/// Mask a long identifier down to its trailing four characters. Idempotent:
/// feeding an already-masked value back in returns it unchanged. Lossy by
/// design; the hidden portion cannot be recovered from the display value.
pub fn mask_identifier(value: &str) -> String {
    if let Some(rest) = value.strip_prefix(IDENTIFIER_MASK_PREFIX) {
        if rest.len() <= 4 {
            return value.to_string();
        }
    }

    let significant: Vec<char> = value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .collect();
    let tail: String = significant
        .iter()
        .skip(significant.len().saturating_sub(4))
        .collect();
    format!("{IDENTIFIER_MASK_PREFIX}{tail}")
}

/// Render a credential as a fixed placeholder, whatever it actually holds.
pub fn mask_credential(_value: &str) -> &'static str {
    CREDENTIAL_MASK
}

fn display_value(masking: Masking, value: Option<&FieldValue>) -> String {
    let Some(value) = value else {
        return ABSENT_PLACEHOLDER.to_string();
    };

    match (masking, value) {
        (Masking::Credential, _) => CREDENTIAL_MASK.to_string(),
        (Masking::Identifier, FieldValue::Text(text)) => mask_identifier(text),
        (Masking::Identifier, other) => mask_identifier(&render_plain(other)),
        (Masking::None, other) => render_plain(other),
    }
}

fn render_plain(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => {
            if text.trim().is_empty() {
                ABSENT_PLACEHOLDER.to_string()
            } else {
                text.clone()
            }
        }
        FieldValue::Number(number) => {
            if number.fract() == 0.0 {
                format!("{}", *number as i64)
            } else {
                format!("{number}")
            }
        }
        FieldValue::Selection(tag) => tag.replace('-', " "),
        FieldValue::Toggle(true) => "yes".to_string(),
        FieldValue::Toggle(false) => "no".to_string(),
        FieldValue::Files(0) => "no files attached".to_string(),
        FieldValue::Files(1) => "1 file attached".to_string(),
        FieldValue::Files(count) => format!("{count} files attached"),
    }
}
