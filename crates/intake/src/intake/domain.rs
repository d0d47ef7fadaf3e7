use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered wizard steps. The summary step is the terminal display state and
/// owns no fields of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    BasicDetails,
    OfficialDetails,
    Financial,
    Summary,
}

impl IntakeStep {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::BasicDetails,
            Self::OfficialDetails,
            Self::Financial,
            Self::Summary,
        ]
    }

    /// One-based position shown in the progress indicator.
    pub const fn position(self) -> u8 {
        match self {
            Self::BasicDetails => 1,
            Self::OfficialDetails => 2,
            Self::Financial => 3,
            Self::Summary => 4,
        }
    }

    pub fn from_position(position: u8) -> Option<Self> {
        IntakeStep::ordered()
            .into_iter()
            .find(|step| step.position() == position)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BasicDetails => "Basic Details",
            Self::OfficialDetails => "Official Details",
            Self::Financial => "Financial Information",
            Self::Summary => "Summary",
        }
    }

    pub const fn is_summary(self) -> bool {
        matches!(self, Self::Summary)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_position(self.position() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.position().checked_sub(1).and_then(Self::from_position)
    }
}

/// Current value of one field. Absence is modeled by the key simply missing
/// from [`FormState`], never by a sentinel value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// Canonical tag of a closed option list; labels are a rendering concern.
    Selection(String),
    /// A yes/no trigger choice.
    Toggle(bool),
    /// Count of attached items; the bytes live with the upload collaborator.
    Files(u32),
}

impl FieldValue {
    /// Empty in the "required field left blank" sense.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Selection(tag) => tag.is_empty(),
            FieldValue::Files(count) => *count == 0,
            FieldValue::Number(_) | FieldValue::Toggle(_) => false,
        }
    }
}

/// Mapping from field key to current value. Mutated only through explicit
/// field updates; validity is derived on demand, never stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.values.insert(key.into(), value);
    }

    pub fn clear(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }
}

/// Verdict for a single field: `error` is `None` when the field is valid
/// (including every inactive field, whatever it stores).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidation {
    pub key: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldValidation {
    pub fn valid(key: &'static str) -> Self {
        Self { key, error: None }
    }

    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            key,
            error: Some(message.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-field results for one step, derived fresh from the form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepValidation {
    pub step: IntakeStep,
    pub fields: Vec<FieldValidation>,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(FieldValidation::is_valid)
    }

    pub fn failures(&self) -> Vec<&FieldValidation> {
        self.fields
            .iter()
            .filter(|field| !field.is_valid())
            .collect()
    }

    pub fn error_for(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .and_then(|field| field.error.as_deref())
    }
}

/// Union of every step validator; consulted only at final submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormValidation {
    pub steps: Vec<StepValidation>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.steps.iter().all(StepValidation::is_valid)
    }

    pub fn invalid_steps(&self) -> Vec<IntakeStep> {
        self.steps
            .iter()
            .filter(|step| !step.is_valid())
            .map(|step| step.step)
            .collect()
    }
}

/// Immutable, fully validated copy of the form handed to the submission
/// gateway. Only fields that were active at submission time are included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSnapshot {
    pub submitted_at: DateTime<Utc>,
    values: BTreeMap<String, FieldValue>,
}

impl IntakeSnapshot {
    pub(crate) fn new(submitted_at: DateTime<Utc>, values: BTreeMap<String, FieldValue>) -> Self {
        Self {
            submitted_at,
            values,
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }
}
