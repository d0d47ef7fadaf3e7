use serde::Serialize;

use super::domain::IntakeStep;

/// Input family a field belongs to. The rendering layer picks the widget;
/// the validation layer picks the applicable constraint checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    /// Closed, ordered option list; the stored value is the canonical tag.
    Selection,
    /// Yes/no trigger choice.
    Toggle,
    /// Attachment count; content, size, and type checks live with the upload
    /// collaborator, not here.
    Attachments,
}

/// Display transform applied by the summary compiler. Never affects what is
/// stored or what the submission gateway receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Masking {
    None,
    /// Long identifier: keep the trailing four characters, replace the rest
    /// with a fixed placeholder prefix.
    Identifier,
    /// Credential: render a constant-length placeholder regardless of the
    /// real value.
    Credential,
}

/// Format and range rules enforced whenever the field is active. Failure
/// messages are field-specific and written for the person filling the form.
#[derive(Debug, Clone)]
pub enum Constraint {
    MinLength {
        min: usize,
        message: &'static str,
    },
    Range {
        min: f64,
        max: Option<f64>,
        message: &'static str,
    },
    Pattern {
        pattern: &'static str,
        message: &'static str,
    },
    OneOf {
        options: &'static [&'static str],
    },
}

/// Predicate deciding whether a field is currently shown and enforced.
/// Invariant (checked at catalog construction): the referenced field belongs
/// to an earlier or the same step, so activation can never be circular.
#[derive(Debug, Clone)]
pub enum Activation {
    Always,
    /// Active when a yes/no trigger holds the expected answer.
    ToggleIs {
        field: &'static str,
        expected: bool,
    },
    /// Active when a selection field holds one of the listed tags.
    SelectionIn {
        field: &'static str,
        any_of: &'static [&'static str],
    },
}

impl Activation {
    /// Key of the trigger field this predicate reads, if any.
    pub fn references(&self) -> Option<&'static str> {
        match self {
            Activation::Always => None,
            Activation::ToggleIs { field, .. } | Activation::SelectionIn { field, .. } => {
                Some(field)
            }
        }
    }
}

/// Declarative description of one logical form field.
#[derive(Debug, Clone)]
pub struct FieldContract {
    pub key: &'static str,
    pub label: &'static str,
    pub step: IntakeStep,
    pub kind: FieldKind,
    pub constraints: Vec<Constraint>,
    pub activation: Activation,
    /// When true and the field is active, a blank value fails validation.
    pub required_when_active: bool,
    pub masking: Masking,
}
