use super::catalog::FieldCatalog;
use super::contract::{Constraint, FieldContract};
use super::domain::{
    FieldValidation, FieldValue, FormState, FormValidation, IntakeStep, StepValidation,
};
use super::visibility;

/// Validate every contract belonging to `step` against the current form
/// state. Inactive fields are always reported valid, whatever they store:
/// validation must never block progress on a field the user was never shown.
///
/// Never panics; absent or mistyped data maps to a structured failure.
pub fn validate_step(catalog: &FieldCatalog, step: IntakeStep, form: &FormState) -> StepValidation {
    let fields = catalog
        .step_contracts(step)
        .into_iter()
        .map(|contract| validate_field(catalog, contract, form))
        .collect();

    StepValidation { step, fields }
}

/// The whole-form validator: exactly the union of all step validators.
/// Cross-step requirements already live on the later field's contract, so no
/// extra rules are composed here. Used only at final submission.
pub fn validate_form(catalog: &FieldCatalog, form: &FormState) -> FormValidation {
    let steps = IntakeStep::ordered()
        .into_iter()
        .filter(|step| !step.is_summary())
        .map(|step| validate_step(catalog, step, form))
        .collect();

    FormValidation { steps }
}

fn validate_field(
    catalog: &FieldCatalog,
    contract: &FieldContract,
    form: &FormState,
) -> FieldValidation {
    if !visibility::is_active(contract, form) {
        return FieldValidation::valid(contract.key);
    }

    match form.get(contract.key) {
        Some(value) if !value.is_blank() => match check_constraints(catalog, contract, value) {
            Some(message) => FieldValidation::invalid(contract.key, message),
            None => FieldValidation::valid(contract.key),
        },
        _ if contract.required_when_active => {
            FieldValidation::invalid(contract.key, required_message(contract))
        }
        _ => FieldValidation::valid(contract.key),
    }
}

/// Prefer the constraint's own wording for "left blank" so messages like
/// "Full name is required" survive; fall back to a generic required line.
fn required_message(contract: &FieldContract) -> String {
    for constraint in &contract.constraints {
        match constraint {
            Constraint::MinLength { message, .. }
            | Constraint::Range { message, .. }
            | Constraint::Pattern { message, .. } => return (*message).to_string(),
            Constraint::OneOf { .. } => {}
        }
    }
    format!("{} is required", contract.label)
}

fn check_constraints(
    catalog: &FieldCatalog,
    contract: &FieldContract,
    value: &FieldValue,
) -> Option<String> {
    for constraint in &contract.constraints {
        match constraint {
            Constraint::MinLength { min, message } => {
                let Some(text) = text_of(value) else {
                    return Some((*message).to_string());
                };
                if text.trim().chars().count() < *min {
                    return Some((*message).to_string());
                }
            }
            Constraint::Range { min, max, message } => {
                let Some(number) = numeric_of(value) else {
                    return Some(format!("{} must be a number", contract.label));
                };
                if number < *min || max.is_some_and(|max| number > max) {
                    return Some((*message).to_string());
                }
            }
            Constraint::Pattern { pattern, message } => {
                let Some(text) = text_of(value) else {
                    return Some((*message).to_string());
                };
                let Some(compiled) = catalog.pattern(pattern) else {
                    // Unreachable for catalogs built through FieldCatalog::new.
                    return Some((*message).to_string());
                };
                if !compiled.is_match(text.trim()) {
                    return Some((*message).to_string());
                }
            }
            Constraint::OneOf { options } => {
                let tag = match value {
                    FieldValue::Selection(tag) => tag.as_str(),
                    FieldValue::Text(text) => text.as_str(),
                    _ => return Some(format!("Select a valid {}", contract.label)),
                };
                if !options.contains(&tag) {
                    return Some(format!("Select a valid {}", contract.label));
                }
            }
        }
    }
    None
}

fn text_of(value: &FieldValue) -> Option<&str> {
    match value {
        FieldValue::Text(text) => Some(text),
        FieldValue::Selection(tag) => Some(tag),
        _ => None,
    }
}

/// Numbers stay numbers and digit strings coerce. Anything else fails,
/// never a silent clamp; NaN and infinities fail too, since every range
/// comparison against them is vacuously false.
fn numeric_of(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(number) => Some(*number),
        FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}
