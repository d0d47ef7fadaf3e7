use super::catalog::FieldCatalog;
use super::contract::{Activation, FieldContract};
use super::domain::{FieldValue, FormState, IntakeStep};

/// Evaluate a field's activation predicate against the current form state.
///
/// Pure and deterministic; callers re-run it after every mutation instead of
/// caching the result, so a just-changed trigger is always respected.
pub fn is_active(contract: &FieldContract, form: &FormState) -> bool {
    match &contract.activation {
        Activation::Always => true,
        Activation::ToggleIs { field, expected } => {
            matches!(form.get(field), Some(FieldValue::Toggle(answer)) if answer == expected)
        }
        Activation::SelectionIn { field, any_of } => {
            matches!(form.get(field), Some(FieldValue::Selection(tag)) if any_of.contains(&tag.as_str()))
        }
    }
}

/// Contracts on `step` whose activation predicate currently holds.
pub fn active_step_fields<'a>(
    catalog: &'a FieldCatalog,
    step: IntakeStep,
    form: &FormState,
) -> Vec<&'a FieldContract> {
    catalog
        .step_contracts(step)
        .into_iter()
        .filter(|contract| is_active(contract, form))
        .collect()
}
