use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::catalog::FieldCatalog;
use super::contract::FieldKind;
use super::domain::{
    FieldValue, FormState, FormValidation, IntakeSnapshot, IntakeStep, StepValidation,
};
use super::{validation, visibility};

/// Refused transitions and bad field updates. Every variant is recoverable
/// by further user input; gating errors carry the per-field report so the
/// caller can surface inline messages.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("field '{0}' is not part of the intake form")]
    UnknownField(String),
    #[error("step '{}' has incomplete or invalid fields", step.label())]
    StepIncomplete {
        step: IntakeStep,
        validation: StepValidation,
    },
    #[error("already at the first step")]
    AtFirstStep,
    #[error("already at the summary step; submit or jump back to edit")]
    AtSummaryStep,
    #[error("jumping between steps is only available from the summary")]
    JumpUnavailable,
    #[error("submission is only available from the summary step")]
    NotAtSummary,
    #[error("the form still has invalid fields")]
    SubmissionBlocked { validation: FormValidation },
    #[error("the session was already submitted")]
    AlreadySubmitted,
}

/// One row of the field surface handed to the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The wizard step state machine. Owns the form state for one user's single
/// in-memory session; forward navigation is gated on step validity, backward
/// navigation is unconditional, and submission freezes an immutable snapshot.
#[derive(Debug, Clone)]
pub struct WizardSession {
    catalog: Arc<FieldCatalog>,
    form: FormState,
    current: IntakeStep,
    visited: Vec<IntakeStep>,
    submitted: bool,
}

impl WizardSession {
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        Self {
            catalog,
            form: FormState::new(),
            current: IntakeStep::BasicDetails,
            visited: vec![IntakeStep::BasicDetails],
            submitted: false,
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn current_step(&self) -> IntakeStep {
        self.current
    }

    /// Read-only history of every step entered, in entry order.
    pub fn visited_steps(&self) -> &[IntakeStep] {
        &self.visited
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Store a value for a known field. Values are accepted as-is; validity
    /// is derived on the next query, never enforced at write time.
    pub fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), WizardError> {
        self.ensure_open()?;
        let contract = self
            .catalog
            .contract(key)
            .ok_or_else(|| WizardError::UnknownField(key.to_string()))?;
        self.form.set(contract.key, value);
        Ok(())
    }

    /// Remove a stored value, returning the field to its pristine state.
    pub fn clear_field(&mut self, key: &str) -> Result<(), WizardError> {
        self.ensure_open()?;
        if self.catalog.contract(key).is_none() {
            return Err(WizardError::UnknownField(key.to_string()));
        }
        self.form.clear(key);
        Ok(())
    }

    pub fn validate_step(&self, step: IntakeStep) -> StepValidation {
        validation::validate_step(&self.catalog, step, &self.form)
    }

    pub fn validate_form(&self) -> FormValidation {
        validation::validate_form(&self.catalog, &self.form)
    }

    /// Advance to the following step, gated on the current step's active
    /// fields all being valid. Refusal is local and recoverable: the session
    /// stays where it is and the report says which fields to fix.
    pub fn next(&mut self) -> Result<IntakeStep, WizardError> {
        self.ensure_open()?;
        let Some(target) = self.current.next() else {
            return Err(WizardError::AtSummaryStep);
        };

        let report = self.validate_step(self.current);
        if !report.is_valid() {
            return Err(WizardError::StepIncomplete {
                step: self.current,
                validation: report,
            });
        }

        self.enter(target);
        Ok(target)
    }

    /// Return to the previous step. Never validated: reviewing or editing
    /// earlier answers must never be blocked.
    pub fn back(&mut self) -> Result<IntakeStep, WizardError> {
        self.ensure_open()?;
        let Some(target) = self.current.previous() else {
            return Err(WizardError::AtFirstStep);
        };
        self.enter(target);
        Ok(target)
    }

    /// Jump straight to any step. Offered by the summary's per-section edit
    /// buttons, so it is only honored from the summary state.
    pub fn jump_to_step(&mut self, step: IntakeStep) -> Result<IntakeStep, WizardError> {
        self.ensure_open()?;
        if !self.current.is_summary() {
            return Err(WizardError::JumpUnavailable);
        }
        self.enter(step);
        Ok(step)
    }

    /// Freeze the form into an immutable snapshot, keeping only the fields
    /// that are active right now. Allowed only from the summary step and only
    /// when the whole form validates; on refusal nothing is mutated.
    pub fn submit(&mut self) -> Result<IntakeSnapshot, WizardError> {
        self.ensure_open()?;
        if !self.current.is_summary() {
            return Err(WizardError::NotAtSummary);
        }

        let report = self.validate_form();
        if !report.is_valid() {
            return Err(WizardError::SubmissionBlocked { validation: report });
        }

        let mut values = BTreeMap::new();
        for contract in self.catalog.contracts() {
            if !visibility::is_active(contract, &self.form) {
                continue;
            }
            if let Some(value) = self.form.get(contract.key) {
                values.insert(contract.key.to_string(), value.clone());
            }
        }

        self.submitted = true;
        Ok(IntakeSnapshot::new(Utc::now(), values))
    }

    /// Ordered field surface for one step: what to render, what it holds,
    /// whether it is active, and its current inline error, if any.
    pub fn field_surface(&self, step: IntakeStep) -> Vec<FieldView> {
        let report = self.validate_step(step);
        self.catalog
            .step_contracts(step)
            .into_iter()
            .map(|contract| FieldView {
                key: contract.key,
                label: contract.label,
                kind: contract.kind,
                value: self.form.get(contract.key).cloned(),
                is_active: visibility::is_active(contract, &self.form),
                error: report.error_for(contract.key).map(str::to_string),
            })
            .collect()
    }

    fn enter(&mut self, step: IntakeStep) {
        self.current = step;
        self.visited.push(step);
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        Ok(())
    }
}
