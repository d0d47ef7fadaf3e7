//! Progressive-disclosure intake wizard: declarative field contracts grouped
//! into ordered steps, a visibility resolver for conditional fields, step and
//! whole-form validation, the step state machine, and the redacted summary
//! compiler.
//!
//! Validation is always re-derived from the current form state; nothing in
//! this module caches an activation flag or a validation verdict across a
//! field mutation.

pub mod catalog;
pub mod contract;
pub mod domain;
pub mod router;
pub mod service;
pub mod session;
pub mod store;
pub mod summary;
pub mod validation;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, FieldCatalog};
pub use contract::{Activation, Constraint, FieldContract, FieldKind, Masking};
pub use domain::{
    FieldValidation, FieldValue, FormState, FormValidation, IntakeSnapshot, IntakeStep,
    StepValidation,
};
pub use router::intake_router;
pub use service::{IntakeServiceError, IntakeWizardService};
pub use session::{FieldView, WizardError, WizardSession};
pub use store::{GatewayError, SessionId, SessionStore, StoreError, SubmissionGateway};
pub use summary::{IntakeSummary, SummaryEntry, SummarySection, CREDENTIAL_MASK};
