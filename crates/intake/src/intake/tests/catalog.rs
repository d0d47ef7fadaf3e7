use crate::intake::catalog::{CatalogError, FieldCatalog};
use crate::intake::contract::{Activation, Constraint, FieldContract, FieldKind, Masking};
use crate::intake::domain::IntakeStep;

fn contract(key: &'static str, step: IntakeStep) -> FieldContract {
    FieldContract {
        key,
        label: key,
        step,
        kind: FieldKind::Text,
        constraints: Vec::new(),
        activation: Activation::Always,
        required_when_active: true,
        masking: Masking::None,
    }
}

#[test]
fn standard_catalog_builds() {
    let catalog = FieldCatalog::standard();
    assert_eq!(catalog.contracts().len(), 27);
    assert!(catalog.contract("fullName").is_some());
    assert!(catalog.contract("yearlyPnLStatement").is_some());
    assert!(catalog
        .step_contracts(IntakeStep::Summary)
        .is_empty());
}

#[test]
fn rejects_duplicate_keys() {
    let contracts = vec![
        contract("fullName", IntakeStep::BasicDetails),
        contract("fullName", IntakeStep::OfficialDetails),
    ];
    let error = FieldCatalog::new(contracts).expect_err("duplicate must be rejected");
    assert!(matches!(error, CatalogError::DuplicateKey("fullName")));
}

#[test]
fn rejects_unknown_activation_reference() {
    let mut dependent = contract("landDetails", IntakeStep::Financial);
    dependent.activation = Activation::ToggleIs {
        field: "noSuchTrigger",
        expected: true,
    };
    let error = FieldCatalog::new(vec![dependent]).expect_err("unknown reference must be rejected");
    assert!(matches!(
        error,
        CatalogError::UnknownReference {
            field: "landDetails",
            referenced: "noSuchTrigger",
        }
    ));
}

#[test]
fn rejects_forward_activation_reference() {
    let mut dependent = contract("dependent", IntakeStep::OfficialDetails);
    dependent.activation = Activation::ToggleIs {
        field: "laterTrigger",
        expected: true,
    };
    let mut trigger = contract("laterTrigger", IntakeStep::Financial);
    trigger.kind = FieldKind::Toggle;

    let error =
        FieldCatalog::new(vec![dependent, trigger]).expect_err("forward reference must be rejected");
    assert!(matches!(
        error,
        CatalogError::ForwardReference {
            field: "dependent",
            referenced: "laterTrigger",
        }
    ));
}

#[test]
fn allows_same_step_activation_reference() {
    let mut trigger = contract("ownLand", IntakeStep::Financial);
    trigger.kind = FieldKind::Toggle;
    trigger.required_when_active = false;
    let mut dependent = contract("landDetails", IntakeStep::Financial);
    dependent.activation = Activation::ToggleIs {
        field: "ownLand",
        expected: true,
    };

    assert!(FieldCatalog::new(vec![trigger, dependent]).is_ok());
}

#[test]
fn rejects_fields_on_the_summary_step() {
    let error = FieldCatalog::new(vec![contract("stray", IntakeStep::Summary)])
        .expect_err("summary step fields must be rejected");
    assert!(matches!(error, CatalogError::FieldOnSummaryStep("stray")));
}

#[test]
fn rejects_invalid_patterns() {
    let mut broken = contract("broken", IntakeStep::BasicDetails);
    broken.constraints = vec![Constraint::Pattern {
        pattern: r"([unclosed",
        message: "never shown",
    }];
    let error = FieldCatalog::new(vec![broken]).expect_err("bad regex must be rejected");
    assert!(matches!(
        error,
        CatalogError::InvalidPattern { field: "broken", .. }
    ));
}

#[test]
fn standard_patterns_are_precompiled() {
    let catalog = FieldCatalog::standard();
    assert!(catalog.pattern(r"^[6-9]\d{9}$").is_some());
    assert!(catalog.pattern(r"^[A-Z]{5}[0-9]{4}[A-Z]$").is_some());
}
