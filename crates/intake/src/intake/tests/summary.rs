use super::common;
use crate::intake::domain::{FieldValue, FormState, IntakeStep};
use crate::intake::summary::{
    mask_credential, mask_identifier, summarize, CREDENTIAL_MASK, IDENTIFIER_MASK_PREFIX,
};

#[test]
fn identifier_masking_keeps_the_trailing_four() {
    assert_eq!(mask_identifier("123456789012"), "XXXX XXXX 9012");
    assert_eq!(mask_identifier("1234 5678 9012"), "XXXX XXXX 9012");
    assert_eq!(mask_identifier("ABCDE1234F"), "XXXX XXXX 234F");
}

#[test]
fn identifier_masking_is_idempotent() {
    let once = mask_identifier("123456789012");
    let twice = mask_identifier(&once);
    assert_eq!(once, twice);
}

#[test]
fn short_identifiers_still_mask() {
    assert_eq!(mask_identifier("987"), format!("{IDENTIFIER_MASK_PREFIX}987"));
}

#[test]
fn credentials_mask_to_a_constant_placeholder() {
    assert_eq!(mask_credential("hunter2"), CREDENTIAL_MASK);
    assert_eq!(
        mask_credential("a-very-long-passphrase-indeed"),
        CREDENTIAL_MASK
    );
}

#[test]
fn summary_masks_identifiers_and_credentials() {
    let session = common::session_at_summary();
    let summary = summarize(session.catalog(), session.form());

    let basics = summary
        .section(IntakeStep::BasicDetails)
        .expect("basic details section");
    let password = basics
        .entries
        .iter()
        .find(|entry| entry.key == "password")
        .expect("password entry");
    assert_eq!(password.display, CREDENTIAL_MASK);

    let official = summary
        .section(IntakeStep::OfficialDetails)
        .expect("official details section");
    let aadhaar = official
        .entries
        .iter()
        .find(|entry| entry.key == "aadhaarNumber")
        .expect("aadhaar entry");
    assert_eq!(aadhaar.display, "XXXX XXXX 9012");
    let pan = official
        .entries
        .iter()
        .find(|entry| entry.key == "panNumber")
        .expect("pan entry");
    assert_eq!(pan.display, "XXXX XXXX 234F");
}

#[test]
fn summary_omits_inactive_fields_entirely() {
    let session = common::session_at_summary();
    let summary = summarize(session.catalog(), session.form());

    let financial = summary
        .section(IntakeStep::Financial)
        .expect("financial section");
    assert!(financial
        .entries
        .iter()
        .all(|entry| entry.key != "landDetails"));
    // salarySlip is active because the employment choice is salaried.
    assert!(financial
        .entries
        .iter()
        .any(|entry| entry.key == "salarySlip"));
}

#[test]
fn summary_has_no_section_for_the_summary_step() {
    let session = common::session();
    let summary = summarize(session.catalog(), session.form());
    assert_eq!(summary.sections.len(), 3);
    assert!(summary.section(IntakeStep::Summary).is_none());
}

#[test]
fn plain_values_render_for_review() {
    let mut session = common::session_at_summary();
    session
        .jump_to_step(IntakeStep::Financial)
        .expect("jump back to edit");
    session
        .set_field("annualIncome", FieldValue::Number(1_250_000.0))
        .expect("known field");
    session
        .set_field("rentReceipts", FieldValue::Files(3))
        .expect("known field");

    let summary = summarize(session.catalog(), session.form());
    let financial = summary
        .section(IntakeStep::Financial)
        .expect("financial section");

    let display_of = |key: &str| {
        financial
            .entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.display.clone())
    };

    assert_eq!(display_of("annualIncome").as_deref(), Some("1250000"));
    assert_eq!(display_of("bankStatement").as_deref(), Some("1 file attached"));
    assert_eq!(display_of("rentReceipts").as_deref(), Some("3 files attached"));

    let official = summary
        .section(IntakeStep::OfficialDetails)
        .expect("official section");
    let employment = official
        .entries
        .iter()
        .find(|entry| entry.key == "employmentType")
        .expect("employment entry");
    assert_eq!(employment.display, "salaried");
    let disability = official
        .entries
        .iter()
        .find(|entry| entry.key == "disabilityStatus")
        .expect("disability entry");
    assert_eq!(disability.display, "no");
}

#[test]
fn absent_optional_values_render_a_placeholder() {
    let catalog = common::catalog();
    let summary = summarize(&catalog, &FormState::new());
    let financial = summary
        .section(IntakeStep::Financial)
        .expect("financial section");
    let receipts = financial
        .entries
        .iter()
        .find(|entry| entry.key == "rentReceipts")
        .expect("rentReceipts entry");
    assert_eq!(receipts.display, "—");
}

#[test]
fn hyphenated_selection_tags_render_with_spaces() {
    let catalog = common::catalog();
    let mut form = FormState::new();
    form.set(
        "employmentType",
        FieldValue::Selection("self-employed".to_string()),
    );

    let summary = summarize(&catalog, &form);
    let official = summary
        .section(IntakeStep::OfficialDetails)
        .expect("official section");
    let employment = official
        .entries
        .iter()
        .find(|entry| entry.key == "employmentType")
        .expect("employment entry");
    assert_eq!(employment.display, "self employed");
}
