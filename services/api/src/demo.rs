use crate::infra::{InMemorySessionStore, RecordingSubmissionGateway};
use clap::Args;
use std::sync::Arc;
use taxmate_intake::error::AppError;
use taxmate_intake::intake::{
    FieldValue, IntakeServiceError, IntakeStep, IntakeWizardService, SessionId, WizardError,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Employment type for the scripted applicant (salaried, self-employed,
    /// freelancer, or unemployed)
    #[arg(long, default_value = "salaried")]
    pub(crate) employment: String,
    /// Answer yes to the land-ownership question and fill in the details
    #[arg(long)]
    pub(crate) own_land: bool,
    /// Answer yes to the rental-income question and provide a monthly rent
    #[arg(long)]
    pub(crate) with_rental_income: bool,
    /// Print every field of each step, not only the filled ones
    #[arg(long)]
    pub(crate) list_fields: bool,
}

type DemoService = IntakeWizardService<InMemorySessionStore, RecordingSubmissionGateway>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemorySessionStore::default());
    let gateway = Arc::new(RecordingSubmissionGateway::default());
    let service = IntakeWizardService::new(store, gateway.clone());

    println!("TaxMate intake demo (sensitive fields redacted)");

    let (id, surface) = match service.start() {
        Ok(opened) => opened,
        Err(err) => {
            println!("  Could not open a session: {err}");
            return Ok(());
        }
    };
    println!(
        "- Opened session {} on '{}' with {} fields",
        id.0,
        IntakeStep::BasicDetails.label(),
        surface.len()
    );

    fill(&service, &id, basic_details());
    if !advance(&service, &id, args.list_fields) {
        return Ok(());
    }

    fill(&service, &id, official_details(&args.employment));
    if !advance(&service, &id, args.list_fields) {
        return Ok(());
    }

    fill(&service, &id, financial_details(&args));
    if !advance(&service, &id, args.list_fields) {
        return Ok(());
    }

    match service.summary(&id) {
        Ok(summary) => {
            println!("\nReview summary");
            for section in &summary.sections {
                println!("  {}", section.step_label);
                for entry in &section.entries {
                    println!("    {}: {}", entry.label, entry.display);
                }
            }
        }
        Err(err) => {
            println!("  Summary unavailable: {err}");
            return Ok(());
        }
    }

    match service.submit(&id) {
        Ok(snapshot) => {
            println!(
                "\nSubmitted at {} with {} fields",
                snapshot.submitted_at,
                snapshot.values().len()
            );
        }
        Err(err) => {
            print_refusal(err);
            return Ok(());
        }
    }

    println!(
        "Gateway deliveries recorded: {}",
        gateway.deliveries().len()
    );
    Ok(())
}

fn fill(service: &DemoService, id: &SessionId, values: Vec<(&'static str, FieldValue)>) {
    for (key, value) in values {
        if let Err(err) = service.update_field(id, key, value) {
            println!("  Skipping '{key}': {err}");
        }
    }
}

/// Advance one step and report the outcome; false means the demo stops here.
fn advance(service: &DemoService, id: &SessionId, list_fields: bool) -> bool {
    match service.advance(id) {
        Ok((step, surface)) => {
            println!("- Advanced to '{}'", step.label());
            if list_fields {
                for view in &surface {
                    let marker = if view.is_active { "" } else { " (hidden)" };
                    println!("    [{}] {}{}", view.key, view.label, marker);
                }
            }
            true
        }
        Err(err) => {
            print_refusal(err);
            false
        }
    }
}

fn print_refusal(err: IntakeServiceError) {
    match err {
        IntakeServiceError::Wizard(WizardError::StepIncomplete { step, validation }) => {
            println!("  Step '{}' refused the transition:", step.label());
            for failure in validation.failures() {
                if let Some(message) = &failure.error {
                    println!("    - {}: {}", failure.key, message);
                }
            }
        }
        IntakeServiceError::Wizard(WizardError::SubmissionBlocked { validation }) => {
            println!("  Submission blocked; fix these steps first:");
            for step in validation.invalid_steps() {
                println!("    - {}", step.label());
            }
        }
        other => println!("  Refused: {other}"),
    }
}

fn basic_details() -> Vec<(&'static str, FieldValue)> {
    vec![
        ("fullName", FieldValue::Text("Asha Verma".to_string())),
        ("age", FieldValue::Number(34.0)),
        ("mobileNumber", FieldValue::Text("9876543210".to_string())),
        ("password", FieldValue::Text("correct-horse".to_string())),
    ]
}

fn official_details(employment: &str) -> Vec<(&'static str, FieldValue)> {
    vec![
        (
            "aadhaarNumber",
            FieldValue::Text("1234 5678 9012".to_string()),
        ),
        ("panNumber", FieldValue::Text("ABCDE1234F".to_string())),
        (
            "employmentType",
            FieldValue::Selection(employment.to_string()),
        ),
        (
            "stateOfResidence",
            FieldValue::Selection("Karnataka".to_string()),
        ),
        ("disabilityStatus", FieldValue::Toggle(false)),
    ]
}

fn financial_details(args: &DemoArgs) -> Vec<(&'static str, FieldValue)> {
    let mut values = vec![
        ("annualIncome", FieldValue::Number(1_250_000.0)),
        ("monthlyEmi", FieldValue::Number(18_000.0)),
        ("investmentsFdSavings", FieldValue::Number(300_000.0)),
        ("bankStatement", FieldValue::Files(1)),
    ];

    if args.employment == "salaried" {
        values.push(("salarySlip", FieldValue::Files(1)));
    }
    if args.own_land {
        values.push(("ownLand", FieldValue::Toggle(true)));
        values.push((
            "landDetails",
            FieldValue::Text("Plot 14, Whitefield".to_string()),
        ));
    }
    if args.with_rental_income {
        values.push(("earnRentFromProperty", FieldValue::Toggle(true)));
        values.push(("monthlyRent", FieldValue::Number(25_000.0)));
    }

    values
}
