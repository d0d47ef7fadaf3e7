use std::collections::HashMap;

use regex::Regex;

use super::contract::{Activation, Constraint, FieldContract, FieldKind, Masking};
use super::domain::IntakeStep;

pub const EMPLOYMENT_TYPES: &[&str] = &["salaried", "self-employed", "freelancer", "unemployed"];

pub const INDIAN_STATES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Puducherry",
    "Chandigarh",
];

/// Raised while building a catalog from contracts. These are programming
/// defects in the field definitions, surfaced at startup rather than at
/// validation time.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate field key '{0}'")]
    DuplicateKey(&'static str),
    #[error("field '{field}' activation references unknown field '{referenced}'")]
    UnknownReference {
        field: &'static str,
        referenced: &'static str,
    },
    #[error("field '{field}' activation references '{referenced}' declared on a later step")]
    ForwardReference {
        field: &'static str,
        referenced: &'static str,
    },
    #[error("the summary step owns no fields, but '{0}' is assigned to it")]
    FieldOnSummaryStep(&'static str),
    #[error("field '{field}' carries an invalid pattern: {source}")]
    InvalidPattern {
        field: &'static str,
        source: regex::Error,
    },
}

/// The full field contract set, validated and with every pattern compiled.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    contracts: Vec<FieldContract>,
    patterns: HashMap<&'static str, Regex>,
}

impl FieldCatalog {
    /// Validate the contract set invariants and compile pattern constraints.
    ///
    /// Activation predicates may only reference fields declared on an earlier
    /// or the same step; forward references are rejected so activation can
    /// never be circular.
    pub fn new(contracts: Vec<FieldContract>) -> Result<Self, CatalogError> {
        let mut positions: HashMap<&'static str, u8> = HashMap::new();
        for contract in &contracts {
            if contract.step.is_summary() {
                return Err(CatalogError::FieldOnSummaryStep(contract.key));
            }
            if positions
                .insert(contract.key, contract.step.position())
                .is_some()
            {
                return Err(CatalogError::DuplicateKey(contract.key));
            }
        }

        for contract in &contracts {
            if let Some(referenced) = contract.activation.references() {
                let Some(trigger_position) = positions.get(referenced) else {
                    return Err(CatalogError::UnknownReference {
                        field: contract.key,
                        referenced,
                    });
                };
                if *trigger_position > contract.step.position() {
                    return Err(CatalogError::ForwardReference {
                        field: contract.key,
                        referenced,
                    });
                }
            }
        }

        let mut patterns = HashMap::new();
        for contract in &contracts {
            for constraint in &contract.constraints {
                if let Constraint::Pattern { pattern, .. } = constraint {
                    if !patterns.contains_key(pattern) {
                        let compiled = Regex::new(pattern).map_err(|source| {
                            CatalogError::InvalidPattern {
                                field: contract.key,
                                source,
                            }
                        })?;
                        patterns.insert(*pattern, compiled);
                    }
                }
            }
        }

        Ok(Self {
            contracts,
            patterns,
        })
    }

    /// The TaxMate intake form as shipped.
    pub fn standard() -> Self {
        Self::new(standard_contracts()).expect("standard field contracts are well-formed")
    }

    pub fn contracts(&self) -> &[FieldContract] {
        &self.contracts
    }

    pub fn contract(&self, key: &str) -> Option<&FieldContract> {
        self.contracts.iter().find(|contract| contract.key == key)
    }

    pub fn step_contracts(&self, step: IntakeStep) -> Vec<&FieldContract> {
        self.contracts
            .iter()
            .filter(|contract| contract.step == step)
            .collect()
    }

    pub(crate) fn pattern(&self, source: &str) -> Option<&Regex> {
        self.patterns.get(source)
    }
}

fn standard_contracts() -> Vec<FieldContract> {
    vec![
        FieldContract {
            key: "fullName",
            label: "Full Name",
            step: IntakeStep::BasicDetails,
            kind: FieldKind::Text,
            constraints: vec![Constraint::MinLength {
                min: 2,
                message: "Full name is required",
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "age",
            label: "Age",
            step: IntakeStep::BasicDetails,
            kind: FieldKind::Number,
            constraints: vec![Constraint::Range {
                min: 18.0,
                max: Some(120.0),
                message: "Must be 18 or older",
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "mobileNumber",
            label: "Mobile Number",
            step: IntakeStep::BasicDetails,
            kind: FieldKind::Text,
            constraints: vec![Constraint::Pattern {
                pattern: r"^[6-9]\d{9}$",
                message: "Enter a valid 10-digit mobile number",
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "password",
            label: "Password",
            step: IntakeStep::BasicDetails,
            kind: FieldKind::Text,
            constraints: vec![Constraint::MinLength {
                min: 8,
                message: "Password must be at least 8 characters",
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::Credential,
        },
        FieldContract {
            key: "aadhaarNumber",
            label: "Aadhaar Number",
            step: IntakeStep::OfficialDetails,
            kind: FieldKind::Text,
            constraints: vec![Constraint::Pattern {
                pattern: r"^\d{4}\s?\d{4}\s?\d{4}$",
                message: "Enter a valid 12-digit Aadhaar",
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::Identifier,
        },
        FieldContract {
            key: "panNumber",
            label: "PAN",
            step: IntakeStep::OfficialDetails,
            kind: FieldKind::Text,
            constraints: vec![Constraint::Pattern {
                pattern: r"^[A-Z]{5}[0-9]{4}[A-Z]$",
                message: "PAN must be 5 letters, 4 digits, and a final letter",
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::Identifier,
        },
        FieldContract {
            key: "employmentType",
            label: "Employment Type",
            step: IntakeStep::OfficialDetails,
            kind: FieldKind::Selection,
            constraints: vec![Constraint::OneOf {
                options: EMPLOYMENT_TYPES,
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "stateOfResidence",
            label: "State of Residence",
            step: IntakeStep::OfficialDetails,
            kind: FieldKind::Selection,
            constraints: vec![Constraint::OneOf {
                options: INDIAN_STATES,
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "disabilityStatus",
            label: "Disability Status",
            step: IntakeStep::OfficialDetails,
            kind: FieldKind::Toggle,
            constraints: Vec::new(),
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "annualIncome",
            label: "Annual Income (₹)",
            step: IntakeStep::Financial,
            kind: FieldKind::Number,
            constraints: vec![Constraint::Range {
                min: 0.0,
                max: None,
                message: "Must be 0 or more",
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "monthlyEmi",
            label: "Monthly EMI (₹)",
            step: IntakeStep::Financial,
            kind: FieldKind::Number,
            constraints: vec![Constraint::Range {
                min: 0.0,
                max: None,
                message: "Must be 0 or more",
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "investmentsFdSavings",
            label: "Investments (FD / Savings) (₹)",
            step: IntakeStep::Financial,
            kind: FieldKind::Number,
            constraints: vec![Constraint::Range {
                min: 0.0,
                max: None,
                message: "Must be 0 or more",
            }],
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "bankStatement",
            label: "Bank Statement",
            step: IntakeStep::Financial,
            kind: FieldKind::Attachments,
            constraints: Vec::new(),
            activation: Activation::Always,
            required_when_active: true,
            masking: Masking::None,
        },
        // Cross-step requirement: the earlier employment choice decides
        // whether a salary slip must be attached. The rule lives here, on the
        // later field, never on the earlier step.
        FieldContract {
            key: "salarySlip",
            label: "Salary Slip",
            step: IntakeStep::Financial,
            kind: FieldKind::Attachments,
            constraints: Vec::new(),
            activation: Activation::SelectionIn {
                field: "employmentType",
                any_of: &["salaried"],
            },
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "rentReceipts",
            label: "Rent Receipts",
            step: IntakeStep::Financial,
            kind: FieldKind::Attachments,
            constraints: Vec::new(),
            activation: Activation::Always,
            required_when_active: false,
            masking: Masking::None,
        },
        FieldContract {
            key: "otherSpendingProofs",
            label: "Other Spending Proofs",
            step: IntakeStep::Financial,
            kind: FieldKind::Attachments,
            constraints: Vec::new(),
            activation: Activation::Always,
            required_when_active: false,
            masking: Masking::None,
        },
        FieldContract {
            key: "ownLand",
            label: "Do you own land?",
            step: IntakeStep::Financial,
            kind: FieldKind::Toggle,
            constraints: Vec::new(),
            activation: Activation::Always,
            required_when_active: false,
            masking: Masking::None,
        },
        FieldContract {
            key: "landDetails",
            label: "Land Details",
            step: IntakeStep::Financial,
            kind: FieldKind::Text,
            constraints: vec![Constraint::MinLength {
                min: 1,
                message: "Land details required when you own land",
            }],
            activation: Activation::ToggleIs {
                field: "ownLand",
                expected: true,
            },
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "earnRentFromProperty",
            label: "Do you earn rent from property?",
            step: IntakeStep::Financial,
            kind: FieldKind::Toggle,
            constraints: Vec::new(),
            activation: Activation::Always,
            required_when_active: false,
            masking: Masking::None,
        },
        FieldContract {
            key: "monthlyRent",
            label: "Monthly Rent (₹)",
            step: IntakeStep::Financial,
            kind: FieldKind::Number,
            constraints: vec![Constraint::Range {
                min: 0.0,
                max: None,
                message: "Monthly rent required",
            }],
            activation: Activation::ToggleIs {
                field: "earnRentFromProperty",
                expected: true,
            },
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "soldProperty",
            label: "Have you sold any property?",
            step: IntakeStep::Financial,
            kind: FieldKind::Toggle,
            constraints: Vec::new(),
            activation: Activation::Always,
            required_when_active: false,
            masking: Masking::None,
        },
        FieldContract {
            key: "saleAgreementFile",
            label: "Sale Agreement",
            step: IntakeStep::Financial,
            kind: FieldKind::Attachments,
            constraints: Vec::new(),
            activation: Activation::ToggleIs {
                field: "soldProperty",
                expected: true,
            },
            required_when_active: true,
            masking: Masking::None,
        },
        // Trigger with no dependent field, matching the shipped form. The
        // asymmetry with ownLand/isTrader is recorded in DESIGN.md.
        FieldContract {
            key: "runBusiness",
            label: "Do you run a business?",
            step: IntakeStep::Financial,
            kind: FieldKind::Toggle,
            constraints: Vec::new(),
            activation: Activation::Always,
            required_when_active: false,
            masking: Masking::None,
        },
        FieldContract {
            key: "agriculturalIncome",
            label: "Do you earn agricultural income?",
            step: IntakeStep::Financial,
            kind: FieldKind::Toggle,
            constraints: Vec::new(),
            activation: Activation::Always,
            required_when_active: false,
            masking: Masking::None,
        },
        FieldContract {
            key: "agriculturalIncomeCertificate",
            label: "Income Certificate",
            step: IntakeStep::Financial,
            kind: FieldKind::Attachments,
            constraints: Vec::new(),
            activation: Activation::ToggleIs {
                field: "agriculturalIncome",
                expected: true,
            },
            required_when_active: true,
            masking: Masking::None,
        },
        FieldContract {
            key: "isTrader",
            label: "Are you a trader?",
            step: IntakeStep::Financial,
            kind: FieldKind::Toggle,
            constraints: Vec::new(),
            activation: Activation::Always,
            required_when_active: false,
            masking: Masking::None,
        },
        FieldContract {
            key: "yearlyPnLStatement",
            label: "Yearly Profit & Loss Statement",
            step: IntakeStep::Financial,
            kind: FieldKind::Attachments,
            constraints: Vec::new(),
            activation: Activation::ToggleIs {
                field: "isTrader",
                expected: true,
            },
            required_when_active: true,
            masking: Masking::None,
        },
    ]
}
