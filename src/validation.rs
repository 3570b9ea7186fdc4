// Field validation for the booking and contact forms
//
// Verdicts are plain values: a failed check never becomes an `Err`, it
// becomes `FieldValidity::Invalid` with the reason the user has to fix.

use crate::query::parse_date;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

// Why a field was rejected; the message is what the form shows beside it
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidityReason {
    #[error("This field is required")]
    RequiredMissing,

    #[error("Please enter a valid value")]
    FormatInvalid,

    #[error("Please choose a later date")]
    DateOrderInvalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "kebab-case")]
pub enum FieldValidity {
    // Passed, but empty: nothing to confirm yet
    Valid,
    // Passed with a value present
    Confirmed,
    Invalid(ValidityReason),
}

impl FieldValidity {
    pub fn is_valid(&self) -> bool {
        !matches!(self, FieldValidity::Invalid(_))
    }

    pub fn reason(&self) -> Option<ValidityReason> {
        match self {
            FieldValidity::Invalid(reason) => Some(*reason),
            _ => None,
        }
    }

    fn passed(value: &str) -> Self {
        if value.is_empty() {
            FieldValidity::Valid
        } else {
            FieldValidity::Confirmed
        }
    }
}

// Which rule set applies to a field. Decided once, when the form is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    CheckIn,
    CheckOut,
    Email,
    Phone,
    // Only the required check applies
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "default_required")]
    pub required: bool,
    // Value restored when the form is reset
    #[serde(default)]
    pub default: String,
}

fn default_required() -> bool {
    true
}

impl FieldBinding {
    pub fn required(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            default: String::new(),
        }
    }

    pub fn optional(name: &str, kind: FieldKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = default.to_string();
        self
    }
}

// What a single-field check needs to know about the rest of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub today: NaiveDate,
    pub check_in: Option<NaiveDate>,
}

impl ValidationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            check_in: None,
        }
    }

    pub fn with_check_in(mut self, check_in: Option<NaiveDate>) -> Self {
        self.check_in = check_in;
        self
    }
}

// Validates one field, first failing rule wins:
// required, email format, phone format, check-in not in the past,
// check-out after check-in.
pub fn validate_field(
    binding: &FieldBinding,
    value: &str,
    context: &ValidationContext,
) -> FieldValidity {
    let value = value.trim();

    if binding.required && value.is_empty() {
        return FieldValidity::Invalid(ValidityReason::RequiredMissing);
    }
    if value.is_empty() {
        return FieldValidity::Valid;
    }

    let failure = match binding.kind {
        FieldKind::Email if !is_valid_email(value) => Some(ValidityReason::FormatInvalid),
        FieldKind::Phone if !is_valid_phone(value) => Some(ValidityReason::FormatInvalid),
        FieldKind::CheckIn => match parse_date(value) {
            Some(check_in) if check_in < context.today => Some(ValidityReason::DateOrderInvalid),
            _ => None,
        },
        FieldKind::CheckOut => match (context.check_in, parse_date(value)) {
            (Some(check_in), Some(check_out)) if check_out <= check_in => {
                Some(ValidityReason::DateOrderInvalid)
            }
            _ => None,
        },
        _ => None,
    };

    match failure {
        Some(reason) => FieldValidity::Invalid(reason),
        None => FieldValidity::passed(value),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldResult {
    pub name: String,
    pub kind: FieldKind,
    pub validity: FieldValidity,
}

// Outcome of checking a whole form on submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    pub results: Vec<FieldResult>,
}

impl SubmissionReport {
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|result| result.validity.is_valid())
    }

    pub fn failing(&self) -> impl Iterator<Item = &FieldResult> {
        self.results
            .iter()
            .filter(|result| !result.validity.is_valid())
    }

    pub fn failing_names(&self) -> Vec<&str> {
        self.failing().map(|result| result.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldResult> {
        self.results.iter().find(|result| result.name == name)
    }
}

// Checks every field and reports each one; there is no early exit.
//
// The submit-time rules are narrower than `validate_field`: required
// fields, check-out after check-in (when both dates are present), email
// and phone formats. A check-in date in the past is only caught by the
// per-field check.
pub fn validate_submission<'a, I>(fields: I) -> SubmissionReport
where
    I: IntoIterator<Item = (&'a FieldBinding, &'a str)>,
{
    let fields: Vec<(&FieldBinding, &str)> = fields
        .into_iter()
        .map(|(binding, value)| (binding, value.trim()))
        .collect();

    let check_in = fields
        .iter()
        .find(|(binding, _)| binding.kind == FieldKind::CheckIn)
        .and_then(|(_, value)| parse_date(value));

    let results = fields
        .iter()
        .map(|(binding, value)| {
            let validity = submission_verdict(binding, value, check_in);
            FieldResult {
                name: binding.name.clone(),
                kind: binding.kind,
                validity,
            }
        })
        .collect();

    SubmissionReport { results }
}

fn submission_verdict(
    binding: &FieldBinding,
    value: &str,
    check_in: Option<NaiveDate>,
) -> FieldValidity {
    if binding.required && value.is_empty() {
        return FieldValidity::Invalid(ValidityReason::RequiredMissing);
    }
    if value.is_empty() {
        return FieldValidity::Valid;
    }

    let passes = match binding.kind {
        FieldKind::CheckOut => match (check_in, parse_date(value)) {
            (Some(check_in), Some(check_out)) => check_out > check_in,
            _ => true,
        },
        FieldKind::Email => is_valid_email(value),
        FieldKind::Phone => is_valid_phone(value),
        FieldKind::CheckIn | FieldKind::Generic => true,
    };

    if passes {
        FieldValidity::Confirmed
    } else if binding.kind == FieldKind::CheckOut {
        FieldValidity::Invalid(ValidityReason::DateOrderInvalid)
    } else {
        FieldValidity::Invalid(ValidityReason::FormatInvalid)
    }
}

// `local@domain.tld`: exactly one `@`, no whitespace anywhere, and a dot in
// the domain with at least one character on each side of it
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

// An optional leading `+`, then 1 to 16 ASCII digits, the first non-zero
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern compiles"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

// Whitespace is ignored; other punctuation such as `-` or `()` is not
// stripped and makes the number invalid.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(&WHITESPACE.replace_all(value, ""))
}
