// Form configuration: field bindings, currency and notification texts

use crate::error::BookingError;
use crate::validation::{FieldBinding, FieldKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// Names of the booking form fields the summary reads
pub const CHECK_IN: &str = "checkIn";
pub const CHECK_OUT: &str = "checkOut";
pub const ADULTS: &str = "adults";
pub const CHILDREN: &str = "children";
pub const ROOMS: &str = "rooms";
pub const ROOM_TYPE: &str = "roomType";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    pub currency: String,
    // Whether an accepted submission gets a booking reference
    pub issue_reference: bool,
    pub reference_prefix: String,
    pub reference_digits: usize,
    pub success_message: String,
    pub rejection_message: String,
    pub fields: Vec<FieldBinding>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::booking()
    }
}

impl FormConfig {
    // The room booking page
    pub fn booking() -> Self {
        Self {
            currency: "KES".to_string(),
            issue_reference: true,
            reference_prefix: "LM-".to_string(),
            reference_digits: 6,
            success_message: "Booking Request Submitted!".to_string(),
            rejection_message: "Please check your input and try again.".to_string(),
            fields: vec![
                FieldBinding::required(CHECK_IN, FieldKind::CheckIn),
                FieldBinding::required(CHECK_OUT, FieldKind::CheckOut),
                FieldBinding::required(ADULTS, FieldKind::Generic).with_default("1"),
                FieldBinding::optional(CHILDREN, FieldKind::Generic).with_default("0"),
                FieldBinding::required(ROOMS, FieldKind::Generic).with_default("1"),
                FieldBinding::required(ROOM_TYPE, FieldKind::Generic),
                FieldBinding::required("firstName", FieldKind::Generic),
                FieldBinding::required("lastName", FieldKind::Generic),
                FieldBinding::required("email", FieldKind::Email),
                FieldBinding::required("phone", FieldKind::Phone),
                FieldBinding::optional("specialRequests", FieldKind::Generic),
            ],
        }
    }

    // The contact page: required checks only, no reference
    pub fn contact() -> Self {
        Self {
            issue_reference: false,
            success_message: "Form submitted successfully! We will contact you soon.".to_string(),
            rejection_message: "Please fill in all required fields.".to_string(),
            fields: vec![
                FieldBinding::required("name", FieldKind::Generic),
                FieldBinding::required("email", FieldKind::Generic),
                FieldBinding::optional("phone", FieldKind::Generic),
                FieldBinding::required("subject", FieldKind::Generic),
                FieldBinding::required("message", FieldKind::Generic),
            ],
            ..Self::booking()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, BookingError> {
        let config: FormConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BookingError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn field(&self, name: &str) -> Option<&FieldBinding> {
        self.fields.iter().find(|binding| binding.name == name)
    }

    pub fn validate(&self) -> Result<(), BookingError> {
        let mut seen = HashSet::new();
        for binding in &self.fields {
            if !seen.insert(binding.name.as_str()) {
                return Err(BookingError::DuplicateField(binding.name.clone()));
            }
        }

        for kind in [FieldKind::CheckIn, FieldKind::CheckOut] {
            let count = self.fields.iter().filter(|b| b.kind == kind).count();
            if count > 1 {
                return Err(BookingError::InvalidConfig(format!(
                    "at most one {:?} field is allowed, found {}",
                    kind, count
                )));
            }
        }

        if self.issue_reference && self.reference_digits == 0 {
            return Err(BookingError::InvalidConfig(
                "reference_digits must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
