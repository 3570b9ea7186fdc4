// Booking calculator and form handling for the lodge website

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod query;
pub mod reference;
pub mod summary;
pub mod validation;

// Re-export key types for convenience
pub use catalog::{RoomCatalog, RoomRate, RoomType};
pub use config::FormConfig;
pub use controller::{
    Confirmation, FieldChange, FormController, Notification, NotificationLevel, Rejection,
    SubmissionOutcome,
};
pub use error::BookingError;
pub use query::{BookingQuery, FormInput};
pub use reference::{BookingReference, Clock, FixedClock, ReferenceLedger, SystemClock};
pub use summary::{compute_summary, BookingSummary, SummaryDisplay};
pub use validation::{
    validate_field, validate_submission, FieldBinding, FieldKind, FieldValidity,
    SubmissionReport, ValidationContext, ValidityReason,
};
