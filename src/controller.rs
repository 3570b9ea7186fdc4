// Form controller: the surface the page glue talks to
//
// Holds the current field values and the validity marks shown next to them.
// Every computation is delegated to the pure functions in `summary` and
// `validation`; the controller only decides when to run them and what
// state to update afterwards.

use crate::config::{FormConfig, ADULTS, CHILDREN, ROOMS, ROOM_TYPE};
use crate::error::BookingError;
use crate::query::{parse_date, BookingQuery, FormInput};
use crate::reference::{BookingReference, Clock, ReferenceLedger, SystemClock};
use crate::summary::{compute_summary, BookingSummary, SummaryDisplay};
use crate::validation::{
    validate_field, validate_submission, FieldKind, FieldValidity, SubmissionReport,
    ValidationContext,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

// A message for the user, shown once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

// Result of a single field event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: String,
    // None when the event did not re-validate the field
    pub validity: Option<FieldValidity>,
    // Fields whose values were cleared as a consequence
    pub cleared: Vec<String>,
    pub summary: BookingSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub reference: Option<BookingReference>,
    pub summary: BookingSummary,
    pub notification: Notification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub report: SubmissionReport,
    pub notification: Notification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SubmissionOutcome {
    Accepted(Confirmation),
    Rejected(Rejection),
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted(_))
    }

    pub fn notification(&self) -> &Notification {
        match self {
            SubmissionOutcome::Accepted(confirmation) => &confirmation.notification,
            SubmissionOutcome::Rejected(rejection) => &rejection.notification,
        }
    }
}

pub struct FormController {
    config: FormConfig,
    // Parallel to `config.fields`
    values: Vec<String>,
    marks: Vec<Option<FieldValidity>>,
    clock: Arc<dyn Clock>,
    ledger: Arc<ReferenceLedger>,
}

impl FormController {
    pub fn new(config: FormConfig) -> Result<Self, BookingError> {
        config.validate()?;

        let values = config
            .fields
            .iter()
            .map(|binding| binding.default.clone())
            .collect();
        let marks = vec![None; config.fields.len()];

        Ok(Self {
            config,
            values,
            marks,
            clock: Arc::new(SystemClock),
            ledger: Arc::new(ReferenceLedger::new()),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ledger(mut self, ledger: Arc<ReferenceLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<ReferenceLedger> {
        &self.ledger
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|index| self.values[index].as_str())
    }

    // The mark currently shown beside a field, if any
    pub fn mark(&self, name: &str) -> Option<FieldValidity> {
        self.index_of(name).and_then(|index| self.marks[index])
    }

    // A value was committed (change or blur): store it, apply knock-on
    // effects, validate it and refresh the summary.
    pub fn on_field_change(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<FieldChange, BookingError> {
        let index = self.require_index(name)?;
        self.values[index] = value.to_string();

        let mut cleared = Vec::new();
        if self.config.fields[index].kind == FieldKind::CheckIn {
            if let Some(check_out) = self.clear_stale_check_out() {
                cleared.push(check_out);
            }
        }

        let validity = self.validate_index(index);
        self.marks[index] = Some(validity);

        let summary = self.summary();
        debug!(
            field = name,
            ?validity,
            nights = summary.nights,
            total = summary.total_price,
            "field changed"
        );

        Ok(FieldChange {
            field: name.to_string(),
            validity: Some(validity),
            cleared,
            summary,
        })
    }

    // A keystroke: store the value and re-validate only a field that is
    // already marked invalid, so the mark clears as soon as it is fixed.
    pub fn on_field_input(&mut self, name: &str, value: &str) -> Result<FieldChange, BookingError> {
        let index = self.require_index(name)?;
        self.values[index] = value.to_string();

        let validity = match self.marks[index] {
            Some(FieldValidity::Invalid(_)) => {
                let validity = self.validate_index(index);
                self.marks[index] = Some(validity);
                debug!(field = name, ?validity, "field re-validated");
                Some(validity)
            }
            _ => None,
        };

        Ok(FieldChange {
            field: name.to_string(),
            validity,
            cleared: Vec::new(),
            summary: self.summary(),
        })
    }

    // Validates the whole form. An accepted form is reset to its defaults
    // after the confirmation (and reference) has been produced.
    pub fn on_submit(&mut self) -> SubmissionOutcome {
        let report = validate_submission(
            self.config
                .fields
                .iter()
                .zip(self.values.iter().map(String::as_str)),
        );

        if !report.is_valid() {
            for (mark, result) in self.marks.iter_mut().zip(&report.results) {
                match result.validity {
                    FieldValidity::Invalid(_) => *mark = Some(result.validity),
                    _ if matches!(mark, Some(FieldValidity::Invalid(_))) => *mark = None,
                    _ => {}
                }
            }
            debug!(failing = ?report.failing_names(), "submission rejected");

            return SubmissionOutcome::Rejected(Rejection {
                report,
                notification: Notification::error(self.config.rejection_message.as_str()),
            });
        }

        let summary = self.summary();
        let reference = self.config.issue_reference.then(|| {
            self.ledger.issue(
                &self.config.reference_prefix,
                self.config.reference_digits,
                self.clock.as_ref(),
            )
        });

        let message = match &reference {
            Some(reference) => format!(
                "{} Booking Reference: {}",
                self.config.success_message, reference
            ),
            None => self.config.success_message.clone(),
        };
        info!(
            reference = reference.as_ref().map(BookingReference::as_str),
            nights = summary.nights,
            total = summary.total_price,
            "submission accepted"
        );

        self.reset();

        SubmissionOutcome::Accepted(Confirmation {
            reference,
            summary,
            notification: Notification::success(message),
        })
    }

    // Restore every field to its default and drop all marks
    pub fn reset(&mut self) {
        for (value, binding) in self.values.iter_mut().zip(&self.config.fields) {
            value.clone_from(&binding.default);
        }
        self.marks.iter_mut().for_each(|mark| *mark = None);
    }

    pub fn form_input(&self) -> FormInput {
        let named = |name: &str| self.value(name).unwrap_or_default().to_string();
        FormInput {
            check_in: self.value_of_kind(FieldKind::CheckIn).to_string(),
            check_out: self.value_of_kind(FieldKind::CheckOut).to_string(),
            adults: named(ADULTS),
            children: named(CHILDREN),
            rooms: named(ROOMS),
            room_type: named(ROOM_TYPE),
        }
    }

    pub fn query(&self) -> BookingQuery {
        BookingQuery::from_input(&self.form_input())
    }

    pub fn summary(&self) -> BookingSummary {
        compute_summary(self.query())
    }

    pub fn summary_display(&self) -> SummaryDisplay {
        self.summary().display(&self.form_input(), &self.config.currency)
    }

    // Earliest selectable check-in
    pub fn checkin_min(&self) -> NaiveDate {
        self.clock.today()
    }

    // Earliest selectable check-out: the day after check-in
    pub fn checkout_min(&self) -> Option<NaiveDate> {
        self.check_in().and_then(|check_in| check_in.succ_opt())
    }

    fn check_in(&self) -> Option<NaiveDate> {
        parse_date(self.value_of_kind(FieldKind::CheckIn))
    }

    fn value_of_kind(&self, kind: FieldKind) -> &str {
        self.config
            .fields
            .iter()
            .position(|binding| binding.kind == kind)
            .map(|index| self.values[index].as_str())
            .unwrap_or_default()
    }

    // A check-out on or before the new check-in no longer makes sense
    fn clear_stale_check_out(&mut self) -> Option<String> {
        let check_in = self.check_in()?;
        let index = self
            .config
            .fields
            .iter()
            .position(|binding| binding.kind == FieldKind::CheckOut)?;

        let check_out = parse_date(&self.values[index])?;
        if check_out > check_in {
            return None;
        }

        self.values[index].clear();
        self.marks[index] = None;
        Some(self.config.fields[index].name.clone())
    }

    fn validate_index(&self, index: usize) -> FieldValidity {
        let context = ValidationContext::new(self.clock.today()).with_check_in(self.check_in());
        validate_field(&self.config.fields[index], &self.values[index], &context)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.config
            .fields
            .iter()
            .position(|binding| binding.name == name)
    }

    fn require_index(&self, name: &str) -> Result<usize, BookingError> {
        self.index_of(name)
            .ok_or_else(|| BookingError::UnknownField(name.to_string()))
    }
}
