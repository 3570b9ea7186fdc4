// Booking references and the clock they are cut from

use chrono::{DateTime, Local, NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

// Source of "now" and "today"
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    // Local calendar date, used for the "check-in not in the past" rule
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

// A clock that never moves, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    // "Today" is the local date of `now`, as with `SystemClock`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            today: now.with_timezone(&Local).date_naive(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

// A confirmation token such as `LM-482913`.
//
// The digits are the tail of the submission's millisecond timestamp, so two
// submissions in the same millisecond (or exactly 10^digits ms apart) share
// a reference. `ReferenceLedger` reports such repeats but does not avoid them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BookingReference(String);

impl BookingReference {
    pub fn from_timestamp(prefix: &str, digits: usize, at: DateTime<Utc>) -> Self {
        let millis = at.timestamp_millis().unsigned_abs().to_string();
        let tail = &millis[millis.len().saturating_sub(digits)..];
        BookingReference(format!("{}{}", prefix, tail))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LedgerStats {
    pub issued_count: usize,
    pub distinct_count: usize,
    pub collision_count: usize,
}

// Every reference handed out, shared by all forms of a site
#[derive(Debug, Default)]
pub struct ReferenceLedger {
    issued: DashMap<BookingReference, DateTime<Utc>>,
    issued_count: AtomicUsize,
    collision_count: AtomicUsize,
}

impl ReferenceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, prefix: &str, digits: usize, clock: &dyn Clock) -> BookingReference {
        let now = clock.now();
        let reference = BookingReference::from_timestamp(prefix, digits, now);

        self.issued_count.fetch_add(1, Ordering::SeqCst);
        match self.issued.entry(reference.clone()) {
            Entry::Occupied(mut entry) => {
                self.collision_count.fetch_add(1, Ordering::SeqCst);
                warn!(
                    reference = %reference,
                    first_issued_at = %entry.get(),
                    "booking reference issued more than once"
                );
                entry.insert(now);
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
            }
        }

        reference
    }

    pub fn contains(&self, reference: &BookingReference) -> bool {
        self.issued.contains_key(reference)
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            issued_count: self.issued_count.load(Ordering::SeqCst),
            distinct_count: self.issued.len(),
            collision_count: self.collision_count.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::thread;

    fn at_millis(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_reference_uses_last_six_timestamp_digits() {
        let reference = BookingReference::from_timestamp("LM-", 6, at_millis(1_717_243_512_345));
        assert_eq!(reference.as_str(), "LM-512345");
        assert_eq!(reference.to_string(), "LM-512345");
    }

    #[test]
    fn test_reference_keeps_leading_zeros() {
        let reference = BookingReference::from_timestamp("LM-", 6, at_millis(1_717_243_000_042));
        assert_eq!(reference.as_str(), "LM-000042");
    }

    #[test]
    fn test_short_timestamp_is_used_whole() {
        let reference = BookingReference::from_timestamp("LM-", 6, at_millis(1_234));
        assert_eq!(reference.as_str(), "LM-1234");
    }

    #[test]
    fn test_reference_format() {
        let reference = ReferenceLedger::new().issue("LM-", 6, &SystemClock);
        let digits = reference.as_str().strip_prefix("LM-").unwrap();
        assert_eq!(digits.len(), 6);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_ledger_flags_repeated_reference() {
        let ledger = ReferenceLedger::new();
        let clock = FixedClock::new(at_millis(1_717_243_512_345));

        let first = ledger.issue("LM-", 6, &clock);
        let second = ledger.issue("LM-", 6, &clock);
        // Timestamps a million milliseconds apart share their last six digits
        let third = ledger.issue("LM-", 6, &FixedClock::new(at_millis(1_717_244_512_345)));

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert!(ledger.contains(&first));
        assert_eq!(
            ledger.stats(),
            LedgerStats {
                issued_count: 3,
                distinct_count: 1,
                collision_count: 2,
            }
        );
    }

    #[test]
    fn test_ledger_shared_across_threads() {
        let ledger = Arc::new(ReferenceLedger::new());
        let mut handles = vec![];

        for i in 0..8 {
            let ledger = Arc::clone(&ledger);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    let clock = FixedClock::new(at_millis(1_717_000_000_000 + i * 100 + j));
                    ledger.issue("LM-", 6, &clock);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = ledger.stats();
        assert_eq!(stats.issued_count, 800);
        assert_eq!(stats.distinct_count, 800);
        assert_eq!(stats.collision_count, 0);
    }

    #[test]
    fn test_fixed_clock_today_override() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let clock = FixedClock::new(at_millis(0)).with_today(today);
        assert_eq!(clock.today(), today);
        assert_eq!(clock.now(), at_millis(0));
    }

    #[test]
    fn test_fixed_clock_today_is_local_date() {
        // 2025-06-01 23:30 UTC, already 2 June east of UTC
        let now = at_millis(1_748_820_600_000);
        let clock = FixedClock::new(now);
        assert_eq!(clock.today(), now.with_timezone(&Local).date_naive());
    }
}
