// Booking summary: nights, guests, label and total derived from a query

use crate::catalog::{RoomCatalog, RoomType};
use crate::query::{BookingQuery, FormInput};
use chrono::NaiveDate;
use serde::Serialize;

pub const UNSET: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub nights: u32,
    pub adults: u32,
    pub children: u32,
    pub guests: u32,
    pub room_type: Option<RoomType>,
    pub room_label: Option<&'static str>,
    pub total_price: u64,
}

// Display-ready text for each summary line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryDisplay {
    pub check_in: String,
    pub check_out: String,
    pub nights: String,
    pub guests: String,
    pub room_type: String,
    pub total: String,
}

// Derives the summary for a query. Total over every input, including a
// completely blank form.
pub fn compute_summary(query: BookingQuery) -> BookingSummary {
    let catalog = RoomCatalog::global();
    let nights = stay_nights(query.check_in, query.check_out);

    let total_price = match query.room_type {
        Some(room_type) if nights > 0 && query.rooms > 0 => catalog
            .price_per_night(room_type)
            .saturating_mul(nights as u64)
            .saturating_mul(query.rooms as u64),
        _ => 0,
    };

    BookingSummary {
        check_in: query.check_in,
        check_out: query.check_out,
        nights,
        adults: query.adults,
        children: query.children,
        guests: query.adults.saturating_add(query.children),
        room_type: query.room_type,
        room_label: query.room_type.map(|room_type| catalog.label(room_type)),
        total_price,
    }
}

// Whole nights between two calendar dates. Missing dates, or a check-out
// on or before check-in, give zero.
pub fn stay_nights(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> u32 {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => {
            let days = (check_out - check_in).num_days();
            if days <= 0 {
                0
            } else {
                u32::try_from(days).unwrap_or(u32::MAX)
            }
        }
        _ => 0,
    }
}

impl BookingSummary {
    // Dates are echoed as typed, even when they did not parse
    pub fn display(&self, input: &FormInput, currency: &str) -> SummaryDisplay {

        let nights = match self.nights {
            0 => UNSET.to_string(),
            1 => "1 night".to_string(),
            n => format!("{} nights", n),
        };

        let guests = if self.guests > 0 {
            format!(
                "{} ({} adults, {} children)",
                self.guests, self.adults, self.children
            )
        } else {
            UNSET.to_string()
        };

        SummaryDisplay {
            check_in: or_unset(&input.check_in),
            check_out: or_unset(&input.check_out),
            nights,
            guests,
            room_type: self.room_label.unwrap_or(UNSET).to_string(),
            total: format_amount(self.total_price, currency),
        }
    }
}

fn or_unset(text: &str) -> String {
    if text.is_empty() {
        UNSET.to_string()
    } else {
        text.to_string()
    }
}

// "KES 25,000"; a zero total still prints as "KES 0"
pub fn format_amount(amount: u64, currency: &str) -> String {
    format!("{} {}", currency, group_thousands(amount))
}

pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
        rooms: u32,
        room_type: Option<RoomType>,
    ) -> BookingQuery {
        BookingQuery {
            check_in,
            check_out,
            adults: 2,
            children: 0,
            rooms,
            room_type,
        }
    }

    #[test]
    fn test_nights_match_calendar_day_difference() {
        let check_in = date(2025, 6, 1);
        for n in 1..=60 {
            let check_out = check_in + Duration::days(n);
            let summary = compute_summary(query(Some(check_in), Some(check_out), 1, None));
            assert_eq!(summary.nights, n as u32);
        }
    }

    #[test]
    fn test_nights_across_month_and_year_boundaries() {
        assert_eq!(stay_nights(Some(date(2025, 1, 30)), Some(date(2025, 2, 2))), 3);
        assert_eq!(stay_nights(Some(date(2024, 12, 31)), Some(date(2025, 1, 1))), 1);
        assert_eq!(stay_nights(Some(date(2024, 2, 28)), Some(date(2024, 3, 1))), 2);
    }

    #[test_case(Some(date(2025, 6, 5)), Some(date(2025, 6, 5)); "same day")]
    #[test_case(Some(date(2025, 6, 5)), Some(date(2025, 6, 1)); "reversed")]
    #[test_case(None, Some(date(2025, 6, 5)); "missing check-in")]
    #[test_case(Some(date(2025, 6, 5)), None; "missing check-out")]
    fn test_nights_not_computed(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) {
        let summary = compute_summary(query(check_in, check_out, 1, Some(RoomType::Suite)));
        assert_eq!(summary.nights, 0);
        assert_eq!(summary.total_price, 0);
    }

    #[test_case(RoomType::Standard, 3, 2, 51_000; "standard three nights two rooms")]
    #[test_case(RoomType::Deluxe, 2, 1, 25_000; "deluxe two nights")]
    #[test_case(RoomType::Suite, 1, 3, 55_500; "suite one night three rooms")]
    fn test_total_price(room_type: RoomType, nights: i64, rooms: u32, expected: u64) {
        let check_in = date(2025, 6, 1);
        let summary = compute_summary(query(
            Some(check_in),
            Some(check_in + Duration::days(nights)),
            rooms,
            Some(room_type),
        ));
        assert_eq!(summary.total_price, expected);
        assert_eq!(
            summary.total_price,
            RoomCatalog::global().price_per_night(room_type) * nights as u64 * rooms as u64
        );
    }

    #[test]
    fn test_total_is_zero_without_room_type_or_rooms() {
        let check_in = Some(date(2025, 6, 1));
        let check_out = Some(date(2025, 6, 4));

        assert_eq!(compute_summary(query(check_in, check_out, 2, None)).total_price, 0);
        assert_eq!(
            compute_summary(query(check_in, check_out, 0, Some(RoomType::Deluxe))).total_price,
            0
        );
    }

    #[test]
    fn test_blank_query_yields_unset_summary() {
        let summary = compute_summary(BookingQuery::default());
        assert_eq!(summary.nights, 0);
        assert_eq!(summary.guests, 0);
        assert_eq!(summary.room_label, None);
        assert_eq!(summary.total_price, 0);

        let display = summary.display(&FormInput::default(), "KES");
        assert_eq!(display.check_in, "-");
        assert_eq!(display.check_out, "-");
        assert_eq!(display.nights, "-");
        assert_eq!(display.guests, "-");
        assert_eq!(display.room_type, "-");
        assert_eq!(display.total, "KES 0");
    }

    #[test]
    fn test_display_of_complete_summary() {
        let query = BookingQuery {
            check_in: Some(date(2025, 6, 1)),
            check_out: Some(date(2025, 6, 3)),
            adults: 2,
            children: 1,
            rooms: 1,
            room_type: Some(RoomType::Deluxe),
        };

        let input = FormInput {
            check_in: "2025-06-01".to_string(),
            check_out: "2025-06-03".to_string(),
            ..FormInput::default()
        };
        let display = compute_summary(query).display(&input, "KES");
        assert_eq!(display.check_in, "2025-06-01");
        assert_eq!(display.check_out, "2025-06-03");
        assert_eq!(display.nights, "2 nights");
        assert_eq!(display.guests, "3 (2 adults, 1 children)");
        assert_eq!(display.room_type, "Deluxe Room");
        assert_eq!(display.total, "KES 25,000");
    }

    #[test]
    fn test_single_night_is_singular() {
        let summary = compute_summary(query(
            Some(date(2025, 6, 1)),
            Some(date(2025, 6, 2)),
            1,
            Some(RoomType::Standard),
        ));
        assert_eq!(summary.display(&FormInput::default(), "KES").nights, "1 night");
    }

    #[test]
    fn test_display_echoes_unparsed_dates() {
        let input = FormInput {
            check_in: "2025/06/10".to_string(),
            check_out: " 2025-06-12".to_string(),
            rooms: "1".to_string(),
            room_type: "standard".to_string(),
            ..FormInput::default()
        };
        let summary = compute_summary(BookingQuery::from_input(&input));
        assert_eq!(summary.check_in, None);
        assert_eq!(summary.nights, 0);

        let display = summary.display(&input, "KES");
        assert_eq!(display.check_in, "2025/06/10");
        assert_eq!(display.check_out, " 2025-06-12");
        assert_eq!(display.nights, "-");
        assert_eq!(display.total, "KES 0");
    }

    #[test_case(0, "0"; "zero")]
    #[test_case(999, "999"; "below a thousand")]
    #[test_case(1_000, "1,000"; "one thousand")]
    #[test_case(25_000, "25,000"; "tens of thousands")]
    #[test_case(123_456, "123,456"; "six digits")]
    #[test_case(1_234_567, "1,234,567"; "millions")]
    fn test_group_thousands(amount: u64, expected: &str) {
        assert_eq!(group_thousands(amount), expected);
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let query = query(
            Some(date(2025, 6, 1)),
            Some(date(2025, 6, 8)),
            2,
            Some(RoomType::Suite),
        );
        assert_eq!(compute_summary(query), compute_summary(query));
    }
}
