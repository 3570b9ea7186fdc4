// Booking query: the raw form values and their typed, forgiving interpretation

use crate::catalog::RoomType;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Field values exactly as the form holds them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormInput {
    pub check_in: String,
    pub check_out: String,
    #[serde(deserialize_with = "count_text")]
    pub adults: String,
    #[serde(deserialize_with = "count_text")]
    pub children: String,
    #[serde(deserialize_with = "count_text")]
    pub rooms: String,
    pub room_type: String,
}

// Counts arrive either as JSON numbers or as the select's string value
#[derive(Deserialize)]
#[serde(untagged)]
enum CountValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn count_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CountValue::deserialize(deserializer)? {
        CountValue::Integer(n) => n.to_string(),
        CountValue::Float(n) => n.to_string(),
        CountValue::Text(text) => text,
    })
}

// A typed snapshot of the form, rebuilt on every recalculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BookingQuery {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub rooms: u32,
    pub room_type: Option<RoomType>,
}

impl BookingQuery {
    pub fn from_input(input: &FormInput) -> Self {
        Self {
            check_in: parse_date(&input.check_in),
            check_out: parse_date(&input.check_out),
            adults: parse_count(&input.adults),
            children: parse_count(&input.children),
            rooms: parse_count(&input.rooms),
            room_type: RoomType::from_form_value(&input.room_type),
        }
    }
}

impl From<&FormInput> for BookingQuery {
    fn from(input: &FormInput) -> Self {
        BookingQuery::from_input(input)
    }
}

// ISO calendar date; blank or malformed text is treated as absent
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

// Reads a count the way a browser's `parseInt` would: leading whitespace,
// an optional sign, then as many digits as follow. Anything unparseable
// or negative counts as zero.
pub fn parse_count(text: &str) -> u32 {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if negative || digits.is_empty() {
        return 0;
    }

    digits
        .parse::<u64>()
        .map(|n| n.min(u32::MAX as u64) as u32)
        .unwrap_or(u32::MAX)
}
