//! Loose scalar cells shared by the record types.
//!
//! The browser pages stored numeric cells either as JSON numbers or as the
//! text typed into a table cell. [`LooseNumber`] keeps whichever form was
//! written so documents round-trip byte-for-byte in meaning, and exposes a
//! parsed view for the aggregators.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A numeric cell stored either as a JSON number or as text.
///
/// # Examples
/// ```
/// use recordkeeper::domain::LooseNumber;
///
/// let cell: LooseNumber = serde_json::from_str("\" 42.5 \"").expect("text cell");
/// assert_eq!(cell.value(), Some(42.5));
/// assert_eq!(LooseNumber::default().value(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    /// A JSON number.
    Number(Number),
    /// Free text, possibly blank or non-numeric.
    Text(String),
}

impl Default for LooseNumber {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl LooseNumber {
    /// Parsed numeric value; `None` for blank, non-numeric or non-finite cells.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(number) => number.as_f64().filter(|value| value.is_finite()),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
        }
    }

    /// True when the cell holds no text at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    /// Build a number cell, keeping integral values integral on the wire.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "integral and within the exactly representable range"
            )]
            return Self::Number(Number::from(value as i64));
        }
        Number::from_f64(value).map_or_else(Self::default, Self::Number)
    }

    /// Build a text cell.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl From<i64> for LooseNumber {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse the timestamp formats the pages wrote: `datetime-local` values,
/// RFC 3339 strings and plain `YYYY-MM-DD` dates (read as midnight).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| parse_date(trimmed).map(|date| date.and_time(NaiveTime::MIN)))
}

/// Parse a strict `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
