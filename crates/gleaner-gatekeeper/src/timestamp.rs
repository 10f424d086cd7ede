//! ISO-8601 timestamp parsing
//!
//! Accepts the shapes oracles and publishers actually emit: minute or second
//! precision, `T` or space separator, optional fractional seconds, optional
//! `Z`/numeric offset, or a bare date. Offsets are dropped and the wall-clock
//! value kept. Results are truncated to minute precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use gleaner_domain::PUBLISHED_AT_FORMAT;
use thiserror::Error;

/// Why a timestamp was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// Empty or whitespace-only input
    #[error("timestamp is empty")]
    Empty,

    /// No supported ISO-8601 shape matched
    #[error("'{0}' is not an ISO-8601 timestamp")]
    Unparseable(String),
}

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse an ISO-8601 timestamp to a naive wall-clock value at minute precision
///
/// # Examples
///
/// ```
/// use gleaner_gatekeeper::parse_timestamp;
///
/// assert!(parse_timestamp("2025-02-24T09:30").is_ok());
/// assert!(parse_timestamp("not-a-date").is_err());
/// assert!(parse_timestamp("").is_err());
/// ```
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(truncate_to_minute(dt.naive_local()));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(truncate_to_minute(dt.naive_local()));
        }
    }

    let naive = s.strip_suffix('Z').unwrap_or(s);
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(truncate_to_minute(dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(naive, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    Err(TimestampError::Unparseable(s.to_string()))
}

/// Render a timestamp in the canonical `YYYY-MM-DDTHH:MM` form
pub fn format_published_at(dt: &NaiveDateTime) -> String {
    dt.format(PUBLISHED_AT_FORMAT).to_string()
}

fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}
