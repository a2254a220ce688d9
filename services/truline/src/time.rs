//! Canonicalize provider timestamps into UTC instants
//!
//! Upstream feeds send start times as epoch milliseconds, RFC 3339 strings,
//! naive datetime strings, or bare dates. Everything collapses to a
//! `DateTime<Utc>`; callers decide the fallback (typically "now") when a
//! field is absent.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimeParseError {
    #[error("timestamp value has unsupported shape: {0}")]
    UnsupportedShape(String),
    #[error("numeric timestamp {0} is out of range for epoch milliseconds")]
    MillisOutOfRange(i64),
    #[error("unparsable timestamp string: {0:?}")]
    UnparsableString(String),
}

/// Interpret a JSON timestamp value as a UTC instant.
///
/// Numbers are epoch milliseconds; strings go through [`parse_instant_str`].
pub fn parse_instant(value: &Value) -> Result<DateTime<Utc>, TimeParseError> {
    match value {
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| TimeParseError::UnsupportedShape(n.to_string()))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
                .ok_or(TimeParseError::MillisOutOfRange(millis))
        }
        Value::String(s) => parse_instant_str(s),
        other => Err(TimeParseError::UnsupportedShape(other.to_string())),
    }
}

/// Parse a timestamp string. RFC 3339 first, then naive datetime formats and
/// bare dates, all interpreted as UTC.
pub fn parse_instant_str(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::UnparsableString(s.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap();
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    Err(TimeParseError::UnparsableString(trimmed.to_string()))
}

/// Render an instant as a UTC ISO-8601 string with millisecond precision.
pub fn to_utc_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
