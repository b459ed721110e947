//! Timestamp parsing and display
//!
//! The API sends timestamps as strings. Most are RFC 3339, but naive
//! datetimes (assumed UTC) and unix seconds also occur.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an API timestamp
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

/// Render a timestamp in local time, or the raw text when it cannot be parsed
pub fn format_timestamp(value: &str) -> String {
    match parse_timestamp(value) {
        Some(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None if value.trim().is_empty() => "-".to_string(),
        None => value.to_string(),
    }
}
