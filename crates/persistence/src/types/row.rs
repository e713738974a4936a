//! Row representation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// One record of the master dataset: column name to scalar value.
///
/// Rows are read-only here; no schema is enforced beyond the filter
/// allow-list.
pub type Row = Map<String, Value>;

/// Returns a column value as text, if it is a scalar.
///
/// Strings are returned as-is; numbers and booleans use their JSON text.
pub fn row_text_value(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Returns the keyset sort key of a row (the value of `sort_key`).
pub fn row_sort_key(row: &Row, sort_key: &str) -> Option<String> {
    row_text_value(row, sort_key)
}

/// Parses a `created_at` style timestamp.
///
/// Accepts RFC 3339, the PostgreSQL text form (`2024-03-01 10:00:00+00`),
/// offset-less date-times (read as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}
