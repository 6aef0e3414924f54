//! ISO-8601 date handling.
//!
//! The delivery API stores all timestamps as UTC ISO-8601 strings. Sync
//! checkpoints additionally require millisecond precision in the extended
//! form (`yyyy-MM-ddTHH:mm:ss.SSSZ`), so formatting is pinned rather than
//! left to chrono's default RFC 3339 output.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parses an ISO-8601 timestamp into a UTC datetime.
///
/// Accepts RFC 3339 strings with any offset (normalized to UTC) and, as a
/// fallback, the extended form without an offset. Returns `None` on anything
/// else; callers treat unparseable dates as absent fields.
pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats a UTC datetime as `yyyy-MM-ddTHH:mm:ss.SSSZ`.
///
/// This is the exact shape the sync endpoint expects for `start_from`;
/// millisecond precision is mandatory even when the fraction is zero.
pub fn format_sync_timestamp(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
