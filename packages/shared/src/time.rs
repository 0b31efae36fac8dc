//! Time-related utilities.
//!
//! Timestamps travel through the relay as Unix epoch milliseconds (UTC) and
//! are only rendered to text at the edges (HTTP debug output, client console).

use chrono::{DateTime, Local, SecondsFormat, Utc};

/// Get current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 format in UTC.
///
/// Returns `None` when the timestamp is outside the range chrono can represent.
pub fn millis_to_rfc3339(timestamp_millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Format a Unix timestamp (milliseconds) as local wall-clock time `HH:MM:SS`.
pub fn millis_to_local_clock(timestamp_millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
}
