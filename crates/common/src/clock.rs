//! Epoch-millisecond helpers shared by timer records.
//!
//! Timer records carry wall-clock timestamps as milliseconds since the Unix
//! epoch, the same convention the rest of the backend uses for durations
//! and timestamps on the wire.

use chrono::{DateTime, Utc};

/// Current wall-clock time as milliseconds since the Unix epoch.
#[must_use]
pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Converts a UTC timestamp to milliseconds since the Unix epoch.
#[must_use]
pub fn to_epoch_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}
