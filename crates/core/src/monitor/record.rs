//! Timer records: one in-flight or completed operation instance.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied metadata carried through a timer unchanged.
pub type Metadata = HashMap<String, Value>;

/// An operation that has been started but not yet ended.
///
/// Held in the monitor's active set keyed by the caller-chosen operation
/// id. The monotonic instant drives elapsed/duration math; the epoch
/// timestamp is what ends up in records and snapshots.
#[derive(Debug, Clone)]
pub struct ActiveTimer {
    /// Category string selecting the slow threshold and stats bucket.
    pub op_type: String,
    /// Wall-clock start, milliseconds since the Unix epoch.
    pub started_at: i64,
    /// Monotonic start used for duration computation.
    pub started_instant: Instant,
    /// Opaque caller-supplied context.
    pub metadata: Metadata,
}

impl ActiveTimer {
    /// Milliseconds elapsed since the timer started.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started_instant.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// A finished operation as recorded by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOperation {
    /// Caller-chosen id unique per in-flight instance.
    pub id: String,
    /// Category string the operation was bucketed under.
    pub op_type: String,
    /// Wall-clock start, milliseconds since the Unix epoch.
    pub started_at: i64,
    /// Wall-clock end, milliseconds since the Unix epoch.
    pub ended_at: i64,
    /// `ended_at - started_at`; never negative by construction.
    pub duration_ms: u64,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Failure description, present only when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
    /// Caller-supplied metadata, carried through unchanged.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}
