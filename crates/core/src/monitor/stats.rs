//! Serializable snapshots of registry state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::record::CompletedOperation;

/// Completion counts for one operation type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStats {
    /// Completed operations of this type.
    pub total: u64,
    /// Successful completions.
    pub success: u64,
    /// Failed completions.
    pub errors: u64,
    /// `success / total`, `0.0` when nothing has completed.
    pub success_rate: f64,
}

/// Slow-operation aggregate for one operation type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowTypeStats {
    /// How many completions exceeded the type's threshold.
    pub count: u64,
    /// Cumulative mean duration of those completions, in milliseconds.
    pub avg_duration_ms: f64,
    /// Longest observed duration, in milliseconds.
    pub max_duration_ms: u64,
}

/// One in-flight operation as seen by `active_operations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOperation {
    /// Caller-chosen operation id.
    pub id: String,
    /// Category string.
    pub op_type: String,
    /// Wall-clock start, milliseconds since the Unix epoch.
    pub started_at: i64,
    /// Milliseconds elapsed so far.
    pub elapsed_ms: u64,
}

/// Aggregate view of the registry at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Milliseconds since the monitor was created (or last reset).
    pub uptime_ms: u64,
    /// Completed operations across all types.
    pub total_operations: u64,
    /// Per-type completion counters.
    pub operations: HashMap<String, TypeStats>,
    /// Per-type slow aggregates; empty until something runs slow.
    pub slow_operations: HashMap<String, SlowTypeStats>,
    /// Operations currently in flight.
    pub active_count: usize,
    /// Most recent slow records, newest first.
    pub recent_slow: Vec<CompletedOperation>,
}
