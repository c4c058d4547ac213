//! Per-type slow thresholds.
//!
//! Each operation type maps to a duration above which a completed operation
//! is classified "slow" and retained for diagnostics. The table is built
//! once at construction and never mutated at runtime; unrecognized types
//! fall back to a one-second default.

use std::collections::HashMap;
use std::time::Duration;

/// Threshold applied to operation types without an explicit entry.
pub const DEFAULT_SLOW_THRESHOLD_MS: u64 = 1000;

/// Built-in `(type, threshold-ms)` pairs for the operations the backend
/// actually runs.
const DEFAULT_THRESHOLDS: &[(&str, u64)] = &[
    ("dynamodb_query", 500),
    ("dynamodb_scan", 1000),
    ("dynamodb_batch", 800),
    ("api_request", 2000),
    ("cache_operation", 50),
    ("file_upload", 5000),
    ("text_parsing", 3000),
];

/// Immutable mapping from operation type to its slow threshold.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use skillet_core::ThresholdTable;
///
/// let table = ThresholdTable::default();
/// assert_eq!(table.slow_threshold("dynamodb_query"), Duration::from_millis(500));
/// assert_eq!(table.slow_threshold("unknown_type"), Duration::from_millis(1000));
/// ```
#[derive(Debug, Clone)]
pub struct ThresholdTable {
    entries: HashMap<String, Duration>,
    fallback: Duration,
}

impl ThresholdTable {
    /// Builds the table with the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        let entries = DEFAULT_THRESHOLDS
            .iter()
            .map(|(op_type, ms)| ((*op_type).to_string(), Duration::from_millis(*ms)))
            .collect();
        Self { entries, fallback: Duration::from_millis(DEFAULT_SLOW_THRESHOLD_MS) }
    }

    /// Returns the slow threshold for `op_type`, falling back to the
    /// default for unrecognized types.
    #[must_use]
    pub fn slow_threshold(&self, op_type: &str) -> Duration {
        self.entries.get(op_type).copied().unwrap_or(self.fallback)
    }

    /// Overrides the threshold for a single operation type.
    ///
    /// Intended for construction-time tuning; the table is not meant to be
    /// reconfigured while the monitor is live.
    #[must_use]
    pub fn with_override<S: Into<String>>(mut self, op_type: S, threshold: Duration) -> Self {
        self.entries.insert(op_type.into(), threshold);
        self
    }

    /// Replaces the fallback threshold applied to unrecognized types.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Duration) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::new()
    }
}
