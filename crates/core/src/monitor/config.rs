//! Monitor configuration.
//!
//! Defaults mirror the production values: a 100-entry slow-operation trail,
//! ten recent slow records in stats snapshots, a 30-second stall threshold,
//! and a warning once more than ten operations are in flight.

use std::time::Duration;

use skillet_common::{TelemetryError, TelemetryResult};

use super::thresholds::ThresholdTable;

/// Tunables for [`OperationMonitor`](super::registry::OperationMonitor).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Bound on the slow-operation trail (oldest evicted first).
    pub slow_history_capacity: usize,

    /// How many recent slow records a stats snapshot includes.
    pub recent_slow_limit: usize,

    /// Elapsed time after which an in-flight operation flips health to
    /// unhealthy.
    pub stalled_after: Duration,

    /// In-flight operation count above which health degrades to warning.
    pub active_warning_limit: usize,

    /// Buffer size of the completion broadcast channel. Slow subscribers
    /// lose events once they lag this far behind.
    pub event_capacity: usize,

    /// Debug-log completions that stayed under their threshold.
    pub verbose_completions: bool,

    /// Per-type slow thresholds.
    pub thresholds: ThresholdTable,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            slow_history_capacity: 100,
            recent_slow_limit: 10,
            stalled_after: Duration::from_millis(30_000),
            active_warning_limit: 10,
            event_capacity: 256,
            verbose_completions: false,
            thresholds: ThresholdTable::default(),
        }
    }
}

impl MonitorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the slow-operation trail bound.
    #[must_use]
    pub fn slow_history_capacity(mut self, capacity: usize) -> Self {
        self.slow_history_capacity = capacity;
        self
    }

    /// Sets how many recent slow records snapshots include.
    #[must_use]
    pub fn recent_slow_limit(mut self, limit: usize) -> Self {
        self.recent_slow_limit = limit;
        self
    }

    /// Sets the stall threshold for health reporting.
    #[must_use]
    pub fn stalled_after(mut self, after: Duration) -> Self {
        self.stalled_after = after;
        self
    }

    /// Sets the in-flight warning limit for health reporting.
    #[must_use]
    pub fn active_warning_limit(mut self, limit: usize) -> Self {
        self.active_warning_limit = limit;
        self
    }

    /// Sets the completion broadcast buffer size.
    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Enables debug logging of completions under their threshold.
    #[must_use]
    pub fn verbose_completions(mut self, verbose: bool) -> Self {
        self.verbose_completions = verbose;
        self
    }

    /// Replaces the threshold table.
    #[must_use]
    pub fn thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Rejects configurations that would make the monitor inoperable.
    pub fn validate(&self) -> TelemetryResult<()> {
        if self.slow_history_capacity == 0 {
            return Err(TelemetryError::config(
                "slow_history_capacity",
                "must be greater than zero",
            ));
        }
        if self.event_capacity == 0 {
            return Err(TelemetryError::config("event_capacity", "must be greater than zero"));
        }
        if self.stalled_after.is_zero() {
            return Err(TelemetryError::config("stalled_after", "must be greater than zero"));
        }
        Ok(())
    }
}
