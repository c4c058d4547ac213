//! The operation timer registry.
//!
//! [`OperationMonitor`] tracks in-flight operations keyed by a
//! caller-supplied id, classifies completions against per-type slow
//! thresholds, and keeps cumulative success/error counters plus a bounded
//! trail of recent slow operations. Completed records fan out over a
//! broadcast channel; a lagging subscriber skips missed events instead of
//! ever blocking `end_timer`.
//!
//! Concurrency: the active set lives in a `DashMap` and aggregates behind a
//! `parking_lot::Mutex`, so `start_timer`/`end_timer`/`stats` are safe to
//! call from concurrently executing requests. Nothing here performs I/O;
//! the monitor only measures work done elsewhere.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use skillet_common::{epoch_millis, HistoryBuffer, TelemetryResult};

use super::config::MonitorConfig;
use super::record::{ActiveTimer, CompletedOperation, Metadata};
use super::stats::{ActiveOperation, SlowTypeStats, StatsSnapshot, TypeStats};

/// Lifecycle state of a monitor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    /// Accepting timer calls.
    Running,
    /// Shut down; timer calls are warned no-ops.
    Shutdown,
}

/// Per-type success/error counters. Monotonic between resets.
#[derive(Debug, Default, Clone)]
struct TypeCounters {
    success: u64,
    errors: u64,
}

/// Per-type aggregate over slow completions.
#[derive(Debug, Default, Clone)]
struct SlowAggregate {
    count: u64,
    avg_ms: f64,
    max_ms: u64,
}

/// Aggregate state guarded by a single mutex. Mutations happen only in
/// `end_timer` and `reset`, both of which hold the lock for a handful of
/// map operations.
#[derive(Debug)]
struct AggregateState {
    counters: HashMap<String, TypeCounters>,
    slow_trail: HistoryBuffer<CompletedOperation>,
    slow_aggregates: HashMap<String, SlowAggregate>,
    started_instant: Instant,
}

impl AggregateState {
    fn new(slow_history_capacity: usize) -> Self {
        Self {
            counters: HashMap::new(),
            slow_trail: HistoryBuffer::new(slow_history_capacity),
            slow_aggregates: HashMap::new(),
            started_instant: Instant::now(),
        }
    }
}

/// Tracks the duration and outcome of named operations.
///
/// Explicitly constructed and passed by reference to every collaborator
/// that needs it; there is no global instance. Lifecycle is
/// [`new`](Self::new) / [`reset`](Self::reset) / [`shutdown`](Self::shutdown).
///
/// # Examples
///
/// ```rust
/// use skillet_core::OperationMonitor;
///
/// let monitor = OperationMonitor::new();
/// monitor.start_timer("req-1", "dynamodb_query");
/// let record = monitor.end_timer("req-1", true, None);
///
/// assert!(record.is_some());
/// assert_eq!(monitor.stats().total_operations, 1);
/// ```
#[derive(Debug)]
pub struct OperationMonitor {
    config: MonitorConfig,
    active: DashMap<String, ActiveTimer>,
    state: Mutex<AggregateState>,
    events: broadcast::Sender<CompletedOperation>,
    shut_down: AtomicBool,
}

impl OperationMonitor {
    /// Creates a monitor with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        // The default configuration is statically valid.
        Self::build(MonitorConfig::default())
    }

    /// Creates a monitor with a validated custom configuration.
    pub fn with_config(config: MonitorConfig) -> TelemetryResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MonitorConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let state = Mutex::new(AggregateState::new(config.slow_history_capacity));
        Self { config, active: DashMap::new(), state, events, shut_down: AtomicBool::new(false) }
    }

    /// Registers a new active timer under `id`.
    ///
    /// A duplicate `id` silently overwrites the previous active record
    /// (last write wins); the overwritten timer is dropped without touching
    /// any counter.
    pub fn start_timer(&self, id: impl Into<String>, op_type: impl Into<String>) {
        self.start_timer_with(id, op_type, Metadata::new());
    }

    /// Registers a new active timer carrying caller-supplied metadata.
    pub fn start_timer_with(
        &self,
        id: impl Into<String>,
        op_type: impl Into<String>,
        metadata: Metadata,
    ) {
        let id = id.into();
        if self.is_shut_down() {
            warn!(operation_id = %id, "timer start ignored: monitor has shut down");
            return;
        }
        let timer = ActiveTimer {
            op_type: op_type.into(),
            started_at: epoch_millis(),
            started_instant: Instant::now(),
            metadata,
        };
        self.active.insert(id, timer);
    }

    /// Ends the timer registered under `id` and records its outcome.
    ///
    /// An unknown `id` (never started, or already ended) is a recoverable
    /// miss: a warning is logged, `None` is returned, and no counter moves.
    /// On a hit the completed record is returned, counted, retained in the
    /// slow trail when it exceeded its type's threshold, and published to
    /// subscribers.
    pub fn end_timer(
        &self,
        id: &str,
        success: bool,
        error_details: Option<String>,
    ) -> Option<CompletedOperation> {
        if self.is_shut_down() {
            warn!(operation_id = %id, "timer end ignored: monitor has shut down");
            return None;
        }
        let Some((id, timer)) = self.active.remove(id) else {
            warn!(operation_id = %id, "timer ended without a matching start");
            return None;
        };

        let duration_ms = timer.elapsed_ms();
        let record = CompletedOperation {
            id,
            op_type: timer.op_type,
            started_at: timer.started_at,
            ended_at: timer.started_at.saturating_add(i64::try_from(duration_ms).unwrap_or(i64::MAX)),
            duration_ms,
            success,
            error_details: if success { None } else { error_details },
            metadata: timer.metadata,
        };

        let threshold = self.config.thresholds.slow_threshold(&record.op_type);
        let threshold_ms = u64::try_from(threshold.as_millis()).unwrap_or(u64::MAX);
        let is_slow = u128::from(record.duration_ms) > threshold.as_millis();

        {
            let mut state = self.state.lock();
            let counters = state.counters.entry(record.op_type.clone()).or_default();
            if record.success {
                counters.success += 1;
            } else {
                counters.errors += 1;
            }

            if is_slow {
                let aggregate = state.slow_aggregates.entry(record.op_type.clone()).or_default();
                aggregate.count += 1;
                // Cumulative mean: avg += (x - avg) / n.
                let sample = record.duration_ms as f64;
                aggregate.avg_ms += (sample - aggregate.avg_ms) / aggregate.count as f64;
                aggregate.max_ms = aggregate.max_ms.max(record.duration_ms);
                state.slow_trail.push(record.clone());
            }
        }

        if is_slow {
            warn!(
                operation_id = %record.id,
                op_type = %record.op_type,
                duration_ms = record.duration_ms,
                threshold_ms,
                success = record.success,
                "operation exceeded slow threshold"
            );
        } else if self.config.verbose_completions {
            debug!(
                operation_id = %record.id,
                op_type = %record.op_type,
                duration_ms = record.duration_ms,
                success = record.success,
                "operation completed"
            );
        }

        // At-most-once fan-out; send only fails when nobody subscribes.
        let _ = self.events.send(record.clone());

        Some(record)
    }

    /// Slow threshold for `op_type`, with the default fallback.
    #[must_use]
    pub fn slow_threshold(&self, op_type: &str) -> std::time::Duration {
        self.config.thresholds.slow_threshold(op_type)
    }

    /// Aggregate snapshot of everything the registry knows right now.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        let state = self.state.lock();

        let mut operations = HashMap::with_capacity(state.counters.len());
        let mut total_operations = 0;
        for (op_type, counters) in &state.counters {
            let total = counters.success + counters.errors;
            total_operations += total;
            let success_rate =
                if total == 0 { 0.0 } else { counters.success as f64 / total as f64 };
            operations.insert(
                op_type.clone(),
                TypeStats { total, success: counters.success, errors: counters.errors, success_rate },
            );
        }

        let slow_operations = state
            .slow_aggregates
            .iter()
            .map(|(op_type, aggregate)| {
                (
                    op_type.clone(),
                    SlowTypeStats {
                        count: aggregate.count,
                        avg_duration_ms: aggregate.avg_ms,
                        max_duration_ms: aggregate.max_ms,
                    },
                )
            })
            .collect();

        let recent_slow = state
            .slow_trail
            .latest(self.config.recent_slow_limit)
            .into_iter()
            .cloned()
            .collect();

        StatsSnapshot {
            uptime_ms: u64::try_from(state.started_instant.elapsed().as_millis())
                .unwrap_or(u64::MAX),
            total_operations,
            operations,
            slow_operations,
            active_count: self.active.len(),
            recent_slow,
        }
    }

    /// Snapshot of in-flight operations, longest-running first.
    #[must_use]
    pub fn active_operations(&self) -> Vec<ActiveOperation> {
        let mut operations: Vec<ActiveOperation> = self
            .active
            .iter()
            .map(|entry| ActiveOperation {
                id: entry.key().clone(),
                op_type: entry.value().op_type.clone(),
                started_at: entry.value().started_at,
                elapsed_ms: entry.value().elapsed_ms(),
            })
            .collect();
        operations.sort_by(|a, b| b.elapsed_ms.cmp(&a.elapsed_ms));
        operations
    }

    /// Clears active timers, counters, and the slow trail, and restarts the
    /// uptime origin. For test isolation and administrative resets; never
    /// invoked automatically.
    pub fn reset(&self) {
        self.active.clear();
        let mut state = self.state.lock();
        state.counters.clear();
        state.slow_aggregates.clear();
        state.slow_trail.clear();
        state.started_instant = Instant::now();
    }

    /// Flips the monitor into its terminal state. Idempotent; subsequent
    /// timer calls become warned no-ops while reads keep working.
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> MonitorStatus {
        if self.is_shut_down() { MonitorStatus::Shutdown } else { MonitorStatus::Running }
    }

    /// Subscribes to completed-operation events.
    ///
    /// Delivery is at most once per completion: a receiver that lags more
    /// than the configured buffer behind loses the missed events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CompletedOperation> {
        self.events.subscribe()
    }

    /// Stall threshold used by health reporting.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

impl Default for OperationMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for monitor::registry.
    use std::thread;
    use std::time::Duration;

    use serde_json::json;

    use crate::monitor::config::MonitorConfig;
    use crate::monitor::record::Metadata;
    use crate::monitor::thresholds::ThresholdTable;

    use super::{MonitorStatus, OperationMonitor};

    /// Monitor whose thresholds classify everything taking over 0ms as slow.
    fn touchy_monitor(slow_history_capacity: usize) -> OperationMonitor {
        let thresholds = ThresholdTable::default().with_fallback(Duration::ZERO);
        let config = MonitorConfig::default()
            .slow_history_capacity(slow_history_capacity)
            .thresholds(thresholds);
        OperationMonitor::with_config(config).unwrap()
    }

    /// Validates `OperationMonitor::end_timer` behavior for the start-then-end
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the returned record has `duration_ms >= 0` semantics (the
    ///   type is unsigned; the record is present).
    /// - Confirms the `(type, success)` counter moved by exactly 1.
    /// - Confirms the active set is empty afterwards.
    #[test]
    fn start_then_end_counts_one_success() {
        let monitor = OperationMonitor::new();
        monitor.start_timer("op-1", "dynamodb_query");
        let record = monitor.end_timer("op-1", true, None).unwrap();

        assert!(record.success);
        assert!(record.error_details.is_none());
        assert!(record.ended_at >= record.started_at);

        let stats = monitor.stats();
        assert_eq!(stats.total_operations, 1);
        let type_stats = &stats.operations["dynamodb_query"];
        assert_eq!(type_stats.success, 1);
        assert_eq!(type_stats.errors, 0);
        assert_eq!(type_stats.success_rate, 1.0);
        assert_eq!(stats.active_count, 0);
    }

    /// Validates `OperationMonitor::end_timer` behavior for the unknown-id
    /// miss scenario.
    ///
    /// Assertions:
    /// - Confirms the end call returns `None`.
    /// - Confirms no aggregate counter changed.
    #[test]
    fn ending_an_unknown_id_is_a_harmless_miss() {
        let monitor = OperationMonitor::new();
        assert!(monitor.end_timer("never-started", true, None).is_none());
        assert_eq!(monitor.stats().total_operations, 0);
    }

    /// Validates `OperationMonitor::end_timer` behavior for the double-end
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the second end returns `None`.
    /// - Confirms counters moved exactly once.
    #[test]
    fn second_end_for_the_same_id_is_a_noop() {
        let monitor = OperationMonitor::new();
        monitor.start_timer("op-1", "api_request");
        assert!(monitor.end_timer("op-1", false, Some("boom".into())).is_some());
        assert!(monitor.end_timer("op-1", false, Some("boom".into())).is_none());

        let stats = monitor.stats();
        assert_eq!(stats.operations["api_request"].errors, 1);
        assert_eq!(stats.total_operations, 1);
    }

    /// Validates `OperationMonitor::start_timer` behavior for the duplicate-id
    /// overwrite scenario.
    ///
    /// Assertions:
    /// - Confirms the second start wins (record carries the new type).
    /// - Confirms only one completion is counted.
    #[test]
    fn duplicate_start_overwrites_silently() {
        let monitor = OperationMonitor::new();
        monitor.start_timer("op-1", "dynamodb_query");
        monitor.start_timer("op-1", "dynamodb_scan");

        let record = monitor.end_timer("op-1", true, None).unwrap();
        assert_eq!(record.op_type, "dynamodb_scan");
        assert_eq!(monitor.stats().total_operations, 1);
    }

    /// Validates `OperationMonitor::end_timer` behavior for the slow-trail
    /// eviction scenario.
    ///
    /// Assertions:
    /// - Confirms the trail never exceeds its bound of 3.
    /// - Confirms the oldest slow record is absent after the fourth.
    #[test]
    fn slow_trail_evicts_oldest_beyond_capacity() {
        let monitor = touchy_monitor(3);
        for index in 0..4 {
            let id = format!("slow-{index}");
            monitor.start_timer(&id, "recipe_render");
            thread::sleep(Duration::from_millis(2));
            monitor.end_timer(&id, true, None);
        }

        let stats = monitor.stats();
        let retained: Vec<&str> = stats.recent_slow.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(retained.len(), 3);
        assert!(!retained.contains(&"slow-0"));
        assert_eq!(retained[0], "slow-3"); // newest first
        assert_eq!(stats.slow_operations["recipe_render"].count, 4);
    }

    /// Validates `OperationMonitor::stats` behavior for the cumulative mean
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures the slow average lies between the observed min and max.
    /// - Confirms the max matches the longest observed duration.
    #[test]
    fn slow_average_is_a_cumulative_mean() {
        let monitor = touchy_monitor(10);
        for (index, pause) in [2u64, 4, 6].iter().enumerate() {
            let id = format!("slow-{index}");
            monitor.start_timer(&id, "text_chunk");
            thread::sleep(Duration::from_millis(*pause));
            monitor.end_timer(&id, true, None);
        }

        let stats = monitor.stats();
        let slow = &stats.slow_operations["text_chunk"];
        assert_eq!(slow.count, 3);
        let durations: Vec<u64> =
            stats.recent_slow.iter().map(|r| r.duration_ms).collect();
        let min = *durations.iter().min().unwrap() as f64;
        let max = *durations.iter().max().unwrap() as f64;
        assert!(slow.avg_duration_ms >= min && slow.avg_duration_ms <= max);
        assert_eq!(slow.max_duration_ms as f64, max);
    }

    /// Validates `OperationMonitor::active_operations` behavior for the
    /// longest-running-first ordering scenario.
    ///
    /// Assertions:
    /// - Confirms the first entry is the operation started earliest.
    /// - Confirms elapsed values are non-increasing.
    #[test]
    fn active_operations_sort_longest_running_first() {
        let monitor = OperationMonitor::new();
        monitor.start_timer("older", "api_request");
        thread::sleep(Duration::from_millis(5));
        monitor.start_timer("newer", "api_request");

        let active = monitor.active_operations();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].id, "older");
        assert!(active[0].elapsed_ms >= active[1].elapsed_ms);
    }

    /// Validates `OperationMonitor::reset` behavior for the zeroed state
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `total_operations` equals `0` after reset.
    /// - Confirms the active set and slow trail are empty.
    #[test]
    fn reset_zeroes_everything() {
        let monitor = touchy_monitor(10);
        monitor.start_timer("done", "dynamodb_query");
        thread::sleep(Duration::from_millis(2));
        monitor.end_timer("done", true, None);
        monitor.start_timer("in-flight", "dynamodb_query");

        monitor.reset();

        let stats = monitor.stats();
        assert_eq!(stats.total_operations, 0);
        assert_eq!(stats.active_count, 0);
        assert!(stats.recent_slow.is_empty());
        assert!(stats.slow_operations.is_empty());
        assert!(monitor.active_operations().is_empty());
    }

    /// Validates `OperationMonitor::shutdown` behavior for the terminal
    /// lifecycle scenario.
    ///
    /// Assertions:
    /// - Confirms `status()` flips to `Shutdown`.
    /// - Confirms subsequent starts and ends are no-ops.
    #[test]
    fn shutdown_turns_timer_calls_into_noops() {
        let monitor = OperationMonitor::new();
        assert_eq!(monitor.status(), MonitorStatus::Running);

        monitor.shutdown();
        monitor.shutdown(); // idempotent

        assert_eq!(monitor.status(), MonitorStatus::Shutdown);
        monitor.start_timer("late", "api_request");
        assert!(monitor.end_timer("late", true, None).is_none());
        assert_eq!(monitor.stats().total_operations, 0);
    }

    /// Validates `OperationMonitor::start_timer_with` behavior for the
    /// metadata pass-through scenario.
    ///
    /// Assertions:
    /// - Confirms metadata arrives on the completed record unchanged.
    #[test]
    fn metadata_is_carried_through_unchanged() {
        let monitor = OperationMonitor::new();
        let mut metadata = Metadata::new();
        metadata.insert("table".into(), json!("recipes"));
        metadata.insert("page".into(), json!(3));

        monitor.start_timer_with("op-1", "dynamodb_query", metadata);
        let record = monitor.end_timer("op-1", true, None).unwrap();
        assert_eq!(record.metadata["table"], json!("recipes"));
        assert_eq!(record.metadata["page"], json!(3));
    }

    /// Validates `OperationMonitor::end_timer` behavior for the
    /// error-details-only-on-failure scenario.
    ///
    /// Assertions:
    /// - Confirms details supplied on a successful end are dropped.
    /// - Confirms details on a failed end are kept.
    #[test]
    fn error_details_present_only_on_failure() {
        let monitor = OperationMonitor::new();
        monitor.start_timer("ok", "cache_operation");
        let ok = monitor.end_timer("ok", true, Some("ignored".into())).unwrap();
        assert!(ok.error_details.is_none());

        monitor.start_timer("bad", "cache_operation");
        let bad = monitor.end_timer("bad", false, Some("cache miss storm".into())).unwrap();
        assert_eq!(bad.error_details.as_deref(), Some("cache miss storm"));
    }
}
