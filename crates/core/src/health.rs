//! Health summary over the operation monitor.
//!
//! A pure read combining [`stats`](OperationMonitor::stats) and
//! [`active_operations`](OperationMonitor::active_operations) into a
//! JSON-serializable document for a liveness/readiness endpoint. The
//! status ladder, worst first:
//!
//! 1. `unhealthy`: any in-flight operation has exceeded the stall
//!    threshold (30 s by default), regardless of anything else
//! 2. `warning`: more operations in flight than the warning limit, or any
//!    slow-operation type on record
//! 3. `healthy`: otherwise

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::monitor::registry::OperationMonitor;
use crate::monitor::stats::StatsSnapshot;

/// Overall health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// Nothing noteworthy in flight or on record.
    Healthy,
    /// Elevated load or recorded slow operations; worth watching.
    Warning,
    /// At least one operation appears stalled.
    Unhealthy,
}

/// The health document served to liveness/readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Overall classification.
    pub status: HealthState,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
    /// Milliseconds since the monitor was created or last reset.
    pub uptime_ms: u64,
    /// Full registry snapshot backing the summary.
    pub operations: StatsSnapshot,
    /// Operations currently in flight.
    pub active_count: usize,
    /// Operation types with recorded slow completions.
    pub slow_type_count: usize,
    /// Human-readable descriptions of whatever degraded the status.
    pub warnings: Vec<String>,
}

/// Produces the current health document for `monitor`.
#[must_use]
pub fn health_report(monitor: &OperationMonitor) -> HealthReport {
    let stats = monitor.stats();
    let active = monitor.active_operations();
    let config = monitor.config();

    let stalled_after_ms =
        u64::try_from(config.stalled_after.as_millis()).unwrap_or(u64::MAX);

    let mut warnings = Vec::new();
    let mut stalled = false;
    for operation in &active {
        if operation.elapsed_ms >= stalled_after_ms {
            stalled = true;
            warnings.push(format!(
                "operation '{}' ({}) has been running for {}ms",
                operation.id, operation.op_type, operation.elapsed_ms
            ));
        }
    }

    let crowded = active.len() > config.active_warning_limit;
    if crowded {
        warnings.push(format!("{} operations in flight", active.len()));
    }
    for op_type in stats.slow_operations.keys() {
        warnings.push(format!("slow operations recorded for type '{op_type}'"));
    }

    let status = if stalled {
        HealthState::Unhealthy
    } else if crowded || !stats.slow_operations.is_empty() {
        HealthState::Warning
    } else {
        HealthState::Healthy
    };

    HealthReport {
        status,
        timestamp: Utc::now(),
        uptime_ms: stats.uptime_ms,
        active_count: active.len(),
        slow_type_count: stats.slow_operations.len(),
        operations: stats,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the health summary.
    use std::thread;
    use std::time::Duration;

    use crate::monitor::config::MonitorConfig;
    use crate::monitor::registry::OperationMonitor;
    use crate::monitor::thresholds::ThresholdTable;

    use super::{health_report, HealthState};

    /// Validates `health_report` behavior for the quiet registry scenario.
    ///
    /// Assertions:
    /// - Confirms `report.status` equals `HealthState::Healthy`.
    /// - Confirms `report.warnings` is empty.
    #[test]
    fn quiet_registry_is_healthy() {
        let monitor = OperationMonitor::new();
        monitor.start_timer("brief", "dynamodb_query");
        monitor.end_timer("brief", true, None);

        let report = health_report(&monitor);
        assert_eq!(report.status, HealthState::Healthy);
        assert!(report.warnings.is_empty());
        assert_eq!(report.active_count, 0);
    }

    /// Validates `health_report` behavior for the stalled operation scenario.
    ///
    /// Assertions:
    /// - Confirms a long-running active operation flips the status to
    ///   `Unhealthy` regardless of other state.
    /// - Confirms the warning names the stalled operation.
    #[test]
    fn stalled_operation_is_unhealthy() {
        let config = MonitorConfig::default().stalled_after(Duration::from_millis(5));
        let monitor = OperationMonitor::with_config(config).unwrap();
        monitor.start_timer("stuck", "file_upload");
        thread::sleep(Duration::from_millis(10));

        let report = health_report(&monitor);
        assert_eq!(report.status, HealthState::Unhealthy);
        assert!(report.warnings.iter().any(|w| w.contains("stuck")));
    }

    /// Validates `health_report` behavior for the crowded registry scenario.
    ///
    /// Assertions:
    /// - Confirms exceeding the in-flight warning limit yields `Warning`.
    #[test]
    fn too_many_active_operations_is_a_warning() {
        let config = MonitorConfig::default().active_warning_limit(2);
        let monitor = OperationMonitor::with_config(config).unwrap();
        for index in 0..3 {
            monitor.start_timer(format!("req-{index}"), "api_request");
        }

        let report = health_report(&monitor);
        assert_eq!(report.status, HealthState::Warning);
        assert!(report.warnings.iter().any(|w| w.contains("3 operations in flight")));
    }

    /// Validates `health_report` behavior for the recorded-slow-type
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms any slow type on record yields `Warning` while nothing is
    ///   stalled.
    #[test]
    fn recorded_slow_type_is_a_warning() {
        let thresholds = ThresholdTable::default().with_fallback(Duration::ZERO);
        let config = MonitorConfig::default().thresholds(thresholds);
        let monitor = OperationMonitor::with_config(config).unwrap();

        monitor.start_timer("sluggish", "recipe_render");
        thread::sleep(Duration::from_millis(2));
        monitor.end_timer("sluggish", true, None);

        let report = health_report(&monitor);
        assert_eq!(report.status, HealthState::Warning);
        assert_eq!(report.slow_type_count, 1);
        assert!(report.warnings.iter().any(|w| w.contains("recipe_render")));
    }

    /// Validates `HealthState` serde behavior for the lowercase wire format
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `Healthy` serializes to `"healthy"`.
    /// - Confirms `Unhealthy` serializes to `"unhealthy"`.
    #[test]
    fn health_state_serializes_lowercase() {
        assert_eq!(serde_json::to_value(HealthState::Healthy).unwrap(), "healthy");
        assert_eq!(serde_json::to_value(HealthState::Warning).unwrap(), "warning");
        assert_eq!(serde_json::to_value(HealthState::Unhealthy).unwrap(), "unhealthy");
    }
}
