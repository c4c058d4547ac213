//! Operation timing and health reporting for the recipe-service backend.
//!
//! The central type is [`OperationMonitor`]: collaborators bracket any unit
//! of work worth measuring with [`start_timer`](OperationMonitor::start_timer)
//! and [`end_timer`](OperationMonitor::end_timer), and the monitor keeps
//! per-type success/error counters, a bounded trail of slow operations,
//! and a snapshot of everything currently in flight. A broadcast channel
//! fans completed operations out to any interested subscriber, and
//! [`health_report`] condenses the registry state into a liveness document.
//!
//! The monitor is an explicitly constructed instance passed by reference;
//! there is no global singleton. Lifecycle is `new` / `reset` / `shutdown`.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod health;
pub mod monitor;

// Re-export commonly used types for convenience
// ------------------------
pub use health::{health_report, HealthReport, HealthState};
pub use monitor::config::MonitorConfig;
pub use monitor::record::{ActiveTimer, CompletedOperation, Metadata};
pub use monitor::registry::{MonitorStatus, OperationMonitor};
pub use monitor::stats::{ActiveOperation, SlowTypeStats, StatsSnapshot, TypeStats};
pub use monitor::thresholds::ThresholdTable;
pub use monitor::timed::{timed, timed_with, RequestTimer};
