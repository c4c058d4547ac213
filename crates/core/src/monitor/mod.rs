//! The operation timer registry and its supporting types.
//!
//! Module layout:
//! - [`config`]: tunables (history capacity, stall threshold, channel size)
//! - [`thresholds`]: per-type slow thresholds with a default fallback
//! - [`record`]: active and completed timer records
//! - [`registry`]: the [`OperationMonitor`](registry::OperationMonitor)
//! - [`stats`]: serializable snapshot types
//! - [`timed`]: higher-order timing combinators and the request timer

pub mod config;
pub mod record;
pub mod registry;
pub mod stats;
pub mod thresholds;
pub mod timed;
