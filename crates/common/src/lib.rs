//! Foundation utilities shared across Skillet crates.
//!
//! Skillet is the observability layer of the recipe-service backend. This
//! crate holds the pieces with no runtime dependency:
//! - `error`: the `TelemetryError` taxonomy used by configuration and
//!   lifecycle paths
//! - `collections`: the bounded [`HistoryBuffer`] backing the
//!   slow-operation ring
//! - `correlation`: fresh [`CorrelationId`]s linking client-visible
//!   failures to server-side log lines
//! - `clock`: epoch-millisecond helpers shared by timer records

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod clock;
pub mod collections;
pub mod correlation;
pub mod error;

// Re-export commonly used types for convenience
// ------------------------
pub use clock::{epoch_millis, to_epoch_millis};
pub use collections::HistoryBuffer;
pub use correlation::CorrelationId;
pub use error::{TelemetryError, TelemetryResult};
