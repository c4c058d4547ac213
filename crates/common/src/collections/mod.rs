//! Bounded collections used by the monitoring subsystem.

pub mod history;

pub use history::HistoryBuffer;
