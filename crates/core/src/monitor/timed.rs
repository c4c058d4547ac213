//! Higher-order timing combinators.
//!
//! [`timed`] wraps a unit of async work so its duration and outcome are
//! recorded transparently: the work's own success or failure path is
//! untouched, and a failure is recorded before being handed back to the
//! caller. [`RequestTimer`] is the HTTP-layer variant that derives the
//! outcome from the response status code instead of a `Result`.

use std::fmt;
use std::future::Future;

use super::record::{CompletedOperation, Metadata};
use super::registry::OperationMonitor;

/// Runs `work` under a timer, recording success or failure from its result.
///
/// The result is returned unchanged; a failed operation is recorded with
/// the error's display text as details and the error propagates as-is.
///
/// # Examples
///
/// ```rust
/// # async fn example() {
/// use skillet_core::{timed, OperationMonitor};
///
/// let monitor = OperationMonitor::new();
/// let result: Result<u32, std::io::Error> =
///     timed(&monitor, "fetch-1", "dynamodb_query", async { Ok(7) }).await;
///
/// assert_eq!(result.unwrap(), 7);
/// assert_eq!(monitor.stats().total_operations, 1);
/// # }
/// ```
pub async fn timed<F, T, E>(
    monitor: &OperationMonitor,
    id: impl Into<String>,
    op_type: impl Into<String>,
    work: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    timed_with(monitor, id, op_type, Metadata::new(), work).await
}

/// [`timed`] with caller-supplied metadata on the record.
pub async fn timed_with<F, T, E>(
    monitor: &OperationMonitor,
    id: impl Into<String>,
    op_type: impl Into<String>,
    metadata: Metadata,
    work: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let id = id.into();
    monitor.start_timer_with(&*id, op_type, metadata);
    match work.await {
        Ok(value) => {
            let _ = monitor.end_timer(&id, true, None);
            Ok(value)
        }
        Err(error) => {
            let _ = monitor.end_timer(&id, false, Some(error.to_string()));
            Err(error)
        }
    }
}

/// Operation type assigned to request-scoped timers.
pub const REQUEST_OP_TYPE: &str = "api_request";

/// Times one HTTP request from entry to response finalization.
///
/// Start the timer when the request enters the handler stack and call
/// [`finish`](Self::finish) with the response status once the response is
/// final: a status below 400 counts as success, anything else is recorded
/// as a failure with the status in the details. Dropping the timer without
/// finishing leaves the operation active; there is no automatic eviction,
/// and the abandoned timer surfaces through `active_operations` and the
/// health report.
#[derive(Debug)]
pub struct RequestTimer<'a> {
    monitor: &'a OperationMonitor,
    id: String,
}

impl<'a> RequestTimer<'a> {
    /// Starts timing a request under the caller-chosen id.
    #[must_use]
    pub fn begin(monitor: &'a OperationMonitor, id: impl Into<String>) -> Self {
        Self::begin_with(monitor, id, Metadata::new())
    }

    /// Starts timing a request with metadata (route, method, caller id).
    #[must_use]
    pub fn begin_with(
        monitor: &'a OperationMonitor,
        id: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        let id = id.into();
        monitor.start_timer_with(&*id, REQUEST_OP_TYPE, metadata);
        Self { monitor, id }
    }

    /// The operation id this timer was registered under.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ends the timer, deriving the outcome from the response status.
    pub fn finish(self, status_code: u16) -> Option<CompletedOperation> {
        let success = status_code < 400;
        let details = if success { None } else { Some(format!("HTTP {status_code}")) };
        self.monitor.end_timer(&self.id, success, details)
    }
}
