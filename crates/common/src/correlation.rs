//! Correlation identifiers linking client-visible failures to log lines.
//!
//! Every classified error is stamped with a fresh [`CorrelationId`] that
//! appears both in the server-side log entry and in the response body sent
//! to the client, so a support ticket quoting the id can be matched to the
//! full error detail without ever exposing internals. Correlation ids are
//! independent of the timer registry's operation ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque identifier correlating one error response with its log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generates a fresh, unique identifier.
    #[must_use]
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}
