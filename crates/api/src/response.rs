//! The wire shape of a classified error.
//!
//! Every classifier entry point produces an [`ErrorResponse`]: the HTTP
//! status to apply and a fixed-shape JSON body. The body never carries raw
//! internals: only a user-safe message, optional details, a fresh
//! correlation id, and a timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skillet_common::CorrelationId;

/// The JSON body sent to the client for a classified error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Always `false`; kept for the response envelope the frontend expects.
    pub success: bool,
    /// User-safe summary of what went wrong.
    pub message: String,
    /// Optional user-safe elaboration; omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Correlates this response with the server-side log entry.
    pub error_id: CorrelationId,
    /// When the error was classified.
    pub timestamp: DateTime<Utc>,
}

/// A classified error ready for the HTTP layer to apply as
/// `(status, json_body)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code to respond with.
    pub status: u16,
    /// Response body.
    pub body: ErrorBody,
}

impl ErrorResponse {
    /// Builds a response with a fresh correlation id and timestamp.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                success: false,
                message: message.into(),
                details,
                error_id: CorrelationId::fresh(),
                timestamp: Utc::now(),
            },
        }
    }

    /// The correlation id stamped on this response.
    #[must_use]
    pub fn error_id(&self) -> CorrelationId {
        self.body.error_id
    }
}
