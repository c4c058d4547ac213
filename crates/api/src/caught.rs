//! The raw surface of a caught error.
//!
//! Collaborators forward whatever they caught (storage exceptions, auth
//! failures, upload-limit rejections, plain errors) preserving the fields
//! the classifier dispatches on: the error's name, its message, an
//! optional limit code, an optional explicit HTTP status, and optional
//! storage transport metadata.

use std::error::Error;

/// Transport metadata attached to storage-layer errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportInfo {
    /// HTTP status reported by the storage transport.
    pub status_code: Option<u16>,
    /// Request id assigned by the storage service.
    pub request_id: Option<String>,
}

/// A caught error as handed to the classifier.
///
/// # Examples
///
/// ```rust
/// use skillet_api::CaughtError;
///
/// let caught = CaughtError::named("ConditionalCheckFailedException")
///     .with_message("The conditional request failed");
/// assert_eq!(caught.name, "ConditionalCheckFailedException");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaughtError {
    /// The error's type or family name (e.g. `ValidationException`).
    pub name: String,
    /// The error's message, verbatim.
    pub message: String,
    /// Limit code carried by upload rejections (e.g. `LIMIT_FILE_SIZE`).
    pub code: Option<String>,
    /// Explicit HTTP status the error was thrown with, if any.
    pub http_status: Option<u16>,
    /// Storage transport metadata, if any.
    pub transport: Option<TransportInfo>,
}

impl CaughtError {
    /// Creates a caught error from its type/family name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Captures a plain Rust error: type name `Error`, display message.
    #[must_use]
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        Self { name: "Error".to_string(), message: error.to_string(), ..Self::default() }
    }

    /// Sets the error message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the upload-limit code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets an explicit HTTP status carried by the error.
    #[must_use]
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Attaches storage transport metadata.
    #[must_use]
    pub fn with_transport(mut self, transport: TransportInfo) -> Self {
        self.transport = Some(transport);
        self
    }
}
