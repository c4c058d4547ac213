//! Stateless error classification.
//!
//! [`ErrorClassifier::classify`] dispatches a caught error through an
//! ordered chain (storage, auth, validation, upload, explicit status,
//! generic) and the first matching branch wins. Each branch produces a
//! fixed, user-safe message (raw internals are never echoed to the client
//! outside non-production mode) and logs the full original error at error
//! level, stamped with the same correlation id the client receives.

use std::env;
use std::time::Duration;

use tracing::error;

use crate::caught::CaughtError;
use crate::response::ErrorResponse;

/// Environment variable controlling non-production behavior.
const ENV_VAR: &str = "SKILLET_ENV";

/// Storage error family names with an explicit status mapping.
const STORAGE_CONFLICT: &str = "ConditionalCheckFailedException";
const STORAGE_MALFORMED: &str = "ValidationException";
const STORAGE_NOT_FOUND: &str = "ResourceNotFoundException";
const STORAGE_THROTTLED: &[&str] =
    &["ProvisionedThroughputExceededException", "ThrottlingException", "RequestLimitExceeded"];
const STORAGE_UNAVAILABLE: &[&str] =
    &["ServiceUnavailable", "ServiceUnavailableException", "InternalServerError"];

/// Terms marking an error message as authentication/authorization-flavored.
const AUTH_TERMS: &[&str] =
    &["token", "unauthorized", "permission", "forbidden", "authentication", "authorization"];

/// Request context included in server-side log lines.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP method of the failing request.
    pub method: String,
    /// Request path.
    pub path: String,
}

impl RequestContext {
    /// Creates a context from method and path.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self { method: method.into(), path: path.into() }
    }
}

/// Classifier tunables.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Include the original message as `details` on unclassified errors.
    /// Off in production; the safe default.
    pub expose_internal_details: bool,
    /// Retry window quoted by the rate-limit responder.
    pub rate_limit_window: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { expose_internal_details: false, rate_limit_window: Duration::from_millis(60_000) }
    }
}

impl ClassifierConfig {
    /// Reads the environment: anything but `production` exposes details on
    /// unclassified errors.
    #[must_use]
    pub fn from_env() -> Self {
        let environment = env::var(ENV_VAR).unwrap_or_default();
        Self { expose_internal_details: environment != "production", ..Self::default() }
    }

    /// Sets whether unclassified errors expose their original message.
    #[must_use]
    pub fn expose_internal_details(mut self, expose: bool) -> Self {
        self.expose_internal_details = expose;
        self
    }

    /// Sets the quoted rate-limit retry window.
    #[must_use]
    pub fn rate_limit_window(mut self, window: Duration) -> Self {
        self.rate_limit_window = window;
        self
    }
}

/// Translates caught errors into `(status, body)` pairs.
///
/// Stateless between calls; safe to share by reference across handlers.
#[derive(Debug, Clone, Default)]
pub struct ErrorClassifier {
    config: ClassifierConfig,
}

impl ErrorClassifier {
    /// Creates a classifier with the production-safe defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a classifier with explicit configuration.
    #[must_use]
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classifies a caught error into an HTTP status and user-safe body.
    ///
    /// Ordered dispatch, first match wins: storage, auth, validation,
    /// upload limit, explicit status, generic catch-all.
    #[must_use]
    pub fn classify(&self, caught: &CaughtError, context: Option<&RequestContext>) -> ErrorResponse {
        let response = if self.is_storage_error(caught) {
            self.classify_storage(caught)
        } else if self.is_auth_error(caught) {
            self.classify_auth(caught)
        } else if self.is_validation_error(caught) {
            ErrorResponse::new(400, "Validation failed", Some(caught.message.clone()))
        } else if let Some(code) = upload_limit_code(caught) {
            classify_upload(code)
        } else if let Some(status) = caught.http_status {
            let message =
                if caught.message.is_empty() { "Request failed".to_string() } else { caught.message.clone() };
            ErrorResponse::new(status, message, None)
        } else {
            self.classify_generic(caught)
        };

        self.log_classified(&response, caught, context);
        response
    }

    /// Builds the 404 response for an unmatched route.
    #[must_use]
    pub fn not_found(&self, method: &str, path: &str) -> ErrorResponse {
        let response = ErrorResponse::new(404, format!("Route {method} {path} not found"), None);
        error!(
            error_id = %response.error_id(),
            method,
            path,
            "route not found"
        );
        response
    }

    /// Builds the 429 response quoting the configured retry window.
    #[must_use]
    pub fn rate_limited(&self) -> ErrorResponse {
        let window_ms = self.config.rate_limit_window.as_millis();
        let response = ErrorResponse::new(
            429,
            format!("Too many requests, please retry in {window_ms}ms"),
            None,
        );
        error!(error_id = %response.error_id(), window_ms, "rate limit exceeded");
        response
    }

    fn is_storage_error(&self, caught: &CaughtError) -> bool {
        caught.transport.is_some() || caught.name.ends_with("Exception") || STORAGE_UNAVAILABLE.contains(&caught.name.as_str())
    }

    fn classify_storage(&self, caught: &CaughtError) -> ErrorResponse {
        let name = caught.name.as_str();
        if name == STORAGE_CONFLICT {
            ErrorResponse::new(
                409,
                "Conflict: the item was modified by another request",
                Some("conditional check failed".into()),
            )
        } else if name == STORAGE_MALFORMED {
            ErrorResponse::new(
                400,
                "Invalid request to the data store",
                Some("malformed request".into()),
            )
        } else if name == STORAGE_NOT_FOUND {
            ErrorResponse::new(404, "The requested resource was not found", None)
        } else if STORAGE_THROTTLED.contains(&name) {
            ErrorResponse::new(
                429,
                "Too many requests to the data store",
                Some("please retry shortly".into()),
            )
        } else if STORAGE_UNAVAILABLE.contains(&name) {
            ErrorResponse::new(
                503,
                "The data store is temporarily unavailable",
                Some("please retry shortly".into()),
            )
        } else {
            ErrorResponse::new(500, "A data store error occurred", None)
        }
    }

    fn is_auth_error(&self, caught: &CaughtError) -> bool {
        let message = caught.message.to_lowercase();
        AUTH_TERMS.iter().any(|term| message.contains(term))
    }

    fn classify_auth(&self, caught: &CaughtError) -> ErrorResponse {
        let message = caught.message.to_lowercase();
        if message.contains("token") || message.contains("unauthorized") {
            ErrorResponse::new(
                401,
                "Authentication required",
                Some("Please provide a valid authentication token".into()),
            )
        } else if message.contains("permission") || message.contains("forbidden") {
            ErrorResponse::new(
                403,
                "You do not have permission to perform this action",
                None,
            )
        } else {
            ErrorResponse::new(401, "Authentication required", Some(caught.message.clone()))
        }
    }

    fn is_validation_error(&self, caught: &CaughtError) -> bool {
        caught.name.to_lowercase().contains("validation")
            || caught.message.to_lowercase().contains("validation")
    }

    fn classify_generic(&self, caught: &CaughtError) -> ErrorResponse {
        let details = (self.config.expose_internal_details && !caught.message.is_empty())
            .then(|| caught.message.clone());
        ErrorResponse::new(500, "Internal server error", details)
    }

    /// Logs the full original error server-side, with the same correlation
    /// id the client receives. Runs for every branch regardless of what is
    /// exposed to the client.
    fn log_classified(
        &self,
        response: &ErrorResponse,
        caught: &CaughtError,
        context: Option<&RequestContext>,
    ) {
        let (transport_status, transport_request_id) = match &caught.transport {
            Some(transport) => (transport.status_code, transport.request_id.as_deref()),
            None => (None, None),
        };
        let (method, path) = match context {
            Some(ctx) => (Some(ctx.method.as_str()), Some(ctx.path.as_str())),
            None => (None, None),
        };
        error!(
            error_id = %response.error_id(),
            status = response.status,
            error_name = %caught.name,
            error_message = %caught.message,
            error_code = caught.code.as_deref(),
            transport_status,
            transport_request_id,
            method,
            path,
            "request error classified"
        );
    }
}

/// Extracts a recognized upload-limit code, if present.
fn upload_limit_code(caught: &CaughtError) -> Option<&str> {
    caught.code.as_deref().filter(|code| code.starts_with("LIMIT_"))
}

fn classify_upload(code: &str) -> ErrorResponse {
    match code {
        "LIMIT_FILE_SIZE" => ErrorResponse::new(
            413,
            "File too large",
            Some("The uploaded file exceeds the maximum allowed size".into()),
        ),
        "LIMIT_FILE_COUNT" => ErrorResponse::new(
            400,
            "Too many files",
            Some("The upload exceeds the maximum number of files".into()),
        ),
        _ => ErrorResponse::new(400, "Upload failed", None),
    }
}
