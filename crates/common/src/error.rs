//! Error types shared across the Skillet workspace.
//!
//! Timer bookkeeping itself never fails: a lookup miss is a logged warning
//! and a `None`, not an error. `TelemetryError` covers the cold paths that
//! can legitimately reject: configuration validation and lifecycle
//! transitions.

use thiserror::Error;

/// Standard result type using [`TelemetryError`].
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised by configuration and lifecycle paths.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TelemetryError {
    /// Invalid configuration value.
    #[error("Configuration error in field '{field}': {message}")]
    Config {
        /// The offending field name.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// An internal channel was closed while still in use.
    #[error("Channel '{channel}' closed")]
    ChannelClosed {
        /// Name of the closed channel.
        channel: String,
    },

    /// Operation attempted against a component that has shut down.
    #[error("Component '{component}' has shut down")]
    Shutdown {
        /// Name of the shut-down component.
        component: String,
    },
}

impl TelemetryError {
    /// Create a configuration error for a specific field.
    pub fn config<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Config { field: field.into(), message: message.into() }
    }

    /// Create a closed-channel error.
    pub fn channel_closed<C: Into<String>>(channel: C) -> Self {
        Self::ChannelClosed { channel: channel.into() }
    }

    /// Create a shutdown error for a named component.
    pub fn shutdown<C: Into<String>>(component: C) -> Self {
        Self::Shutdown { component: component.into() }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the shared error taxonomy.
    use super::*;

    /// Validates `TelemetryError::config` behavior for the display formatting
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `err.to_string()` equals `"Configuration error in field
    ///   'slow_history_capacity': must be greater than zero"`.
    #[test]
    fn config_error_display_names_the_field() {
        let err = TelemetryError::config("slow_history_capacity", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Configuration error in field 'slow_history_capacity': must be greater than zero"
        );
    }

    /// Validates `TelemetryError::shutdown` behavior for the lifecycle error
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `err.to_string()` equals `"Component 'operation_monitor' has
    ///   shut down"`.
    /// - Confirms the variant round-trips through `PartialEq`.
    #[test]
    fn shutdown_error_names_the_component() {
        let err = TelemetryError::shutdown("operation_monitor");
        assert_eq!(err.to_string(), "Component 'operation_monitor' has shut down");
        assert_eq!(err, TelemetryError::shutdown("operation_monitor"));
    }
}
