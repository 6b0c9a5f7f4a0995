//! Error types for Waypoint.
//!
//! [`WaypointError`] covers the three outcomes that leave the dispatcher
//! without a successful handler call:
//!
//! | `ErrorCategory` | Status | Fatal |
//! |---|---|---|
//! | `Configuration` | 500 | yes |
//! | `NotFound` | 404 | no |
//! | `Handler` | 500 | no |
//!
//! Configuration errors are raised while a router is being built and must stop
//! start-up. Not-found errors are expected at request time and only surface
//! when no not-found handler is registered.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use waypoint_router::{Miss, PatternError};

/// Result type alias using [`WaypointError`].
pub type WaypointResult<T> = Result<T, WaypointError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid route or handler registration.
    Configuration,
    /// No route accepted the request.
    NotFound,
    /// A handler reported a failure.
    Handler,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Configuration | Self::Handler => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Returns true if the error must stop processing rather than be recovered.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration)
    }

    /// Returns the snake_case name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::NotFound => "not_found",
            Self::Handler => "handler",
        }
    }
}

/// Standard error type for Waypoint.
///
/// # Example
///
/// ```
/// use waypoint_core::{ErrorCategory, WaypointError};
///
/// let err = WaypointError::configuration("controller has no action `shwo`");
/// assert_eq!(err.category(), ErrorCategory::Configuration);
/// assert!(err.is_fatal());
/// ```
#[derive(Error, Debug)]
pub enum WaypointError {
    /// A route or handler was registered incorrectly.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable error message.
        message: String,
        /// The underlying error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// No route matched and no not-found handler is registered.
    #[error("{message}")]
    NotFound {
        /// The configured not-found message.
        message: String,
        /// Request method as received.
        method: String,
        /// Request path.
        path: String,
        /// Why the lookup missed.
        reason: Miss,
    },

    /// A handler returned an error.
    #[error("Handler error: {message}")]
    Handler {
        /// Human-readable error message.
        message: String,
        /// The handler's error.
        #[source]
        source: anyhow::Error,
    },
}

impl WaypointError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a configuration error with a source error.
    pub fn configuration_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(
        message: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        reason: Miss,
    ) -> Self {
        Self::NotFound {
            message: message.into(),
            method: method.into(),
            path: path.into(),
            reason,
        }
    }

    /// Creates a handler error.
    pub fn handler(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Handler {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Handler { .. } => ErrorCategory::Handler,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns true if the error must stop processing.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.category().is_fatal()
    }

    /// Returns the miss reason of a not found error.
    #[must_use]
    pub const fn miss(&self) -> Option<Miss> {
        match self {
            Self::NotFound { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl From<PatternError> for WaypointError {
    fn from(err: PatternError) -> Self {
        Self::configuration_with_source(format!("invalid route pattern `{}`", err.pattern()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_configuration_error() {
        let error = WaypointError::configuration("bad handler");
        assert_eq!(error.category(), ErrorCategory::Configuration);
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.is_fatal());
        assert!(error.source().is_none());
        assert!(error.to_string().contains("bad handler"));
    }

    #[test]
    fn test_not_found_error() {
        let error = WaypointError::not_found("NOT FOUND", "PUT", "/x", Miss::NoRoutesForMethod);
        assert_eq!(error.category(), ErrorCategory::NotFound);
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert!(!error.is_fatal());
        assert_eq!(error.miss(), Some(Miss::NoRoutesForMethod));
        assert_eq!(error.to_string(), "NOT FOUND");
    }

    #[test]
    fn test_handler_error_keeps_source() {
        let error = WaypointError::handler("showUser failed", anyhow::anyhow!("db down"));
        assert_eq!(error.category(), ErrorCategory::Handler);
        assert!(!error.is_fatal());
        assert!(error.miss().is_none());
        assert_eq!(error.source().map(ToString::to_string).as_deref(), Some("db down"));
    }

    #[test]
    fn test_from_pattern_error() {
        let err = PatternError::MissingLeadingSlash {
            pattern: "users".to_string(),
        };
        let error = WaypointError::from(err);
        assert_eq!(error.category(), ErrorCategory::Configuration);
        assert!(error.to_string().contains("`users`"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ErrorCategory::NotFound).expect("serialization should work");
        assert_eq!(json, "\"not_found\"");
        assert_eq!(ErrorCategory::NotFound.as_str(), "not_found");
    }

    #[test]
    fn test_all_error_categories_have_status_codes() {
        for category in [
            ErrorCategory::Configuration,
            ErrorCategory::NotFound,
            ErrorCategory::Handler,
        ] {
            let status = category.default_status_code();
            assert!(
                status.is_client_error() || status.is_server_error(),
                "Category {:?} should map to error status code, got {}",
                category,
                status
            );
        }
    }
}
