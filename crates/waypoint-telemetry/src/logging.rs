//! Structured logging setup.
//!
//! # Example
//!
//! ```rust,ignore
//! use waypoint_telemetry::logging::{LogConfig, init_logging};
//!
//! init_logging(&LogConfig::default())?;
//!
//! tracing::debug!(route.pattern = "/users/{id}", "route registered");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "waypoint=debug,warn").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            span_events: false,
            file_line_info: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            span_events: true,
            file_line_info: true,
            include_target: true,
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

/// Initializes the logging subsystem.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for a bad filter directive and
/// [`TelemetryError::LoggingInit`] if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns error if the directive is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter(format!("{filter}: {e}")))
}

/// Standard log fields for Waypoint.
pub mod fields {
    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// HTTP path field name.
    pub const HTTP_PATH: &str = "http.path";

    /// Matched route pattern field name.
    pub const ROUTE_PATTERN: &str = "route.pattern";

    /// Handler description field name.
    pub const ROUTE_HANDLER: &str = "route.handler";

    /// Not-found reason field name.
    pub const MISS_REASON: &str = "miss_reason";

    /// Error field name.
    pub const ERROR: &str = "error";
}

/// Logs a dispatched route.
#[macro_export]
macro_rules! log_route_matched {
    ($method:expr, $path:expr, $pattern:expr, $handler:expr) => {
        tracing::debug!(
            http.method = %$method,
            http.path = %$path,
            route.pattern = %$pattern,
            route.handler = %$handler,
            "Route dispatched"
        );
    };
}

/// Logs a request no route accepted.
#[macro_export]
macro_rules! log_route_miss {
    ($method:expr, $path:expr, $reason:expr) => {
        tracing::warn!(
            http.method = %$method,
            http.path = %$path,
            miss_reason = %$reason,
            "No route found"
        );
    };
}

/// Logs a failed handler.
#[macro_export]
macro_rules! log_handler_error {
    ($method:expr, $path:expr, $handler:expr, $error:expr) => {
        tracing::error!(
            http.method = %$method,
            http.path = %$path,
            route.handler = %$handler,
            error = %$error,
            "Handler failed"
        );
    };
}
