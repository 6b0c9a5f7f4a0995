//! Structured logging for Waypoint.
//!
//! Waypoint logs through `tracing`. This crate installs a
//! `tracing-subscriber` registry with an `EnvFilter` and either a JSON or a
//! pretty formatting layer, and defines the field names the router uses:
//!
//! | Field | Example |
//! |--------|---------|
//! | `http.method` | `GET` |
//! | `http.path` | `/posts/5` |
//! | `route.pattern` | `/posts/{page?}` |
//! | `route.handler` | `PostController::index` |
//! | `miss_reason` | `no_pattern_matched` |
//!
//! # Example
//!
//! ```rust
//! use waypoint_telemetry::{init_logging, LogConfig};
//!
//! let config = LogConfig::development();
//! init_logging(&config).expect("logging installs once");
//!
//! tracing::info!(http.method = "GET", http.path = "/", "request received");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
