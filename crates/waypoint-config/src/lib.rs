//! Typed configuration for Waypoint.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use waypoint_config::ConfigLoader;
//!
//! # fn main() -> Result<(), waypoint_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("waypoint.toml")?
//!     .with_env_prefix("WAYPOINT")
//!     .load()?;
//!
//! waypoint_telemetry::init_logging(&(&config.logging).into()).ok();
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [routing]
//! not_found_message = "NOT FOUND"
//! body_binding = ["put", "patch", "delete"]
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! include_location = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `WAYPOINT__ROUTING__NOT_FOUND_MESSAGE=Gone`
//! - `WAYPOINT__ROUTING__BODY_BINDING=put,patch`
//! - `WAYPOINT__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::WaypointConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, RoutingConfig, DEFAULT_NOT_FOUND_MESSAGE};
