//! Configuration sections.

use serde::{Deserialize, Serialize};
use waypoint_router::Method;
use waypoint_telemetry::LogConfig;

use crate::ConfigError;

/// Message carried by the terminal not-found outcome.
pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "NOT FOUND";

/// Routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Message used when no route matches and no not-found handler exists.
    #[serde(default = "default_not_found_message")]
    pub not_found_message: String,

    /// Methods whose handlers also bind from url-encoded body fields.
    #[serde(default = "default_body_binding")]
    pub body_binding: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            not_found_message: default_not_found_message(),
            body_binding: default_body_binding(),
        }
    }
}

impl RoutingConfig {
    /// Resolves `body_binding` into methods.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unknown method names and for
    /// GET, HEAD and POST, whose parameter sources are fixed.
    pub fn body_binding_methods(&self) -> Result<Vec<Method>, ConfigError> {
        self.body_binding
            .iter()
            .map(|name| match Method::from_name(name.trim()) {
                Some(method @ (Method::Put | Method::Patch | Method::Delete)) => Ok(method),
                Some(method) => Err(ConfigError::invalid_value(
                    "routing.body_binding",
                    format!("{method} has a fixed parameter source"),
                )),
                None => Err(ConfigError::invalid_value(
                    "routing.body_binding",
                    format!("unknown method `{name}`"),
                )),
            })
            .collect()
    }
}

fn default_not_found_message() -> String {
    DEFAULT_NOT_FOUND_MESSAGE.to_string()
}

fn default_body_binding() -> Vec<String> {
    vec!["put".to_string(), "patch".to_string(), "delete".to_string()]
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: config.level.clone(),
            json_format: config.format == LogFormat::Json,
            span_events: config.format == LogFormat::Pretty,
            file_line_info: config.include_location,
            include_target: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_defaults() {
        let config = RoutingConfig::default();
        assert_eq!(config.not_found_message, "NOT FOUND");
        assert_eq!(
            config.body_binding_methods().unwrap(),
            vec![Method::Put, Method::Patch, Method::Delete]
        );
    }

    #[test]
    fn test_body_binding_validation() {
        let config = RoutingConfig {
            body_binding: vec!["PATCH".to_string()],
            ..Default::default()
        };
        assert_eq!(config.body_binding_methods().unwrap(), vec![Method::Patch]);

        let config = RoutingConfig {
            body_binding: vec!["post".to_string()],
            ..Default::default()
        };
        assert!(config.body_binding_methods().is_err());

        let config = RoutingConfig {
            body_binding: vec!["fetch".to_string()],
            ..Default::default()
        };
        let err = config.body_binding_methods().unwrap_err();
        assert!(err.to_string().contains("fetch"));
    }

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_log_format_serde() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_into_log_config() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            ..Default::default()
        };
        let log = LogConfig::from(&config);
        assert_eq!(log.level, "debug");
        assert!(!log.json_format);
        assert!(log.file_line_info);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<RoutingConfig, _> = toml::from_str("not_found = \"x\"");
        assert!(result.is_err());
    }
}
