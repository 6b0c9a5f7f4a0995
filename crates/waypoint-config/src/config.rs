//! Main configuration type.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig, RoutingConfig};

/// Complete Waypoint configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use waypoint_config::WaypointConfig;
///
/// let config = WaypointConfig::default();
/// assert_eq!(config.routing.not_found_message, "NOT FOUND");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct WaypointConfig {
    /// Routing configuration.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WaypointConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `routing.body_binding` names an unknown method, or GET/HEAD/POST
    /// - `logging.level` is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.routing.body_binding_methods()?;

        if self.logging.enabled {
            waypoint_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty, debug-level logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use waypoint_config::{LogFormat, WaypointConfig};
    ///
    /// let config = WaypointConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        Self {
            routing: RoutingConfig::default(),
            logging: LoggingConfig {
                enabled: true,
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
            },
        }
    }

    /// Create a production configuration preset.
    ///
    /// JSON, info-level logs.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(WaypointConfig::default().validate().is_ok());
        assert!(WaypointConfig::development().validate().is_ok());
        assert_eq!(WaypointConfig::production(), WaypointConfig::default());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = WaypointConfig::default();
        config.logging.level = "waypoint=chatty".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));

        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_body_binding() {
        let mut config = WaypointConfig::default();
        config.routing.body_binding = vec!["get".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialize_roundtrip_toml() {
        let config = WaypointConfig::development();
        let text = toml::to_string(&config).unwrap();
        let parsed: WaypointConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
