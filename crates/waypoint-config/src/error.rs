//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`WaypointConfig`](crate::WaypointConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Neither TOML nor JSON.
    #[error("unsupported configuration format `{format}` (expected toml or json)")]
    UnsupportedFormat {
        /// The extension or format name given.
        format: String,
    },

    /// Malformed TOML, or TOML with unknown fields.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Malformed JSON, or JSON with unknown fields.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A `.env` file exists but could not be parsed.
    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// A field holds a value that is well-formed but not allowed.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `routing.body_binding`.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An override variable could not be parsed.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The variable name.
        var: String,
        /// Why parsing failed.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an environment variable parse error.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error() {
        let err = ConfigError::file_not_found("/etc/waypoint.toml");
        assert!(err.to_string().contains("/etc/waypoint.toml"));
    }

    #[test]
    fn test_unsupported_format_error() {
        let err = ConfigError::unsupported_format("yaml");
        assert_eq!(
            err.to_string(),
            "unsupported configuration format `yaml` (expected toml or json)"
        );
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("routing.body_binding", "unknown method `fetch`");
        assert!(err.to_string().contains("routing.body_binding"));
        assert!(err.to_string().contains("fetch"));
    }

    #[test]
    fn test_env_parse_error() {
        let err = ConfigError::env_parse_error("WAYPOINT__LOGGING__ENABLED", "expected boolean");
        assert!(err.to_string().contains("WAYPOINT__LOGGING__ENABLED"));
        assert!(err.to_string().contains("expected boolean"));
    }
}
