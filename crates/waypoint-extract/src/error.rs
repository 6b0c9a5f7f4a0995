//! Extraction error types.
//!
//! Errors raised while building a [`Request`](crate::Request) or decoding its
//! body, tagged with the part of the request that failed.

use http::StatusCode;
use std::fmt;

/// Part of the request an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Method or URI
    Uri,
    /// Query string parameters
    Query,
    /// Request body (form, JSON, XML)
    Body,
    /// HTTP headers
    Header,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri => write!(f, "uri"),
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
            Self::Header => write!(f, "header"),
        }
    }
}

/// Error that occurs during extraction.
///
/// # Example
///
/// ```rust
/// use waypoint_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::deserialization_failed(ExtractionSource::Body, "expected value");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.extraction_source(), ExtractionSource::Body);
/// assert!(err.to_string().contains("expected value"));
/// ```
#[derive(Debug)]
pub struct ExtractionError {
    extraction_source: ExtractionSource,
    kind: ExtractionErrorKind,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    /// Method, URI or header could not form a request
    InvalidRequest,
    /// Deserialization failed
    DeserializationFailed,
    /// Bytes were not valid UTF-8
    InvalidEncoding,
}

impl ExtractionError {
    /// Creates an error for a request that cannot be built.
    #[must_use]
    pub fn invalid_request(source: ExtractionSource, details: impl Into<String>) -> Self {
        let details = details.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::InvalidRequest,
            message: format!("invalid request {source}: {details}"),
        }
    }

    /// Creates an error for deserialization failure.
    #[must_use]
    pub fn deserialization_failed(source: ExtractionSource, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::DeserializationFailed,
            message: format!("failed to deserialize {source}: {error}"),
        }
    }

    /// Creates an error for text that is not valid UTF-8.
    #[must_use]
    pub fn invalid_encoding(source: ExtractionSource, details: impl Into<String>) -> Self {
        let details = details.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::InvalidEncoding,
            message: format!("{source} is not valid UTF-8: {details}"),
        }
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ExtractionErrorKind::InvalidRequest
            | ExtractionErrorKind::DeserializationFailed
            | ExtractionErrorKind::InvalidEncoding => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ExtractionErrorKind::InvalidRequest => "INVALID_REQUEST",
            ExtractionErrorKind::DeserializationFailed => "DESERIALIZATION_FAILED",
            ExtractionErrorKind::InvalidEncoding => "INVALID_ENCODING",
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_error() {
        let err = ExtractionError::invalid_request(ExtractionSource::Uri, "empty method");

        assert_eq!(err.extraction_source(), ExtractionSource::Uri);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_REQUEST");
        assert!(err.to_string().contains("empty method"));
    }

    #[test]
    fn test_deserialization_failed_error() {
        let err = ExtractionError::deserialization_failed(
            ExtractionSource::Query,
            "unexpected token at position 5",
        );

        assert_eq!(err.extraction_source(), ExtractionSource::Query);
        assert_eq!(err.error_code(), "DESERIALIZATION_FAILED");
        assert!(err.to_string().starts_with("failed to deserialize query"));
    }

    #[test]
    fn test_invalid_encoding_error() {
        let err = ExtractionError::invalid_encoding(ExtractionSource::Body, "byte 3");
        assert_eq!(err.error_code(), "INVALID_ENCODING");
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_extraction_source_display() {
        assert_eq!(ExtractionSource::Uri.to_string(), "uri");
        assert_eq!(ExtractionSource::Query.to_string(), "query");
        assert_eq!(ExtractionSource::Body.to_string(), "body");
        assert_eq!(ExtractionSource::Header.to_string(), "header");
    }
}
