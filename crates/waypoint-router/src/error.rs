//! Route pattern errors.

use thiserror::Error;

/// A route pattern that cannot be compiled into a matcher.
///
/// All of these are registration mistakes; they surface when a route table is
/// frozen, before any request is served.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern does not begin with `/`.
    #[error("route pattern `{pattern}` must start with '/'")]
    MissingLeadingSlash {
        /// The offending pattern.
        pattern: String,
    },

    /// A `{` without a matching `}` (or the reverse, or a nested `{`).
    #[error("unbalanced braces in route pattern `{pattern}` at byte {position}")]
    UnbalancedBraces {
        /// The offending pattern.
        pattern: String,
        /// Byte offset of the brace that broke the balance.
        position: usize,
    },

    /// A placeholder name that is empty or uses characters outside `[A-Za-z0-9_]`.
    #[error("invalid placeholder name `{name}` in route pattern `{pattern}`")]
    InvalidName {
        /// The offending pattern.
        pattern: String,
        /// The raw text between the braces.
        name: String,
    },

    /// The same placeholder name appears twice in one pattern.
    #[error("placeholder `{name}` appears more than once in route pattern `{pattern}`")]
    DuplicatePlaceholder {
        /// The offending pattern.
        pattern: String,
        /// The repeated name.
        name: String,
    },

    /// A placeholder shares its `/` segment with literal text.
    #[error("placeholder in segment `{segment}` of route pattern `{pattern}` must span the whole segment")]
    EmbeddedPlaceholder {
        /// The offending pattern.
        pattern: String,
        /// The segment containing the placeholder.
        segment: String,
    },

    /// The assembled expression (usually a verbatim annotation) is not a valid regex.
    #[error("route pattern `{pattern}` does not compile to a valid expression")]
    InvalidExpression {
        /// The offending pattern.
        pattern: String,
        /// The regex compiler's error.
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    /// Returns the route pattern this error refers to.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::MissingLeadingSlash { pattern }
            | Self::UnbalancedBraces { pattern, .. }
            | Self::InvalidName { pattern, .. }
            | Self::DuplicatePlaceholder { pattern, .. }
            | Self::EmbeddedPlaceholder { pattern, .. }
            | Self::InvalidExpression { pattern, .. } => pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_pattern() {
        let err = PatternError::UnbalancedBraces {
            pattern: "/users/{id".to_string(),
            position: 7,
        };
        assert!(err.to_string().contains("/users/{id"));
        assert!(err.to_string().contains("byte 7"));
        assert_eq!(err.pattern(), "/users/{id");
    }

    #[test]
    fn test_duplicate_display() {
        let err = PatternError::DuplicatePlaceholder {
            pattern: "/{a}/{a}".to_string(),
            name: "a".to_string(),
        };
        assert!(err.to_string().contains("`a`"));
    }
}
