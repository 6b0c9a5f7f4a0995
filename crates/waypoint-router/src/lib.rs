//! Ordered, pattern-compiling route table for Waypoint.
//!
//! Routes are registered per HTTP method in a [`RouteTable`] and matched by a
//! linear scan in registration order: the first pattern that accepts the path
//! wins. Patterns are compiled once, when the table is frozen.
//!
//! # Pattern syntax
//!
//! - literal segments: `/users/active`
//! - required placeholders: `/users/{id}`
//! - optional placeholders: `/posts/{page?}` (every placeholder after the
//!   first optional one is optional too)
//!
//! A placeholder matches `[a-zA-Z0-9+]+` unless the pattern's [`TypeHints`]
//! name a type from the [`TypeCatalog`] (`number`, `uuid`, `date`, ...) or
//! give a regex fragment.
//!
//! # Example
//!
//! ```rust
//! use waypoint_router::{Method, RouteTable, TypeHints};
//!
//! let mut table = RouteTable::new();
//! table.get("/", "home", TypeHints::new());
//! table.get("/articles/{slug}", "showArticle", [("slug", "url_title")]);
//! table.any("/ping", "ping", TypeHints::new());
//!
//! let table = table.freeze().unwrap();
//!
//! let m = table.find(Method::Get, "/articles/hello-world").unwrap();
//! assert_eq!(*m.handler, "showArticle");
//! assert_eq!(m.params.get("slug"), Some("hello-world"));
//!
//! assert!(table.find(Method::Delete, "/ping").is_ok());
//! assert!(table.find(Method::Post, "/").is_err());
//! ```

#![doc(html_root_url = "https://docs.rs/waypoint-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod method;
mod params;
mod pattern;
pub mod resource;
mod table;

use std::fmt;

pub use error::PatternError;
pub use method::{Method, MethodMap, UnknownMethod};
pub use params::Params;
pub use pattern::{CompiledPattern, Placeholder, TypeCatalog, TypeHints, DEFAULT_FRAGMENT};
pub use resource::{ResourceAction, ResourceRoute, RESOURCE_ROUTES};
pub use table::{CompiledRoute, CompiledTable, RouteTable};

/// A matched route with its handler and extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, H> {
    /// The method the route was registered for
    pub method: Method,
    /// The pattern text of the matched route
    pub pattern: &'a str,
    /// The handler registered for the route
    pub handler: &'a H,
    /// Extracted path parameters
    pub params: Params,
}

impl<'a, H> RouteMatch<'a, H> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(method: Method, pattern: &'a str, handler: &'a H, params: Params) -> Self {
        Self {
            method,
            pattern,
            handler,
            params,
        }
    }
}

/// Why a lookup found no route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Miss {
    /// The method has no routes at all (or is not a supported method).
    NoRoutesForMethod,
    /// Routes exist for the method but none accepted the path.
    NoPatternMatched,
}

impl Miss {
    /// A short machine-friendly label, used as a log field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoRoutesForMethod => "no_routes_for_method",
            Self::NoPatternMatched => "no_pattern_matched",
        }
    }
}

impl fmt::Display for Miss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRoutesForMethod => f.write_str("no routes registered for method"),
            Self::NoPatternMatched => f.write_str("no route pattern matched the path"),
        }
    }
}
