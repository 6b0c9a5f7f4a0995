//! Route pattern compilation.
//!
//! A route pattern is a `/`-separated list of literal segments and
//! placeholders. `{name}` is a required placeholder and `{name?}` an optional
//! one. Each placeholder is replaced by a matching fragment taken from the
//! pattern's [`TypeHints`] (resolved through the [`TypeCatalog`]) or the
//! default fragment, and the whole expression is anchored at both ends.
//!
//! ```text
//! /posts/{id}/{page?}   with  id -> number
//!          │
//!          ▼
//! ^/posts/(?:[0-9]+)/(?:[a-zA-Z0-9+]+)?$
//! ```
//!
//! Once a placeholder is marked optional, every placeholder after it in the
//! same pattern is optional too.

use regex::Regex;

use crate::error::PatternError;
use crate::params::Params;

/// Fragment used for placeholders without an annotation.
pub const DEFAULT_FRAGMENT: &str = "[a-zA-Z0-9+]+";

const CATALOG: &[(&str, &str)] = &[
    ("number", "[0-9]+"),
    ("digit", "[0-9]"),
    ("integer", "-?[0-9]+"),
    ("char", "[A-Za-z0-9_]"),
    ("string", "[A-Za-z0-9_]+"),
    ("alfa", "[a-zA-Z]+"),
    ("text", "[A-Za-z0-9_]+\\+?"),
    ("alfanum", "[a-zA-Z0-9]+"),
    ("url_title", "[A-Za-z0-9_\\-]+"),
    ("date", "[0-9]{4}-[0-9]{2}-[0-9]{2}"),
    (
        "uuid",
        "[a-z0-9]{8}-[a-z0-9]{4}-[a-z0-9]{4}-[a-z0-9]{4}-[a-z0-9\\-]{12}",
    ),
];

/// The fixed table of named placeholder types.
///
/// # Example
///
/// ```rust
/// use waypoint_router::TypeCatalog;
///
/// assert_eq!(TypeCatalog::lookup("number"), Some("[0-9]+"));
/// assert_eq!(TypeCatalog::resolve("number"), "[0-9]+");
/// // Unknown names are used verbatim as a regex fragment.
/// assert_eq!(TypeCatalog::resolve("[a-f]{2}"), "[a-f]{2}");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeCatalog;

impl TypeCatalog {
    /// Returns the fragment registered for a type name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<&'static str> {
        CATALOG
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, fragment)| *fragment)
    }

    /// Resolves an annotation: a catalog name, or else a literal fragment.
    #[must_use]
    pub fn resolve(annotation: &str) -> &str {
        Self::lookup(annotation).unwrap_or(annotation)
    }

    /// Iterates the catalog's type names.
    pub fn names() -> impl Iterator<Item = &'static str> {
        CATALOG.iter().map(|(n, _)| *n)
    }
}

/// Per-pattern annotations: placeholder name → type name or regex fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeHints {
    inner: Vec<(String, String)>,
}

/// Shared empty annotation set.
pub(crate) static NO_HINTS: TypeHints = TypeHints { inner: Vec::new() };

impl TypeHints {
    /// Creates an empty annotation set.
    #[must_use]
    pub const fn new() -> Self {
        Self { inner: Vec::new() }
    }

    /// Adds (or replaces) the annotation for a placeholder.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.insert(name, type_name);
        self
    }

    /// Sets the annotation for a placeholder, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        let name = name.into();
        let type_name = type_name.into();
        match self.inner.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = type_name,
            None => self.inner.push((name, type_name)),
        }
    }

    /// Returns the annotation for a placeholder.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.as_str())
    }

    /// Returns true if no annotations are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TypeHints {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut hints = Self::new();
        for (k, v) in iter {
            hints.insert(k, v);
        }
        hints
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for TypeHints {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A placeholder found in a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    name: String,
    optional: bool,
    segment: usize,
    fragment: String,
}

impl Placeholder {
    /// The placeholder's name, without braces or `?`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the placeholder may be missing from the path.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Index of the `/`-segment the placeholder occupies.
    #[must_use]
    pub fn segment(&self) -> usize {
        self.segment
    }

    /// The matching fragment substituted for the placeholder.
    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

/// A route pattern compiled into an anchored regular expression.
///
/// # Example
///
/// ```rust
/// use waypoint_router::{CompiledPattern, TypeHints};
///
/// let hints = TypeHints::new().with("id", "number");
/// let pattern = CompiledPattern::compile("/posts/{id}/{page?}", &hints).unwrap();
///
/// assert!(pattern.is_match("/posts/42/3"));
/// assert!(pattern.is_match("/posts/42"));
/// assert!(!pattern.is_match("/posts/abc"));
///
/// let params = pattern.extract("/posts/42");
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("page"), None);
/// ```
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    placeholders: Vec<Placeholder>,
}

impl CompiledPattern {
    /// Compiles a route pattern with its annotations.
    pub fn compile(pattern: &str, hints: &TypeHints) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash {
                pattern: pattern.to_string(),
            });
        }
        check_braces(pattern)?;

        let mut placeholders: Vec<Placeholder> = Vec::new();
        let mut parts = Vec::new();
        let mut optional_from_here = false;

        for (index, segment) in pattern.split('/').enumerate() {
            let Some(raw) = placeholder_body(pattern, segment)? else {
                parts.push(regex::escape(segment));
                continue;
            };

            let (name, optional) = match raw.strip_suffix('?') {
                Some(name) => (name, true),
                None => (raw, false),
            };
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(PatternError::InvalidName {
                    pattern: pattern.to_string(),
                    name: raw.to_string(),
                });
            }
            if placeholders.iter().any(|p| p.name == name) {
                return Err(PatternError::DuplicatePlaceholder {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }

            optional_from_here |= optional;
            let fragment = hints
                .get(name)
                .map_or(DEFAULT_FRAGMENT, TypeCatalog::resolve)
                .to_string();
            parts.push(if optional_from_here {
                format!("(?:{fragment})?")
            } else {
                format!("(?:{fragment})")
            });

            placeholders.push(Placeholder {
                name: name.to_string(),
                optional: optional_from_here,
                segment: index,
                fragment,
            });
        }

        let expression = format!("^{}$", parts.join("/"));
        let regex = Regex::new(&expression).map_err(|source| PatternError::InvalidExpression {
            pattern: pattern.to_string(),
            source,
        })?;

        tracing::debug!(pattern, expression = %expression, "compiled route pattern");

        Ok(Self {
            source: pattern.to_string(),
            regex,
            placeholders,
        })
    }

    /// Returns the original pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the anchored expression the pattern compiled to.
    #[must_use]
    pub fn expression(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns the pattern's placeholders in order.
    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Tests a request path.
    ///
    /// The path is accepted as given, with one `/` appended, or with one
    /// trailing `/` removed. Appending is what lets `/posts/{page?}` accept
    /// `/posts`.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        if self.regex.is_match(path) {
            return true;
        }
        let mut slashed = String::with_capacity(path.len() + 1);
        slashed.push_str(path);
        slashed.push('/');
        if self.regex.is_match(&slashed) {
            return true;
        }
        match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() && !trimmed.ends_with('/') => {
                self.regex.is_match(trimmed)
            }
            _ => false,
        }
    }

    /// Pairs each placeholder with the path segment at the same position.
    ///
    /// `+` in a captured segment decodes to a space. A placeholder whose
    /// segment is missing or empty is left out.
    #[must_use]
    pub fn extract(&self, path: &str) -> Params {
        let segments: Vec<&str> = path.split('/').collect();
        self.placeholders
            .iter()
            .filter_map(|p| {
                segments
                    .get(p.segment)
                    .filter(|value| !value.is_empty())
                    .map(|value| (p.name.clone(), value.replace('+', " ")))
            })
            .collect()
    }
}

fn check_braces(pattern: &str) -> Result<(), PatternError> {
    let mut open: Option<usize> = None;
    for (position, c) in pattern.char_indices() {
        let unbalanced = match c {
            '{' if open.is_some() => true,
            '{' => {
                open = Some(position);
                false
            }
            '}' if open.is_none() => true,
            '}' => {
                open = None;
                false
            }
            _ => false,
        };
        if unbalanced {
            return Err(PatternError::UnbalancedBraces {
                pattern: pattern.to_string(),
                position,
            });
        }
    }
    match open {
        Some(position) => Err(PatternError::UnbalancedBraces {
            pattern: pattern.to_string(),
            position,
        }),
        None => Ok(()),
    }
}

// Braces are balanced by the time this runs.
fn placeholder_body<'a>(pattern: &str, segment: &'a str) -> Result<Option<&'a str>, PatternError> {
    if !segment.contains('{') {
        return Ok(None);
    }
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(body) if !body.contains('{') => Ok(Some(body)),
        _ => Err(PatternError::EmbeddedPlaceholder {
            pattern: pattern.to_string(),
            segment: segment.to_string(),
        }),
    }
}
