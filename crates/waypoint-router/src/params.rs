//! Path parameters extracted from a matched route.
//!
//! Parameters are kept in pattern order as `(name, value)` pairs in a small
//! vector; routes rarely carry more than a handful of placeholders.

use smallvec::SmallVec;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Named values captured from the request path.
///
/// Optional placeholders that had no corresponding path segment are absent,
/// not stored as empty strings.
///
/// # Example
///
/// ```rust
/// use waypoint_router::Params;
///
/// let mut params = Params::new();
/// params.push("slug", "hello world");
/// params.push("page", "2");
///
/// assert_eq!(params.get("slug"), Some("hello world"));
/// assert_eq!(params.get("page"), Some("2"));
/// assert!(!params.contains("missing"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if a parameter with this name was captured.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(n, _)| n == name)
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates the parameters in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = smallvec::IntoIter<[(String, String); INLINE_PARAMS]>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
