//! HTTP method keys and per-method storage.
//!
//! Routes are registered per method. [`Method`] is the closed set of verbs the
//! router knows about, and [`MethodMap`] holds one slot per verb so a lookup
//! for an unknown or unregistered method is simply an empty slot.

use std::fmt;
use std::str::FromStr;

/// The HTTP methods a route can be registered for.
///
/// # Example
///
/// ```rust
/// use waypoint_router::Method;
///
/// assert_eq!(Method::from_name("get"), Some(Method::Get));
/// assert_eq!(Method::from_name("DELETE"), Some(Method::Delete));
/// assert_eq!(Method::from_name("OPTIONS"), None);
/// assert_eq!(Method::Patch.as_key(), "patch");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Every method, in the order `any` registers them.
    pub const ALL: [Method; 6] = [
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
    ];

    /// Parses a method name case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_key().eq_ignore_ascii_case(name))
    }

    /// Returns the canonical lowercase key (`"get"`, `"post"`, ...).
    #[must_use]
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Head => "head",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// Returns the uppercase wire name (`"GET"`, `"POST"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns true for methods whose handlers read path parameters only.
    #[must_use]
    pub const fn is_safe(self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unsupported method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = UnknownMethod;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        match *method {
            http::Method::GET => Ok(Self::Get),
            http::Method::HEAD => Ok(Self::Head),
            http::Method::POST => Ok(Self::Post),
            http::Method::PUT => Ok(Self::Put),
            http::Method::PATCH => Ok(Self::Patch),
            http::Method::DELETE => Ok(Self::Delete),
            _ => Err(UnknownMethod(method.as_str().to_string())),
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Head => Self::HEAD,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

/// One optional value per [`Method`].
#[derive(Debug, Clone)]
pub struct MethodMap<T> {
    get: Option<T>,
    head: Option<T>,
    post: Option<T>,
    put: Option<T>,
    patch: Option<T>,
    delete: Option<T>,
}

impl<T> Default for MethodMap<T> {
    fn default() -> Self {
        Self {
            get: None,
            head: None,
            post: None,
            put: None,
            patch: None,
            delete: None,
        }
    }
}

impl<T> MethodMap<T> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored for a method.
    #[must_use]
    pub fn get(&self, method: Method) -> Option<&T> {
        self.slot(method).as_ref()
    }

    /// Returns the value stored for a method, inserting one built by `init` if absent.
    pub fn get_or_insert_with(&mut self, method: Method, init: impl FnOnce() -> T) -> &mut T {
        self.slot_mut(method).get_or_insert_with(init)
    }

    /// Returns true if the method has a value.
    #[must_use]
    pub fn contains(&self, method: Method) -> bool {
        self.slot(method).is_some()
    }

    /// Iterates the occupied slots in [`Method::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Method, &T)> {
        Method::ALL
            .into_iter()
            .filter_map(move |m| self.get(m).map(|v| (m, v)))
    }

    /// Converts every occupied slot, short-circuiting on the first error.
    pub fn try_map<U, E>(self, mut f: impl FnMut(Method, T) -> Result<U, E>) -> Result<MethodMap<U>, E> {
        let mut out = MethodMap::new();
        for (method, value) in self.into_entries() {
            *out.slot_mut(method) = Some(f(method, value)?);
        }
        Ok(out)
    }

    fn into_entries(self) -> impl Iterator<Item = (Method, T)> {
        [
            (Method::Get, self.get),
            (Method::Head, self.head),
            (Method::Post, self.post),
            (Method::Put, self.put),
            (Method::Patch, self.patch),
            (Method::Delete, self.delete),
        ]
        .into_iter()
        .filter_map(|(m, v)| v.map(|v| (m, v)))
    }

    fn slot(&self, method: Method) -> &Option<T> {
        match method {
            Method::Get => &self.get,
            Method::Head => &self.head,
            Method::Post => &self.post,
            Method::Put => &self.put,
            Method::Patch => &self.patch,
            Method::Delete => &self.delete,
        }
    }

    fn slot_mut(&mut self, method: Method) -> &mut Option<T> {
        match method {
            Method::Get => &mut self.get,
            Method::Head => &mut self.head,
            Method::Post => &mut self.post,
            Method::Put => &mut self.put,
            Method::Patch => &mut self.patch,
            Method::Delete => &mut self.delete,
        }
    }
}
