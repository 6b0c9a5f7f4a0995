//! Ordered key-value parameter store.
//!
//! [`ParameterStore`] holds the query, form and header data of a request, and
//! the parameter source handed to the [`ArgumentBinder`](crate::ArgumentBinder).
//! Keys keep their insertion order; overwriting a key keeps its position.

use std::net::IpAddr;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use waypoint_core::coerce;
use waypoint_router::Params;

use crate::{ExtractionError, ExtractionSource};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

/// A validation filter for [`ParameterStore::is_valid_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// A decimal integer, optionally signed.
    Int,
    /// A decimal number with optional fraction and exponent.
    Float,
    /// A truthy flag: `1`, `true`, `on` or `yes` (any case).
    Bool,
    /// An email address.
    Email,
    /// An absolute URL.
    Url,
    /// An IPv4 or IPv6 address.
    Ip,
}

impl Filter {
    /// Returns true if `value` passes the filter.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::Int => value.parse::<i64>().is_ok(),
            Self::Float => !value.is_empty() && value.parse::<f64>().is_ok_and(f64::is_finite),
            Self::Bool => ["1", "true", "on", "yes"]
                .iter()
                .any(|t| value.eq_ignore_ascii_case(t)),
            Self::Email => EMAIL.is_match(value),
            Self::Url => url::Url::parse(value).is_ok(),
            Self::Ip => value.parse::<IpAddr>().is_ok(),
        }
    }
}

/// An ordered map of request parameters.
///
/// # Example
///
/// ```rust
/// use waypoint_extract::{Filter, ParameterStore};
///
/// let store = ParameterStore::from_query("id=A-42&email=ana%40example.com&q=rust+lang").unwrap();
/// assert_eq!(store.get("q"), Some("rust lang"));
/// assert_eq!(store.get_integer("id"), 42);
/// assert_eq!(store.get_alfa("id"), "A");
/// assert!(store.is_valid_for("email", Filter::Email));
/// assert_eq!(store.get_string("missing"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterStore {
    entries: IndexMap<String, String>,
}

impl ParameterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URL query string (without the leading `?`).
    ///
    /// Repeated keys keep the last value.
    pub fn from_query(query: &str) -> Result<Self, ExtractionError> {
        serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .map(|pairs| pairs.into_iter().collect())
            .map_err(|e| ExtractionError::deserialization_failed(ExtractionSource::Query, e.to_string()))
    }

    /// Parses an `application/x-www-form-urlencoded` body.
    pub fn from_form(body: &[u8]) -> Result<Self, ExtractionError> {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
            .map(|pairs| pairs.into_iter().collect())
            .map_err(|e| ExtractionError::deserialization_failed(ExtractionSource::Body, e.to_string()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn all(&self) -> &IndexMap<String, String> {
        &self.entries
    }

    /// Iterates `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, or `default` when missing.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Sets a value, keeping the key's position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Removes `key`, returning its value. Remaining entries keep their order.
    pub fn delete(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Copies every entry of `other` in, overwriting existing keys.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// The value as text; missing keys give `""`.
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.get_or(key, "").to_string()
    }

    /// The digits of the value read as an integer; other characters are
    /// dropped first, and a value without digits gives `0`.
    #[must_use]
    pub fn get_integer(&self, key: &str) -> i64 {
        let digits: String = self
            .get_or(key, "")
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        coerce::to_int(&digits)
    }

    /// The numeric prefix of the value as a float; missing keys give `0.0`.
    #[must_use]
    pub fn get_float(&self, key: &str) -> f64 {
        coerce::to_float(self.get_or(key, ""))
    }

    /// Only the ASCII letters of the value.
    #[must_use]
    pub fn get_alfa(&self, key: &str) -> String {
        self.get_or(key, "")
            .chars()
            .filter(char::is_ascii_alphabetic)
            .collect()
    }

    /// Only the ASCII letters and digits of the value.
    #[must_use]
    pub fn get_alfanum(&self, key: &str) -> String {
        self.get_or(key, "")
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect()
    }

    /// Returns true if the value for `key` exists and passes `filter`.
    #[must_use]
    pub fn is_valid_for(&self, key: &str, filter: Filter) -> bool {
        self.get(key).is_some_and(|value| filter.accepts(value))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for ParameterStore {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl From<&Params> for ParameterStore {
    fn from(params: &Params) -> Self {
        params.iter().collect()
    }
}
