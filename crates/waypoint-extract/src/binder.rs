//! Handler argument binding.
//!
//! [`ArgumentBinder`] resolves a handler's [`Signature`] against a parameter
//! source into positional [`Arguments`]:
//!
//! | Parameter | Value |
//! |---|---|
//! | untyped | `source[name]`, or `query[name]` when there is no source |
//! | primitive | `source[name]`, falling back to `query[name]`, then coerced |
//! | object | a fresh instance, request data ignored |
//!
//! An empty source counts as no source. Missing untyped values bind as
//! [`Argument::Absent`](waypoint_core::Argument::Absent); missing primitives
//! bind as their zero value.

use waypoint_core::{Arguments, ParamKind, ParamSpec, Signature};

use crate::ParameterStore;

/// Binds handler parameters from a parameter source and the query string.
///
/// # Example
///
/// ```rust
/// use waypoint_core::Signature;
/// use waypoint_extract::{ArgumentBinder, ParameterStore};
///
/// let path: ParameterStore = [("id", "41")].into_iter().collect();
/// let query: ParameterStore = [("page", "3"), ("id", "9")].into_iter().collect();
///
/// let signature = Signature::new().int("id").int("page").untyped("sort");
/// let args = ArgumentBinder::new(Some(&path), &query).bind(&signature);
///
/// assert_eq!(args.int("id"), Some(41));
/// assert_eq!(args.int("page"), Some(3));
/// assert!(args.is_absent("sort"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ArgumentBinder<'a> {
    source: Option<&'a ParameterStore>,
    query: &'a ParameterStore,
}

impl<'a> ArgumentBinder<'a> {
    /// Creates a binder over a parameter source and the query fields.
    #[must_use]
    pub fn new(source: Option<&'a ParameterStore>, query: &'a ParameterStore) -> Self {
        Self {
            source: source.filter(|store| !store.is_empty()),
            query,
        }
    }

    /// Returns true if a non-empty parameter source is in use.
    #[must_use]
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Finds the raw value for one parameter.
    #[must_use]
    pub fn lookup(&self, spec: &ParamSpec) -> Option<&'a str> {
        let name = spec.name();
        match (spec.kind(), self.source) {
            (ParamKind::Object(_), _) => None,
            (ParamKind::Untyped, Some(source)) => source.get(name),
            (ParamKind::Primitive(_), Some(source)) => {
                source.get(name).or_else(|| self.query.get(name))
            }
            (_, None) => self.query.get(name),
        }
    }

    /// Binds every parameter of `signature`, in declaration order.
    #[must_use]
    pub fn bind(&self, signature: &Signature) -> Arguments {
        let mut args = Arguments::new();
        for spec in signature.params() {
            let raw = self.lookup(spec);
            tracing::trace!(param = spec.name(), found = raw.is_some(), "binding argument");
            args.push(spec.name(), spec.bind(raw));
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::Argument;

    #[derive(Debug, Default, PartialEq)]
    struct Mailer {
        sent: usize,
    }

    fn store(pairs: &[(&str, &str)]) -> ParameterStore {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_untyped_reads_source_only() {
        let source = store(&[("slug", "foo bar")]);
        let query = store(&[("slug", "query"), ("page", "2")]);
        let binder = ArgumentBinder::new(Some(&source), &query);

        let args = binder.bind(&Signature::new().untyped("slug").untyped("page"));
        assert_eq!(args.str("slug"), Some("foo bar"));
        assert!(args.is_absent("page"));
    }

    #[test]
    fn test_untyped_without_source_reads_query() {
        let query = store(&[("page", "2")]);
        let binder = ArgumentBinder::new(None, &query);
        assert!(!binder.has_source());

        let args = binder.bind(&Signature::new().untyped("page").untyped("missing"));
        assert_eq!(args.str("page"), Some("2"));
        assert!(args.is_absent("missing"));
    }

    #[test]
    fn test_empty_source_counts_as_none() {
        let source = ParameterStore::new();
        let query = store(&[("q", "rust")]);
        let binder = ArgumentBinder::new(Some(&source), &query);
        assert!(!binder.has_source());

        let args = binder.bind(&Signature::new().untyped("q"));
        assert_eq!(args.str("q"), Some("rust"));
    }

    #[test]
    fn test_primitive_falls_back_to_query() {
        let source = store(&[("id", "12")]);
        let query = store(&[("limit", "50"), ("id", "99")]);
        let binder = ArgumentBinder::new(Some(&source), &query);

        let args = binder.bind(&Signature::new().int("id").int("limit").bool("draft"));
        assert_eq!(args.int("id"), Some(12));
        assert_eq!(args.int("limit"), Some(50));
        assert_eq!(args.bool("draft"), Some(false));
    }

    #[test]
    fn test_coercion_misses_yield_zero_values() {
        let source = store(&[("n", "abc"), ("x", "nope"), ("s", "text")]);
        let query = ParameterStore::new();
        let args = ArgumentBinder::new(Some(&source), &query)
            .bind(&Signature::new().int("n").float("x").string("s").float("gone"));

        assert_eq!(args.int("n"), Some(0));
        assert_eq!(args.float("x"), Some(0.0));
        assert_eq!(args.str("s"), Some("text"));
        assert_eq!(args.float("gone"), Some(0.0));
    }

    #[test]
    fn test_object_parameters_get_fresh_instances() {
        let source = store(&[("mailer", "ignored")]);
        let query = ParameterStore::new();
        let binder = ArgumentBinder::new(Some(&source), &query);
        let signature = Signature::new().object::<Mailer>("mailer").untyped("mailer_id");

        let mut args = binder.bind(&signature);
        assert_eq!(args.len(), 2);
        assert_eq!(args.take::<Mailer>("mailer"), Some(Mailer::default()));
        assert!(binder.lookup(&signature.params()[0]).is_none());
    }

    #[test]
    fn test_positional_order_follows_signature() {
        let source = store(&[("b", "2"), ("a", "1")]);
        let query = ParameterStore::new();
        let args = ArgumentBinder::new(Some(&source), &query)
            .bind(&Signature::new().untyped("a").untyped("b"));

        assert_eq!(args.at(0).and_then(Argument::as_str), Some("1"));
        assert_eq!(args.at(1).and_then(Argument::as_str), Some("2"));
    }
}
