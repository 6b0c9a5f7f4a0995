//! Handler signatures and bound arguments.
//!
//! A handler declares its parameters once, at registration, as a
//! [`Signature`]. At dispatch each [`ParamSpec`] turns the raw value found for
//! its name into an [`Argument`], and the results form the positional
//! [`Arguments`] the handler receives.
//!
//! # Example
//!
//! ```
//! use waypoint_core::{Argument, Signature};
//!
//! #[derive(Default)]
//! struct Mailer;
//!
//! let signature = Signature::new()
//!     .int("id")
//!     .untyped("slug")
//!     .object::<Mailer>("mailer");
//!
//! let id = signature.params()[0].bind(Some("42"));
//! assert_eq!(id.as_int(), Some(42));
//!
//! let slug = signature.params()[1].bind(None);
//! assert!(matches!(slug, Argument::Absent));
//! ```

use std::any::{self, Any};
use std::collections::HashSet;
use std::fmt;

use crate::coerce::{Primitive, Value};
use crate::error::{WaypointError, WaypointResult};

/// A collaborator type instantiated fresh for every invocation.
#[derive(Clone, Copy)]
pub struct ObjectType {
    name: &'static str,
    make: fn() -> Box<dyn Any + Send>,
}

fn make_default<T: Default + Send + 'static>() -> Box<dyn Any + Send> {
    Box::new(T::default())
}

impl ObjectType {
    /// Describes `T`, constructed through its `Default` implementation.
    #[must_use]
    pub fn of<T: Default + Send + 'static>() -> Self {
        Self {
            name: any::type_name::<T>(),
            make: make_default::<T>,
        }
    }

    /// Returns the Rust type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.name
    }

    /// Builds a new instance.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn Any + Send> {
        (self.make)()
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectType").field(&self.name).finish()
    }
}

/// How a declared parameter is bound.
#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
    /// No declared type: the raw text is bound as found.
    Untyped,
    /// A primitive type: the raw text is coerced.
    Primitive(Primitive),
    /// A collaborator type: a fresh instance is bound, ignoring request data.
    Object(ObjectType),
}

/// One declared handler parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    kind: ParamKind,
}

impl ParamSpec {
    /// Creates a parameter of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Creates an untyped parameter.
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Untyped)
    }

    /// Creates a primitive-typed parameter.
    #[must_use]
    pub fn primitive(name: impl Into<String>, primitive: Primitive) -> Self {
        Self::new(name, ParamKind::Primitive(primitive))
    }

    /// Creates an object-typed parameter.
    #[must_use]
    pub fn object<T: Default + Send + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Object(ObjectType::of::<T>()))
    }

    /// Creates a parameter from a declared type name.
    ///
    /// Primitive names resolve through [`Primitive::from_name`]; `None` and
    /// unknown names yield an untyped parameter.
    #[must_use]
    pub fn declared(name: impl Into<String>, type_name: Option<&str>) -> Self {
        match type_name.and_then(Primitive::from_name) {
            Some(primitive) => Self::primitive(name, primitive),
            None => Self::untyped(name),
        }
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter kind.
    #[must_use]
    pub const fn kind(&self) -> &ParamKind {
        &self.kind
    }

    /// Returns true if the parameter reads request data.
    #[must_use]
    pub const fn reads_request(&self) -> bool {
        !matches!(self.kind, ParamKind::Object(_))
    }

    /// Binds the raw value found for this parameter.
    ///
    /// A missing value leaves an untyped parameter [`Argument::Absent`] and
    /// gives a primitive parameter its zero value.
    #[must_use]
    pub fn bind(&self, raw: Option<&str>) -> Argument {
        match (&self.kind, raw) {
            (ParamKind::Object(object), _) => Argument::Instance(object.instantiate()),
            (ParamKind::Untyped, None) => Argument::Absent,
            (ParamKind::Untyped, Some(raw)) => Argument::Raw(raw.to_string()),
            (ParamKind::Primitive(primitive), raw) => {
                Argument::Value(primitive.coerce(raw.unwrap_or_default()))
            }
        }
    }
}

/// The ordered parameter list of a handler.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<ParamSpec>,
}

impl Signature {
    /// Creates an empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Appends an untyped parameter.
    #[must_use]
    pub fn untyped(self, name: impl Into<String>) -> Self {
        self.param(ParamSpec::untyped(name))
    }

    /// Appends an `int` parameter.
    #[must_use]
    pub fn int(self, name: impl Into<String>) -> Self {
        self.param(ParamSpec::primitive(name, Primitive::Int))
    }

    /// Appends a `bool` parameter.
    #[must_use]
    pub fn bool(self, name: impl Into<String>) -> Self {
        self.param(ParamSpec::primitive(name, Primitive::Bool))
    }

    /// Appends a `string` parameter.
    #[must_use]
    pub fn string(self, name: impl Into<String>) -> Self {
        self.param(ParamSpec::primitive(name, Primitive::Str))
    }

    /// Appends a `float` parameter.
    #[must_use]
    pub fn float(self, name: impl Into<String>) -> Self {
        self.param(ParamSpec::primitive(name, Primitive::Float))
    }

    /// Appends an object-typed parameter.
    #[must_use]
    pub fn object<T: Default + Send + 'static>(self, name: impl Into<String>) -> Self {
        self.param(ParamSpec::object::<T>(name))
    }

    /// The declared parameters in order.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if the handler takes no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Checks that every parameter name is non-empty and unique.
    pub fn validate(&self) -> WaypointResult<()> {
        let mut seen = HashSet::with_capacity(self.params.len());
        for spec in &self.params {
            if spec.name.is_empty() {
                return Err(WaypointError::configuration(
                    "handler parameter names must not be empty",
                ));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(WaypointError::configuration(format!(
                    "handler parameter `{}` is declared more than once",
                    spec.name
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<ParamSpec> for Signature {
    fn from_iter<I: IntoIterator<Item = ParamSpec>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

/// One bound argument.
pub enum Argument {
    /// No value was found for an untyped parameter.
    Absent,
    /// Raw text for an untyped parameter.
    Raw(String),
    /// A coerced primitive.
    Value(Value),
    /// A fresh collaborator instance.
    Instance(Box<dyn Any + Send>),
}

impl Argument {
    /// Returns true if no value was bound.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the text of a raw or `string` argument.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Raw(s) | Self::Value(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the coerced integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Value(v) => v.as_int(),
            _ => None,
        }
    }

    /// Returns the coerced boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Value(v) => v.as_bool(),
            _ => None,
        }
    }

    /// Returns the coerced float.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Value(v) => v.as_float(),
            _ => None,
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Raw(s) => f.debug_tuple("Raw").field(s).finish(),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

/// Positional arguments bound for one invocation.
///
/// Arguments keep the order of the handler's [`Signature`]; the named
/// accessors look an argument up by its parameter name.
#[derive(Debug, Default)]
pub struct Arguments {
    entries: Vec<(String, Argument)>,
}

impl Arguments {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an argument.
    pub fn push(&mut self, name: impl Into<String>, argument: Argument) {
        self.entries.push((name.into(), argument));
    }

    /// Returns the argument at a position.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Argument> {
        self.entries.get(index).map(|(_, arg)| arg)
    }

    /// Returns the argument bound to a parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, arg)| arg)
    }

    /// Raw or `string` text bound to `name`.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Argument::as_str)
    }

    /// Integer bound to `name`.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Argument::as_int)
    }

    /// Boolean bound to `name`.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Argument::as_bool)
    }

    /// Float bound to `name`.
    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Argument::as_float)
    }

    /// Returns true if `name` is unbound or bound to [`Argument::Absent`].
    #[must_use]
    pub fn is_absent(&self, name: &str) -> bool {
        self.get(name).map_or(true, Argument::is_absent)
    }

    /// Moves the collaborator instance bound to `name` out of the list.
    ///
    /// Returns `None` if there is no instance under that name, or it is not a
    /// `T`; in the latter case the instance stays in place.
    pub fn take<T: 'static>(&mut self, name: &str) -> Option<T> {
        let slot = self
            .entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, arg)| arg)?;

        match std::mem::replace(slot, Argument::Absent) {
            Argument::Instance(boxed) => match boxed.downcast::<T>() {
                Ok(value) => Some(*value),
                Err(boxed) => {
                    *slot = Argument::Instance(boxed);
                    None
                }
            },
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, argument)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Argument)> {
        self.entries.iter().map(|(n, a)| (n.as_str(), a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Clock {
        ticks: u32,
    }

    #[test]
    fn test_bind_by_kind() {
        assert_eq!(ParamSpec::untyped("a").bind(Some("x y")).as_str(), Some("x y"));
        assert!(ParamSpec::untyped("a").bind(None).is_absent());
        assert_eq!(ParamSpec::primitive("n", Primitive::Int).bind(Some("abc")).as_int(), Some(0));
        assert_eq!(ParamSpec::primitive("n", Primitive::Int).bind(None).as_int(), Some(0));
        assert_eq!(ParamSpec::primitive("s", Primitive::Str).bind(None).as_str(), Some(""));
        assert_eq!(ParamSpec::primitive("b", Primitive::Bool).bind(Some("0")).as_bool(), Some(false));
        assert_eq!(ParamSpec::primitive("s", Primitive::Str).bind(Some("hi")).as_str(), Some("hi"));
        assert!(matches!(
            ParamSpec::object::<Clock>("clock").bind(None),
            Argument::Instance(_)
        ));
    }

    #[test]
    fn test_declared_type_names() {
        assert!(matches!(
            ParamSpec::declared("n", Some("int")).kind(),
            ParamKind::Primitive(Primitive::Int)
        ));
        assert!(matches!(ParamSpec::declared("n", None).kind(), ParamKind::Untyped));
        assert!(matches!(ParamSpec::declared("n", Some("mixed")).kind(), ParamKind::Untyped));
        assert!(!ParamSpec::object::<Clock>("c").reads_request());
    }

    #[test]
    fn test_object_type() {
        let object = ObjectType::of::<Clock>();
        assert!(object.type_name().ends_with("Clock"));
        let instance = object.instantiate();
        assert_eq!(instance.downcast_ref::<Clock>(), Some(&Clock::default()));
    }

    #[test]
    fn test_signature_validate() {
        assert!(Signature::new().int("id").string("name").validate().is_ok());

        let err = Signature::new().int("id").untyped("id").validate().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("`id`"));

        assert!(Signature::new().untyped("").validate().is_err());
    }

    #[test]
    fn test_signature_from_iter() {
        let signature: Signature = ["a", "b"].into_iter().map(ParamSpec::untyped).collect();
        assert_eq!(signature.len(), 2);
        assert_eq!(signature.params()[1].name(), "b");
        assert!(Signature::new().is_empty());
    }

    #[test]
    fn test_arguments_accessors() {
        let mut args = Arguments::new();
        args.push("id", Argument::Value(Value::Int(7)));
        args.push("slug", Argument::Raw("hello world".into()));
        args.push("page", Argument::Absent);
        args.push("clock", Argument::Instance(Box::new(Clock { ticks: 3 })));

        assert_eq!(args.len(), 4);
        assert_eq!(args.int("id"), Some(7));
        assert_eq!(args.str("slug"), Some("hello world"));
        assert!(args.is_absent("page"));
        assert!(args.is_absent("missing"));
        assert!(args.at(2).is_some_and(Argument::is_absent));

        let names: Vec<_> = args.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["id", "slug", "page", "clock"]);
    }

    #[test]
    fn test_take_instance() {
        let mut args = Arguments::new();
        args.push("clock", Argument::Instance(Box::new(Clock { ticks: 3 })));
        args.push("id", Argument::Value(Value::Int(1)));

        assert_eq!(args.take::<String>("clock"), None);
        assert_eq!(args.take::<Clock>("clock"), Some(Clock { ticks: 3 }));
        assert_eq!(args.take::<Clock>("clock"), None);
        assert_eq!(args.take::<Clock>("id"), None);
        assert_eq!(args.int("id"), Some(1));
    }
}
