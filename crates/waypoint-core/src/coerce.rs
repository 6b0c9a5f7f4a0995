//! Lenient coercion of raw parameter text into primitive values.
//!
//! Coercion never fails: text that does not parse yields the type's zero
//! value. Integers and floats are read from the longest numeric prefix after
//! leading whitespace, so `"12abc"` is `12` and `"abc"` is `0`.

use std::fmt;

/// A primitive parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Signed 64-bit integer.
    Int,
    /// Boolean.
    Bool,
    /// Text, bound unchanged.
    Str,
    /// 64-bit float.
    Float,
}

impl Primitive {
    /// Resolves a declared type name (`int`, `integer`, `bool`, `boolean`,
    /// `string`, `str`, `float`, `double`), case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(Self::Int),
            "bool" | "boolean" => Some(Self::Bool),
            "string" | "str" => Some(Self::Str),
            "float" | "double" => Some(Self::Float),
            _ => None,
        }
    }

    /// Returns the canonical type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Str => "string",
            Self::Float => "float",
        }
    }

    /// Coerces raw text into a value of this type.
    #[must_use]
    pub fn coerce(self, raw: &str) -> Value {
        match self {
            Self::Int => Value::Int(to_int(raw)),
            Self::Bool => Value::Bool(to_bool(raw)),
            Self::Str => Value::Str(raw.to_string()),
            Self::Float => Value::Float(to_float(raw)),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coerced primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Text value.
    Str(String),
    /// Float value.
    Float(f64),
}

impl Value {
    /// Returns the primitive type of this value.
    #[must_use]
    pub const fn primitive(&self) -> Primitive {
        match self {
            Self::Int(_) => Primitive::Int,
            Self::Bool(_) => Primitive::Bool,
            Self::Str(_) => Primitive::Str,
            Self::Float(_) => Primitive::Float,
        }
    }

    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the float, if this is a float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }
}

/// Reads a signed integer prefix; out-of-range values saturate.
#[must_use]
pub fn to_int(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    value
}

/// Empty text and `"0"` are false; anything else is true.
#[must_use]
pub fn to_bool(raw: &str) -> bool {
    !(raw.is_empty() || raw == "0")
}

/// Reads a float prefix (sign, digits, fraction, exponent).
#[must_use]
pub fn to_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let end = float_prefix_len(s.as_bytes());
    s[..end].parse().unwrap_or(0.0)
}

fn float_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut i = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let int_digits = digits_from(i);
    i += int_digits;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = digits_from(i + 1);
        if int_digits + frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-' | b'+')) {
            j += 1;
        }
        let exp_digits = digits_from(j);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_primitive_names() {
        assert_eq!(Primitive::from_name("int"), Some(Primitive::Int));
        assert_eq!(Primitive::from_name("Integer"), Some(Primitive::Int));
        assert_eq!(Primitive::from_name("boolean"), Some(Primitive::Bool));
        assert_eq!(Primitive::from_name("string"), Some(Primitive::Str));
        assert_eq!(Primitive::from_name("double"), Some(Primitive::Float));
        assert_eq!(Primitive::from_name("Request"), None);
        assert_eq!(Primitive::Float.to_string(), "float");
    }

    #[test]
    fn test_to_int() {
        assert_eq!(to_int("42"), 42);
        assert_eq!(to_int("  -7"), -7);
        assert_eq!(to_int("+3"), 3);
        assert_eq!(to_int("12abc"), 12);
        assert_eq!(to_int("3.9"), 3);
        assert_eq!(to_int("abc"), 0);
        assert_eq!(to_int(""), 0);
        assert_eq!(to_int("-"), 0);
        assert_eq!(to_int("99999999999999999999"), i64::MAX);
        assert_eq!(to_int("-99999999999999999999"), i64::MIN);
    }

    #[test]
    fn test_to_bool() {
        assert!(!to_bool(""));
        assert!(!to_bool("0"));
        assert!(to_bool("1"));
        assert!(to_bool("false"));
        assert!(to_bool("00"));
    }

    #[test]
    fn test_to_float() {
        assert!((to_float("3.5") - 3.5).abs() < f64::EPSILON);
        assert!((to_float(" -0.25kg") + 0.25).abs() < f64::EPSILON);
        assert!((to_float("1e3") - 1000.0).abs() < f64::EPSILON);
        assert!((to_float("2e") - 2.0).abs() < f64::EPSILON);
        assert!((to_float(".5") - 0.5).abs() < f64::EPSILON);
        assert!((to_float("7.") - 7.0).abs() < f64::EPSILON);
        assert!(to_float("abc").abs() < f64::EPSILON);
        assert!(to_float(".").abs() < f64::EPSILON);
        assert!(to_float("-").abs() < f64::EPSILON);
    }

    #[test]
    fn test_coerce_values() {
        assert_eq!(Primitive::Int.coerce("5"), Value::Int(5));
        assert_eq!(Primitive::Bool.coerce("0"), Value::Bool(false));
        assert_eq!(Primitive::Str.coerce("foo bar"), Value::Str("foo bar".into()));
        assert_eq!(Primitive::Float.coerce("x"), Value::Float(0.0));

        let v = Primitive::Int.coerce("9");
        assert_eq!(v.primitive(), Primitive::Int);
        assert_eq!(v.as_int(), Some(9));
        assert_eq!(v.as_bool(), None);
    }

    proptest! {
        #[test]
        fn prop_int_roundtrips_decimal_text(n in any::<i64>()) {
            prop_assert_eq!(to_int(&n.to_string()), n);
        }

        #[test]
        fn prop_coercion_never_panics(s in "\\PC*") {
            let _ = to_int(&s);
            let _ = to_float(&s);
            let _ = to_bool(&s);
        }
    }
}
