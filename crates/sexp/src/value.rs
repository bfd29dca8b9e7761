//! Literal values carried by atoms.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::capability::CapabilityError;

/// Kind of a literal value.
///
/// Integers and floats share the `Number` kind and compare numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Number,
    String,
    Symbol,
}

impl ValueKind {
    /// Returns the lowercase name used in error messages and by the `kind` capability.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Symbol => "symbol",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A childless literal produced by the template parser.
///
/// There is deliberately no list variant: anything with children is a
/// [`Sexp`](crate::Sexp).
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Symbol(String),
}

const COMMON_CAPABILITIES: &[&str] = &["kind", "is_nil", "to_string", "inspect"];
const STRING_CAPABILITIES: &[&str] = &[
    "len",
    "is_empty",
    "to_uppercase",
    "to_lowercase",
    "trim",
    "starts_with",
    "ends_with",
    "contains",
    "to_symbol",
];
const SYMBOL_CAPABILITIES: &[&str] = &["len", "is_empty", "name", "starts_with", "ends_with"];
const NUMBER_CAPABILITIES: &[&str] = &[
    "abs",
    "is_zero",
    "is_positive",
    "is_negative",
    "to_float",
    "to_integer",
];
const BOOL_CAPABILITIES: &[&str] = &["not"];

impl Value {
    /// Creates a symbol value.
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// Creates a string value.
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) | Value::Float(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Symbol(_) => ValueKind::Symbol,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns the inner boolean if this is a Bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the inner integer if this is an Integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the numeric value of an Integer or Float.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the inner text if this is a String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the symbol name if this is a Symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Capabilities this value answers through [`Value::invoke`].
    pub fn capabilities(&self) -> impl Iterator<Item = &'static str> {
        let specific: &'static [&'static str] = match self {
            Value::Nil => &[],
            Value::Bool(_) => BOOL_CAPABILITIES,
            Value::Integer(_) | Value::Float(_) => NUMBER_CAPABILITIES,
            Value::String(_) => STRING_CAPABILITIES,
            Value::Symbol(_) => SYMBOL_CAPABILITIES,
        };
        COMMON_CAPABILITIES.iter().chain(specific).copied()
    }

    pub fn supports(&self, capability: &str) -> bool {
        self.capabilities().any(|c| c == capability)
    }

    /// Invokes a named capability on this value.
    ///
    /// Unknown capabilities fail with [`CapabilityError::NotFound`].
    pub fn invoke(&self, capability: &str, args: &[Value]) -> Result<Value, CapabilityError> {
        if !self.supports(capability) {
            return Err(CapabilityError::not_found(capability, self.kind().name()));
        }

        // Only the substring tests take an argument.
        let expected = match capability {
            "starts_with" | "ends_with" | "contains" => 1,
            _ => 0,
        };
        if args.len() != expected {
            return Err(CapabilityError::Arity {
                capability: capability.to_string(),
                expected,
                got: args.len(),
            });
        }

        let result = match (capability, self) {
            ("kind", _) => Value::string(self.kind().name()),
            ("is_nil", _) => Value::Bool(self.is_nil()),
            ("to_string", _) => Value::String(self.to_string()),
            ("inspect", _) => Value::String(format!("{self:?}")),

            ("len", Value::String(s) | Value::Symbol(s)) => {
                Value::Integer(s.chars().count() as i64)
            }
            ("is_empty", Value::String(s) | Value::Symbol(s)) => Value::Bool(s.is_empty()),
            ("to_uppercase", Value::String(s)) => Value::String(s.to_uppercase()),
            ("to_lowercase", Value::String(s)) => Value::String(s.to_lowercase()),
            ("trim", Value::String(s)) => Value::string(s.trim()),
            ("to_symbol", Value::String(s)) => Value::symbol(s.as_str()),
            ("name", Value::Symbol(s)) => Value::string(s.as_str()),
            ("starts_with", Value::String(s) | Value::Symbol(s)) => {
                Value::Bool(s.starts_with(text_arg(capability, args)?))
            }
            ("ends_with", Value::String(s) | Value::Symbol(s)) => {
                Value::Bool(s.ends_with(text_arg(capability, args)?))
            }
            ("contains", Value::String(s)) => Value::Bool(s.contains(text_arg(capability, args)?)),

            ("abs", Value::Integer(n)) => Value::Integer(
                n.checked_abs()
                    .ok_or_else(|| CapabilityError::overflow(capability, self))?,
            ),
            ("abs", Value::Float(n)) => Value::Float(n.abs()),
            ("is_zero", _) => Value::Bool(self.as_number() == Some(0.0)),
            ("is_positive", _) => Value::Bool(self.as_number().is_some_and(|n| n > 0.0)),
            ("is_negative", _) => Value::Bool(self.as_number().is_some_and(|n| n < 0.0)),
            ("to_float", _) => Value::Float(self.as_number().unwrap_or_default()),
            ("to_integer", Value::Float(n)) => {
                let n = n.trunc();
                if !is_integral_in_i64(n) {
                    return Err(CapabilityError::overflow(capability, self));
                }
                Value::Integer(n as i64)
            }
            ("to_integer", Value::Integer(n)) => Value::Integer(*n),

            ("not", Value::Bool(b)) => Value::Bool(!b),

            _ => return Err(CapabilityError::not_found(capability, self.kind().name())),
        };
        Ok(result)
    }
}

fn text_arg<'a>(capability: &str, args: &'a [Value]) -> Result<&'a str, CapabilityError> {
    match args.first() {
        Some(Value::String(s) | Value::Symbol(s)) => Ok(s),
        _ => Err(CapabilityError::ArgumentType {
            capability: capability.to_string(),
            position: 0,
            expected: "string or symbol",
        }),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            // NaN equals itself so every value stays reflexive.
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i)) => {
                integer_equals_float(*i, *f)
            }
            _ => false,
        }
    }
}

// 2^63, exactly representable. i64 covers [-2^63, 2^63).
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn is_integral_in_i64(f: f64) -> bool {
    f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f)
}

/// Exact comparison: the float must hold precisely the integer's value.
fn integer_equals_float(i: i64, f: f64) -> bool {
    is_integral_in_i64(f) && f as i64 == i
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        *self == Value::Integer(*other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        *self == Value::Float(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

/// Natural text form: string contents, symbol name, number digits.
/// Nil renders as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) | Value::Symbol(s) => f.write_str(s),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(s) => write!(f, ":{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

// Serialization/deserialization support. Symbols are written as
// `{"sym": name}` since JSON has no symbol type.
const SYMBOL_KEY: &str = "sym";
const SYMBOL_FIELDS: &[&str] = &[SYMBOL_KEY];

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(n) if !n.is_finite() => Err(ser::Error::custom(format!(
                "non-finite float {n:?} has no JSON form"
            ))),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Symbol(s) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(SYMBOL_KEY, s)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a literal value or {\"sym\": name}")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| E::custom(format!("integer {v} out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::string(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let key: String = map
            .next_key()?
            .ok_or_else(|| de::Error::custom("empty object is not a literal"))?;
        if key != SYMBOL_KEY {
            return Err(de::Error::unknown_field(&key, SYMBOL_FIELDS));
        }
        let name: String = map.next_value()?;
        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom("symbol object must have exactly one key"));
        }
        Ok(Value::Symbol(name))
    }

    fn visit_seq<A>(self, _seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        Err(de::Error::custom("lists are compound nodes, not literals"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_compare_across_representations() {
        assert_eq!(Value::Integer(42), Value::Float(42.0));
        assert_ne!(Value::Integer(42), Value::Float(42.5));
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn test_integer_float_equality_is_exact() {
        // 2^53 + 1 rounds to 2^53 when cast to f64.
        let big = Value::Integer(9_007_199_254_740_993);
        let rounded = Value::Float(9_007_199_254_740_992.0);
        assert_ne!(big, rounded);
        assert_ne!(rounded, big);
        assert_eq!(Value::Integer(9_007_199_254_740_992), rounded);

        assert_ne!(Value::Integer(i64::MAX), Value::Float(9_223_372_036_854_775_808.0));
        assert_eq!(Value::Integer(i64::MIN), Value::Float(-9_223_372_036_854_775_808.0));
        assert_ne!(Value::Integer(0), Value::Float(f64::NAN));
    }

    #[test]
    fn test_distinct_kinds_never_equal() {
        assert_ne!(Value::Integer(42), Value::string("42"));
        assert_ne!(Value::symbol("div"), Value::string("div"));
        assert_ne!(Value::Bool(false), Value::Nil);
        assert_ne!(Value::Integer(0), Value::Bool(false));
    }

    #[test]
    fn test_display_and_debug() {
        assert_eq!(Value::string("abc").to_string(), "abc");
        assert_eq!(Value::symbol("tag").to_string(), "tag");
        assert_eq!(Value::Nil.to_string(), "");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Integer(1).to_string(), "1");
        assert_eq!(format!("{:?}", Value::string("abc")), "\"abc\"");
        assert_eq!(format!("{:?}", Value::symbol("tag")), ":tag");
        assert_eq!(format!("{:?}", Value::Float(1.0)), "1.0");
        assert_eq!(format!("{:?}", Value::Nil), "nil");
    }

    #[test]
    fn test_invoke_string_capabilities() {
        let v = Value::string("  Hello ");
        assert_eq!(v.invoke("trim", &[]).unwrap(), "Hello");
        assert_eq!(v.invoke("len", &[]).unwrap(), 8i64);
        assert_eq!(
            Value::string("hello").invoke("starts_with", &["he".into()]).unwrap(),
            true
        );
        assert_eq!(
            Value::string("div").invoke("to_symbol", &[]).unwrap(),
            Value::symbol("div")
        );
    }

    #[test]
    fn test_invoke_number_capabilities() {
        assert_eq!(Value::Integer(-3).invoke("abs", &[]).unwrap(), 3i64);
        assert_eq!(Value::Float(2.9).invoke("to_integer", &[]).unwrap(), 2i64);
        assert_eq!(Value::Integer(0).invoke("is_zero", &[]).unwrap(), true);
    }

    #[test]
    fn test_invoke_number_overflow() {
        assert!(matches!(
            Value::Integer(i64::MIN).invoke("abs", &[]),
            Err(CapabilityError::Overflow { .. })
        ));
        for n in [f64::NAN, f64::INFINITY, 1e300] {
            assert!(matches!(
                Value::Float(n).invoke("to_integer", &[]),
                Err(CapabilityError::Overflow { .. })
            ));
        }
    }

    #[test]
    fn test_invoke_unknown_capability() {
        let err = Value::Integer(1).invoke("to_uppercase", &[]).unwrap_err();
        assert_eq!(
            err,
            CapabilityError::NotFound {
                capability: "to_uppercase".to_string(),
                kind: "number",
            }
        );
    }

    #[test]
    fn test_invoke_argument_errors() {
        let v = Value::string("abc");
        assert!(matches!(
            v.invoke("contains", &[]),
            Err(CapabilityError::Arity { expected: 1, got: 0, .. })
        ));
        assert!(matches!(
            v.invoke("contains", &[Value::Integer(1)]),
            Err(CapabilityError::ArgumentType { position: 0, .. })
        ));
    }

    #[test]
    fn test_json_symbol_encoding() {
        let v: Value = serde_json::from_str(r#"{"sym": "div"}"#).unwrap();
        assert_eq!(v, Value::symbol("div"));
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"sym":"div"}"#);

        let v: Value = serde_json::from_str("null").unwrap();
        assert!(v.is_nil());
        assert!(serde_json::from_str::<Value>("[1, 2]").is_err());
    }

    #[test]
    fn test_json_rejects_non_finite_floats() {
        assert!(serde_json::to_string(&Value::Float(f64::NAN)).is_err());
        assert!(serde_json::to_string(&Value::Float(f64::NEG_INFINITY)).is_err());
        assert_eq!(serde_json::to_string(&Value::Float(1.5)).unwrap(), "1.5");
    }
}
