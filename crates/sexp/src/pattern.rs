//! Patterns that lint rules match nodes against.

use crate::Value;

/// A pattern passed to [`SexpNode::matches`](crate::SexpNode::matches).
///
/// A list pattern is compared element by element against a compound node,
/// with the node's tag at index 0. A list may be shorter than the node it
/// matches, in which case the trailing children are ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Literal(Value),
    List(Vec<Pattern>),
}

impl Pattern {
    /// A symbol literal, the usual first element of a list pattern.
    pub fn symbol(name: impl Into<String>) -> Self {
        Pattern::Literal(Value::symbol(name))
    }

    pub fn list(items: impl IntoIterator<Item = impl Into<Pattern>>) -> Self {
        Pattern::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns the literal if this is not a list pattern.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Pattern::Literal(value) => Some(value),
            Pattern::List(_) => None,
        }
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        Pattern::Literal(value)
    }
}

impl From<bool> for Pattern {
    fn from(value: bool) -> Self {
        Pattern::Literal(value.into())
    }
}

impl From<i32> for Pattern {
    fn from(value: i32) -> Self {
        Pattern::Literal(value.into())
    }
}

impl From<i64> for Pattern {
    fn from(value: i64) -> Self {
        Pattern::Literal(value.into())
    }
}

impl From<f64> for Pattern {
    fn from(value: f64) -> Self {
        Pattern::Literal(value.into())
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Pattern::Literal(value.into())
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Pattern::Literal(value.into())
    }
}

impl From<Vec<Pattern>> for Pattern {
    fn from(items: Vec<Pattern>) -> Self {
        Pattern::List(items)
    }
}
