//! Literal leaves of an S-expression tree.

use std::fmt;

use crate::capability::{NODE_CAPABILITIES, SexpNode, invoke_node_capability};
use crate::{CapabilityError, Node, Pattern, Sexp, Value};

/// An atomic, childless literal within an S-expression.
///
/// Wraps a [`Value`] so it answers the same [`SexpNode`] contract as a
/// [`Sexp`](crate::Sexp). Equality and matching look only at the wrapped
/// value, and the value never changes after construction.
///
/// ```
/// use slim_lint_sexp::{Atom, Pattern, SexpNode, Value};
///
/// let atom = Atom::new("foo");
/// assert!(atom == "foo");
/// assert!(atom.matches(&Pattern::from("foo")));
/// assert_eq!(atom.render(), "foo");
/// assert_eq!(atom.debug_render(), "Atom(\"foo\")");
///
/// // Anything the atom itself does not answer is forwarded to the value.
/// assert_eq!(atom.invoke("len", &[]).unwrap(), Value::Integer(3));
/// ```
#[derive(Clone)]
pub struct Atom {
    value: Value,
}

impl Atom {
    /// Creates an atom from the specified value.
    pub fn new(value: impl Into<Value>) -> Self {
        Atom {
            value: value.into(),
        }
    }

    /// The wrapped value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Unwraps the atom, returning its value.
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl SexpNode for Atom {
    /// A literal pattern matches when it equals the wrapped value. List
    /// patterns never match an atom.
    fn matches(&self, pattern: &Pattern) -> bool {
        pattern.as_literal().is_some_and(|p| self.value == *p)
    }

    fn supports(&self, capability: &str) -> bool {
        NODE_CAPABILITIES.contains(&capability) || self.value.supports(capability)
    }

    fn invoke(&self, capability: &str, args: &[Value]) -> Result<Value, CapabilityError> {
        match invoke_node_capability(self, capability, args, |other| self.value == *other) {
            Some(result) => result,
            None => self.value.invoke(capability, args),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn debug_render(&self) -> String {
        format!("{self:?}")
    }

    fn tag(&self) -> Option<&str> {
        None
    }

    fn children(&self) -> &[Node] {
        &[]
    }

    fn line(&self) -> Option<usize> {
        None
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<Value> for Atom {
    fn eq(&self, other: &Value) -> bool {
        self.value == *other
    }
}

impl PartialEq<Atom> for Value {
    fn eq(&self, other: &Atom) -> bool {
        *self == other.value
    }
}

impl PartialEq<Node> for Atom {
    fn eq(&self, other: &Node) -> bool {
        other.as_atom() == Some(self)
    }
}

/// An atom never equals a compound node.
impl PartialEq<Sexp> for Atom {
    fn eq(&self, _other: &Sexp) -> bool {
        false
    }
}

impl PartialEq<str> for Atom {
    fn eq(&self, other: &str) -> bool {
        self.value == *other
    }
}

impl PartialEq<&str> for Atom {
    fn eq(&self, other: &&str) -> bool {
        self.value == **other
    }
}

impl PartialEq<String> for Atom {
    fn eq(&self, other: &String) -> bool {
        self.value == *other.as_str()
    }
}

impl PartialEq<i64> for Atom {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl PartialEq<f64> for Atom {
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl PartialEq<bool> for Atom {
    fn eq(&self, other: &bool) -> bool {
        self.value == *other
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({:?})", self.value)
    }
}

impl From<Value> for Atom {
    fn from(value: Value) -> Self {
        Atom { value }
    }
}
