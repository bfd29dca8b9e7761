//! Compound S-expression nodes and the [`Node`] sum type.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::capability::{NODE_CAPABILITIES, SexpNode, invoke_node_capability};
use crate::{Atom, CapabilityError, Pattern, Value};

const SEXP_CAPABILITIES: &[&str] = &["len", "is_empty"];

/// A tagged list: a tag symbol followed by child nodes.
///
/// The tag sits at index 0 when the node is indexed or matched, so
/// `(html tag "div")` has three elements. The source line is carried for
/// reporting and does not take part in equality.
#[derive(Clone)]
pub struct Sexp {
    tag: String,
    children: Vec<Node>,
    line: Option<usize>,
}

impl Sexp {
    pub fn new(tag: impl Into<String>, children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
        Sexp {
            tag: tag.into(),
            children: children.into_iter().map(Into::into).collect(),
            line: None,
        }
    }

    /// Sets the source line this node was parsed from.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// The tag. Unlike [`SexpNode::tag`], always present.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Number of elements, counting the tag.
    pub fn len(&self) -> usize {
        self.children.len() + 1
    }

    /// Always false: every node has at least its tag.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the element at `index`, where index 0 is the tag.
    pub fn get(&self, index: usize) -> Option<Node> {
        match index {
            0 => Some(Node::Atom(Atom::new(Value::symbol(self.tag.as_str())))),
            _ => self.children.get(index - 1).cloned(),
        }
    }

    fn element_matches(&self, index: usize, pattern: &Pattern) -> bool {
        match index {
            0 => pattern
                .as_literal()
                .is_some_and(|p| p.as_symbol() == Some(self.tag.as_str())),
            _ => self.children[index - 1].matches(pattern),
        }
    }

    fn write_debug(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{indent}(:{}", self.tag)?;
        for child in &self.children {
            f.write_str("\n")?;
            match child {
                Node::Atom(atom) => write!(f, "{indent}  {atom:?}")?,
                Node::Sexp(sexp) => sexp.write_debug(f, depth + 1)?,
            }
        }
        f.write_str(")")
    }
}

impl SexpNode for Sexp {
    /// Prefix match: every element of a list pattern must match the element
    /// at the same index. A literal pattern never matches a compound node.
    fn matches(&self, pattern: &Pattern) -> bool {
        let Pattern::List(items) = pattern else {
            return false;
        };
        if items.len() > self.len() {
            tracing::trace!(
                tag = %self.tag,
                pattern_len = items.len(),
                node_len = self.len(),
                "pattern longer than node"
            );
            return false;
        }
        items
            .iter()
            .enumerate()
            .all(|(index, item)| self.element_matches(index, item))
    }

    fn supports(&self, capability: &str) -> bool {
        NODE_CAPABILITIES.contains(&capability) || SEXP_CAPABILITIES.contains(&capability)
    }

    fn invoke(&self, capability: &str, args: &[Value]) -> Result<Value, CapabilityError> {
        // A compound node never equals a bare literal.
        if let Some(result) = invoke_node_capability(self, capability, args, |_| false) {
            return result;
        }
        if !SEXP_CAPABILITIES.contains(&capability) {
            return Err(CapabilityError::not_found(capability, "sexp"));
        }
        if !args.is_empty() {
            return Err(CapabilityError::Arity {
                capability: capability.to_string(),
                expected: 0,
                got: args.len(),
            });
        }
        Ok(match capability {
            "len" => Value::Integer(self.len() as i64),
            _ => Value::Bool(self.is_empty()),
        })
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn debug_render(&self) -> String {
        format!("{self:?}")
    }

    fn tag(&self) -> Option<&str> {
        Some(&self.tag)
    }

    fn children(&self) -> &[Node] {
        &self.children
    }

    fn line(&self) -> Option<usize> {
        self.line
    }
}

impl PartialEq for Sexp {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.children == other.children
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.tag)?;
        for child in &self.children {
            write!(f, " {child}")?;
        }
        f.write_str(")")
    }
}

/// Multi-line form, one child per line, atoms shown as `Atom(..)`.
impl fmt::Debug for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_debug(f, 0)
    }
}

/// Any node of a tree: a literal [`Atom`] or a compound [`Sexp`].
#[derive(Clone, PartialEq)]
pub enum Node {
    Atom(Atom),
    Sexp(Sexp),
}

impl Node {
    pub fn is_atom(&self) -> bool {
        matches!(self, Node::Atom(_))
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Node::Atom(atom) => Some(atom),
            Node::Sexp(_) => None,
        }
    }

    pub fn as_sexp(&self) -> Option<&Sexp> {
        match self {
            Node::Sexp(sexp) => Some(sexp),
            Node::Atom(_) => None,
        }
    }

    /// Visits this node and every descendant, pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Collects every node in the tree that matches `pattern`.
    pub fn find_all(&self, pattern: &Pattern) -> Vec<&Node> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.matches(pattern) {
                found.push(node);
            }
        });
        found
    }

    /// Parses a tree from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl SexpNode for Node {
    fn matches(&self, pattern: &Pattern) -> bool {
        match self {
            Node::Atom(atom) => atom.matches(pattern),
            Node::Sexp(sexp) => sexp.matches(pattern),
        }
    }

    fn supports(&self, capability: &str) -> bool {
        match self {
            Node::Atom(atom) => atom.supports(capability),
            Node::Sexp(sexp) => sexp.supports(capability),
        }
    }

    fn invoke(&self, capability: &str, args: &[Value]) -> Result<Value, CapabilityError> {
        match self {
            Node::Atom(atom) => atom.invoke(capability, args),
            Node::Sexp(sexp) => sexp.invoke(capability, args),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn debug_render(&self) -> String {
        format!("{self:?}")
    }

    fn tag(&self) -> Option<&str> {
        match self {
            Node::Atom(atom) => SexpNode::tag(atom),
            Node::Sexp(sexp) => SexpNode::tag(sexp),
        }
    }

    fn children(&self) -> &[Node] {
        match self {
            Node::Atom(atom) => atom.children(),
            Node::Sexp(sexp) => sexp.children(),
        }
    }

    fn line(&self) -> Option<usize> {
        match self {
            Node::Atom(atom) => atom.line(),
            Node::Sexp(sexp) => sexp.line(),
        }
    }
}

/// A compound node never equals an atom.
impl PartialEq<Atom> for Sexp {
    fn eq(&self, _other: &Atom) -> bool {
        false
    }
}

impl PartialEq<Sexp> for Node {
    fn eq(&self, other: &Sexp) -> bool {
        self.as_sexp() == Some(other)
    }
}

impl PartialEq<Atom> for Node {
    fn eq(&self, other: &Atom) -> bool {
        self.as_atom() == Some(other)
    }
}

impl PartialEq<Value> for Node {
    fn eq(&self, other: &Value) -> bool {
        self.as_atom().is_some_and(|atom| atom == other)
    }
}

impl PartialEq<&str> for Node {
    fn eq(&self, other: &&str) -> bool {
        self.as_atom().is_some_and(|atom| atom == other)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Atom(atom) => fmt::Display::fmt(atom, f),
            Node::Sexp(sexp) => fmt::Display::fmt(sexp, f),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Atom(atom) => fmt::Debug::fmt(atom, f),
            Node::Sexp(sexp) => fmt::Debug::fmt(sexp, f),
        }
    }
}

impl From<Atom> for Node {
    fn from(atom: Atom) -> Self {
        Node::Atom(atom)
    }
}

impl From<Sexp> for Node {
    fn from(sexp: Sexp) -> Self {
        Node::Sexp(sexp)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::Atom(Atom::from(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Atom(Atom::new(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Atom(Atom::new(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Atom(Atom::new(value))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Atom(Atom::new(value))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Atom(Atom::new(value))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Atom(Atom::new(value))
    }
}

// Serialization/deserialization support. A compound node is a JSON array
// whose first element is the tag string; everything else is a literal.
impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Atom(atom) => atom.value().serialize(serializer),
            Node::Sexp(sexp) => {
                let mut seq = serializer.serialize_seq(Some(sexp.len()))?;
                seq.serialize_element(sexp.tag())?;
                for child in sexp.children() {
                    seq.serialize_element(child)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a literal or a [tag, ...children] array")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let tag: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::custom("compound node needs a tag"))?;
        let mut children = Vec::new();
        while let Some(child) = seq.next_element::<Node>()? {
            children.push(child);
        }
        Ok(Node::Sexp(Sexp::new(tag, children)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Value::Nil.into())
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Value::Nil.into())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(v.into())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(v.into())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        i64::try_from(v)
            .map(Node::from)
            .map_err(|_| E::custom(format!("integer {v} out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(v.into())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(v.into())
    }

    fn visit_map<A>(self, map: A) -> Result<Node, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let value = Value::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(value.into())
    }
}
