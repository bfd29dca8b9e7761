//! The capability contract shared by every tree node.

use thiserror::Error;

use crate::{Node, Pattern, Value};

/// Errors raised when invoking a named capability on a node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapabilityError {
    #[error("capability `{capability}` not found on {kind}")]
    NotFound {
        capability: String,
        kind: &'static str,
    },

    #[error("wrong number of arguments for `{capability}`: expected {expected}, got {got}")]
    Arity {
        capability: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid argument for `{capability}` at position {position}: expected {expected}")]
    ArgumentType {
        capability: String,
        position: usize,
        expected: &'static str,
    },

    #[error("`{capability}` out of range for {value}")]
    Overflow { capability: String, value: String },
}

impl CapabilityError {
    pub(crate) fn not_found(capability: &str, kind: &'static str) -> Self {
        tracing::debug!(capability, kind, "capability not found");
        CapabilityError::NotFound {
            capability: capability.to_string(),
            kind,
        }
    }

    pub(crate) fn overflow(capability: &str, value: &Value) -> Self {
        CapabilityError::Overflow {
            capability: capability.to_string(),
            value: format!("{value:?}"),
        }
    }
}

/// Capabilities every node answers itself, before anything is forwarded.
///
/// `to_string` and `inspect` are aliases of `render` and `debug_render`.
/// `tag` and `line` are nil on atoms, and `child_count` is 0.
pub const NODE_CAPABILITIES: &[&str] = &[
    "equals",
    "matches",
    "render",
    "debug_render",
    "to_string",
    "inspect",
    "supports",
    "tag",
    "line",
    "child_count",
];

/// What the matcher may ask of any node, literal or compound.
///
/// Rule code is written once against this trait (or against [`Node`](crate::Node),
/// which implements it) and never has to check which kind of node it holds.
pub trait SexpNode {
    /// Whether this node matches the given pattern.
    fn matches(&self, pattern: &Pattern) -> bool;

    /// Whether `capability` can be invoked on this node.
    fn supports(&self, capability: &str) -> bool;

    /// Invokes a named capability.
    ///
    /// Fails with [`CapabilityError::NotFound`] when nothing defines it.
    fn invoke(&self, capability: &str, args: &[Value]) -> Result<Value, CapabilityError>;

    /// Human-readable text.
    fn render(&self) -> String;

    /// Diagnostic text.
    fn debug_render(&self) -> String;

    /// The tag of a compound node. Atoms have none.
    fn tag(&self) -> Option<&str>;

    /// Child nodes, not counting the tag. Atoms have none.
    fn children(&self) -> &[Node];

    /// Source line, when the parser recorded one.
    fn line(&self) -> Option<usize>;
}

/// Serves the capabilities in [`NODE_CAPABILITIES`] for a node.
///
/// Returns `None` for anything else so the caller can continue the lookup.
pub(crate) fn invoke_node_capability<N>(
    node: &N,
    capability: &str,
    args: &[Value],
    equals: impl FnOnce(&Value) -> bool,
) -> Option<Result<Value, CapabilityError>>
where
    N: SexpNode + ?Sized,
{
    let expected = match capability {
        "render" | "debug_render" | "to_string" | "inspect" | "tag" | "line" | "child_count" => 0,
        "equals" | "matches" | "supports" => 1,
        _ => return None,
    };
    if args.len() != expected {
        return Some(Err(CapabilityError::Arity {
            capability: capability.to_string(),
            expected,
            got: args.len(),
        }));
    }

    let result = match capability {
        "render" | "to_string" => Ok(Value::String(node.render())),
        "debug_render" | "inspect" => Ok(Value::String(node.debug_render())),
        "tag" => Ok(node.tag().map(Value::symbol).into()),
        "line" => Ok(node.line().map(|line| line as i64).into()),
        "child_count" => Ok(Value::Integer(node.children().len() as i64)),
        "equals" => Ok(Value::Bool(equals(&args[0]))),
        "matches" => Ok(Value::Bool(node.matches(&Pattern::Literal(args[0].clone())))),
        _ => match &args[0] {
            Value::String(name) | Value::Symbol(name) => Ok(Value::Bool(node.supports(name))),
            _ => Err(CapabilityError::ArgumentType {
                capability: capability.to_string(),
                position: 0,
                expected: "string or symbol",
            }),
        },
    };
    Some(result)
}
