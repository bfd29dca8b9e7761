//! S-expression nodes for the Slim template linter.
//!
//! Parsed templates arrive as S-expressions: a tag symbol followed by
//! children, each either a nested list or a literal. Lint rules walk these
//! trees and ask every node the same questions (does it match this pattern,
//! is it equal to that node) without caring which kind of node it is.
//!
//! # Node kinds
//!
//! - [`Sexp`]: a compound node, `(tag child...)`.
//! - [`Atom`]: a literal leaf wrapping a [`Value`] so it answers the same
//!   [`SexpNode`] contract as a compound node.
//! - [`Node`]: either of the above.
//!
//! # JSON form
//!
//! ```json
//! ["multi",
//!   ["html", {"sym": "tag"}, "div", ["html", {"sym": "attrs"}]],
//!   ["newline"]
//! ]
//! ```
//!
//! Arrays are compound nodes tagged by their first element. `{"sym": name}`
//! is a symbol; other JSON scalars are literals of the same kind.

mod atom;
mod capability;
mod pattern;
mod sexp;
mod value;

pub use atom::Atom;
pub use capability::{CapabilityError, NODE_CAPABILITIES, SexpNode};
pub use pattern::Pattern;
pub use sexp::{Node, Sexp};
pub use value::{Value, ValueKind};
