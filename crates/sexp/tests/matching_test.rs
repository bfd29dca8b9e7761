//! Rule-style matching over trees loaded from JSON.

use serde_json::json;
use slim_lint_sexp::{Atom, CapabilityError, Node, Pattern, Sexp, SexpNode, Value};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `div#main` followed by a bare `p` with text.
fn template() -> Node {
    let json = json!([
        "multi",
        ["html", {"sym": "tag"}, "div",
            ["html", {"sym": "attrs"},
                ["html", {"sym": "attr"}, "id", ["static", "main"]]],
            ["multi", ["newline"]]],
        ["html", {"sym": "tag"}, "p",
            ["html", {"sym": "attrs"}],
            ["slim", {"sym": "text"}, {"sym": "inline"}, ["static", "hello"]]],
        ["newline"]
    ]);
    serde_json::from_value(json).unwrap()
}

fn tag_pattern(name: &str) -> Pattern {
    Pattern::list([
        Pattern::symbol("html"),
        Pattern::symbol("tag"),
        Pattern::from(name),
    ])
}

#[test]
fn test_find_tags_by_name() {
    init_tracing();
    let tree = template();

    let divs = tree.find_all(&tag_pattern("div"));
    assert_eq!(divs.len(), 1);
    assert_eq!(divs[0].tag(), Some("html"));

    let spans = tree.find_all(&tag_pattern("span"));
    assert!(spans.is_empty());

    let tags = tree.find_all(&Pattern::list([Pattern::symbol("html"), Pattern::symbol("tag")]));
    assert_eq!(tags.len(), 2);
}

#[test]
fn test_rule_reads_children_without_kind_checks() {
    init_tracing();
    let tree = template();

    // Collect the text of every `(static ...)` node, treating the content
    // child like any other node.
    let mut texts = Vec::new();
    for node in tree.find_all(&Pattern::list([Pattern::symbol("static")])) {
        let content = &node.children()[0];
        assert!(content.supports("trim"));
        texts.push(content.invoke("trim", &[]).unwrap());
    }
    assert_eq!(texts, vec![Value::string("main"), Value::string("hello")]);
}

#[test]
fn test_atoms_compare_against_raw_literals() {
    let tree = template();
    let attr = tree
        .find_all(&Pattern::list([Pattern::symbol("html"), Pattern::symbol("attr")]))
        .into_iter()
        .next()
        .unwrap();

    let name = &attr.children()[1];
    assert!(*name == "id");
    assert_eq!(*name, Atom::new("id"));
    assert_eq!(Atom::new("id"), *name);
    assert!(!(*name == Value::symbol("id")));
}

#[test]
fn test_duplicate_subtrees_are_equal() {
    let tree = template();
    let newlines = tree.find_all(&Pattern::list([Pattern::symbol("newline")]));
    assert_eq!(newlines.len(), 2);
    assert_eq!(newlines[0], newlines[1]);
}

#[test]
fn test_missing_capability_surfaces_to_rule() {
    init_tracing();
    let tree = template();
    let tag_name = tree.children()[0].as_sexp().unwrap().get(2).unwrap();

    assert_eq!(tag_name, "div");
    let err = tag_name.invoke("abs", &[]).unwrap_err();
    assert!(matches!(
        err,
        CapabilityError::NotFound { ref capability, kind: "string" } if capability == "abs"
    ));
}

#[test]
fn test_json_form_roundtrips() {
    let tree = template();
    let json = tree.to_json().unwrap();
    assert_eq!(Node::from_json(&json).unwrap(), tree);
}

#[test]
fn test_non_finite_float_has_no_json_form() {
    let tree = Node::from(Sexp::new("x", [Value::Float(f64::NAN)]));
    assert!(tree.to_json().is_err());
}

#[test]
fn test_rejects_untagged_arrays() {
    assert!(Node::from_json("[]").is_err());
    assert!(Node::from_json("[1, 2]").is_err());
    assert!(Node::from_json(r#"{"other": 1}"#).is_err());
}
