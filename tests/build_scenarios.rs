//! End-to-end building and rendering scenarios.
//!
//! Each test builds a tree through the public API and compares the whole
//! rendered output, since consumers snapshot it byte for byte.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use xmlwright::serial::escape::{escape, unescape};
use xmlwright::{BuildError, Document, DocumentOptions, ElementConfig, NameClass};

const DECL: &str = "<?xml version='1.0' encoding='UTF-8' standalone='yes'?>";

fn bare() -> Document {
    Document::with_options(&DocumentOptions::default().declaration(false)).unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_minimal_document() {
    let doc = Document::new();
    assert_eq!(doc.render(true), format!("{DECL}\n\n<root/>"));
}

#[test]
fn test_invalid_element_name() {
    let mut doc = Document::new();
    let err = doc.create_element("1bad").unwrap_err();
    assert_eq!(
        err,
        BuildError::InvalidName {
            class: NameClass::Element,
            name: "1bad".to_string(),
        }
    );
    assert_eq!(err.to_string(), "invalid element name '1bad'");
}

#[test]
fn test_reserved_and_multi_colon_names() {
    let mut doc = Document::new();
    for name in ["xmlfoo", "XMLdata", "a:b:c", "", "has space"] {
        assert!(
            matches!(doc.create_element(name), Err(BuildError::InvalidName { .. })),
            "{name:?} should be rejected"
        );
    }
    for name in ["xm", "svg:rect", "_private", "data-set.v2"] {
        assert!(doc.create_element(name).is_ok(), "{name:?} should pass");
    }
}

#[test]
fn test_comment_with_hyphens() {
    let mut doc = bare();
    let root = doc.root();
    doc.add_comment(root, "a--b").unwrap();
    let out = doc.render(false);
    let body = out
        .strip_prefix("<root><!--")
        .and_then(|rest| rest.strip_suffix("--></root>"))
        .unwrap();
    assert!(!body.contains("--"), "comment body {body:?} holds '--'");
    assert_eq!(out, "<root><!-- a&#45;&#45;b --></root>");
}

#[test]
fn test_validating_child_list() {
    let mut doc = bare();
    let root = doc.root();
    let table = doc
        .add_element_with(root, "table", &ElementConfig::default().validating(["row"]))
        .unwrap();

    let column = doc.create_element("column").unwrap();
    assert_eq!(
        doc.add_child(table, column),
        Err(BuildError::InvalidChild {
            parent: "table".to_string(),
            child: "column".to_string(),
        })
    );
    assert_eq!(doc.parent(column), None);

    let comment = doc.create_comment("rows follow");
    doc.add_child(table, comment).unwrap();
    doc.add_element(table, "row").unwrap();

    assert_eq!(
        doc.render(true),
        "\n<root>\n  <table>\n    <!-- rows follow -->\n    <row/>\n  </table>\n</root>"
    );
}

#[test]
fn test_full_document() {
    let mut doc = Document::with_options(
        &DocumentOptions::default()
            .root_name("catalog")
            .standalone(None),
    )
    .unwrap();
    let catalog = doc.root();
    doc.add_document_comment("generated").unwrap();
    doc.declare_namespace(catalog, "http://example.com/books", None)
        .unwrap();
    doc.declare_namespace(catalog, "http://purl.org/dc/elements/1.1/", Some("dc"))
        .unwrap();

    let book = doc.add_element(catalog, "book").unwrap();
    doc.set_attribute(book, "id", "bk1").unwrap();
    doc.set_attribute(book, "xml:lang", "en").unwrap();
    let title = doc.add_element(book, "dc:title").unwrap();
    doc.add_text(title, "Tom & Jerry's").unwrap();
    let notes = doc.add_element(book, "notes").unwrap();
    doc.add_cdata(notes, "if (a < b) {}").unwrap();

    assert_eq!(
        doc.render(true),
        "<?xml version='1.0' encoding='UTF-8'?>\n\
         \n<!-- generated -->\
         \n<catalog xmlns='http://example.com/books'\
         \n         xmlns:dc='http://purl.org/dc/elements/1.1/'>\
         \n  <book id='bk1'\
         \n        xml:lang='en'>\
         \n    <dc:title>Tom &amp; Jerry&apos;s</dc:title>\
         \n    <notes><![CDATA[if (a < b) {}]]></notes>\
         \n  </book>\
         \n</catalog>"
    );
}

#[test]
fn test_mixed_content_stays_on_one_line() {
    let mut doc = bare();
    let root = doc.root();
    let p = doc.add_element(root, "p").unwrap();
    doc.add_text(p, "Hello, ").unwrap();
    let b = doc
        .add_element_with(p, "b", &ElementConfig::inline())
        .unwrap();
    doc.add_text(b, "world").unwrap();
    doc.add_text(p, "!").unwrap();
    assert_eq!(
        doc.render(true),
        "\n<root>\n  <p>Hello, <b>world</b>!</p>\n</root>"
    );
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn test_attachment_uniqueness() {
    let mut doc = bare();
    let root = doc.root();
    let a = doc.add_element(root, "a").unwrap();
    let b = doc.add_element(root, "b").unwrap();

    let nodes = [
        doc.create_element("x").unwrap(),
        doc.create_text("t"),
        doc.create_comment("c"),
    ];
    for node in nodes {
        doc.add_child(a, node).unwrap();
        assert!(matches!(
            doc.add_child(a, node),
            Err(BuildError::AlreadyAdded { .. })
        ));
        assert!(matches!(
            doc.add_child(b, node),
            Err(BuildError::AlreadyAttached { .. })
        ));
        assert_eq!(doc.parent(node), Some(a));
    }
    assert_eq!(doc.children(a).len(), 3);
    assert!(doc.children(b).is_empty());
}

#[test]
fn test_escape_round_trip() {
    let samples = [
        "",
        "   ",
        "\t\n",
        "&amp;",
        "&lt;tag&gt;",
        "a < b && c > d",
        "\"quoted\" and 'single'",
        "&#65; stays literal",
        "unicode: é ü 日本",
        "&unknown; & &",
    ];
    for s in samples {
        assert_eq!(unescape(&escape(s)), s, "round trip of {s:?}");
    }
}

#[test]
fn test_namespace_ordering() {
    let mut doc = bare();
    let root = doc.root();
    let mut declared = vec![doc.namespace("urn:n1", None).unwrap()];
    for i in 2..=8 {
        let prefix = format!("n{i}");
        declared.push(doc.namespace(&format!("urn:n{i}"), Some(prefix.as_str())).unwrap());
    }
    for ns in declared.iter().rev() {
        assert!(doc.set_namespace(root, ns.clone()).unwrap());
    }
    assert_eq!(doc.namespaces(root), declared);
}

#[test]
fn test_attribute_append_semantics() {
    let mut doc = bare();
    let root = doc.root();
    doc.set_attribute(root, "a", "x").unwrap();
    doc.append_attribute(root, "a", "y", ",").unwrap();
    assert_eq!(doc.attribute(root, "a"), Some("x,y"));

    doc.append_attribute(root, "b", "y", ",").unwrap();
    assert_eq!(doc.attribute(root, "b"), Some("y"));
}

#[test]
fn test_self_closing_emptiness() {
    let mut doc = bare();
    let root = doc.root();
    let empty = doc.add_element(root, "empty").unwrap();
    assert_eq!(doc.render_node(empty, 0, false, true), "<empty/>");
    assert_eq!(doc.render_node(empty, 0, false, false), "<empty></empty>");

    doc.add_text(empty, "x").unwrap();
    assert_eq!(doc.render_node(empty, 0, false, true), "<empty>x</empty>");
}

#[test]
fn test_failed_operations_leave_tree_unchanged() {
    let mut doc = bare();
    let root = doc.root();
    let leaf = doc
        .add_element_with(root, "leaf", &ElementConfig::leaf().attributes(false))
        .unwrap();
    let before = doc.render(true);

    assert!(doc.add_text(leaf, "text").is_err());
    assert!(doc.add_element(leaf, "child").is_err());
    assert!(doc.set_attribute(leaf, "a", "1").is_err());
    assert!(doc.set_attribute(root, "bad name", "1").is_err());
    assert!(doc.add_element(root, "9").is_err());

    assert_eq!(doc.render(true), before);
}

#[test]
fn test_malformed_namespace_identifier() {
    let doc = bare();
    let err = doc.namespace("not a uri", Some("p")).unwrap_err();
    assert!(matches!(err, BuildError::MalformedIdentifier { .. }));
    assert!(matches!(
        doc.namespace("urn:ok", Some("xmlns")),
        Err(BuildError::InvalidName {
            class: NameClass::Prefix,
            ..
        })
    ));
}
