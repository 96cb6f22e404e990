//! XML renderer.
//!
//! Renders a [`Document`] or a single node into a string. Layout follows
//! the block/inline model: a node renders as a block only if it and all of
//! its ancestors ask for block layout, and only block nodes get the
//! newline-plus-indentation filler when pretty-printing.

use tracing::trace;

use crate::serial::escape::comment_body;
use crate::tree::{
    AttributeTable, Comment, DocType, Document, Element, NodeId, NodeKind, ProcessingInstruction,
};

/// One level of indentation.
pub const INDENT: &str = "  ";

/// How elements without children are closed.
///
/// # Examples
///
/// ```
/// use xmlwright::Document;
/// use xmlwright::serial::Closing;
///
/// let mut doc = Document::new();
/// let root = doc.root();
/// doc.add_element(root, "br").unwrap();
/// doc.add_element(root, "p").unwrap();
///
/// let html = doc.render_node(root, 0, false, false);
/// assert_eq!(html, "<root><br></br><p></p></root>");
/// let html = doc.render_with(false, Closing::VoidOnly);
/// assert!(html.ends_with("<root><br/><p></p></root>"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Closing {
    /// `<name/>` for every empty element.
    #[default]
    SelfClose,
    /// `<name></name>` for every empty element.
    Explicit,
    /// Only HTML void elements (`br`, `img`, `meta`, ...) self-close.
    VoidOnly,
}

impl Closing {
    /// Whether an empty element with this name self-closes.
    #[must_use]
    pub fn self_closes(self, name: &str) -> bool {
        match self {
            Self::SelfClose => true,
            Self::Explicit => false,
            Self::VoidOnly => is_void_element(name),
        }
    }
}

impl From<bool> for Closing {
    fn from(self_closing: bool) -> Self {
        if self_closing {
            Self::SelfClose
        } else {
            Self::Explicit
        }
    }
}

/// Returns true for HTML elements that never have content.
#[must_use]
pub fn is_void_element(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
            | "basefont"
            | "frame"
            | "isindex"
    )
}

/// Renders the document-level children, then the root element, all at
/// indentation level 0.
///
/// # Examples
///
/// ```
/// use xmlwright::Document;
/// use xmlwright::serial::{render_document, Closing};
///
/// let doc = Document::new();
/// assert_eq!(
///     render_document(&doc, true, Closing::SelfClose),
///     "<?xml version='1.0' encoding='UTF-8' standalone='yes'?>\n\n<root/>"
/// );
/// ```
#[must_use]
pub fn render_document(doc: &Document, pretty: bool, closing: Closing) -> String {
    trace!(nodes = doc.node_count(), pretty, "rendering document");
    let mut out = String::new();
    for &child in doc.prolog() {
        render_into(doc, child, 0, pretty, closing, &mut out);
    }
    render_into(doc, doc.root(), 0, pretty, closing, &mut out);
    out
}

/// Renders one node and its descendants.
#[must_use]
pub fn render_node(
    doc: &Document,
    id: NodeId,
    indent: usize,
    pretty: bool,
    closing: Closing,
) -> String {
    let mut out = String::new();
    render_into(doc, id, indent, pretty, closing, &mut out);
    out
}

fn push_filler(out: &mut String, indent: usize) {
    out.push('\n');
    for _ in 0..indent {
        out.push_str(INDENT);
    }
}

fn render_into(
    doc: &Document,
    id: NodeId,
    indent: usize,
    pretty: bool,
    closing: Closing,
    out: &mut String,
) {
    let block = doc.is_block(id);
    match &doc.node(id).kind {
        NodeKind::Element(element) => {
            render_element(doc, element, indent, pretty, block, closing, out);
        }
        NodeKind::Text(text) => {
            if pretty && block {
                push_filler(out, indent);
            }
            out.push_str(&(text.escape)(text.content()));
        }
        NodeKind::Comment(comment) => {
            if pretty && block {
                push_filler(out, indent);
            }
            render_comment(comment, out);
        }
        NodeKind::ProcessingInstruction(pi) => render_pi(pi, indent, pretty, out),
        NodeKind::DocType(doctype) => {
            if pretty {
                out.push('\n');
            }
            render_doctype(doctype, out);
        }
    }
}

fn render_element(
    doc: &Document,
    element: &Element,
    indent: usize,
    pretty: bool,
    block: bool,
    closing: Closing,
    out: &mut String,
) {
    let name = element.name();
    if pretty && block {
        push_filler(out, indent);
    }
    out.push('<');
    out.push_str(name);
    // Continuation lines align under the first attribute.
    let continuation = (pretty && block).then(|| {
        let mut pad = String::from("\n");
        for _ in 0..indent {
            pad.push_str(INDENT);
        }
        pad.extend(std::iter::repeat(' ').take(name.chars().count() + 2));
        pad
    });
    push_attributes(element.attributes(), continuation.as_deref(), out);

    let children = element.children();
    if children.is_empty() && closing.self_closes(name) {
        out.push_str("/>");
        return;
    }
    out.push('>');

    let child_indent = if block { indent + 1 } else { indent };
    for &child in children.ids() {
        render_into(doc, child, child_indent, pretty, closing, out);
    }
    if pretty && children.last().is_some_and(|last| doc.is_block(last)) {
        push_filler(out, indent);
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn push_attributes(table: &AttributeTable, continuation: Option<&str>, out: &mut String) {
    for (i, fragment) in table.fragments().iter().enumerate() {
        match continuation {
            Some(pad) if i > 0 => out.push_str(pad),
            _ => out.push(' '),
        }
        out.push_str(fragment);
    }
}

fn render_comment(comment: &Comment, out: &mut String) {
    let body = comment_body(comment.content());
    if body.is_empty() {
        out.push_str("<!-- -->");
    } else {
        out.push_str("<!-- ");
        out.push_str(&body);
        out.push_str(" -->");
    }
}

fn render_pi(pi: &ProcessingInstruction, indent: usize, pretty: bool, out: &mut String) {
    let target = pi.target();
    out.push_str("<?");
    out.push_str(target);
    for (i, fragment) in pi.data().iter().enumerate() {
        if pretty && i > 0 {
            push_filler(out, indent);
            out.extend(std::iter::repeat(' ').take(target.chars().count() + 2));
        }
        out.push(' ');
        out.push_str(fragment);
    }
    push_attributes(pi.attributes(), None, out);
    out.push_str("?>");
    if pretty {
        out.push('\n');
    }
}

fn render_doctype(doctype: &DocType, out: &mut String) {
    out.push_str("<!DOCTYPE ");
    out.push_str(doctype.name());
    match doctype.dtd_name() {
        Some(dtd_name) => {
            out.push_str(" PUBLIC \"");
            out.push_str(dtd_name);
            out.push_str("\" \"");
        }
        None => out.push_str(" SYSTEM \""),
    }
    out.push_str(doctype.uri());
    out.push_str("\">");
}
