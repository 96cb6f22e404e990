//! Node variants.
//!
//! The variant set is closed: elements, text (plain, CDATA, or predefined
//! markup), comments, processing instructions and document type
//! declarations. Parent links live in [`NodeData`](super::NodeData), not here.

use std::fmt;

use super::attributes::AttributeTable;
use super::children::ChildList;
use crate::serial::escape::EscapeFn;

/// The kind of a node and its payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// An element, e.g. `<row id='1'>...</row>`.
    Element(Element),
    /// Character data rendered through an escape function.
    Text(Text),
    /// A comment, `<!-- ... -->`.
    Comment(Comment),
    /// A processing instruction, e.g. the XML declaration.
    ProcessingInstruction(ProcessingInstruction),
    /// A document type declaration.
    DocType(DocType),
}

impl NodeKind {
    /// The name used for whitelist checks and diagnostics.
    #[must_use]
    pub fn element_name(&self) -> &str {
        match self {
            Self::Element(element) => &element.name,
            Self::Text(_) => "#text",
            Self::Comment(_) => "#comment",
            Self::ProcessingInstruction(pi) => &pi.target,
            Self::DocType(_) => "#doctype",
        }
    }

    /// The node's own layout preference, ignoring its ancestors.
    #[must_use]
    pub fn is_block(&self) -> bool {
        match self {
            Self::Element(element) => element.block,
            Self::Text(text) => text.block,
            Self::Comment(_) | Self::ProcessingInstruction(_) | Self::DocType(_) => true,
        }
    }

    /// The attribute table, for the variants that have one.
    #[must_use]
    pub fn attributes(&self) -> Option<&AttributeTable> {
        match self {
            Self::Element(element) => Some(&element.attributes),
            Self::ProcessingInstruction(pi) => Some(&pi.attributes),
            _ => None,
        }
    }

    pub(crate) fn attributes_mut(&mut self) -> Option<&mut AttributeTable> {
        match self {
            Self::Element(element) => Some(&mut element.attributes),
            Self::ProcessingInstruction(pi) => Some(&mut pi.attributes),
            _ => None,
        }
    }

    /// The child list of an element.
    #[must_use]
    pub fn children(&self) -> Option<&ChildList> {
        match self {
            Self::Element(element) => Some(&element.children),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut ChildList> {
        match self {
            Self::Element(element) => Some(&mut element.children),
            _ => None,
        }
    }
}

/// Element payload.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) attributes: AttributeTable,
    pub(crate) children: ChildList,
    pub(crate) block: bool,
}

impl Element {
    /// The element name, possibly `prefix:local`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes and namespace declarations.
    #[must_use]
    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    /// Children in document order.
    #[must_use]
    pub fn children(&self) -> &ChildList {
        &self.children
    }

    /// Whether the element asks for block layout.
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.block
    }
}

/// Text payload.
#[derive(Clone)]
pub struct Text {
    pub(crate) content: String,
    pub(crate) escape: EscapeFn,
    pub(crate) block: bool,
}

impl Text {
    /// The raw, unescaped content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The content as it will be rendered.
    #[must_use]
    pub fn escaped(&self) -> String {
        (self.escape)(&self.content).into_owned()
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("content", &self.content)
            .field("block", &self.block)
            .finish_non_exhaustive()
    }
}

/// Comment payload, stored unescaped.
#[derive(Debug, Clone)]
pub struct Comment {
    pub(crate) content: String,
}

impl Comment {
    /// The raw comment text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Processing instruction payload.
#[derive(Debug, Clone)]
pub struct ProcessingInstruction {
    pub(crate) target: String,
    pub(crate) data: Vec<String>,
    pub(crate) attributes: AttributeTable,
}

impl ProcessingInstruction {
    /// The instruction target, e.g. `xml` or `xml-stylesheet`.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Data fragments in the order they were added.
    #[must_use]
    pub fn data(&self) -> &[String] {
        &self.data
    }

    /// Pseudo-attributes rendered after the data.
    #[must_use]
    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }
}

/// Document type declaration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocType {
    pub(crate) name: String,
    pub(crate) dtd_name: Option<String>,
    pub(crate) uri: String,
}

impl DocType {
    /// The declared root element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The public DTD name, if any.
    #[must_use]
    pub fn dtd_name(&self) -> Option<&str> {
        self.dtd_name.as_deref()
    }

    /// The system identifier.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }
}
