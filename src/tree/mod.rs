//! Arena-based markup tree.
//!
//! Every node lives in a `Vec<NodeData>` owned by the [`Document`] and is
//! referenced by [`NodeId`], a newtype over `NonZeroU32`. A node records its
//! parent as an id, never as an owning pointer, so the ownership graph stays
//! a forest with no reference cycles: each child id is held by exactly one
//! parent's [`ChildList`].
//!
//! # Attachment
//!
//! Nodes are created detached and attached exactly once. Attaching a node
//! that already has a parent fails with [`BuildError::AlreadyAdded`] (same
//! parent) or [`BuildError::AlreadyAttached`] (different parent), and the
//! parent link never changes afterwards.
//!
//! Document-level children (the XML declaration, other processing
//! instructions, the document type and document comments) render before the
//! root element, but their parent for attachment purposes is the root.

mod attributes;
mod children;
mod config;
mod namespace;
mod node;

pub use attributes::{
    is_reserved_attribute, AttributeTable, NamespaceRegistry, SortOrder, XML_ID, XML_LANG,
    XML_SPACE,
};
pub use children::{ChildList, ChildPolicy};
pub use config::{DocumentOptions, ElementConfig};
pub use namespace::Namespace;
pub use node::{Comment, DocType, Element, NodeKind, ProcessingInstruction, Text};

use std::num::NonZeroU32;

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::error::{BuildError, BuildResult};
use crate::serial::escape::{self, EscapeFn};
use crate::serial::{self, Closing};
use crate::util::names::{NameClass, NameValidators};

/// Target of the XML declaration.
const DECLARATION_TARGET: &str = "xml";

/// A typed index into the document's node arena.
///
/// `Option<NodeId>` has the same size as `NodeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    const ROOT: Self = Self(NonZeroU32::MIN);

    /// Slot `index` is stored as `index + 1`. `None` once that no longer
    /// fits in a `u32`.
    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|index| index.checked_add(1))
            .and_then(NonZeroU32::new)
            .map(Self)
    }

    fn as_index(self) -> usize {
        self.0.get() as usize - 1
    }

    /// Converts this `NodeId` to a raw, always non-zero `u32`.
    #[must_use]
    pub fn into_raw(self) -> u32 {
        self.0.get()
    }

    /// Creates a `NodeId` from a raw `u32`, or `None` for 0.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }
}

/// Storage for a single node in the arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Variant and payload.
    pub kind: NodeKind,
    /// The parent, set once at attach time. `None` while detached and
    /// always `None` for the root element.
    pub parent: Option<NodeId>,
}

/// A markup document: one root element, the document-level children that
/// render before it, and the name validators used while building.
///
/// A document holds at most `u32::MAX` nodes. Creating a node past that
/// limit panics, as growing a full `Vec` does.
///
/// # Examples
///
/// ```
/// use xmlwright::Document;
///
/// let mut doc = Document::new();
/// let root = doc.root();
/// let item = doc.add_element(root, "item").unwrap();
/// doc.set_attribute(item, "id", "1").unwrap();
/// doc.add_text(item, "fish & chips").unwrap();
///
/// assert_eq!(
///     doc.render(false),
///     "<?xml version='1.0' encoding='UTF-8' standalone='yes'?>\
///      <root><item id='1'>fish &amp; chips</item></root>"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    prolog: Vec<NodeId>,
    declaration: Option<NodeId>,
    validators: NameValidators,
}

impl Document {
    /// Creates a document with a root named `root` and the declaration
    /// `<?xml version='1.0' encoding='UTF-8' standalone='yes'?>`.
    #[must_use]
    pub fn new() -> Self {
        let options = DocumentOptions::default();
        let root = Element {
            name: options.root_name.clone(),
            attributes: AttributeTable::new(),
            children: ChildList::default(),
            block: true,
        };
        let mut doc = Self::around(root, NameValidators::new());
        doc.declare(&options);
        doc
    }

    /// Creates a document from options, using the default name validators.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidName`] if the root name or a registered
    /// root attribute name is rejected.
    pub fn with_options(options: &DocumentOptions) -> BuildResult<Self> {
        Self::with_validators(options, NameValidators::new())
    }

    /// Creates a document that builds under the given validator set.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidName`] if the root name or a registered
    /// root attribute name is rejected.
    pub fn with_validators(
        options: &DocumentOptions,
        validators: NameValidators,
    ) -> BuildResult<Self> {
        let root = make_element(&validators, &options.root_name, &options.root)?;
        let mut doc = Self::around(root, validators);
        if options.declaration {
            doc.declare(options);
        }
        Ok(doc)
    }

    fn around(root: Element, validators: NameValidators) -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(NodeData {
            kind: NodeKind::Element(root),
            parent: None,
        });
        Self {
            nodes,
            root: NodeId::ROOT,
            prolog: Vec::new(),
            declaration: None,
            validators,
        }
    }

    fn declare(&mut self, options: &DocumentOptions) {
        let mut attributes = AttributeTable::new();
        attributes.register_sequence(["version", "encoding", "standalone"]);
        attributes.insert_unchecked("version", &options.version);
        if let Some(label) = &options.encoding {
            attributes.insert_unchecked("encoding", &declared_encoding(label));
        }
        if let Some(standalone) = options.standalone {
            attributes.insert_unchecked("standalone", if standalone { "yes" } else { "no" });
        }
        let id = self.create_node(NodeKind::ProcessingInstruction(ProcessingInstruction {
            target: DECLARATION_TARGET.to_string(),
            data: Vec::new(),
            attributes,
        }));
        self.node_mut(id).parent = Some(self.root);
        self.prolog.insert(0, id);
        self.declaration = Some(id);
    }

    // --- Access ---

    /// The root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The XML declaration, if the document has one.
    #[must_use]
    pub fn declaration(&self) -> Option<NodeId> {
        self.declaration
    }

    /// Document-level children in rendering order.
    #[must_use]
    pub fn prolog(&self) -> &[NodeId] {
        &self.prolog
    }

    /// The validator set consulted while building.
    #[must_use]
    pub fn validators(&self) -> &NameValidators {
        &self.validators
    }

    /// Mutable access to the validator set, for replacing validators or
    /// registering listeners.
    pub fn validators_mut(&mut self) -> &mut NameValidators {
        &mut self.validators
    }

    /// Returns the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// The node's name: the element name, the instruction target, or a
    /// `#`-prefixed placeholder for the other variants.
    #[must_use]
    pub fn element_name(&self, id: NodeId) -> &str {
        self.node(id).kind.element_name()
    }

    /// The parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The children of an element; empty for every other variant.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .kind
            .children()
            .map_or(&[][..], ChildList::ids)
    }

    /// Iterates over a node and its ancestors, walking up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    /// Whether the node renders as a block: it and every ancestor must ask
    /// for block layout. Document-level children only consult themselves.
    #[must_use]
    pub fn is_block(&self, id: NodeId) -> bool {
        if self.prolog.contains(&id) {
            return self.node(id).kind.is_block();
        }
        self.ancestors(id).all(|a| self.node(a).kind.is_block())
    }

    /// The value of an attribute.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).kind.attributes()?.get(name)
    }

    /// The attribute table of an element or processing instruction.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> Option<&AttributeTable> {
        self.node(id).kind.attributes()
    }

    /// Namespaces declared on a node, unprefixed first.
    #[must_use]
    pub fn namespaces(&self, id: NodeId) -> Vec<Namespace> {
        self.attributes(id)
            .map(AttributeTable::get_namespaces)
            .unwrap_or_default()
    }

    /// Concatenated raw content of every text descendant.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        result
    }

    fn collect_text(&self, id: NodeId, buf: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text(text) => buf.push_str(&text.content),
            NodeKind::Element(element) => {
                for &child in element.children.ids() {
                    self.collect_text(child, buf);
                }
            }
            _ => {}
        }
    }

    /// Number of nodes in the arena, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- Creation ---

    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let Some(id) = NodeId::from_index(self.nodes.len()) else {
            panic!("node arena is full ({} nodes)", self.nodes.len());
        };
        self.nodes.push(NodeData { kind, parent: None });
        id
    }

    /// Creates a detached element with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidName`] if the element validator rejects
    /// `name`.
    pub fn create_element(&mut self, name: &str) -> BuildResult<NodeId> {
        self.create_element_with(name, &ElementConfig::default())
    }

    /// Creates a detached element.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidName`] if `name` or one of the
    /// configuration's registered attribute names is rejected.
    pub fn create_element_with(
        &mut self,
        name: &str,
        config: &ElementConfig,
    ) -> BuildResult<NodeId> {
        let element = make_element(&self.validators, name, config)?;
        Ok(self.create_node(NodeKind::Element(element)))
    }

    /// Creates detached text, escaped with the markup entities.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create_text_with(text, escape::escape, false)
    }

    /// Creates detached text with a custom escape function and layout.
    pub fn create_text_with(&mut self, text: &str, escape: EscapeFn, block: bool) -> NodeId {
        self.create_node(NodeKind::Text(Text {
            content: text.to_string(),
            escape,
            block,
        }))
    }

    /// Creates a detached CDATA section.
    pub fn create_cdata(&mut self, text: &str) -> NodeId {
        self.create_text_with(text, escape::cdata, false)
    }

    /// Creates detached predefined markup: emitted verbatim, laid out as a
    /// block.
    pub fn create_markup(&mut self, markup: &str) -> NodeId {
        self.create_text_with(markup, escape::verbatim, true)
    }

    /// Creates a detached comment.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.create_node(NodeKind::Comment(Comment {
            content: text.to_string(),
        }))
    }

    /// Creates a detached processing instruction.
    ///
    /// The target must pass the element name validator and may not be
    /// `xml`, which is reserved for the declaration. The default validator
    /// also refuses other `xml`-prefixed targets such as `xml-stylesheet`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidName`] for a rejected target.
    pub fn create_processing_instruction(&mut self, target: &str) -> BuildResult<NodeId> {
        self.validators.check(NameClass::Element, target)?;
        if target.eq_ignore_ascii_case(DECLARATION_TARGET) {
            return Err(BuildError::InvalidName {
                class: NameClass::Element,
                name: target.to_string(),
            });
        }
        Ok(self.create_node(NodeKind::ProcessingInstruction(ProcessingInstruction {
            target: target.to_string(),
            data: Vec::new(),
            attributes: AttributeTable::new(),
        })))
    }

    /// Creates a detached document type declaration. With a `dtd_name` it
    /// renders as `PUBLIC`, otherwise as `SYSTEM`.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidName`] if the element validator rejects `name`.
    /// - [`BuildError::NotAllowed`] if `dtd_name` or `uri` contains `"`.
    pub fn create_doctype(
        &mut self,
        name: &str,
        dtd_name: Option<&str>,
        uri: &str,
    ) -> BuildResult<NodeId> {
        self.validators.check(NameClass::Element, name)?;
        if dtd_name.into_iter().chain([uri]).any(|literal| literal.contains('"')) {
            return Err(BuildError::not_allowed(
                "document type identifiers containing '\"'",
            ));
        }
        Ok(self.create_node(NodeKind::DocType(DocType {
            name: name.to_string(),
            dtd_name: dtd_name.map(str::to_string),
            uri: uri.to_string(),
        })))
    }

    // --- Attachment ---

    fn child_list(&self, parent: NodeId) -> BuildResult<&ChildList> {
        let kind = &self.node(parent).kind;
        kind.children().ok_or_else(|| {
            BuildError::not_allowed(format!("'{}' cannot contain nodes", kind.element_name()))
        })
    }

    /// Checks the single-attachment invariant and rejects cycles.
    fn check_detached(&self, parent: NodeId, child: NodeId) -> BuildResult<()> {
        let name = || self.element_name(child).to_string();
        if child == self.root {
            return Err(BuildError::AlreadyAttached { name: name() });
        }
        match self.parent(child) {
            Some(current) if current == parent => {
                return Err(BuildError::AlreadyAdded { name: name() });
            }
            Some(_) => return Err(BuildError::AlreadyAttached { name: name() }),
            None => {}
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(BuildError::not_allowed(format!(
                "'{}' cannot be attached beneath itself",
                name()
            )));
        }
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        if let Some(list) = self.node_mut(parent).kind.children_mut() {
            list.push(child);
        }
        debug!(
            parent = self.element_name(parent),
            child = self.element_name(child),
            "node attached"
        );
    }

    /// Attaches a detached node as the last child of `parent`.
    ///
    /// Comments are always accepted. Text needs `allows_text`; elements need
    /// `allows_children` and, when validating, a whitelisted name.
    /// Processing instructions and document types only attach at document
    /// level.
    ///
    /// # Errors
    ///
    /// - [`BuildError::NotAllowed`] if the parent's configuration refuses the
    ///   child, or the child is an ancestor of `parent`.
    /// - [`BuildError::InvalidChild`] if the child's name is not whitelisted.
    /// - [`BuildError::AlreadyAdded`] / [`BuildError::AlreadyAttached`] if the
    ///   child already has a parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> BuildResult<()> {
        let list = self.child_list(parent)?;
        let parent_name = self.element_name(parent);
        match &self.node(child).kind {
            NodeKind::Element(element) => list.admit_element(parent_name, &element.name)?,
            NodeKind::Text(_) => list.admit_text(parent_name)?,
            NodeKind::Comment(_) => {}
            NodeKind::ProcessingInstruction(_) | NodeKind::DocType(_) => {
                return Err(BuildError::not_allowed(format!(
                    "'{}' may only appear at document level",
                    self.element_name(child)
                )));
            }
        }
        self.check_detached(parent, child)?;
        self.attach(parent, child);
        Ok(())
    }

    /// Creates an element with the default configuration and appends it.
    ///
    /// # Errors
    ///
    /// See [`Document::add_element_with`].
    pub fn add_element(&mut self, parent: NodeId, name: &str) -> BuildResult<NodeId> {
        self.add_element_with(parent, name, &ElementConfig::default())
    }

    /// Creates an element and appends it. Nothing is allocated if the
    /// parent would refuse it.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidName`] for a rejected name.
    /// - [`BuildError::NotAllowed`] / [`BuildError::InvalidChild`] if the
    ///   parent refuses the element.
    pub fn add_element_with(
        &mut self,
        parent: NodeId,
        name: &str,
        config: &ElementConfig,
    ) -> BuildResult<NodeId> {
        let element = make_element(&self.validators, name, config)?;
        self.child_list(parent)?
            .admit_element(self.element_name(parent), name)?;
        let id = self.create_node(NodeKind::Element(element));
        self.attach(parent, id);
        Ok(id)
    }

    /// Appends text escaped with the markup entities. Empty text is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if the parent refuses text.
    pub fn add_text(&mut self, parent: NodeId, text: &str) -> BuildResult<Option<NodeId>> {
        self.add_text_with(parent, text, escape::escape, false)
    }

    /// Appends text rendered through `escape`. Empty text is skipped unless
    /// `allow_empty` is set.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if the parent refuses text.
    pub fn add_text_with(
        &mut self,
        parent: NodeId,
        text: &str,
        escape: EscapeFn,
        allow_empty: bool,
    ) -> BuildResult<Option<NodeId>> {
        self.append_text(parent, text, escape, allow_empty, false)
    }

    /// Appends a CDATA section. Governed by `allows_text`; empty content
    /// yields an empty section.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if the parent refuses text.
    pub fn add_cdata(&mut self, parent: NodeId, text: &str) -> BuildResult<Option<NodeId>> {
        self.append_text(parent, text, escape::cdata, true, false)
    }

    /// Appends predefined markup, emitted verbatim as a block.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if the parent refuses text.
    pub fn add_markup(&mut self, parent: NodeId, markup: &str) -> BuildResult<Option<NodeId>> {
        self.append_text(parent, markup, escape::verbatim, false, true)
    }

    fn append_text(
        &mut self,
        parent: NodeId,
        text: &str,
        escape: EscapeFn,
        allow_empty: bool,
        block: bool,
    ) -> BuildResult<Option<NodeId>> {
        self.child_list(parent)?
            .admit_text(self.element_name(parent))?;
        if text.is_empty() && !allow_empty {
            return Ok(None);
        }
        let id = self.create_text_with(text, escape, block);
        self.attach(parent, id);
        Ok(Some(id))
    }

    /// Appends a comment. Blank text is skipped. Comments are accepted
    /// whatever the parent's child and text settings.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if `parent` is not an element.
    pub fn add_comment(&mut self, parent: NodeId, text: &str) -> BuildResult<Option<NodeId>> {
        self.child_list(parent)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let id = self.create_comment(text);
        self.attach(parent, id);
        Ok(Some(id))
    }

    /// Extends the whitelist of a validating element. Only elements added
    /// afterwards are affected.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if `id` is not an element.
    pub fn permit_children<I, S>(&mut self, id: NodeId, names: I) -> BuildResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = &mut self.node_mut(id).kind;
        let name = kind.element_name().to_string();
        let list = kind
            .children_mut()
            .ok_or_else(|| BuildError::not_allowed(format!("'{name}' cannot contain nodes")))?;
        list.permit(names);
        Ok(())
    }

    // --- Document-level children ---

    /// Appends a detached processing instruction, document type or comment
    /// to the document level, after any already there.
    ///
    /// # Errors
    ///
    /// - [`BuildError::NotAllowed`] for elements and text.
    /// - [`BuildError::AlreadyAdded`] / [`BuildError::AlreadyAttached`] if the
    ///   node already has a parent.
    pub fn add_prolog(&mut self, child: NodeId) -> BuildResult<()> {
        match &self.node(child).kind {
            NodeKind::ProcessingInstruction(_) | NodeKind::DocType(_) | NodeKind::Comment(_) => {}
            NodeKind::Element(_) | NodeKind::Text(_) => {
                return Err(BuildError::not_allowed(format!(
                    "'{}' cannot appear at document level",
                    self.element_name(child)
                )));
            }
        }
        self.check_detached(self.root, child)?;
        self.node_mut(child).parent = Some(self.root);
        self.prolog.push(child);
        debug!(child = self.element_name(child), "document-level node attached");
        Ok(())
    }

    /// Adds a document-level comment. Blank text is skipped.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature mirrors [`Document::add_comment`].
    pub fn add_document_comment(&mut self, text: &str) -> BuildResult<Option<NodeId>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let id = self.create_comment(text);
        self.add_prolog(id)?;
        Ok(Some(id))
    }

    /// Creates a processing instruction and adds it at document level.
    ///
    /// # Errors
    ///
    /// See [`Document::create_processing_instruction`].
    pub fn add_processing_instruction(&mut self, target: &str) -> BuildResult<NodeId> {
        let id = self.create_processing_instruction(target)?;
        self.add_prolog(id)?;
        Ok(id)
    }

    /// Creates a document type declaration and adds it at document level.
    ///
    /// # Errors
    ///
    /// See [`Document::create_doctype`].
    pub fn set_doctype(
        &mut self,
        name: &str,
        dtd_name: Option<&str>,
        uri: &str,
    ) -> BuildResult<NodeId> {
        let id = self.create_doctype(name, dtd_name, uri)?;
        self.add_prolog(id)?;
        Ok(id)
    }

    /// Appends a data fragment to a processing instruction.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if `pi` is not a processing
    /// instruction or `data` contains `?>`.
    pub fn add_data(&mut self, pi: NodeId, data: &str) -> BuildResult<()> {
        if data.contains("?>") {
            return Err(BuildError::not_allowed(
                "processing instruction data containing '?>'",
            ));
        }
        match &mut self.node_mut(pi).kind {
            NodeKind::ProcessingInstruction(instruction) => {
                instruction.data.push(data.to_string());
                Ok(())
            }
            other => Err(BuildError::not_allowed(format!(
                "'{}' does not take instruction data",
                other.element_name()
            ))),
        }
    }

    // --- Attributes and namespaces ---

    fn table_mut(&mut self, id: NodeId) -> BuildResult<(&NameValidators, &mut AttributeTable)> {
        let Self {
            nodes, validators, ..
        } = self;
        let kind = &mut nodes[id.as_index()].kind;
        let label = describe(kind);
        match kind.attributes_mut() {
            Some(table) => Ok((&*validators, table)),
            None => Err(BuildError::not_allowed(format!(
                "{label} cannot carry attributes"
            ))),
        }
    }

    /// Sets, appends to, or deletes an attribute and returns the previous
    /// value. See [`AttributeTable::set_attribute`].
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidName`] for a rejected name.
    /// - [`BuildError::NotAllowed`] if the node carries no attributes, or the
    ///   name is not registered in checking mode.
    pub fn update_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: Option<&str>,
        append: Option<&str>,
    ) -> BuildResult<Option<String>> {
        let (validators, table) = self.table_mut(id)?;
        table.set_attribute(validators, name, value, append)
    }

    /// Sets an attribute, replacing any previous value.
    ///
    /// # Errors
    ///
    /// See [`Document::update_attribute`].
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> BuildResult<Option<String>> {
        self.update_attribute(id, name, Some(value), None)
    }

    /// Appends to an attribute, joining with `separator` when a non-blank
    /// value is already present.
    ///
    /// # Errors
    ///
    /// See [`Document::update_attribute`].
    pub fn append_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
        separator: &str,
    ) -> BuildResult<Option<String>> {
        self.update_attribute(id, name, Some(value), Some(separator))
    }

    /// Deletes an attribute.
    ///
    /// # Errors
    ///
    /// See [`Document::update_attribute`].
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> BuildResult<Option<String>> {
        self.update_attribute(id, name, None, None)
    }

    /// Sets an attribute whose value must be a name token.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidName`] if the nmtoken validator rejects
    /// `value`; otherwise see [`Document::update_attribute`].
    pub fn set_token_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> BuildResult<Option<String>> {
        self.validators.check(NameClass::NmToken, value)?;
        self.set_attribute(id, name, value)
    }

    /// Registers attribute names accepted in checking mode.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidName`] if any name is rejected; nothing is
    ///   registered then.
    /// - [`BuildError::NotAllowed`] if the node carries no attributes.
    pub fn register_attributes<I, S>(&mut self, id: NodeId, names: I) -> BuildResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (validators, table) = self.table_mut(id)?;
        table.register_attributes(validators, names)
    }

    /// Ranks the given attribute names first when rendering.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if the node carries no attributes.
    pub fn register_sequence<I, S>(&mut self, id: NodeId, names: I) -> BuildResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.table_mut(id)?.1.register_sequence(names);
        Ok(())
    }

    /// Replaces the attribute display order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if the node carries no attributes.
    pub fn set_sort_order(&mut self, id: NodeId, order: SortOrder) -> BuildResult<()> {
        self.table_mut(id)?.1.set_sort_order(order);
        Ok(())
    }

    /// Builds a namespace under this document's validators.
    ///
    /// # Errors
    ///
    /// See [`Namespace::new`].
    pub fn namespace(&self, identifier: &str, prefix: Option<&str>) -> BuildResult<Namespace> {
        Namespace::new(identifier, prefix, &self.validators)
    }

    /// Declares a namespace on a node. Returns false if an equal
    /// declaration was already there.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotAllowed`] if the node carries no attributes.
    pub fn set_namespace(&mut self, id: NodeId, namespace: Namespace) -> BuildResult<bool> {
        Ok(self.table_mut(id)?.1.set_namespace(namespace))
    }

    /// Builds a namespace and declares it on a node.
    ///
    /// # Errors
    ///
    /// See [`Namespace::new`] and [`Document::set_namespace`].
    pub fn declare_namespace(
        &mut self,
        id: NodeId,
        identifier: &str,
        prefix: Option<&str>,
    ) -> BuildResult<bool> {
        let namespace = self.namespace(identifier, prefix)?;
        self.set_namespace(id, namespace)
    }

    // --- Rendering ---

    /// Renders the document-level children and then the root element.
    /// Empty elements self-close.
    #[must_use]
    pub fn render(&self, pretty: bool) -> String {
        serial::render_document(self, pretty, Closing::SelfClose)
    }

    /// Renders the document with an explicit closing policy.
    #[must_use]
    pub fn render_with(&self, pretty: bool, closing: Closing) -> String {
        serial::render_document(self, pretty, closing)
    }

    /// Renders one node and its descendants at the given indentation level.
    #[must_use]
    pub fn render_node(&self, id: NodeId, indent: usize, pretty: bool, self_closing: bool) -> String {
        serial::render_node(self, id, indent, pretty, Closing::from(self_closing))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn make_element(
    validators: &NameValidators,
    name: &str,
    config: &ElementConfig,
) -> BuildResult<Element> {
    validators.check(NameClass::Element, name)?;
    let mut attributes = if !config.allows_attributes {
        AttributeTable::forbidding()
    } else if config.checks_attributes {
        AttributeTable::checking()
    } else {
        AttributeTable::new()
    };
    if config.allows_attributes && !config.permitted_attributes.is_empty() {
        attributes.register_attributes(validators, &config.permitted_attributes)?;
    }
    Ok(Element {
        name: name.to_string(),
        attributes,
        children: ChildList::new(config.child_policy(), config.permitted_children.iter().cloned()),
        block: config.block,
    })
}

/// Spells UTF-8 labels (`utf8`, `unicode-1-1-utf-8`, ...) canonically and
/// keeps every other label as given, warning when `encoding_rs` does not
/// know it.
fn declared_encoding(label: &str) -> String {
    match Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) if encoding == UTF_8 => encoding.name().to_string(),
        Some(_) => label.to_string(),
        None => {
            warn!(label, "declaring an encoding label unknown to encoding_rs");
            label.to_string()
        }
    }
}

fn describe(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Element(_) => "an element",
        NodeKind::Text(_) => "text",
        NodeKind::Comment(_) => "a comment",
        NodeKind::ProcessingInstruction(_) => "a processing instruction",
        NodeKind::DocType(_) => "a document type",
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).parent;
        Some(current)
    }
}
