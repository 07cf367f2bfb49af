//! Arena-based DOM node tree.
//!
//! This module implements the core tree representation using arena allocation
//! with typed indices. All nodes live in a contiguous `Vec<NodeData>` owned by
//! the [`Dom`], and are referenced by [`NodeId`], a newtype over `NonZeroU32`.
//!
//! One `Dom` can hold several documents. Every node records the Document
//! node that created it, and the mutation operations refuse to link nodes
//! owned by different documents.
//!
//! # Architecture
//!
//! Navigation links (parent, first\_child, last\_child, next\_sibling,
//! prev\_sibling), the owner document and an attribute's owner element are
//! all arena indices. The owning direction is parent to children; every
//! other link is a plain index, so there are no reference cycles and every
//! hop is O(1). Detached nodes stay allocated until the `Dom` is dropped.
//!
//! The structural operations live in submodules: `mutation` (insert,
//! replace, remove, append), `clone` (clone and import), `text`
//! (`textContent`, normalization, value updates) and `attributes` (the
//! per-element attribute map).

mod attributes;
mod clone;
mod mutation;
mod node;
mod options;
mod text;

pub use node::{NodeKind, NodeType, QualifiedName};
pub use options::DomOptions;

use std::num::NonZeroU32;

use tracing::{debug, instrument};

use crate::error::{DomError, DomResult};
use crate::util::qname::{
    is_valid_name, is_valid_ncname, split_qname, validate_qname, XMLNS_NAMESPACE, XML_NAMESPACE,
};

/// A typed index into the node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, meaning it can never be zero
/// and `Option<NodeId>` has the same size as `NodeId` (niche optimization).
/// An id is only meaningful for the `Dom` that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0 or does not fit in a `u32`.
    #[allow(clippy::expect_used)]
    fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index).expect("node arena exceeded u32::MAX entries");
        Self(NonZeroU32::new(raw).expect("NodeId index must be non-zero"))
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Storage for a single node in the arena.
///
/// Each node stores its kind (element, text, comment, etc.), its owner
/// document, and links to parent, children, and siblings for tree
/// navigation. Access individual nodes via [`Dom::node`].
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// The Document node that created this node. `None` for documents.
    pub owner_document: Option<NodeId>,
    /// Parent node, if any.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind, owner_document: Option<NodeId>) -> Self {
        Self {
            kind,
            owner_document,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// How a constructor treats the name it is given.
#[derive(Debug, Clone, Copy)]
enum Naming<'a> {
    /// DOM Level 1: no namespace triple.
    Plain,
    /// DOM Level 2: split the qualified name and bind it to a namespace.
    Namespaced(Option<&'a str>),
}

/// An arena of DOM nodes spanning one or more documents.
///
/// All tree operations go through `&Dom` (navigation) or `&mut Dom`
/// (construction and mutation). Because every mutating call borrows the
/// whole arena mutably, a `Dom` shared between threads must sit behind a
/// single lock such as `RwLock<Dom>`.
///
/// # Examples
///
/// ```
/// use domcore::Dom;
///
/// let mut dom = Dom::new();
/// let doc = dom.create_document();
/// let svg = dom.create_element(doc, "svg").unwrap();
/// dom.append_child(doc, svg).unwrap();
/// assert_eq!(dom.document_element(doc), Some(svg));
/// assert_eq!(dom.node_name(svg), "svg");
/// ```
#[derive(Debug)]
pub struct Dom {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    options: DomOptions,
}

impl Dom {
    /// Creates an empty arena with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(DomOptions::default())
    }

    /// Creates an empty arena with the given options.
    #[must_use]
    pub fn with_options(options: DomOptions) -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document, None));
        Self { nodes, options }
    }

    /// Returns the options this arena was created with.
    #[must_use]
    pub fn options(&self) -> &DomOptions {
        &self.options
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this `Dom`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    /// Returns a mutable reference to the `NodeData` for the given node.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns the total number of nodes in the arena, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1 // subtract placeholder at index 0
    }

    fn alloc(&mut self, kind: NodeKind, owner_document: Option<NodeId>) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind, owner_document));
        NodeId::from_index(index)
    }

    // --- Construction ---

    /// Creates a new, empty Document node.
    #[instrument(level = "trace", skip(self))]
    pub fn create_document(&mut self) -> NodeId {
        self.alloc(NodeKind::Document, None)
    }

    /// Creates a node of the given type owned by `doc`, without a value
    /// and without namespace support.
    ///
    /// # Errors
    ///
    /// Fails if `doc` is not a Document (`WrongDocument`), if the type needs
    /// a value (`MissingValue`), if `node_type` is `Document`
    /// (`NotSupported`), or if the name is invalid for the type
    /// (`InvalidCharacter`).
    pub fn create_node(&mut self, doc: NodeId, node_type: NodeType, name: &str) -> DomResult<NodeId> {
        self.build_node(doc, node_type, name, None, Naming::Plain)
    }

    /// Creates a value-bearing node (text, comment, attribute, ...) owned by
    /// `doc`.
    ///
    /// # Errors
    ///
    /// As [`create_node`](Dom::create_node), plus `NoDataAllowed` when the
    /// type carries no value.
    pub fn create_node_with_value(
        &mut self,
        doc: NodeId,
        node_type: NodeType,
        name: &str,
        value: &str,
    ) -> DomResult<NodeId> {
        self.build_node(doc, node_type, name, Some(value), Naming::Plain)
    }

    /// Creates a namespace-aware element or attribute owned by `doc`.
    ///
    /// An empty `namespace` is treated as no namespace.
    ///
    /// # Errors
    ///
    /// As [`create_node`](Dom::create_node), plus `Namespace` for a
    /// malformed qualified name, a type other than Element or Attribute, or
    /// a prefix/namespace combination the namespace rules forbid.
    pub fn create_node_ns(
        &mut self,
        doc: NodeId,
        node_type: NodeType,
        namespace: Option<&str>,
        qualified_name: &str,
    ) -> DomResult<NodeId> {
        self.build_node(doc, node_type, qualified_name, None, Naming::Namespaced(namespace))
    }

    /// Creates a namespace-aware node that carries a value (in practice, an
    /// attribute).
    ///
    /// # Errors
    ///
    /// As [`create_node_ns`](Dom::create_node_ns) and
    /// [`create_node_with_value`](Dom::create_node_with_value).
    pub fn create_node_with_value_ns(
        &mut self,
        doc: NodeId,
        node_type: NodeType,
        namespace: Option<&str>,
        qualified_name: &str,
        value: &str,
    ) -> DomResult<NodeId> {
        self.build_node(
            doc,
            node_type,
            qualified_name,
            Some(value),
            Naming::Namespaced(namespace),
        )
    }

    #[instrument(level = "trace", skip(self))]
    fn build_node(
        &mut self,
        doc: NodeId,
        node_type: NodeType,
        name: &str,
        value: Option<&str>,
        naming: Naming<'_>,
    ) -> DomResult<NodeId> {
        if self.node_type(doc) != NodeType::Document {
            debug!(?doc, "owner is not a document node");
            return Err(DomError::WrongDocument);
        }
        if node_type == NodeType::Document {
            return Err(DomError::NotSupported(
                "document nodes are created with create_document".to_string(),
            ));
        }
        match (node_type.carries_value(), value) {
            (true, None) => return Err(DomError::MissingValue(node_type)),
            (false, Some(_)) => return Err(DomError::NoDataAllowed(node_type)),
            _ => {}
        }

        if let Some(fixed) = node_type.fixed_name() {
            if name != fixed {
                return Err(DomError::InvalidCharacter(name.to_string()));
            }
        } else {
            self.check_name(name)?;
        }

        let qualified = match naming {
            Naming::Plain => QualifiedName::plain(name),
            Naming::Namespaced(namespace) => {
                if !matches!(node_type, NodeType::Element | NodeType::Attribute) {
                    return Err(DomError::Namespace(format!(
                        "{node_type} nodes cannot be namespace-qualified"
                    )));
                }
                self.qualify(namespace, name, node_type == NodeType::Attribute)?
            }
        };

        let value = value.unwrap_or_default().to_string();
        let kind = match node_type {
            NodeType::Element => NodeKind::Element {
                name: qualified,
                attributes: Vec::new(),
            },
            NodeType::Attribute => NodeKind::Attribute {
                name: qualified,
                value,
                owner_element: None,
            },
            NodeType::Text => NodeKind::Text { content: value },
            NodeType::CDataSection => NodeKind::CData { content: value },
            NodeType::Comment => NodeKind::Comment { content: value },
            NodeType::ProcessingInstruction => NodeKind::ProcessingInstruction {
                target: name.to_string(),
                data: value,
            },
            NodeType::EntityReference => NodeKind::EntityReference {
                name: name.to_string(),
            },
            NodeType::Entity => NodeKind::Entity {
                name: name.to_string(),
            },
            NodeType::Notation => NodeKind::Notation {
                name: name.to_string(),
            },
            NodeType::DocumentType => NodeKind::DocumentType {
                name: name.to_string(),
                public_id: None,
                system_id: None,
            },
            NodeType::DocumentFragment => NodeKind::DocumentFragment,
            NodeType::Document => {
                return Err(DomError::NotSupported(
                    "document nodes are created with create_document".to_string(),
                ))
            }
        };
        Ok(self.alloc(kind, Some(doc)))
    }

    /// Checks a node name against the configured strictness.
    fn check_name(&self, name: &str) -> DomResult<()> {
        let valid = if self.options.strict_names {
            is_valid_name(name)
        } else {
            !name.is_empty()
        };
        if valid {
            Ok(())
        } else {
            Err(DomError::InvalidCharacter(name.to_string()))
        }
    }

    /// Splits and validates a qualified name for a namespace-aware node.
    fn qualify(
        &self,
        namespace: Option<&str>,
        qualified_name: &str,
        is_attribute: bool,
    ) -> DomResult<QualifiedName> {
        if let Some(problem) = validate_qname(qualified_name) {
            return Err(DomError::Namespace(format!("`{qualified_name}`: {problem}")));
        }
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let (prefix, local) = split_qname(qualified_name);
        self.check_namespace(prefix, qualified_name, namespace, is_attribute)?;
        Ok(QualifiedName {
            name: qualified_name.to_string(),
            prefix: prefix.map(str::to_string),
            local_name: Some(local.to_string()),
            namespace: namespace.map(str::to_string),
        })
    }

    /// Enforces the `xml`/`xmlns` binding rules of Namespaces in XML.
    fn check_namespace(
        &self,
        prefix: Option<&str>,
        qualified_name: &str,
        namespace: Option<&str>,
        is_attribute: bool,
    ) -> DomResult<()> {
        if !self.options.namespace_checks {
            return Ok(());
        }
        if let (Some(prefix), None) = (prefix, namespace) {
            return Err(DomError::Namespace(format!(
                "prefix `{prefix}` requires a namespace URI"
            )));
        }
        if prefix == Some("xml") && namespace != Some(XML_NAMESPACE) {
            return Err(DomError::Namespace(format!(
                "prefix `xml` must be bound to {XML_NAMESPACE}"
            )));
        }
        let is_xmlns = is_attribute && (prefix == Some("xmlns") || qualified_name == "xmlns");
        if is_xmlns && namespace != Some(XMLNS_NAMESPACE) {
            return Err(DomError::Namespace(format!(
                "`{qualified_name}` must be bound to {XMLNS_NAMESPACE}"
            )));
        }
        if !is_xmlns && namespace == Some(XMLNS_NAMESPACE) {
            return Err(DomError::Namespace(format!(
                "{XMLNS_NAMESPACE} is reserved for namespace declarations"
            )));
        }
        Ok(())
    }

    /// Creates an element (DOM Level 1, no namespace).
    ///
    /// # Errors
    ///
    /// See [`create_node`](Dom::create_node).
    pub fn create_element(&mut self, doc: NodeId, tag_name: &str) -> DomResult<NodeId> {
        self.create_node(doc, NodeType::Element, tag_name)
    }

    /// Creates a namespace-aware element.
    ///
    /// # Errors
    ///
    /// See [`create_node_ns`](Dom::create_node_ns).
    pub fn create_element_ns(
        &mut self,
        doc: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
    ) -> DomResult<NodeId> {
        self.create_node_ns(doc, NodeType::Element, namespace, qualified_name)
    }

    /// Creates an attribute with an empty value.
    ///
    /// # Errors
    ///
    /// See [`create_node`](Dom::create_node).
    pub fn create_attribute(&mut self, doc: NodeId, name: &str) -> DomResult<NodeId> {
        self.create_node_with_value(doc, NodeType::Attribute, name, "")
    }

    /// Creates a namespace-aware attribute with an empty value.
    ///
    /// # Errors
    ///
    /// See [`create_node_ns`](Dom::create_node_ns).
    pub fn create_attribute_ns(
        &mut self,
        doc: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
    ) -> DomResult<NodeId> {
        self.create_node_with_value_ns(doc, NodeType::Attribute, namespace, qualified_name, "")
    }

    /// Creates a text node.
    ///
    /// # Errors
    ///
    /// Fails with `WrongDocument` if `doc` is not a document.
    pub fn create_text_node(&mut self, doc: NodeId, data: &str) -> DomResult<NodeId> {
        self.create_node_with_value(doc, NodeType::Text, "#text", data)
    }

    /// Creates a comment node.
    ///
    /// # Errors
    ///
    /// Fails with `WrongDocument` if `doc` is not a document.
    pub fn create_comment(&mut self, doc: NodeId, data: &str) -> DomResult<NodeId> {
        self.create_node_with_value(doc, NodeType::Comment, "#comment", data)
    }

    /// Creates a CDATA section.
    ///
    /// # Errors
    ///
    /// Fails with `WrongDocument` if `doc` is not a document.
    pub fn create_cdata_section(&mut self, doc: NodeId, data: &str) -> DomResult<NodeId> {
        self.create_node_with_value(doc, NodeType::CDataSection, "#cdata-section", data)
    }

    /// Creates a processing instruction.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidCharacter` if `target` is not a valid name.
    pub fn create_processing_instruction(
        &mut self,
        doc: NodeId,
        target: &str,
        data: &str,
    ) -> DomResult<NodeId> {
        self.create_node_with_value(doc, NodeType::ProcessingInstruction, target, data)
    }

    /// Creates an entity reference.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidCharacter` if `name` is not a valid name.
    pub fn create_entity_reference(&mut self, doc: NodeId, name: &str) -> DomResult<NodeId> {
        self.create_node(doc, NodeType::EntityReference, name)
    }

    /// Creates an empty document fragment.
    ///
    /// # Errors
    ///
    /// Fails with `WrongDocument` if `doc` is not a document.
    pub fn create_document_fragment(&mut self, doc: NodeId) -> DomResult<NodeId> {
        self.create_node(doc, NodeType::DocumentFragment, "#document-fragment")
    }

    /// Creates a document type node, e.g. for
    /// `<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "...">`.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidCharacter` if `name` is not a valid name.
    pub fn create_document_type(
        &mut self,
        doc: NodeId,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> DomResult<NodeId> {
        let id = self.create_node(doc, NodeType::DocumentType, name)?;
        if let NodeKind::DocumentType {
            public_id: public,
            system_id: system,
            ..
        } = &mut self.node_mut(id).kind
        {
            *public = public_id.map(str::to_string);
            *system = system_id.map(str::to_string);
        }
        Ok(id)
    }

    // --- Node properties ---

    /// Returns the node's type.
    #[must_use]
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).kind.node_type()
    }

    /// Returns the DOM `nodeName`: the tag or attribute name, the PI target,
    /// or a fixed `#...` constant.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> &str {
        self.node(id).kind.name()
    }

    /// Returns the DOM `nodeValue`, `None` for types that carry no value.
    #[must_use]
    pub fn node_value(&self, id: NodeId) -> Option<&str> {
        self.node(id).kind.value()
    }

    /// Returns the namespace URI of an element or attribute, if any.
    #[must_use]
    pub fn namespace_uri(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .kind
            .qualified_name()
            .and_then(|q| q.namespace.as_deref())
    }

    /// Returns the namespace prefix of an element or attribute, if any.
    #[must_use]
    pub fn prefix(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .kind
            .qualified_name()
            .and_then(|q| q.prefix.as_deref())
    }

    /// Returns the local name of a namespace-aware element or attribute.
    ///
    /// Nodes created through the Level 1 constructors have no local name.
    #[must_use]
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .kind
            .qualified_name()
            .and_then(|q| q.local_name.as_deref())
    }

    /// Changes the namespace prefix of a namespace-aware element or
    /// attribute. `None` or an empty prefix removes it.
    ///
    /// The qualified name is rebuilt from the new prefix and the local name.
    /// The namespace URI is unchanged, so the same binding rules as at
    /// creation apply.
    ///
    /// # Errors
    ///
    /// - `Namespace` if the node was not created namespace-aware or the
    ///   new prefix conflicts with its namespace URI.
    /// - `InvalidCharacter` if the prefix is not an `NCName`.
    #[instrument(level = "trace", skip(self))]
    pub fn set_prefix(&mut self, id: NodeId, prefix: Option<&str>) -> DomResult<()> {
        let is_attribute = self.node_type(id) == NodeType::Attribute;
        let Some(current) = self.node(id).kind.qualified_name() else {
            return Err(DomError::Namespace(format!(
                "{} nodes have no prefix",
                self.node_type(id)
            )));
        };
        let Some(local) = current.local_name.clone() else {
            debug!(?id, "prefix change on a node without namespace support");
            return Err(DomError::Namespace(
                "node was not created with namespace support".to_string(),
            ));
        };
        let namespace = current.namespace.clone();

        let prefix = prefix.filter(|p| !p.is_empty());
        let qualified_name = match prefix {
            Some(p) => {
                if !is_valid_ncname(p) {
                    return Err(DomError::InvalidCharacter(p.to_string()));
                }
                format!("{p}:{local}")
            }
            None => local,
        };
        self.check_namespace(prefix, &qualified_name, namespace.as_deref(), is_attribute)?;

        if let Some(name) = self.node_mut(id).kind.qualified_name_mut() {
            name.prefix = prefix.map(str::to_string);
            name.name = qualified_name;
        }
        Ok(())
    }

    /// Returns the Document node that created this node. `None` for
    /// documents.
    #[must_use]
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).owner_document
    }

    /// Returns the document a node belongs to, counting a document as
    /// belonging to itself.
    pub(crate) fn document_of(&self, id: NodeId) -> NodeId {
        self.node(id).owner_document.unwrap_or(id)
    }

    /// Returns the first element child of a document.
    #[must_use]
    pub fn document_element(&self, doc: NodeId) -> Option<NodeId> {
        self.children(doc)
            .find(|&id| self.node_type(id) == NodeType::Element)
    }

    /// Returns the document type child of a document, if any.
    #[must_use]
    pub fn doctype(&self, doc: NodeId) -> Option<NodeId> {
        self.children(doc)
            .find(|&id| self.node_type(id) == NodeType::DocumentType)
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// Returns `true` if the node has at least one child.
    #[must_use]
    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        self.node(id).first_child.is_some()
    }

    /// Returns the number of children (`NodeList.length`).
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Returns the child at `index` (`NodeList.item`).
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).nth(index)
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            dom: self,
            next: self.node(id).first_child,
        }
    }

    /// Returns an iterator over a node and its ancestors (walking up to root).
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            dom: self,
            next: Some(id),
        }
    }

    /// Returns an iterator over all descendants of a node (depth-first).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            dom: self,
            root: id,
            next: self.first_child(id),
        }
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    pub(crate) fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    dom: &'a Dom,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.dom.node(current).next_sibling;
        Some(current)
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    dom: &'a Dom,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.dom.node(current).parent;
        Some(current)
    }
}

/// Depth-first iterator over all descendants of a node, in document order.
pub struct Descendants<'a> {
    dom: &'a Dom,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        // Try to go deeper first
        if let Some(child) = self.dom.first_child(current) {
            self.next = Some(child);
            return Some(current);
        }

        // Try next sibling
        if let Some(sibling) = self.dom.next_sibling(current) {
            self.next = Some(sibling);
            return Some(current);
        }

        // Walk up to find an ancestor with a next sibling
        let mut ancestor = self.dom.parent(current);
        while let Some(anc) = ancestor {
            if anc == self.root {
                self.next = None;
                return Some(current);
            }
            if let Some(sibling) = self.dom.next_sibling(anc) {
                self.next = Some(sibling);
                return Some(current);
            }
            ancestor = self.dom.parent(anc);
        }

        self.next = None;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::qname::SVG_NAMESPACE;

    #[test]
    fn test_new_dom_is_empty() {
        let dom = Dom::new();
        assert_eq!(dom.node_count(), 0);
    }

    #[test]
    fn test_create_document() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        assert_eq!(dom.node_type(doc), NodeType::Document);
        assert_eq!(dom.node_name(doc), "#document");
        assert_eq!(dom.node_value(doc), None);
        assert_eq!(dom.owner_document(doc), None);
        assert_eq!(dom.parent(doc), None);
        assert!(!dom.has_child_nodes(doc));
    }

    #[test]
    fn test_create_element_sets_owner() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let rect = dom.create_element(doc, "rect")?;

        assert_eq!(dom.node_type(rect), NodeType::Element);
        assert_eq!(dom.node_name(rect), "rect");
        assert_eq!(dom.owner_document(rect), Some(doc));
        assert_eq!(dom.parent(rect), None);
        assert_eq!(dom.local_name(rect), None);
        assert_eq!(dom.namespace_uri(rect), None);
        Ok(())
    }

    #[test]
    fn test_create_element_ns_splits_name() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let rect = dom.create_element_ns(doc, Some(SVG_NAMESPACE), "svg:rect")?;

        assert_eq!(dom.node_name(rect), "svg:rect");
        assert_eq!(dom.prefix(rect), Some("svg"));
        assert_eq!(dom.local_name(rect), Some("rect"));
        assert_eq!(dom.namespace_uri(rect), Some(SVG_NAMESPACE));
        Ok(())
    }

    #[test]
    fn test_empty_namespace_is_none() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let g = dom.create_element_ns(doc, Some(""), "g")?;
        assert_eq!(dom.namespace_uri(g), None);
        assert_eq!(dom.local_name(g), Some("g"));
        Ok(())
    }

    #[test]
    fn test_value_bearing_constructors() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();

        let text = dom.create_text_node(doc, "hello")?;
        assert_eq!(dom.node_name(text), "#text");
        assert_eq!(dom.node_value(text), Some("hello"));

        let comment = dom.create_comment(doc, "note")?;
        assert_eq!(dom.node_name(comment), "#comment");
        assert_eq!(dom.node_value(comment), Some("note"));

        let cdata = dom.create_cdata_section(doc, "x < y")?;
        assert_eq!(dom.node_type(cdata), NodeType::CDataSection);
        assert_eq!(dom.node_value(cdata), Some("x < y"));

        let pi = dom.create_processing_instruction(doc, "xml-stylesheet", "href=\"s.css\"")?;
        assert_eq!(dom.node_name(pi), "xml-stylesheet");
        assert_eq!(dom.node_value(pi), Some("href=\"s.css\""));

        let attr = dom.create_attribute(doc, "width")?;
        assert_eq!(dom.node_value(attr), Some(""));
        Ok(())
    }

    #[test]
    fn test_value_required_for_text() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        assert_eq!(
            dom.create_node(doc, NodeType::Text, "#text"),
            Err(DomError::MissingValue(NodeType::Text))
        );
    }

    #[test]
    fn test_value_rejected_for_element() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        assert_eq!(
            dom.create_node_with_value(doc, NodeType::Element, "g", "x"),
            Err(DomError::NoDataAllowed(NodeType::Element))
        );
    }

    #[test]
    fn test_document_type_not_constructible_generically() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let result = dom.create_node(doc, NodeType::Document, "#document");
        assert!(matches!(result, Err(DomError::NotSupported(_))));
    }

    #[test]
    fn test_fixed_name_must_match() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        assert_eq!(
            dom.create_node_with_value(doc, NodeType::Text, "text", "x"),
            Err(DomError::InvalidCharacter("text".to_string()))
        );
    }

    #[test]
    fn test_invalid_element_name() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        assert_eq!(
            dom.create_element(doc, "1rect"),
            Err(DomError::InvalidCharacter("1rect".to_string()))
        );
        assert_eq!(
            dom.create_element(doc, ""),
            Err(DomError::InvalidCharacter(String::new()))
        );
    }

    #[test]
    fn test_relaxed_names() -> DomResult<()> {
        let mut dom = Dom::with_options(DomOptions::default().strict_names(false));
        let doc = dom.create_document();
        let odd = dom.create_element(doc, "1rect")?;
        assert_eq!(dom.node_name(odd), "1rect");
        assert!(dom.create_element(doc, "").is_err());
        Ok(())
    }

    #[test]
    fn test_owner_must_be_document() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let g = dom.create_element(doc, "g")?;
        assert_eq!(dom.create_element(g, "rect"), Err(DomError::WrongDocument));
        Ok(())
    }

    #[test]
    fn test_namespace_only_on_elements_and_attributes() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let result = dom.create_node_with_value_ns(
            doc,
            NodeType::Text,
            Some(SVG_NAMESPACE),
            "#text",
            "x",
        );
        assert!(matches!(result, Err(DomError::Namespace(_))));
    }

    #[test]
    fn test_prefix_without_namespace() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let result = dom.create_element_ns(doc, None, "svg:rect");
        assert!(matches!(result, Err(DomError::Namespace(_))));
    }

    #[test]
    fn test_malformed_qname() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let result = dom.create_element_ns(doc, Some(SVG_NAMESPACE), "a:b:c");
        assert!(matches!(result, Err(DomError::Namespace(_))));
    }

    #[test]
    fn test_xml_prefix_binding() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let ok = dom.create_attribute_ns(doc, Some(XML_NAMESPACE), "xml:space")?;
        assert_eq!(dom.local_name(ok), Some("space"));

        let bad = dom.create_attribute_ns(doc, Some(SVG_NAMESPACE), "xml:space");
        assert!(matches!(bad, Err(DomError::Namespace(_))));
        Ok(())
    }

    #[test]
    fn test_xmlns_binding() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        dom.create_attribute_ns(doc, Some(XMLNS_NAMESPACE), "xmlns")?;
        dom.create_attribute_ns(doc, Some(XMLNS_NAMESPACE), "xmlns:svg")?;

        let wrong_ns = dom.create_attribute_ns(doc, Some(SVG_NAMESPACE), "xmlns:svg");
        assert!(matches!(wrong_ns, Err(DomError::Namespace(_))));

        let reserved = dom.create_element_ns(doc, Some(XMLNS_NAMESPACE), "foo");
        assert!(matches!(reserved, Err(DomError::Namespace(_))));
        Ok(())
    }

    #[test]
    fn test_namespace_checks_disabled() -> DomResult<()> {
        let mut dom = Dom::with_options(DomOptions::default().namespace_checks(false));
        let doc = dom.create_document();
        let el = dom.create_element_ns(doc, None, "svg:rect")?;
        assert_eq!(dom.prefix(el), Some("svg"));
        assert_eq!(dom.namespace_uri(el), None);
        Ok(())
    }

    #[test]
    fn test_set_prefix_rebuilds_node_name() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let rect = dom.create_element_ns(doc, Some(SVG_NAMESPACE), "svg:rect")?;

        dom.set_prefix(rect, Some("s"))?;
        assert_eq!(dom.prefix(rect), Some("s"));
        assert_eq!(dom.node_name(rect), "s:rect");
        assert_eq!(dom.local_name(rect), Some("rect"));
        assert_eq!(dom.namespace_uri(rect), Some(SVG_NAMESPACE));

        dom.set_prefix(rect, None)?;
        assert_eq!(dom.prefix(rect), None);
        assert_eq!(dom.node_name(rect), "rect");
        Ok(())
    }

    #[test]
    fn test_set_prefix_errors() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let plain = dom.create_element(doc, "rect")?;
        let text = dom.create_text_node(doc, "t")?;
        let no_ns = dom.create_element_ns(doc, None, "rect")?;
        let svg = dom.create_element_ns(doc, Some(SVG_NAMESPACE), "rect")?;

        assert!(matches!(dom.set_prefix(plain, Some("p")), Err(DomError::Namespace(_))));
        assert!(matches!(dom.set_prefix(text, Some("p")), Err(DomError::Namespace(_))));
        assert!(matches!(dom.set_prefix(no_ns, Some("p")), Err(DomError::Namespace(_))));
        assert!(matches!(dom.set_prefix(svg, Some("xml")), Err(DomError::Namespace(_))));
        assert_eq!(
            dom.set_prefix(svg, Some("1p")),
            Err(DomError::InvalidCharacter("1p".to_string()))
        );
        // Failed calls leave the name alone.
        assert_eq!(dom.node_name(svg), "rect");
        Ok(())
    }

    #[test]
    fn test_create_document_type() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let dt = dom.create_document_type(
            doc,
            "svg",
            Some("-//W3C//DTD SVG 1.1//EN"),
            Some("http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd"),
        )?;
        assert_eq!(dom.node_type(dt), NodeType::DocumentType);
        assert_eq!(dom.node_name(dt), "svg");
        let NodeKind::DocumentType { public_id, .. } = &dom.node(dt).kind else {
            panic!("expected a document type payload");
        };
        assert_eq!(public_id.as_deref(), Some("-//W3C//DTD SVG 1.1//EN"));

        dom.append_child(doc, dt)?;
        assert_eq!(dom.doctype(doc), Some(dt));
        Ok(())
    }

    #[test]
    fn test_children_iterator() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let g = dom.create_element(doc, "g")?;
        let a = dom.create_text_node(doc, "A")?;
        let b = dom.create_text_node(doc, "B")?;
        let c = dom.create_text_node(doc, "C")?;

        dom.append_child(g, a)?;
        dom.append_child(g, b)?;
        dom.append_child(g, c)?;

        let children: Vec<NodeId> = dom.children(g).collect();
        assert_eq!(children, vec![a, b, c]);
        assert_eq!(dom.child_count(g), 3);
        assert_eq!(dom.child_at(g, 1), Some(b));
        assert_eq!(dom.child_at(g, 3), None);
        Ok(())
    }

    #[test]
    fn test_children_iterator_empty() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        assert_eq!(dom.children(doc).count(), 0);
        assert_eq!(dom.child_at(doc, 0), None);
    }

    #[test]
    fn test_ancestors_iterator() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let parent = dom.create_element(doc, "parent")?;
        let child = dom.create_element(doc, "child")?;

        dom.append_child(doc, parent)?;
        dom.append_child(parent, child)?;

        let ancestors: Vec<NodeId> = dom.ancestors(child).collect();
        assert_eq!(ancestors, vec![child, parent, doc]);
        assert!(dom.is_inclusive_ancestor(doc, child));
        assert!(dom.is_inclusive_ancestor(child, child));
        assert!(!dom.is_inclusive_ancestor(child, parent));
        Ok(())
    }

    #[test]
    fn test_descendants_iterator() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let text_el = dom.create_element(doc, "text")?;
        let a = dom.create_text_node(doc, "hello ")?;
        let tspan = dom.create_element(doc, "tspan")?;
        let tspan_text = dom.create_text_node(doc, "world")?;

        dom.append_child(doc, text_el)?;
        dom.append_child(text_el, a)?;
        dom.append_child(text_el, tspan)?;
        dom.append_child(tspan, tspan_text)?;

        let desc: Vec<NodeId> = dom.descendants(doc).collect();
        assert_eq!(desc, vec![text_el, a, tspan, tspan_text]);

        let inner: Vec<NodeId> = dom.descendants(tspan).collect();
        assert_eq!(inner, vec![tspan_text]);
        Ok(())
    }

    #[test]
    fn test_document_element() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();

        // No element children yet
        assert_eq!(dom.document_element(doc), None);

        let comment = dom.create_comment(doc, "generator")?;
        let svg = dom.create_element(doc, "svg")?;
        dom.append_child(doc, comment)?;
        dom.append_child(doc, svg)?;

        assert_eq!(dom.document_element(doc), Some(svg));
        Ok(())
    }

    #[test]
    fn test_node_count_includes_detached_nodes() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let a = dom.create_text_node(doc, "A")?;
        assert_eq!(dom.node_count(), 2);

        let g = dom.create_element(doc, "g")?;
        dom.append_child(g, a)?;
        dom.remove_child(g, a)?;

        // Removing a node does not free it from the arena
        assert_eq!(dom.node_count(), 3);
        Ok(())
    }

    #[test]
    fn test_dom_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dom>();
    }
}
