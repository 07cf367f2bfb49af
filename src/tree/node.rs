//! Node type definitions.
//!
//! [`NodeType`] is the closed set of W3C DOM node types with their numeric
//! codes. [`NodeKind`] carries the per-type payload: a variant exists only
//! for the data that type is allowed to hold, so an element with a value or
//! a text node with a namespace cannot be expressed.

use std::fmt;

use super::NodeId;

/// The type of a DOM node, numbered as in DOM Level 2 Core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum NodeType {
    /// `ELEMENT_NODE`
    Element = 1,
    /// `ATTRIBUTE_NODE`
    Attribute = 2,
    /// `TEXT_NODE`
    Text = 3,
    /// `CDATA_SECTION_NODE`
    CDataSection = 4,
    /// `ENTITY_REFERENCE_NODE`
    EntityReference = 5,
    /// `ENTITY_NODE`
    Entity = 6,
    /// `PROCESSING_INSTRUCTION_NODE`
    ProcessingInstruction = 7,
    /// `COMMENT_NODE`
    Comment = 8,
    /// `DOCUMENT_NODE`
    Document = 9,
    /// `DOCUMENT_TYPE_NODE`
    DocumentType = 10,
    /// `DOCUMENT_FRAGMENT_NODE`
    DocumentFragment = 11,
    /// `NOTATION_NODE`
    Notation = 12,
}

impl NodeType {
    /// Returns the DOM numeric code for this type.
    #[must_use]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Looks up a node type by its DOM numeric code.
    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => Self::Element,
            2 => Self::Attribute,
            3 => Self::Text,
            4 => Self::CDataSection,
            5 => Self::EntityReference,
            6 => Self::Entity,
            7 => Self::ProcessingInstruction,
            8 => Self::Comment,
            9 => Self::Document,
            10 => Self::DocumentType,
            11 => Self::DocumentFragment,
            12 => Self::Notation,
            _ => return None,
        })
    }

    /// Returns `true` if nodes of this type may be given children through
    /// the mutation operations.
    #[must_use]
    pub fn can_have_children(self) -> bool {
        matches!(
            self,
            Self::Document | Self::DocumentFragment | Self::Element
        )
    }

    /// Returns `true` if nodes of this type carry a `nodeValue`.
    #[must_use]
    pub fn carries_value(self) -> bool {
        matches!(
            self,
            Self::Attribute
                | Self::Text
                | Self::CDataSection
                | Self::Comment
                | Self::ProcessingInstruction
        )
    }

    /// Returns the constant `nodeName` for types that do not carry their
    /// own name.
    #[must_use]
    pub fn fixed_name(self) -> Option<&'static str> {
        match self {
            Self::Text => Some("#text"),
            Self::CDataSection => Some("#cdata-section"),
            Self::Comment => Some("#comment"),
            Self::Document => Some("#document"),
            Self::DocumentFragment => Some("#document-fragment"),
            _ => None,
        }
    }

    /// Returns `true` if a node of type `child` may be a direct child of a
    /// node of this type.
    ///
    /// This does not enforce the one-element and one-doctype limits on
    /// documents; those depend on the existing children.
    #[must_use]
    pub fn accepts_child(self, child: NodeType) -> bool {
        match self {
            Self::Document => matches!(
                child,
                Self::Element | Self::ProcessingInstruction | Self::Comment | Self::DocumentType
            ),
            Self::Element | Self::DocumentFragment => matches!(
                child,
                Self::Element
                    | Self::Text
                    | Self::CDataSection
                    | Self::Comment
                    | Self::ProcessingInstruction
                    | Self::EntityReference
            ),
            _ => false,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Element => "Element",
            Self::Attribute => "Attribute",
            Self::Text => "Text",
            Self::CDataSection => "CDATASection",
            Self::EntityReference => "EntityReference",
            Self::Entity => "Entity",
            Self::ProcessingInstruction => "ProcessingInstruction",
            Self::Comment => "Comment",
            Self::Document => "Document",
            Self::DocumentType => "DocumentType",
            Self::DocumentFragment => "DocumentFragment",
            Self::Notation => "Notation",
        };
        f.write_str(name)
    }
}

/// The name of an element or attribute.
///
/// `name` is the `nodeName` exactly as given at construction. The namespace
/// triple is only filled in for nodes created through a namespace-aware
/// constructor; DOM Level 1 nodes leave all three `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// The qualified name (`nodeName`).
    pub name: String,
    /// The namespace prefix. Mutable through `Dom::set_prefix`.
    pub prefix: Option<String>,
    /// The local part of the name.
    pub local_name: Option<String>,
    /// The namespace URI.
    pub namespace: Option<String>,
}

impl QualifiedName {
    /// A name created without namespace support.
    pub(crate) fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            prefix: None,
            local_name: None,
            namespace: None,
        }
    }
}

/// The kind of a DOM node and its associated data.
///
/// Navigation links (parent, children, siblings) and the owner document are
/// stored in `NodeData`, not here.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A document node. Owns no payload; its children are the prolog and
    /// the document element.
    Document,

    /// A parentless container whose children move on insertion.
    DocumentFragment,

    /// A document type declaration, e.g. `<!DOCTYPE svg ...>`.
    DocumentType {
        /// The declared root element name.
        name: String,
        /// The PUBLIC identifier, if any.
        public_id: Option<String>,
        /// The SYSTEM identifier, if any.
        system_id: Option<String>,
    },

    /// An element node, e.g. `<svg:rect width="10">`.
    Element {
        /// Tag name and namespace triple.
        name: QualifiedName,
        /// Attribute nodes in insertion order, keyed by their `nodeName`.
        attributes: Vec<NodeId>,
    },

    /// An attribute node. Attributes never sit in a child list; they hang
    /// off their owner element's attribute map.
    Attribute {
        /// Attribute name and namespace triple.
        name: QualifiedName,
        /// The attribute value.
        value: String,
        /// The element whose attribute map holds this node, if any.
        owner_element: Option<NodeId>,
    },

    /// A text node containing character data.
    Text {
        /// The character data.
        content: String,
    },

    /// A CDATA section.
    CData {
        /// The section content (no escaping applied).
        content: String,
    },

    /// A comment node.
    Comment {
        /// The comment text, without delimiters.
        content: String,
    },

    /// A processing instruction, e.g. `<?xml-stylesheet href="a.css"?>`.
    ProcessingInstruction {
        /// The PI target, which is also its `nodeName`.
        target: String,
        /// The PI data.
        data: String,
    },

    /// An unexpanded entity reference.
    EntityReference {
        /// The entity name (without `&` and `;`).
        name: String,
    },

    /// An entity declared in a DTD.
    Entity {
        /// The entity name.
        name: String,
    },

    /// A notation declared in a DTD.
    Notation {
        /// The notation name.
        name: String,
    },
}

impl NodeKind {
    /// Returns the [`NodeType`] this payload belongs to.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Document => NodeType::Document,
            Self::DocumentFragment => NodeType::DocumentFragment,
            Self::DocumentType { .. } => NodeType::DocumentType,
            Self::Element { .. } => NodeType::Element,
            Self::Attribute { .. } => NodeType::Attribute,
            Self::Text { .. } => NodeType::Text,
            Self::CData { .. } => NodeType::CDataSection,
            Self::Comment { .. } => NodeType::Comment,
            Self::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
            Self::EntityReference { .. } => NodeType::EntityReference,
            Self::Entity { .. } => NodeType::Entity,
            Self::Notation { .. } => NodeType::Notation,
        }
    }

    /// Returns the DOM `nodeName`.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Element { name, .. } | Self::Attribute { name, .. } => &name.name,
            Self::DocumentType { name, .. }
            | Self::EntityReference { name }
            | Self::Entity { name }
            | Self::Notation { name }
            | Self::ProcessingInstruction { target: name, .. } => name,
            Self::Document => "#document",
            Self::DocumentFragment => "#document-fragment",
            Self::Text { .. } => "#text",
            Self::CData { .. } => "#cdata-section",
            Self::Comment { .. } => "#comment",
        }
    }

    /// Returns the DOM `nodeValue`, present only for value-bearing types.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Attribute { value, .. } => Some(value),
            Self::Text { content } | Self::CData { content } | Self::Comment { content } => {
                Some(content)
            }
            Self::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Returns a mutable handle on the value slot, for value-bearing types.
    pub(crate) fn value_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Attribute { value, .. } => Some(value),
            Self::Text { content } | Self::CData { content } | Self::Comment { content } => {
                Some(content)
            }
            Self::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Returns the qualified name of an element or attribute.
    #[must_use]
    pub fn qualified_name(&self) -> Option<&QualifiedName> {
        match self {
            Self::Element { name, .. } | Self::Attribute { name, .. } => Some(name),
            _ => None,
        }
    }

    pub(crate) fn qualified_name_mut(&mut self) -> Option<&mut QualifiedName> {
        match self {
            Self::Element { name, .. } | Self::Attribute { name, .. } => Some(name),
            _ => None,
        }
    }
}
