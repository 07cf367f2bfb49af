//! The attribute map of element nodes (DOM `NamedNodeMap`).
//!
//! Attributes are ordinary arena nodes of type `Attribute`. An element keeps
//! their ids in insertion order; each attribute points back at its element
//! through `owner_element`. Lookups by name match the attribute's `nodeName`
//! (its qualified name); the `_ns` variants match on namespace URI and local
//! name instead.

use tracing::{debug, instrument};

use super::{Dom, NodeId, NodeKind, NodeType};
use crate::error::{DomError, DomResult};

impl Dom {
    /// Returns the attribute nodes of an element in insertion order, or
    /// `None` for any other node type.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> Option<&[NodeId]> {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Returns `true` if the node is an element with at least one attribute.
    #[must_use]
    pub fn has_attributes(&self, id: NodeId) -> bool {
        self.attributes(id).is_some_and(|attrs| !attrs.is_empty())
    }

    /// Returns `true` if the element has an attribute with this name.
    #[must_use]
    pub fn has_attribute(&self, elem: NodeId, name: &str) -> bool {
        self.get_attribute_node(elem, name).is_some()
    }

    /// Looks up an attribute node by qualified name.
    #[must_use]
    pub fn get_attribute_node(&self, elem: NodeId, name: &str) -> Option<NodeId> {
        self.attributes(elem)?
            .iter()
            .copied()
            .find(|&attr| self.node_name(attr) == name)
    }

    /// Returns the value of an attribute by qualified name.
    #[must_use]
    pub fn get_attribute(&self, elem: NodeId, name: &str) -> Option<&str> {
        self.get_attribute_node(elem, name)
            .and_then(|attr| self.node_value(attr))
    }

    /// Looks up an attribute node by namespace URI and local name.
    ///
    /// Attributes created without namespace support match on their
    /// qualified name when `namespace` is `None`.
    #[must_use]
    pub fn get_attribute_node_ns(
        &self,
        elem: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<NodeId> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        self.attributes(elem)?.iter().copied().find(|&attr| {
            self.namespace_uri(attr) == namespace
                && self.local_name(attr).unwrap_or(self.node_name(attr)) == local_name
        })
    }

    /// Returns the value of an attribute by namespace URI and local name.
    #[must_use]
    pub fn get_attribute_ns(
        &self,
        elem: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<&str> {
        self.get_attribute_node_ns(elem, namespace, local_name)
            .and_then(|attr| self.node_value(attr))
    }

    /// Returns the element an attribute belongs to, if any.
    #[must_use]
    pub fn owner_element(&self, attr: NodeId) -> Option<NodeId> {
        match &self.node(attr).kind {
            NodeKind::Attribute { owner_element, .. } => *owner_element,
            _ => None,
        }
    }

    /// Sets an attribute value, creating the attribute if it does not exist.
    /// Returns the attribute node.
    ///
    /// # Errors
    ///
    /// Returns `HierarchyRequest` if `elem` is not an element, and
    /// `InvalidCharacter` for an invalid name.
    #[instrument(level = "trace", skip(self))]
    pub fn set_attribute(&mut self, elem: NodeId, name: &str, value: &str) -> DomResult<NodeId> {
        self.require_element(elem)?;
        if let Some(existing) = self.get_attribute_node(elem, name) {
            self.set_node_value(existing, value)?;
            return Ok(existing);
        }
        let doc = self.document_of(elem);
        let attr = self.create_node_with_value(doc, NodeType::Attribute, name, value)?;
        self.attach_attribute(elem, attr);
        Ok(attr)
    }

    /// Sets a namespaced attribute value, creating the attribute if no
    /// attribute with the same namespace URI and local name exists.
    ///
    /// When an existing attribute is updated its prefix changes to the one
    /// in `qualified_name`.
    ///
    /// # Errors
    ///
    /// As [`set_attribute`](Dom::set_attribute), plus the namespace errors of
    /// [`create_node_ns`](Dom::create_node_ns).
    #[instrument(level = "trace", skip(self))]
    pub fn set_attribute_ns(
        &mut self,
        elem: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
        value: &str,
    ) -> DomResult<NodeId> {
        self.require_element(elem)?;
        self.check_name(qualified_name)?;
        let name = self.qualify(namespace, qualified_name, true)?;
        let local = name.local_name.as_deref().unwrap_or(qualified_name);

        match self.get_attribute_node_ns(elem, namespace, local) {
            Some(existing) if self.local_name(existing).is_some() => {
                self.set_prefix(existing, name.prefix.as_deref())?;
                self.set_node_value(existing, value)?;
                Ok(existing)
            }
            found => {
                let doc = self.document_of(elem);
                let attr = self.alloc(
                    NodeKind::Attribute {
                        name,
                        value: value.to_string(),
                        owner_element: None,
                    },
                    Some(doc),
                );
                // A Level 1 attribute of the same name gives up its slot.
                match found {
                    Some(plain) => self.swap_attribute(elem, plain, attr),
                    None => self.attach_attribute(elem, attr),
                }
                Ok(attr)
            }
        }
    }

    /// Adds an attribute node to an element, replacing any attribute with
    /// the same qualified name. Returns the replaced attribute, now
    /// detached.
    ///
    /// # Errors
    ///
    /// - `HierarchyRequest` if `elem` is not an element or `attr` is not an
    ///   attribute.
    /// - `WrongDocument` if they belong to different documents.
    /// - `InUseAttribute` if `attr` belongs to another element.
    #[instrument(level = "trace", skip(self))]
    pub fn set_attribute_node(&mut self, elem: NodeId, attr: NodeId) -> DomResult<Option<NodeId>> {
        self.require_element(elem)?;
        if self.node_type(attr) != NodeType::Attribute {
            return Err(DomError::HierarchyRequest(format!(
                "{} nodes cannot be used as attributes",
                self.node_type(attr)
            )));
        }
        if self.document_of(attr) != self.document_of(elem) {
            debug!(?elem, ?attr, "attribute from another document");
            return Err(DomError::WrongDocument);
        }
        match self.owner_element(attr) {
            Some(owner) if owner == elem => return Ok(None),
            Some(owner) => {
                debug!(?elem, ?attr, ?owner, "attribute already in use");
                return Err(DomError::InUseAttribute);
            }
            None => {}
        }

        let name = self.node_name(attr).to_string();
        let replaced = self.get_attribute_node(elem, &name);
        match replaced {
            Some(old) => self.swap_attribute(elem, old, attr),
            None => self.attach_attribute(elem, attr),
        }
        Ok(replaced)
    }

    /// Removes an attribute by qualified name and returns the removed node,
    /// or `None` if there was no such attribute.
    ///
    /// # Errors
    ///
    /// Returns `HierarchyRequest` if `elem` is not an element.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_attribute(&mut self, elem: NodeId, name: &str) -> DomResult<Option<NodeId>> {
        self.require_element(elem)?;
        let Some(attr) = self.get_attribute_node(elem, name) else {
            return Ok(None);
        };
        self.detach_attribute(elem, attr);
        Ok(Some(attr))
    }

    /// Removes a specific attribute node from an element.
    ///
    /// # Errors
    ///
    /// Returns `HierarchyRequest` if `elem` is not an element and
    /// `NotFound` if `attr` is not one of its attributes.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_attribute_node(&mut self, elem: NodeId, attr: NodeId) -> DomResult<NodeId> {
        self.require_element(elem)?;
        if self.owner_element(attr) != Some(elem) {
            debug!(?elem, ?attr, "attribute not owned by element");
            return Err(DomError::NotFound(
                "attribute is not set on this element".to_string(),
            ));
        }
        self.detach_attribute(elem, attr);
        Ok(attr)
    }

    fn require_element(&self, id: NodeId) -> DomResult<()> {
        let node_type = self.node_type(id);
        if node_type == NodeType::Element {
            Ok(())
        } else {
            Err(DomError::HierarchyRequest(format!(
                "{node_type} nodes cannot carry attributes"
            )))
        }
    }

    fn attach_attribute(&mut self, elem: NodeId, attr: NodeId) {
        if let NodeKind::Element { attributes, .. } = &mut self.node_mut(elem).kind {
            attributes.push(attr);
        }
        self.set_owner_element(attr, Some(elem));
    }

    /// Puts `new` in `old`'s position in the attribute list and detaches
    /// `old`.
    fn swap_attribute(&mut self, elem: NodeId, old: NodeId, new: NodeId) {
        if let NodeKind::Element { attributes, .. } = &mut self.node_mut(elem).kind {
            match attributes.iter().position(|&a| a == old) {
                Some(slot) => attributes[slot] = new,
                None => attributes.push(new),
            }
        }
        self.set_owner_element(old, None);
        self.set_owner_element(new, Some(elem));
    }

    fn detach_attribute(&mut self, elem: NodeId, attr: NodeId) {
        if let NodeKind::Element { attributes, .. } = &mut self.node_mut(elem).kind {
            attributes.retain(|&a| a != attr);
        }
        self.set_owner_element(attr, None);
    }

    fn set_owner_element(&mut self, attr: NodeId, elem: Option<NodeId>) {
        if let NodeKind::Attribute { owner_element, .. } = &mut self.node_mut(attr).kind {
            *owner_element = elem;
        }
    }
}
