//! `cloneNode` and `importNode`.

use tracing::{debug, instrument};

use super::{Dom, NodeId, NodeKind, NodeType};
use crate::error::{DomError, DomResult};

impl Dom {
    /// Copies a node into a new, detached node owned by the same document.
    ///
    /// With `deep`, the whole child subtree is copied in order; without it
    /// the copy has no children. An element's attributes are always copied,
    /// and the copies belong to the cloned element. The source is never
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` when asked to clone a Document node.
    #[instrument(level = "trace", skip(self))]
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        if self.node_type(id) == NodeType::Document {
            debug!(?id, "refusing to clone a document");
            return Err(DomError::NotSupported(
                "document nodes cannot be cloned".to_string(),
            ));
        }
        let doc = self.document_of(id);
        Ok(self.copy_subtree(id, doc, deep))
    }

    /// Copies a node from any document into `doc`.
    ///
    /// The copy is detached and owned by `doc`; the source stays where it
    /// is. This is the way to move content between documents, since the
    /// mutation operations refuse foreign nodes.
    ///
    /// # Errors
    ///
    /// Returns `WrongDocument` if `doc` is not a Document node, and
    /// `NotSupported` for Document and DocumentType sources.
    #[instrument(level = "trace", skip(self))]
    pub fn import_node(&mut self, doc: NodeId, id: NodeId, deep: bool) -> DomResult<NodeId> {
        if self.node_type(doc) != NodeType::Document {
            return Err(DomError::WrongDocument);
        }
        let source_type = self.node_type(id);
        if matches!(source_type, NodeType::Document | NodeType::DocumentType) {
            debug!(?id, %source_type, "refusing to import");
            return Err(DomError::NotSupported(format!(
                "{source_type} nodes cannot be imported"
            )));
        }
        Ok(self.copy_subtree(id, doc, deep))
    }

    fn copy_subtree(&mut self, source: NodeId, doc: NodeId, deep: bool) -> NodeId {
        let mut kind = self.node(source).kind.clone();
        let source_attributes = match &mut kind {
            NodeKind::Element { attributes, .. } => std::mem::take(attributes),
            NodeKind::Attribute { owner_element, .. } => {
                *owner_element = None;
                Vec::new()
            }
            _ => Vec::new(),
        };
        let copy = self.alloc(kind, Some(doc));

        for attr in source_attributes {
            let attr_copy = self.copy_subtree(attr, doc, true);
            if let NodeKind::Attribute { owner_element, .. } = &mut self.node_mut(attr_copy).kind {
                *owner_element = Some(copy);
            }
            if let NodeKind::Element { attributes, .. } = &mut self.node_mut(copy).kind {
                attributes.push(attr_copy);
            }
        }

        if deep {
            let children: Vec<NodeId> = self.children(source).collect();
            for child in children {
                let child_copy = self.copy_subtree(child, doc, true);
                self.link_before(copy, child_copy, None);
            }
        }
        copy
    }
}
