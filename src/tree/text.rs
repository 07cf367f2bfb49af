//! Character data: `textContent`, `normalize` and `nodeValue` updates.

use tracing::{instrument, trace};

use super::{Dom, NodeId, NodeKind, NodeType};
use crate::error::{DomError, DomResult};

impl Dom {
    /// Returns the DOM Level 3 `textContent` of a node.
    ///
    /// Character-data nodes, processing instructions and attributes return
    /// their own value. Elements, fragments, entities and entity references
    /// return the text and CDATA content of all descendants in document
    /// order, skipping comments and processing instructions. Documents,
    /// document types and notations return `None`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        match &self.node(id).kind {
            NodeKind::Document | NodeKind::DocumentType { .. } | NodeKind::Notation { .. } => None,
            NodeKind::Element { .. }
            | NodeKind::DocumentFragment
            | NodeKind::EntityReference { .. }
            | NodeKind::Entity { .. } => {
                let mut buf = String::new();
                for desc in self.descendants(id) {
                    if let NodeKind::Text { content } | NodeKind::CData { content } =
                        &self.node(desc).kind
                    {
                        buf.push_str(content);
                    }
                }
                Some(buf)
            }
            kind => kind.value().map(str::to_string),
        }
    }

    /// Replaces the value of a text, CDATA, comment, processing instruction
    /// or attribute node.
    ///
    /// # Errors
    ///
    /// Returns `NoDataAllowed` for node types that carry no value.
    #[instrument(level = "trace", skip(self))]
    pub fn set_node_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        let node_type = self.node_type(id);
        let Some(slot) = self.node_mut(id).kind.value_mut() else {
            return Err(DomError::NoDataAllowed(node_type));
        };
        value.clone_into(slot);
        Ok(())
    }

    /// Puts the subtree under `id` into normal form: no empty text nodes and
    /// no two adjacent text nodes.
    ///
    /// Adjacent text siblings are merged into the first of them, and the
    /// merged-away and empty nodes are detached. CDATA sections are left
    /// alone. Calling this on an already normal subtree changes nothing.
    #[instrument(level = "trace", skip(self))]
    pub fn normalize(&mut self, id: NodeId) {
        let mut merged = 0usize;
        let mut removed = 0usize;
        self.normalize_children(id, &mut merged, &mut removed);
        trace!(merged, removed, "normalized subtree");
    }

    fn normalize_children(&mut self, parent: NodeId, merged: &mut usize, removed: &mut usize) {
        let mut cursor = self.first_child(parent);
        while let Some(current) = cursor {
            match self.node_type(current) {
                NodeType::Text => {
                    let mut next = self.next_sibling(current);
                    while let Some(sibling) = next {
                        if self.node_type(sibling) != NodeType::Text {
                            break;
                        }
                        let tail = self.node_value(sibling).unwrap_or_default().to_string();
                        if let Some(slot) = self.node_mut(current).kind.value_mut() {
                            slot.push_str(&tail);
                        }
                        self.detach(sibling);
                        *merged += 1;
                        next = self.next_sibling(current);
                    }
                    if self.node_value(current).is_some_and(str::is_empty) {
                        self.detach(current);
                        *removed += 1;
                    }
                    cursor = next;
                }
                _ => {
                    if self.has_child_nodes(current) {
                        self.normalize_children(current, merged, removed);
                    }
                    cursor = self.next_sibling(current);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{DomError, DomResult};
    use crate::tree::{Dom, NodeId, NodeType};

    #[test]
    fn test_text_content_of_leaves() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let text = dom.create_text_node(doc, "t")?;
        let comment = dom.create_comment(doc, "c")?;
        let pi = dom.create_processing_instruction(doc, "target", "data")?;
        let attr = dom.create_attribute(doc, "x")?;
        dom.set_node_value(attr, "10")?;

        assert_eq!(dom.text_content(text).as_deref(), Some("t"));
        assert_eq!(dom.text_content(comment).as_deref(), Some("c"));
        assert_eq!(dom.text_content(pi).as_deref(), Some("data"));
        assert_eq!(dom.text_content(attr).as_deref(), Some("10"));
        Ok(())
    }

    #[test]
    fn test_text_content_of_document_is_none() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let svg = dom.create_element(doc, "svg")?;
        dom.append_child(doc, svg)?;
        let dt = dom.create_document_type(doc, "svg", None, None)?;

        assert_eq!(dom.text_content(doc), None);
        assert_eq!(dom.text_content(dt), None);
        Ok(())
    }

    #[test]
    fn test_text_content_concatenates_descendants() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let text_el = dom.create_element(doc, "text")?;
        let tspan = dom.create_element(doc, "tspan")?;
        let hello = dom.create_text_node(doc, "hello ")?;
        let world = dom.create_text_node(doc, "world")?;
        let cdata = dom.create_cdata_section(doc, "!")?;
        let pi = dom.create_processing_instruction(doc, "skip", "me")?;
        dom.append_child(text_el, hello)?;
        dom.append_child(text_el, tspan)?;
        dom.append_child(tspan, world)?;
        dom.append_child(text_el, pi)?;
        dom.append_child(text_el, cdata)?;

        assert_eq!(dom.text_content(text_el).as_deref(), Some("hello world!"));
        Ok(())
    }

    #[test]
    fn test_text_content_of_empty_element() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let g = dom.create_element(doc, "g")?;
        assert_eq!(dom.text_content(g).as_deref(), Some(""));
        Ok(())
    }

    #[test]
    fn test_set_node_value() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let text = dom.create_text_node(doc, "old")?;

        dom.set_node_value(text, "new")?;

        assert_eq!(dom.node_value(text), Some("new"));
        Ok(())
    }

    #[test]
    fn test_set_node_value_on_element_fails() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let g = dom.create_element(doc, "g")?;

        assert_eq!(
            dom.set_node_value(g, "x"),
            Err(DomError::NoDataAllowed(NodeType::Element))
        );
        assert_eq!(
            dom.set_node_value(doc, "x"),
            Err(DomError::NoDataAllowed(NodeType::Document))
        );
        Ok(())
    }

    #[test]
    fn test_normalize_merges_and_drops_empty() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let g = dom.create_element(doc, "g")?;
        let rect = dom.create_element(doc, "rect")?;
        let a = dom.create_text_node(doc, "a")?;
        let empty = dom.create_text_node(doc, "")?;
        let b = dom.create_text_node(doc, "b")?;
        let lone_empty = dom.create_text_node(doc, "")?;
        dom.append_child(g, a)?;
        dom.append_child(g, empty)?;
        dom.append_child(g, b)?;
        dom.append_child(g, rect)?;
        dom.append_child(g, lone_empty)?;

        dom.normalize(g);

        let children: Vec<NodeId> = dom.children(g).collect();
        assert_eq!(children, vec![a, rect]);
        assert_eq!(dom.node_value(a), Some("ab"));
        assert_eq!(dom.parent(empty), None);
        assert_eq!(dom.parent(b), None);
        assert_eq!(dom.parent(lone_empty), None);
        Ok(())
    }

    #[test]
    fn test_normalize_leading_empty_text() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let g = dom.create_element(doc, "g")?;
        let empty = dom.create_text_node(doc, "")?;
        let rect = dom.create_element(doc, "rect")?;
        dom.append_child(g, empty)?;
        dom.append_child(g, rect)?;

        dom.normalize(g);

        assert_eq!(dom.children(g).collect::<Vec<_>>(), vec![rect]);
        Ok(())
    }

    #[test]
    fn test_normalize_recurses_into_elements() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let svg = dom.create_element(doc, "svg")?;
        let text_el = dom.create_element(doc, "text")?;
        let x = dom.create_text_node(doc, "x")?;
        let y = dom.create_text_node(doc, "y")?;
        dom.append_child(doc, svg)?;
        dom.append_child(svg, text_el)?;
        dom.append_child(text_el, x)?;
        dom.append_child(text_el, y)?;

        dom.normalize(doc);

        assert_eq!(dom.child_count(text_el), 1);
        assert_eq!(dom.node_value(x), Some("xy"));
        Ok(())
    }

    #[test]
    fn test_normalize_keeps_cdata_separate() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let g = dom.create_element(doc, "g")?;
        let a = dom.create_text_node(doc, "a")?;
        let cdata = dom.create_cdata_section(doc, "")?;
        let b = dom.create_text_node(doc, "b")?;
        dom.append_child(g, a)?;
        dom.append_child(g, cdata)?;
        dom.append_child(g, b)?;

        dom.normalize(g);

        assert_eq!(dom.children(g).collect::<Vec<_>>(), vec![a, cdata, b]);
        Ok(())
    }

    #[test]
    fn test_normalize_on_leaf_is_noop() -> DomResult<()> {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let text = dom.create_text_node(doc, "")?;

        dom.normalize(text);

        assert_eq!(dom.node_value(text), Some(""));
        Ok(())
    }
}
