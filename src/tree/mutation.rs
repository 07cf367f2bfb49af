//! Structural mutation: `insertBefore`, `replaceChild`, `removeChild` and
//! `appendChild`.
//!
//! Each public operation validates the whole request before it touches a
//! single link, so a returned error means the tree is unchanged.

use tracing::{debug, instrument};

use super::{Dom, NodeId, NodeType};
use crate::error::{DomError, DomResult};

impl Dom {
    /// Inserts `new_child` into `parent`'s child list immediately before
    /// `ref_child`, or at the end when `ref_child` is `None`.
    ///
    /// A `new_child` that already has a parent is moved, not copied. A
    /// document fragment is emptied and its children are spliced in, in
    /// order. Returns `new_child`.
    ///
    /// # Errors
    ///
    /// - `HierarchyRequest` if `parent` cannot hold children, `new_child` is
    ///   `parent` or one of its ancestors, the child type is not allowed
    ///   under `parent`, or `ref_child` is not a child of `parent`.
    /// - `WrongDocument` if `new_child` belongs to another document.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.check_insertion(parent, new_child, None)?;
        if let Some(reference) = ref_child {
            if self.node(reference).parent != Some(parent) {
                debug!(?parent, ?reference, "reference node is not a child of the target");
                return Err(DomError::HierarchyRequest(
                    "reference node is not a child of the target node".to_string(),
                ));
            }
        }

        // Inserting a node before itself leaves it where it is.
        let reference = if ref_child == Some(new_child) {
            self.next_sibling(new_child)
        } else {
            ref_child
        };
        self.insert_unchecked(parent, new_child, reference);
        Ok(new_child)
    }

    /// Appends `new_child` to the end of `parent`'s child list.
    ///
    /// Equivalent to `insert_before(parent, new_child, None)`.
    ///
    /// # Errors
    ///
    /// See [`insert_before`](Dom::insert_before).
    pub fn append_child(&mut self, parent: NodeId, new_child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, new_child, None)
    }

    /// Replaces `old_child` with `new_child` at the same position and
    /// returns the detached `old_child`.
    ///
    /// # Errors
    ///
    /// The same conditions as [`insert_before`](Dom::insert_before), plus
    /// `NotFound` if `old_child` is not a child of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId> {
        self.check_insertion(parent, new_child, Some(old_child))?;
        if self.node(old_child).parent != Some(parent) {
            debug!(?parent, ?old_child, "node to replace is not a child of the target");
            return Err(DomError::NotFound(
                "node to replace is not a child of the target node".to_string(),
            ));
        }
        if new_child == old_child {
            return Ok(old_child);
        }

        let mut reference = self.next_sibling(old_child);
        if reference == Some(new_child) {
            reference = self.next_sibling(new_child);
        }
        self.detach(old_child);
        self.insert_unchecked(parent, new_child, reference);
        Ok(old_child)
    }

    /// Removes `old_child` from `parent` and returns it.
    ///
    /// The removed node keeps its own subtree and stays in the arena.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `old_child` is not a child of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&mut self, parent: NodeId, old_child: NodeId) -> DomResult<NodeId> {
        if self.node(old_child).parent != Some(parent) {
            debug!(?parent, ?old_child, "node to remove is not a child of the target");
            return Err(DomError::NotFound(
                "node to remove is not a child of the target node".to_string(),
            ));
        }
        self.detach(old_child);
        Ok(old_child)
    }

    /// Validates that `new_child` may become a child of `parent`.
    ///
    /// `replacing` is a current child that the insertion will remove; it is
    /// left out of the per-document element and doctype counts.
    fn check_insertion(
        &self,
        parent: NodeId,
        new_child: NodeId,
        replacing: Option<NodeId>,
    ) -> DomResult<()> {
        let parent_type = self.node_type(parent);
        if !parent_type.can_have_children() {
            debug!(?parent, %parent_type, "target cannot have children");
            return Err(DomError::HierarchyRequest(format!(
                "{parent_type} nodes cannot have children"
            )));
        }
        if self.document_of(new_child) != self.document_of(parent) {
            debug!(?parent, ?new_child, "cross-document insertion");
            return Err(DomError::WrongDocument);
        }
        if self.is_inclusive_ancestor(new_child, parent) {
            debug!(?parent, ?new_child, "insertion would create a cycle");
            return Err(DomError::HierarchyRequest(
                "a node cannot be inserted into itself or one of its descendants".to_string(),
            ));
        }

        let incoming: Vec<NodeType> = if self.node_type(new_child) == NodeType::DocumentFragment {
            self.children(new_child).map(|id| self.node_type(id)).collect()
        } else {
            vec![self.node_type(new_child)]
        };
        if let Some(&bad) = incoming.iter().find(|&&ty| !parent_type.accepts_child(ty)) {
            debug!(?parent, %parent_type, child_type = %bad, "child type not allowed");
            return Err(DomError::HierarchyRequest(format!(
                "{bad} nodes cannot be children of {parent_type} nodes"
            )));
        }

        if parent_type == NodeType::Document {
            for singleton in [NodeType::Element, NodeType::DocumentType] {
                let added = incoming.iter().filter(|&&ty| ty == singleton).count();
                if added == 0 {
                    continue;
                }
                let existing = self
                    .children(parent)
                    .filter(|&id| Some(id) != replacing && id != new_child)
                    .filter(|&id| self.node_type(id) == singleton)
                    .count();
                if existing + added > 1 {
                    debug!(?parent, %singleton, "document already has one");
                    return Err(DomError::HierarchyRequest(format!(
                        "a document can have only one {singleton} child"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Moves `new_child` (or a fragment's children) in front of `reference`.
    /// All checks must already have passed.
    fn insert_unchecked(&mut self, parent: NodeId, new_child: NodeId, reference: Option<NodeId>) {
        if self.node_type(new_child) == NodeType::DocumentFragment {
            let moved: Vec<NodeId> = self.children(new_child).collect();
            for child in moved {
                self.detach(child);
                self.link_before(parent, child, reference);
            }
        } else {
            self.detach(new_child);
            self.link_before(parent, new_child, reference);
        }
    }

    /// Links a detached node into `parent`'s child list before `reference`
    /// (or last, when `reference` is `None`).
    pub(crate) fn link_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        debug_assert!(
            self.node(child).parent.is_none(),
            "child already has a parent; detach it first"
        );
        self.node_mut(child).parent = Some(parent);

        let Some(reference) = reference else {
            if let Some(last) = self.node(parent).last_child {
                self.node_mut(last).next_sibling = Some(child);
                self.node_mut(child).prev_sibling = Some(last);
                self.node_mut(parent).last_child = Some(child);
            } else {
                self.node_mut(parent).first_child = Some(child);
                self.node_mut(parent).last_child = Some(child);
            }
            return;
        };

        if let Some(prev) = self.node(reference).prev_sibling {
            self.node_mut(prev).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(prev);
        } else {
            self.node_mut(parent).first_child = Some(child);
        }
        self.node_mut(child).next_sibling = Some(reference);
        self.node_mut(reference).prev_sibling = Some(child);
    }

    /// Detaches a node from its parent, repairing the sibling links on both
    /// sides. A node without a parent is left alone.
    pub(crate) fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };

        let prev = self.node(id).prev_sibling;
        let next = self.node(id).next_sibling;

        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }

        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }

        self.node_mut(id).parent = None;
        self.node_mut(id).prev_sibling = None;
        self.node_mut(id).next_sibling = None;
    }
}
