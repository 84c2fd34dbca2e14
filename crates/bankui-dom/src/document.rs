//! Document - High-level document API

use crate::{DOMRect, DomError, DomResult, DomTree, ElementData, NodeId};

/// HTML Document
///
/// Owns the tree plus the one piece of global platform state the
/// interaction layer cares about: which element currently has focus.
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Cached reference to <body> element
    body: NodeId,
    /// Element holding focus, if any (`None` means the body)
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with the basic html/head/body skeleton
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under a fresh root cannot violate the hierarchy
        let root = tree.root();
        let _ = tree.append_child(root, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self { tree, body, focused: None }
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Get body element
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create an element with attributes and append it to `parent`
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> DomResult<NodeId> {
        let id = self.tree.create_element(tag);
        if let Some(el) = self.tree.element_mut(id) {
            for (name, value) in attrs {
                el.set_attr(name, value);
            }
        }
        self.tree.append_child(parent, id)
    }

    /// Create a text node and append it to `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> DomResult<NodeId> {
        let id = self.tree.create_text(text);
        self.tree.append_child(parent, id)
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.tree.get(id).ok_or(DomError::NotFound(id))?;
        self.tree.element_mut(id).ok_or(DomError::NotAnElement(id))
    }

    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree.element(id)?.get_attr(name)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        self.element_mut(id)?.remove_attr(name);
        Ok(())
    }

    /// Override the box assigned by layout; `None` removes the box entirely
    pub fn set_rect(&mut self, id: NodeId, rect: Option<DOMRect>) -> DomResult<()> {
        self.element_mut(id)?.rect = rect;
        Ok(())
    }

    /// Layout box of a connected element
    ///
    /// `None` when the element or an ancestor is `display: none`/`hidden`, or
    /// when layout gave it an empty box.
    pub fn layout_box(&self, id: NodeId) -> Option<DOMRect> {
        if !self.tree.is_connected(id) {
            return None;
        }
        let rect = self.tree.element(id)?.rect.filter(|r| !r.is_empty())?;

        let mut current = id;
        while current.is_valid() {
            let node = self.tree.get(current)?;
            if node.as_element().is_some_and(ElementData::is_display_none) {
                return None;
            }
            current = node.parent;
        }
        Some(rect)
    }

    /// Detach an element from its parent
    ///
    /// If focus was inside the removed subtree it falls back to the body,
    /// which is what the platform does.
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        let parent = self.tree.get(id).ok_or(DomError::NotFound(id))?.parent;
        if !parent.is_valid() {
            return Ok(());
        }
        self.tree.remove_child(parent, id)?;
        if let Some(focused) = self.focused {
            if !self.tree.is_connected(focused) {
                tracing::debug!("focused element {} removed, focus returns to body", focused);
                self.focused = None;
            }
        }
        Ok(())
    }

    /// Re-attach a previously removed element
    pub fn insert(&mut self, parent: NodeId, id: NodeId) -> DomResult<()> {
        self.tree.append_child(parent, id).map(|_| ())
    }

    /// Currently focused element (the body when nothing else is)
    pub fn active_element(&self) -> NodeId {
        match self.focused {
            Some(id) if self.tree.is_connected(id) => id,
            _ => self.body,
        }
    }

    /// Whether the platform would accept focus on this element
    pub fn can_focus(&self, id: NodeId) -> bool {
        let Some(el) = self.tree.element(id) else {
            return false;
        };
        !el.has_attr("disabled") && self.layout_box(id).is_some()
    }

    /// Move focus; returns `false` (and changes nothing) if the element cannot take it
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.can_focus(id) {
            tracing::debug!("focus({}) refused", id);
            return false;
        }
        if self.focused != Some(id) {
            tracing::trace!("focus moved to {}", id);
        }
        self.focused = Some(id);
        true
    }

    /// Drop focus back to the body
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Descendant element carrying the given `id` attribute
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&n| self.get_attr(n, "id") == Some(element_id))
    }
}
