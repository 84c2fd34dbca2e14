//! Platform Focus Adapter
//!
//! Everything the interaction layer needs from the rendering engine goes
//! through [`PlatformFocusAdapter`]: reading and moving focus, enumerating
//! candidate elements and writing the handful of attributes (`tabindex`,
//! `aria-*`) that keep semantics in sync with state.

use std::cell::RefCell;
use std::rc::Rc;

use bankui_dom::{Document, NodeId};

/// Snapshot of one element as seen by the focus logic
///
/// Snapshots are taken fresh on every query and never cached: disclosure
/// panels and validation messages change the set between keystrokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusableElement {
    pub id: NodeId,
    /// Lower-cased tag name
    pub tag: String,
    /// Parsed `tabindex`, if any
    pub tab_index: Option<i32>,
    pub has_href: bool,
    pub is_disabled: bool,
    /// Not hidden, not `display: none`, has a layout box
    pub is_visible: bool,
}

impl FocusableElement {
    /// No explicit negative tab order
    pub fn tab_reachable(&self) -> bool {
        self.tab_index.is_none_or(|t| t >= 0)
    }
}

/// Capability interface over the platform's focus and element APIs
pub trait PlatformFocusAdapter {
    /// Element that currently holds focus, if the platform reports one
    fn active_element(&self) -> Option<NodeId>;

    /// Move focus; `false` if the platform refused
    fn focus(&mut self, element: NodeId) -> bool;

    /// Every element below `container`, in document order
    ///
    /// The adapter reports raw candidates; eligibility is decided by the
    /// resolver's predicate table so every platform applies the same rules.
    fn query_focusable(&self, container: NodeId) -> Vec<FocusableElement>;

    /// Snapshot of a single element; `None` once it has left the document
    fn describe(&self, element: NodeId) -> Option<FocusableElement>;

    fn is_attached(&self, element: NodeId) -> bool {
        self.describe(element).is_some()
    }

    /// Current value of an attribute
    fn get_attribute(&self, element: NodeId, name: &str) -> Option<String>;

    /// Set (`Some`) or remove (`None`) an attribute
    fn set_attribute(&mut self, element: NodeId, name: &str, value: Option<&str>);
}

/// Adapter over an in-process [`Document`]
///
/// The document is shared so views (and tests) can keep mutating the tree
/// while the router holds the adapter.
#[derive(Debug, Clone)]
pub struct DomFocusAdapter {
    doc: Rc<RefCell<Document>>,
}

impl DomFocusAdapter {
    pub fn new(doc: Rc<RefCell<Document>>) -> Self {
        Self { doc }
    }

    /// Shared handle to the underlying document
    pub fn document(&self) -> Rc<RefCell<Document>> {
        Rc::clone(&self.doc)
    }

    fn snapshot(doc: &Document, id: NodeId) -> Option<FocusableElement> {
        if !doc.tree().is_connected(id) {
            return None;
        }
        let el = doc.tree().element(id)?;
        Some(FocusableElement {
            id,
            tag: el.tag.clone(),
            tab_index: el.tab_index(),
            has_href: el.has_attr("href"),
            is_disabled: el.has_attr("disabled"),
            is_visible: doc.layout_box(id).is_some(),
        })
    }
}

impl PlatformFocusAdapter for DomFocusAdapter {
    fn active_element(&self) -> Option<NodeId> {
        Some(self.doc.borrow().active_element())
    }

    fn focus(&mut self, element: NodeId) -> bool {
        self.doc.borrow_mut().focus(element)
    }

    fn query_focusable(&self, container: NodeId) -> Vec<FocusableElement> {
        let doc = self.doc.borrow();
        if !doc.tree().is_connected(container) {
            return Vec::new();
        }
        doc.tree()
            .descendants(container)
            .filter_map(|id| Self::snapshot(&doc, id))
            .collect()
    }

    fn describe(&self, element: NodeId) -> Option<FocusableElement> {
        Self::snapshot(&self.doc.borrow(), element)
    }

    fn get_attribute(&self, element: NodeId, name: &str) -> Option<String> {
        self.doc.borrow().get_attr(element, name).map(str::to_string)
    }

    fn set_attribute(&mut self, element: NodeId, name: &str, value: Option<&str>) {
        let mut doc = self.doc.borrow_mut();
        let result = match value {
            Some(v) => doc.set_attr(element, name, v),
            None => doc.remove_attr(element, name),
        };
        if let Err(e) = result {
            tracing::debug!("set_attribute({}, {}) ignored: {}", element, name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_reports_connected_elements_in_order() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let (dialog, first, text_parent, second) = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            let dialog = d.append_element(body, "div", &[("role", "dialog")]).unwrap();
            let first = d.append_element(dialog, "button", &[]).unwrap();
            let p = d.append_element(dialog, "p", &[]).unwrap();
            d.append_text(p, "Text").unwrap();
            let second = d.append_element(dialog, "a", &[("href", "/v3/help")]).unwrap();
            (dialog, first, p, second)
        };
        let adapter = DomFocusAdapter::new(doc.clone());

        let ids: Vec<_> = adapter.query_focusable(dialog).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![first, text_parent, second]);
        assert!(adapter.describe(second).unwrap().has_href);

        doc.borrow_mut().remove(dialog).unwrap();
        assert!(adapter.query_focusable(dialog).is_empty());
        assert!(!adapter.is_attached(first));
        assert!(adapter.describe(first).is_none());
    }

    #[test]
    fn test_set_attribute_roundtrip() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let tab = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            d.append_element(body, "button", &[]).unwrap()
        };
        let mut adapter = DomFocusAdapter::new(doc.clone());

        adapter.set_attribute(tab, "tabindex", Some("-1"));
        assert_eq!(adapter.describe(tab).unwrap().tab_index, Some(-1));
        assert!(!adapter.describe(tab).unwrap().tab_reachable());

        assert_eq!(adapter.get_attribute(tab, "tabindex").as_deref(), Some("-1"));

        adapter.set_attribute(tab, "tabindex", None);
        assert!(adapter.describe(tab).unwrap().tab_reachable());
        assert_eq!(adapter.get_attribute(tab, "tabindex"), None);
    }
}
