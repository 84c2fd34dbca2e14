//! Roving Tabindex
//!
//! A group of peers (tabs, stepper items, radio-like options) where only
//! the item at `active_index` sits in the Tab sequence. Arrow keys, Home
//! and End move the index and native focus together, so Tab enters and
//! leaves the whole group in one keystroke regardless of its size.

use bankui_dom::{Key, KeyboardEvent, NodeId};

use crate::aria::Orientation;
use crate::platform::PlatformFocusAdapter;
use crate::A11yError;

/// Identifier of a group registered with the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) u64);

/// Keyboard-navigable peer set
#[derive(Debug, Clone)]
pub struct RovingFocusGroup {
    orientation: Orientation,
    wrap: bool,
    items: Vec<NodeId>,
    active_index: usize,
}

impl RovingFocusGroup {
    pub fn new(orientation: Orientation, wrap: bool) -> Self {
        Self {
            orientation,
            wrap,
            items: Vec::new(),
            active_index: 0,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// Items in registration (document) order
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_item(&self) -> Option<NodeId> {
        self.items.get(self.active_index).copied()
    }

    pub fn index_of(&self, item: NodeId) -> Option<usize> {
        self.items.iter().position(|&i| i == item)
    }

    /// Exactly the item at `active_index`
    pub fn tab_reachable(&self, index: usize) -> bool {
        index == self.active_index && index < self.items.len()
    }

    /// Add an item at the end of the group; re-registering returns the existing index
    pub fn register_item(&mut self, item: NodeId, adapter: &mut dyn PlatformFocusAdapter) -> usize {
        if let Some(index) = self.index_of(item) {
            return index;
        }
        self.items.push(item);
        let index = self.items.len() - 1;
        adapter.set_attribute(item, "tabindex", Some(tab_index_value(self.tab_reachable(index))));
        index
    }

    /// Drop an unmounted item, keeping one item tab-reachable
    pub fn remove_item(&mut self, item: NodeId, adapter: &mut dyn PlatformFocusAdapter) -> bool {
        let Some(index) = self.index_of(item) else {
            return false;
        };
        self.items.remove(index);
        if index < self.active_index || self.active_index >= self.items.len() {
            self.active_index = self.active_index.saturating_sub(1);
        }
        self.sync_tab_indices(adapter);
        true
    }

    /// Direct activation (click or programmatic selection); does not move focus
    pub fn set_active(
        &mut self,
        index: usize,
        adapter: &mut dyn PlatformFocusAdapter,
    ) -> Result<(), A11yError> {
        if index >= self.items.len() {
            return Err(A11yError::IndexOutOfRange { index, len: self.items.len() });
        }
        self.active_index = index;
        self.sync_tab_indices(adapter);
        Ok(())
    }

    /// Pure key mapping from `current` to the new index
    ///
    /// `None` for keys the group does not handle, including any chord with
    /// Ctrl/Alt/Meta so browser shortcuts keep working.
    pub fn next_index(&self, event: &KeyboardEvent, current: usize) -> Option<usize> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        let m = event.modifiers;
        if m.ctrl || m.alt || m.meta {
            return None;
        }
        let current = current.min(len - 1);
        let last = len - 1;

        Some(match event.key {
            Key::ArrowRight | Key::ArrowDown => {
                if self.wrap {
                    (current + 1) % len
                } else {
                    (current + 1).min(last)
                }
            }
            Key::ArrowLeft | Key::ArrowUp => {
                if self.wrap {
                    (current + len - 1) % len
                } else {
                    current.saturating_sub(1)
                }
            }
            Key::Home => 0,
            Key::End => last,
            _ => return None,
        })
    }

    /// Handle a navigation key pressed on the item at `current_index`
    ///
    /// On a recognized key the default is prevented, `active_index` updated
    /// and native focus moved before returning the new index. Unrecognized
    /// keys are left untouched.
    pub fn handle_key(
        &mut self,
        event: &mut KeyboardEvent,
        current_index: usize,
        adapter: &mut dyn PlatformFocusAdapter,
    ) -> Option<usize> {
        let next = self.next_index(event, current_index)?;
        event.prevent_default();

        self.active_index = next;
        self.sync_tab_indices(adapter);
        let item = self.items[next];
        if !adapter.focus(item) {
            tracing::debug!("roving item {} refused focus", item);
        }
        Some(next)
    }

    /// Move native focus to the active item
    pub fn focus_active(&self, adapter: &mut dyn PlatformFocusAdapter) -> bool {
        self.active_item().is_some_and(|item| adapter.focus(item))
    }

    fn sync_tab_indices(&self, adapter: &mut dyn PlatformFocusAdapter) {
        for (index, &item) in self.items.iter().enumerate() {
            adapter.set_attribute(item, "tabindex", Some(tab_index_value(self.tab_reachable(index))));
        }
    }
}

fn tab_index_value(reachable: bool) -> &'static str {
    if reachable { "0" } else { "-1" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::DomFocusAdapter;
    use bankui_dom::{Document, Modifiers};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tablist(labels: &[&str]) -> (Rc<RefCell<Document>>, DomFocusAdapter, Vec<NodeId>) {
        let doc = Rc::new(RefCell::new(Document::new()));
        let tabs = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            let list = d.append_element(body, "div", &[("role", "tablist")]).unwrap();
            labels
                .iter()
                .map(|label| {
                    let tab = d.append_element(list, "button", &[("role", "tab")]).unwrap();
                    d.append_text(tab, label).unwrap();
                    tab
                })
                .collect()
        };
        let adapter = DomFocusAdapter::new(doc.clone());
        (doc, adapter, tabs)
    }

    fn build(wrap: bool, adapter: &mut DomFocusAdapter, tabs: &[NodeId]) -> RovingFocusGroup {
        let mut group = RovingFocusGroup::new(Orientation::Horizontal, wrap);
        for (i, &t) in tabs.iter().enumerate() {
            assert_eq!(group.register_item(t, adapter), i);
        }
        group
    }

    fn tabindex(doc: &Rc<RefCell<Document>>, id: NodeId) -> String {
        doc.borrow().get_attr(id, "tabindex").unwrap_or_default().to_string()
    }

    #[test]
    fn test_register_marks_only_first_reachable() {
        let (doc, mut adapter, tabs) = tablist(&["Översikt", "Transaktioner", "Dokument"]);
        let group = build(true, &mut adapter, &tabs);
        assert_eq!(tabindex(&doc, tabs[0]), "0");
        assert_eq!(tabindex(&doc, tabs[1]), "-1");
        assert_eq!(tabindex(&doc, tabs[2]), "-1");
        assert!(group.tab_reachable(0));
        assert!(!group.tab_reachable(3));
    }

    #[test]
    fn test_arrow_keys_wrap() {
        let (doc, mut adapter, tabs) = tablist(&["a", "b", "c"]);
        let mut group = build(true, &mut adapter, &tabs);

        let mut left = KeyboardEvent::new(Key::ArrowLeft, tabs[0]);
        assert_eq!(group.handle_key(&mut left, 0, &mut adapter), Some(2));
        assert!(left.is_default_prevented());
        assert_eq!(doc.borrow().active_element(), tabs[2]);
        assert_eq!(tabindex(&doc, tabs[2]), "0");
        assert_eq!(tabindex(&doc, tabs[0]), "-1");

        let mut down = KeyboardEvent::new(Key::ArrowDown, tabs[2]);
        assert_eq!(group.handle_key(&mut down, 2, &mut adapter), Some(0));
    }

    #[test]
    fn test_clamping_without_wrap() {
        let (_doc, mut adapter, tabs) = tablist(&["a", "b"]);
        let mut group = build(false, &mut adapter, &tabs);

        let mut up = KeyboardEvent::new(Key::ArrowUp, tabs[0]);
        assert_eq!(group.handle_key(&mut up, 0, &mut adapter), Some(0));
        let mut right = KeyboardEvent::new(Key::ArrowRight, tabs[0]);
        assert_eq!(group.handle_key(&mut right, 0, &mut adapter), Some(1));
        let mut right = KeyboardEvent::new(Key::ArrowRight, tabs[1]);
        assert_eq!(group.handle_key(&mut right, 1, &mut adapter), Some(1));
        assert_eq!(group.active_index(), 1);
    }

    #[test]
    fn test_unrecognized_keys_pass_through() {
        let (_doc, mut adapter, tabs) = tablist(&["a", "b"]);
        let mut group = build(true, &mut adapter, &tabs);

        let mut typed = KeyboardEvent::new(Key::parse("x"), tabs[0]);
        assert_eq!(group.handle_key(&mut typed, 0, &mut adapter), None);
        assert!(!typed.is_default_prevented());

        let mut back = KeyboardEvent::new(Key::ArrowLeft, tabs[0])
            .with_modifiers(Modifiers { alt: true, ..Default::default() });
        assert_eq!(group.handle_key(&mut back, 0, &mut adapter), None);
        assert!(!back.is_default_prevented());
    }

    #[test]
    fn test_set_active_out_of_range() {
        let (doc, mut adapter, tabs) = tablist(&["a", "b"]);
        let mut group = build(true, &mut adapter, &tabs);
        assert!(matches!(
            group.set_active(5, &mut adapter),
            Err(A11yError::IndexOutOfRange { index: 5, len: 2 })
        ));
        group.set_active(1, &mut adapter).unwrap();
        assert_eq!(tabindex(&doc, tabs[1]), "0");
        // Selection does not steal focus
        assert_eq!(doc.borrow().active_element(), doc.borrow().body());
    }

    #[test]
    fn test_remove_active_item_keeps_invariant() {
        let (doc, mut adapter, tabs) = tablist(&["a", "b", "c"]);
        let mut group = build(true, &mut adapter, &tabs);
        group.set_active(2, &mut adapter).unwrap();

        assert!(group.remove_item(tabs[2], &mut adapter));
        assert_eq!(group.active_index(), 1);
        assert_eq!(tabindex(&doc, tabs[1]), "0");

        assert!(group.remove_item(tabs[0], &mut adapter));
        assert_eq!(group.active_index(), 0);
        assert_eq!(group.active_item(), Some(tabs[1]));
        assert!(!group.remove_item(tabs[0], &mut adapter));
    }

    #[test]
    fn test_empty_group_ignores_keys() {
        let (_doc, mut adapter, tabs) = tablist(&["a"]);
        let mut group = RovingFocusGroup::new(Orientation::Vertical, true);
        let mut end = KeyboardEvent::new(Key::End, tabs[0]);
        assert_eq!(group.handle_key(&mut end, 0, &mut adapter), None);
        assert!(!group.focus_active(&mut adapter));
    }
}
