//! Property-based tests for focus traps and roving groups

use std::cell::RefCell;
use std::rc::Rc;

use bankui_a11y::{
    DomFocusAdapter, FocusConfig, KeyRouter, Orientation, RovingFocusGroup, TabOutcome,
};
use bankui_dom::{Document, Key, KeyboardEvent, NodeId};
use proptest::prelude::*;

/// Dialog with `count` buttons after a trigger that holds focus
fn dialog(count: usize) -> (Rc<RefCell<Document>>, NodeId, NodeId, Vec<NodeId>) {
    let doc = Rc::new(RefCell::new(Document::new()));
    let (trigger, container, buttons) = {
        let mut d = doc.borrow_mut();
        let body = d.body();
        let trigger = d.append_element(body, "button", &[]).unwrap();
        let container = d.append_element(body, "div", &[("role", "dialog")]).unwrap();
        let buttons = (0..count)
            .map(|_| d.append_element(container, "button", &[]).unwrap())
            .collect();
        d.focus(trigger);
        (trigger, container, buttons)
    };
    (doc, trigger, container, buttons)
}

fn router(doc: &Rc<RefCell<Document>>) -> KeyRouter {
    KeyRouter::new(
        Box::new(DomFocusAdapter::new(doc.clone())),
        &FocusConfig { defer_initial_focus: false },
    )
}

fn nav_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::ArrowLeft),
        Just(Key::ArrowRight),
        Just(Key::ArrowUp),
        Just(Key::ArrowDown),
        Just(Key::Home),
        Just(Key::End),
    ]
}

/// Property: activation focuses the first focusable descendant and
/// deactivation restores the element focused before
#[test]
fn prop_activation_focuses_first_and_restores() {
    proptest!(|(count in 1usize..12)| {
        let (doc, trigger, container, buttons) = dialog(count);
        let mut router = router(&doc);

        let handle = router.activate_scope(container);
        prop_assert_eq!(doc.borrow().active_element(), buttons[0]);

        prop_assert!(router.deactivate_scope(handle));
        prop_assert_eq!(doc.borrow().active_element(), trigger);
    });
}

/// Property: Tab on the last element wraps to the first and Shift+Tab on
/// the first wraps to the last, for any set size
#[test]
fn prop_tab_wraps_at_both_ends() {
    proptest!(|(count in 1usize..12)| {
        let (doc, _trigger, container, buttons) = dialog(count);
        let mut router = router(&doc);
        router.activate_scope(container);

        let first = buttons[0];
        let last = buttons[count - 1];

        let mut forward = KeyboardEvent::tab(last, false);
        let _ = router.handle_key(&mut forward);
        prop_assert!(forward.is_default_prevented());
        prop_assert_eq!(doc.borrow().active_element(), first);

        let mut backward = KeyboardEvent::tab(first, true);
        let _ = router.handle_key(&mut backward);
        prop_assert!(backward.is_default_prevented());
        prop_assert_eq!(doc.borrow().active_element(), last);
    });
}

/// Property: Tab from an interior element is left to the platform
#[test]
fn prop_interior_tab_passes_through() {
    proptest!(|(count in 3usize..12, pick in any::<prop::sample::Index>())| {
        let (doc, _trigger, container, buttons) = dialog(count);
        let mut router = router(&doc);
        let handle = router.activate_scope(container);
        let scope = router.active_scope().unwrap().clone();
        prop_assert_eq!(scope.handle(), handle);

        let interior = buttons[1 + pick.index(count - 2)];
        let mut tab = KeyboardEvent::tab(interior, false);
        let mut adapter = DomFocusAdapter::new(doc.clone());
        let outcome = scope.handle_tab(&mut tab, &mut adapter, router.resolver());
        prop_assert_eq!(outcome, TabOutcome::PassThrough);
        prop_assert!(!tab.is_default_prevented());
    });
}

/// Property: N ArrowRight presses with wrap return to index 0; without wrap
/// they clamp at N-1
#[test]
fn prop_arrow_cycle() {
    proptest!(|(count in 1usize..10, wrap in any::<bool>())| {
        let (doc, _trigger, _container, items) = dialog(count);
        let mut adapter = DomFocusAdapter::new(doc.clone());
        let mut group = RovingFocusGroup::new(Orientation::Horizontal, wrap);
        for &item in &items {
            group.register_item(item, &mut adapter);
        }

        for _ in 0..count {
            let current = group.active_index();
            let mut right = KeyboardEvent::new(Key::ArrowRight, items[current]);
            group.handle_key(&mut right, current, &mut adapter);
        }
        let expected = if wrap { 0 } else { count - 1 };
        prop_assert_eq!(group.active_index(), expected);

        if !wrap {
            let mut right = KeyboardEvent::new(Key::ArrowRight, items[count - 1]);
            prop_assert_eq!(group.handle_key(&mut right, count - 1, &mut adapter), Some(count - 1));
        }
    });
}

/// Property: after any key sequence exactly one item is tab-reachable, the
/// one at `active_index`, and it holds focus
#[test]
fn prop_single_tab_stop() {
    proptest!(|(count in 1usize..8, wrap in any::<bool>(), keys in prop::collection::vec(nav_key(), 1..30))| {
        let (doc, _trigger, _container, items) = dialog(count);
        let mut adapter = DomFocusAdapter::new(doc.clone());
        let mut group = RovingFocusGroup::new(Orientation::Vertical, wrap);
        for &item in &items {
            group.register_item(item, &mut adapter);
        }

        for key in keys {
            let current = group.active_index();
            let mut event = KeyboardEvent::new(key, items[current]);
            let next = group.handle_key(&mut event, current, &mut adapter);
            prop_assert!(next.is_some());
            prop_assert!(next.unwrap() < count);
        }

        let d = doc.borrow();
        let reachable: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| d.get_attr(**item, "tabindex") == Some("0"))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(reachable, vec![group.active_index()]);
        prop_assert_eq!(d.active_element(), items[group.active_index()]);
    });
}
