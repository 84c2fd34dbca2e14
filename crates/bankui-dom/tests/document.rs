//! Integration tests for bankui-dom
//!
//! Focus, visibility and tree mutation as the interaction layer sees them.

use bankui_dom::{DOMRect, Document, DomError, Key, KeyboardEvent, NodeId};

fn login_form() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::new();
    let body = doc.body();
    let form = doc.append_element(body, "form", &[("id", "login")]).unwrap();
    let pnr = doc
        .append_element(form, "input", &[("id", "personnummer"), ("type", "text")])
        .unwrap();
    let submit = doc.append_element(form, "button", &[("type", "submit")]).unwrap();
    doc.append_text(submit, "Logga in").unwrap();
    (doc, form, pnr, submit)
}

// ============================================================================
// FOCUS
// ============================================================================

#[test]
fn test_focus_falls_back_to_body() {
    let (mut doc, form, pnr, _submit) = login_form();
    assert_eq!(doc.active_element(), doc.body());

    assert!(doc.focus(pnr));
    assert_eq!(doc.active_element(), pnr);

    doc.remove(form).unwrap();
    assert_eq!(doc.active_element(), doc.body());
    assert!(!doc.focus(pnr));
}

#[test]
fn test_disabled_and_hidden_refuse_focus() {
    let (mut doc, form, pnr, submit) = login_form();
    doc.set_attr(submit, "disabled", "").unwrap();
    assert!(!doc.focus(submit));

    doc.set_attr(form, "style", "display: none").unwrap();
    assert!(doc.layout_box(pnr).is_none());
    assert!(!doc.focus(pnr));

    doc.remove_attr(form, "style").unwrap();
    assert!(doc.focus(pnr));
}

#[test]
fn test_zero_size_box_is_invisible() {
    let (mut doc, _form, pnr, _submit) = login_form();
    doc.set_rect(pnr, Some(DOMRect::from_xywh(0.0, 0.0, 0.0, 0.0))).unwrap();
    assert!(doc.layout_box(pnr).is_none());
    doc.set_rect(pnr, Some(DOMRect::from_xywh(10.0, 20.0, 200.0, 0.0))).unwrap();
    assert!(doc.layout_box(pnr).is_none());
    assert!(!doc.focus(pnr));
    doc.set_rect(pnr, Some(DOMRect::from_xywh(10.0, 20.0, 200.0, 32.0))).unwrap();
    assert_eq!(doc.layout_box(pnr).map(|r| r.bottom()), Some(52.0));
}

// ============================================================================
// TREE
// ============================================================================

#[test]
fn test_lookup_and_text() {
    let (doc, _form, pnr, submit) = login_form();
    assert_eq!(doc.get_element_by_id("personnummer"), Some(pnr));
    assert_eq!(doc.get_element_by_id("saknas"), None);
    assert_eq!(doc.tree().text_content(submit), "Logga in");
}

#[test]
fn test_descendants_in_document_order() {
    let (doc, form, pnr, submit) = login_form();
    let elements: Vec<NodeId> = doc
        .tree()
        .descendants(form)
        .filter(|&id| doc.tree().element(id).is_some())
        .collect();
    assert_eq!(elements, vec![pnr, submit]);
}

#[test]
fn test_reinsert_after_remove() {
    let (mut doc, form, pnr, _submit) = login_form();
    doc.remove(pnr).unwrap();
    assert!(!doc.tree().is_connected(pnr));
    doc.insert(form, pnr).unwrap();
    assert!(doc.tree().is_connected(pnr));
    assert_eq!(doc.tree().children(form).last(), Some(&pnr));
}

#[test]
fn test_cycle_is_rejected() {
    let (mut doc, form, pnr, _submit) = login_form();
    let err = doc.insert(pnr, form).unwrap_err();
    assert!(matches!(err, DomError::HierarchyRequest { .. }));
}

// ============================================================================
// EVENTS
// ============================================================================

#[test]
fn test_keyboard_event_flags() {
    let (_doc, _form, pnr, _submit) = login_form();
    let mut event = KeyboardEvent::tab(pnr, true);
    assert_eq!(event.key, Key::Tab);
    assert!(event.shift());
    assert!(!event.is_default_prevented());
    event.prevent_default();
    assert!(event.is_default_prevented());
    assert_eq!(Key::parse(" "), Key::Space);
}
