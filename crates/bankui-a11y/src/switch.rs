//! Switch Control
//!
//! Two-state toggle with `role="switch"` semantics. Space, Enter and click
//! all toggle, and the bound element's `aria-checked` is rewritten on every
//! change so visual and semantic state cannot drift apart.

use bankui_dom::{Key, KeyboardEvent, NodeId};

use crate::aria::AriaRole;
use crate::platform::PlatformFocusAdapter;

type Subscriber = Box<dyn FnMut(bool)>;

/// Boolean toggle with switch keyboard semantics
pub struct SwitchControl {
    checked: bool,
    node: Option<NodeId>,
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for SwitchControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchControl")
            .field("checked", &self.checked)
            .field("node", &self.node)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl SwitchControl {
    pub fn new(checked: bool) -> Self {
        Self {
            checked,
            node: None,
            subscribers: Vec::new(),
        }
    }

    /// Bind to a rendered element and write its initial ARIA state
    pub fn bind(mut self, node: NodeId, adapter: &mut dyn PlatformFocusAdapter) -> Self {
        self.node = Some(node);
        adapter.set_attribute(node, "role", Some(AriaRole::Switch.as_str()));
        self.sync(adapter);
        self
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// `aria-checked` value
    pub fn aria_checked(&self) -> &'static str {
        if self.checked { "true" } else { "false" }
    }

    /// Screen-reader text shown inside the switch
    pub fn state_label(&self) -> &'static str {
        if self.checked { "På" } else { "Av" }
    }

    /// Called with the new state after every change
    pub fn subscribe(&mut self, subscriber: impl FnMut(bool) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Flip the state and notify subscribers
    pub fn toggle(&mut self, adapter: &mut dyn PlatformFocusAdapter) -> bool {
        self.set_checked(!self.checked, adapter);
        self.checked
    }

    /// Set an explicit state; subscribers hear only real changes
    pub fn set_checked(&mut self, checked: bool, adapter: &mut dyn PlatformFocusAdapter) {
        if self.checked == checked {
            return;
        }
        self.checked = checked;
        self.sync(adapter);
        tracing::debug!("switch {:?} -> {}", self.node, self.aria_checked());
        for subscriber in &mut self.subscribers {
            subscriber(checked);
        }
    }

    /// Pointer activation
    pub fn click(&mut self, adapter: &mut dyn PlatformFocusAdapter) -> bool {
        self.toggle(adapter)
    }

    /// Space and Enter toggle; returns whether the key was handled
    ///
    /// Space is prevented so the page does not scroll, Enter so a native
    /// button does not toggle a second time through its synthesized click.
    pub fn handle_key(
        &mut self,
        event: &mut KeyboardEvent,
        adapter: &mut dyn PlatformFocusAdapter,
    ) -> bool {
        match event.key {
            Key::Space | Key::Enter => {
                event.prevent_default();
                self.toggle(adapter);
                true
            }
            _ => false,
        }
    }

    fn sync(&self, adapter: &mut dyn PlatformFocusAdapter) {
        if let Some(node) = self.node {
            adapter.set_attribute(node, "aria-checked", Some(self.aria_checked()));
        }
    }
}
