//! Key Router
//!
//! The single keyboard listener. Escape goes to the registered escape
//! listeners, Tab to the active focus scope, Arrow/Home/End to the roving
//! group that owns the focused item. The router is also the only owner of
//! "which scope is active", so two scopes can never fight over one Tab.

use std::cell::Cell;
use std::rc::Rc;

use bankui_dom::{Key, KeyboardEvent, NodeId};

use crate::aria::{AriaRole, Orientation};
use crate::config::FocusConfig;
use crate::platform::PlatformFocusAdapter;
use crate::resolver::FocusableSetResolver;
use crate::roving::{GroupId, RovingFocusGroup};
use crate::scope::{FocusScope, ScopeHandle, TabOutcome};
use crate::A11yError;

thread_local! {
    /// Shared by every router on the thread, so handles and listener ids
    /// from before a re-init never match anything in the new router
    static NEXT_ID: Cell<u64> = const { Cell::new(1) };
}

fn next_id() -> u64 {
    NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    })
}

/// Close action run on Escape
pub type EscapeCallback = Rc<dyn Fn()>;

/// Identifier of a registered escape listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EscapeListenerId(pub(crate) u64);

struct EscapeListener {
    id: EscapeListenerId,
    callback: EscapeCallback,
    active: bool,
}

/// Focus move waiting for the next animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFocus {
    /// Scope that requested it; the move is dropped if that scope is gone
    scope: Option<ScopeHandle>,
    target: NodeId,
}

/// Result of routing one key event
#[must_use = "escape callbacks only run when the dispatch is fired"]
pub enum Dispatch {
    /// No component handled the key
    Ignored,
    /// The active scope saw a Tab
    Tab(TabOutcome),
    /// A roving group moved to `index`
    Roving { group: GroupId, index: usize },
    /// Escape listeners to run once the router is no longer borrowed
    Escape(Vec<EscapeCallback>),
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignored => write!(f, "Ignored"),
            Self::Tab(outcome) => f.debug_tuple("Tab").field(outcome).finish(),
            Self::Roving { group, index } => f
                .debug_struct("Roving")
                .field("group", group)
                .field("index", index)
                .finish(),
            Self::Escape(callbacks) => write!(f, "Escape({} listeners)", callbacks.len()),
        }
    }
}

impl Dispatch {
    /// Run any escape callbacks carried by this dispatch
    pub fn fire(&self) {
        if let Self::Escape(callbacks) = self {
            for callback in callbacks {
                callback();
            }
        }
    }

    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Global keyboard dispatcher and owner of the active focus scope
pub struct KeyRouter {
    adapter: Box<dyn PlatformFocusAdapter>,
    resolver: FocusableSetResolver,
    defer_initial_focus: bool,
    active: Option<FocusScope>,
    pending: Option<PendingFocus>,
    escape: Vec<EscapeListener>,
    groups: Vec<(GroupId, RovingFocusGroup)>,
}

impl std::fmt::Debug for KeyRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRouter")
            .field("active", &self.active)
            .field("pending", &self.pending)
            .field("escape_listeners", &self.escape.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

impl KeyRouter {
    pub fn new(adapter: Box<dyn PlatformFocusAdapter>, config: &FocusConfig) -> Self {
        Self {
            adapter,
            resolver: FocusableSetResolver::default(),
            defer_initial_focus: config.defer_initial_focus,
            active: None,
            pending: None,
            escape: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Replace the focusability predicate table
    pub fn with_resolver(mut self, resolver: FocusableSetResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn adapter(&self) -> &dyn PlatformFocusAdapter {
        self.adapter.as_ref()
    }

    pub fn adapter_mut(&mut self) -> &mut dyn PlatformFocusAdapter {
        self.adapter.as_mut()
    }

    pub fn resolver(&self) -> &FocusableSetResolver {
        &self.resolver
    }

    // ---- focus scopes ----

    /// Trap focus inside `container`
    ///
    /// Activating the container that is already trapped returns the existing
    /// handle. Activating a different container cleanly deactivates the
    /// current scope first: the last activation wins.
    pub fn activate_scope(&mut self, container: NodeId) -> ScopeHandle {
        if let Some(active) = &self.active {
            if active.container() == container && active.is_active() {
                return active.handle();
            }
        }
        if let Some(mut previous) = self.active.take() {
            tracing::warn!(
                "scope {:?} superseded by activation on {}",
                previous.handle(),
                container
            );
            previous.deactivate(self.adapter.as_mut(), &self.resolver);
            self.cancel_pending_for(previous.handle());
        }

        let role = self
            .adapter
            .get_attribute(container, "role")
            .and_then(|r| AriaRole::parse(&r));
        if !role.is_some_and(|r| r.is_modal_surface()) {
            tracing::debug!("trapping focus in {} which is not a dialog", container);
        }

        let handle = ScopeHandle(next_id());
        let mut scope = FocusScope::new(handle, container);
        if let Some(first) = scope.activate(self.adapter.as_ref(), &self.resolver) {
            if self.defer_initial_focus {
                if let Some(pending) = self.pending {
                    tracing::debug!(
                        "queued focus on {} replaced by initial focus of scope {:?}",
                        pending.target,
                        handle
                    );
                }
                self.pending = Some(PendingFocus { scope: Some(handle), target: first });
            } else {
                self.adapter.focus(first);
            }
        }
        self.active = Some(scope);
        handle
    }

    /// End the trap identified by `handle`
    ///
    /// Stale or foreign handles are ignored; returns whether a scope ended.
    pub fn deactivate_scope(&mut self, handle: ScopeHandle) -> bool {
        match self.active.take() {
            Some(mut scope) if scope.handle() == handle => {
                scope.deactivate(self.adapter.as_mut(), &self.resolver);
                self.cancel_pending_for(handle);
                true
            }
            other => {
                self.active = other;
                tracing::debug!("deactivate for stale scope {:?} ignored", handle);
                false
            }
        }
    }

    pub fn active_scope(&self) -> Option<&FocusScope> {
        self.active.as_ref()
    }

    /// End whatever scope is active (teardown path)
    pub fn deactivate_all(&mut self) {
        if let Some(handle) = self.active.as_ref().map(FocusScope::handle) {
            self.deactivate_scope(handle);
        }
        self.pending = None;
    }

    fn cancel_pending_for(&mut self, handle: ScopeHandle) {
        if self.pending.is_some_and(|p| p.scope == Some(handle)) {
            self.pending = None;
        }
    }

    // ---- focus moves ----

    /// Move focus now
    pub fn focus(&mut self, target: NodeId) -> bool {
        self.adapter.focus(target)
    }

    /// Move focus on the next animation frame (after the view re-renders)
    ///
    /// A queued initial focus of the active scope takes priority: the
    /// request is dropped rather than pulling focus out of an opening dialog.
    /// Any other queued move is replaced.
    pub fn schedule_focus(&mut self, target: NodeId) {
        if let Some(pending) = self.pending {
            let active = self.active.as_ref().map(FocusScope::handle);
            if pending.scope.is_some() && pending.scope == active {
                tracing::debug!(
                    "focus request for {} dropped, scope initial focus on {} is queued",
                    target,
                    pending.target
                );
                return;
            }
            tracing::debug!("queued focus on {} replaced by {}", pending.target, target);
        }
        self.pending = Some(PendingFocus { scope: None, target });
    }

    pub fn has_pending_focus(&self) -> bool {
        self.pending.is_some()
    }

    /// Perform the deferred focus move, if it is still wanted and possible
    pub fn run_animation_frame(&mut self) -> Option<NodeId> {
        let pending = self.pending.take()?;
        if let Some(scope) = pending.scope {
            if self.active.as_ref().map(FocusScope::handle) != Some(scope) {
                return None;
            }
        }
        if !self.resolver.can_focus(self.adapter.as_ref(), pending.target) {
            tracing::debug!("deferred focus target {} is no longer focusable", pending.target);
            return None;
        }
        self.adapter.focus(pending.target).then_some(pending.target)
    }

    // ---- escape listeners ----

    /// Register a close action for Escape
    pub fn on_escape(&mut self, callback: impl Fn() + 'static) -> EscapeListenerId {
        let id = EscapeListenerId(next_id());
        self.escape.push(EscapeListener {
            id,
            callback: Rc::new(callback),
            active: true,
        });
        id
    }

    /// Toggle the listener's `is_active` flag
    pub fn set_escape_active(&mut self, id: EscapeListenerId, active: bool) {
        if let Some(listener) = self.escape.iter_mut().find(|l| l.id == id) {
            listener.active = active;
        }
    }

    pub fn remove_escape(&mut self, id: EscapeListenerId) -> bool {
        let before = self.escape.len();
        self.escape.retain(|l| l.id != id);
        self.escape.len() != before
    }

    // ---- roving groups ----

    pub fn create_roving_group(&mut self, orientation: Orientation, wrap: bool) -> GroupId {
        let id = GroupId(next_id());
        self.groups.push((id, RovingFocusGroup::new(orientation, wrap)));
        id
    }

    pub fn group(&self, id: GroupId) -> Option<&RovingFocusGroup> {
        self.groups.iter().find(|(g, _)| *g == id).map(|(_, group)| group)
    }

    fn group_with_adapter(
        &mut self,
        id: GroupId,
    ) -> Result<(&mut RovingFocusGroup, &mut dyn PlatformFocusAdapter), A11yError> {
        let group = self
            .groups
            .iter_mut()
            .find(|(g, _)| *g == id)
            .map(|(_, group)| group)
            .ok_or(A11yError::UnknownGroup(id))?;
        Ok((group, self.adapter.as_mut()))
    }

    pub fn register_item(&mut self, id: GroupId, item: NodeId) -> Result<usize, A11yError> {
        let (group, adapter) = self.group_with_adapter(id)?;
        Ok(group.register_item(item, adapter))
    }

    pub fn remove_item(&mut self, id: GroupId, item: NodeId) -> Result<bool, A11yError> {
        let (group, adapter) = self.group_with_adapter(id)?;
        Ok(group.remove_item(item, adapter))
    }

    /// Select an item without moving focus
    pub fn set_group_active(&mut self, id: GroupId, index: usize) -> Result<(), A11yError> {
        let (group, adapter) = self.group_with_adapter(id)?;
        group.set_active(index, adapter)
    }

    /// Move focus to the group's active item
    pub fn focus_group(&mut self, id: GroupId) -> Result<bool, A11yError> {
        let (group, adapter) = self.group_with_adapter(id)?;
        Ok(group.focus_active(adapter))
    }

    pub fn remove_roving_group(&mut self, id: GroupId) -> bool {
        let before = self.groups.len();
        self.groups.retain(|(g, _)| *g != id);
        self.groups.len() != before
    }

    /// Group that owns `item`
    pub fn group_for_item(&self, item: NodeId) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, group)| group.index_of(item).is_some())
            .map(|(id, _)| *id)
    }

    // ---- dispatch ----

    /// Route one `keydown`
    pub fn handle_key(&mut self, event: &mut KeyboardEvent) -> Dispatch {
        match event.key {
            Key::Escape => {
                let callbacks: Vec<EscapeCallback> = self
                    .escape
                    .iter()
                    .filter(|l| l.active)
                    .map(|l| Rc::clone(&l.callback))
                    .collect();
                if callbacks.is_empty() {
                    Dispatch::Ignored
                } else {
                    Dispatch::Escape(callbacks)
                }
            }
            Key::Tab => match &self.active {
                Some(scope) => {
                    Dispatch::Tab(scope.handle_tab(event, self.adapter.as_mut(), &self.resolver))
                }
                None => Dispatch::Ignored,
            },
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight | Key::Home | Key::End => {
                let target = event.target;
                for (id, group) in &mut self.groups {
                    if let Some(current) = group.index_of(target) {
                        return match group.handle_key(event, current, self.adapter.as_mut()) {
                            Some(index) => Dispatch::Roving { group: *id, index },
                            None => Dispatch::Ignored,
                        };
                    }
                }
                Dispatch::Ignored
            }
            _ => Dispatch::Ignored,
        }
    }
}
