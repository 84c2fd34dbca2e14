//! Focus Scope
//!
//! One focus-trap session over a container. The scope itself only knows
//! how to capture, wrap and restore focus; which scope is active is owned
//! by the [`KeyRouter`](crate::router::KeyRouter).

use bankui_dom::{KeyboardEvent, NodeId};

use crate::platform::{FocusableElement, PlatformFocusAdapter};
use crate::resolver::FocusableSetResolver;

/// Opaque handle identifying one activation of a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeHandle(pub(crate) u64);

/// Scope lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    Inactive,
    Active,
}

/// What a Tab keystroke did inside an active scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabOutcome {
    /// Focus wrapped around the set boundary; default was prevented
    Wrapped { to: NodeId },
    /// The platform's own Tab handling proceeds
    PassThrough,
}

/// Focus trap session
#[derive(Debug, Clone)]
pub struct FocusScope {
    handle: ScopeHandle,
    container: NodeId,
    state: ScopeState,
    prior_focus: Option<NodeId>,
}

impl FocusScope {
    pub(crate) fn new(handle: ScopeHandle, container: NodeId) -> Self {
        Self {
            handle,
            container,
            state: ScopeState::Inactive,
            prior_focus: None,
        }
    }

    pub fn handle(&self) -> ScopeHandle {
        self.handle
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn state(&self) -> ScopeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == ScopeState::Active
    }

    /// Element that had focus when the scope was activated
    pub fn prior_focus(&self) -> Option<NodeId> {
        self.prior_focus
    }

    /// Current Tab sequence of the container, recomputed on every call
    pub fn focusable_set(
        &self,
        adapter: &dyn PlatformFocusAdapter,
        resolver: &FocusableSetResolver,
    ) -> Vec<FocusableElement> {
        resolver.resolve(adapter, self.container)
    }

    /// `Inactive -> Active`
    ///
    /// Captures the prior focus and returns the element that should receive
    /// initial focus, if the container has any. Calling this on an active
    /// scope changes nothing and returns `None`.
    pub fn activate(
        &mut self,
        adapter: &dyn PlatformFocusAdapter,
        resolver: &FocusableSetResolver,
    ) -> Option<NodeId> {
        if self.is_active() {
            return None;
        }
        self.prior_focus = adapter.active_element();
        self.state = ScopeState::Active;

        let first = self.focusable_set(adapter, resolver).first().map(|e| e.id);
        tracing::debug!(
            "scope {:?} activated on {} (prior focus {:?}, initial target {:?})",
            self.handle,
            self.container,
            self.prior_focus,
            first
        );
        first
    }

    /// `Active -> Inactive`
    ///
    /// Restores the prior focus when that element is still attached and
    /// focusable; otherwise focus stays wherever the platform put it.
    /// Returns `false` if the scope was not active.
    pub fn deactivate(
        &mut self,
        adapter: &mut dyn PlatformFocusAdapter,
        resolver: &FocusableSetResolver,
    ) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = ScopeState::Inactive;

        match self.prior_focus.take() {
            Some(prior) if resolver.can_focus(adapter, prior) => {
                adapter.focus(prior);
                tracing::debug!("scope {:?} deactivated, focus restored to {}", self.handle, prior);
            }
            Some(prior) => {
                tracing::debug!(
                    "scope {:?} deactivated, restore target {} is gone or unfocusable",
                    self.handle,
                    prior
                );
            }
            None => tracing::debug!("scope {:?} deactivated", self.handle),
        }
        true
    }

    /// Wrap Tab/Shift+Tab at the boundaries of the current set
    pub fn handle_tab(
        &self,
        event: &mut KeyboardEvent,
        adapter: &mut dyn PlatformFocusAdapter,
        resolver: &FocusableSetResolver,
    ) -> TabOutcome {
        if !self.is_active() {
            return TabOutcome::PassThrough;
        }
        let set = self.focusable_set(adapter, resolver);
        let (Some(first), Some(last)) = (set.first(), set.last()) else {
            return TabOutcome::PassThrough;
        };

        let target = if event.target.is_valid() {
            Some(event.target)
        } else {
            adapter.active_element()
        };

        let to = match (event.shift(), target) {
            (false, Some(t)) if t == last.id => first.id,
            (true, Some(t)) if t == first.id => last.id,
            _ => return TabOutcome::PassThrough,
        };

        event.prevent_default();
        adapter.focus(to);
        tracing::trace!("tab wrapped to {} in scope {:?}", to, self.handle);
        TabOutcome::Wrapped { to }
    }
}
