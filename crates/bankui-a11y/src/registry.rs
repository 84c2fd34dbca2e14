//! Interaction Registry
//!
//! Per-thread singletons for the key router and the announcer, so components
//! can trap focus or announce without threading handles through every view.
//! The router must be installed with [`init`]; the announcer is created on
//! first use. [`reset`] tears both down, which keeps tests isolated.
//!
//! Focus traps are handed out as [`ScopeGuard`]s: dropping the guard ends
//! the trap on every exit path, including early returns and panics.

use std::cell::RefCell;

use bankui_dom::{KeyboardEvent, NodeId};

use crate::announcer::Announcer;
use crate::aria::{Orientation, Politeness};
use crate::config::{A11yConfig, AnnouncerConfig};
use crate::platform::PlatformFocusAdapter;
use crate::roving::GroupId;
use crate::router::{Dispatch, EscapeListenerId, KeyRouter};
use crate::scope::ScopeHandle;
use crate::A11yError;

/// Teardown that could not run because the router was borrowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Teardown {
    Scope(ScopeHandle),
    Escape(EscapeListenerId),
}

thread_local! {
    static ROUTER: RefCell<Option<KeyRouter>> = const { RefCell::new(None) };
    static ANNOUNCER: RefCell<Option<Announcer>> = const { RefCell::new(None) };
    static ANNOUNCER_CONFIG: RefCell<Option<AnnouncerConfig>> = const { RefCell::new(None) };
    static DEFERRED: RefCell<Vec<Teardown>> = const { RefCell::new(Vec::new()) };
}

/// Install the router for this thread, replacing any previous one
pub fn init(adapter: impl PlatformFocusAdapter + 'static, config: &A11yConfig) {
    let router = KeyRouter::new(Box::new(adapter), &config.focus);
    ROUTER.with(|cell| {
        if let Some(mut previous) = cell.borrow_mut().replace(router) {
            tracing::warn!("interaction registry re-initialized");
            previous.deactivate_all();
        }
    });
    ANNOUNCER_CONFIG.with(|cell| *cell.borrow_mut() = Some(config.announcer.clone()));
    ANNOUNCER.with(|cell| *cell.borrow_mut() = None);
    DEFERRED.with(|cell| cell.borrow_mut().clear());
}

/// Install a specific announcer (e.g. one driven by a manual clock)
pub fn install_announcer(announcer: Announcer) {
    ANNOUNCER.with(|cell| *cell.borrow_mut() = Some(announcer));
}

/// Tear down both singletons
pub fn reset() {
    let router = ROUTER.with(|cell| cell.borrow_mut().take());
    if let Some(mut router) = router {
        router.deactivate_all();
    }
    ANNOUNCER.with(|cell| *cell.borrow_mut() = None);
    ANNOUNCER_CONFIG.with(|cell| *cell.borrow_mut() = None);
    DEFERRED.with(|cell| cell.borrow_mut().clear());
}

pub fn is_initialized() -> bool {
    ROUTER.with(|cell| cell.borrow().is_some())
}

/// Run `f` against the router
pub fn with_router<R>(f: impl FnOnce(&mut KeyRouter) -> R) -> Result<R, A11yError> {
    ROUTER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let router = slot.as_mut().ok_or(A11yError::NotInitialized)?;
        run_deferred(router);
        Ok(f(router))
    })
}

/// Run `f` against the announcer, creating it on first use
pub fn with_announcer<R>(f: impl FnOnce(&mut Announcer) -> R) -> R {
    ANNOUNCER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let announcer = slot.get_or_insert_with(|| {
            let config = ANNOUNCER_CONFIG.with(|c| c.borrow().clone()).unwrap_or_default();
            Announcer::new(&config)
        });
        f(announcer)
    })
}

fn run_deferred(router: &mut KeyRouter) {
    let pending = DEFERRED.with(|cell| std::mem::take(&mut *cell.borrow_mut()));
    for teardown in pending {
        match teardown {
            Teardown::Scope(handle) => {
                router.deactivate_scope(handle);
            }
            Teardown::Escape(id) => {
                router.remove_escape(id);
            }
        }
    }
}

/// Run a teardown now, or queue it if the router is busy
fn teardown(item: Teardown) {
    let ran = ROUTER
        .try_with(|cell| match cell.try_borrow_mut() {
            Ok(mut slot) => {
                if let Some(router) = slot.as_mut() {
                    match item {
                        Teardown::Scope(handle) => {
                            router.deactivate_scope(handle);
                        }
                        Teardown::Escape(id) => {
                            router.remove_escape(id);
                        }
                    }
                }
                true
            }
            Err(_) => false,
        })
        .unwrap_or(true);

    if !ran {
        tracing::debug!("router busy, deferring {:?}", item);
        let _ = DEFERRED.try_with(|cell| cell.borrow_mut().push(item));
    }
}

// ---- focus scopes ----

/// Live focus trap; dropping it deactivates the scope
#[must_use = "dropping the guard immediately ends the focus trap"]
#[derive(Debug)]
pub struct ScopeGuard {
    handle: ScopeHandle,
    released: bool,
}

impl ScopeGuard {
    pub fn handle(&self) -> ScopeHandle {
        self.handle
    }

    /// End the trap now
    pub fn release(mut self) {
        self.released = true;
        teardown(Teardown::Scope(self.handle));
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if !self.released {
            teardown(Teardown::Scope(self.handle));
        }
    }
}

/// Trap focus inside `container` until the guard is dropped
pub fn activate_focus_scope(container: NodeId) -> Result<ScopeGuard, A11yError> {
    let handle = with_router(|router| router.activate_scope(container))?;
    Ok(ScopeGuard { handle, released: false })
}

/// Explicit deactivation by handle; stale handles are ignored
pub fn deactivate_focus_scope(handle: ScopeHandle) -> bool {
    with_router(|router| router.deactivate_scope(handle)).unwrap_or(false)
}

// ---- escape ----

/// Registered Escape listener; dropping it unsubscribes
#[must_use = "dropping the subscription immediately removes the listener"]
#[derive(Debug)]
pub struct EscapeSubscription {
    id: EscapeListenerId,
    released: bool,
}

impl EscapeSubscription {
    pub fn id(&self) -> EscapeListenerId {
        self.id
    }

    /// Toggle whether Escape reaches this listener
    pub fn set_active(&self, active: bool) {
        if let Err(e) = with_router(|router| router.set_escape_active(self.id, active)) {
            tracing::debug!("set_active on escape listener {:?} ignored: {}", self.id, e);
        }
    }

    pub fn unsubscribe(mut self) {
        self.released = true;
        teardown(Teardown::Escape(self.id));
    }
}

impl Drop for EscapeSubscription {
    fn drop(&mut self) {
        if !self.released {
            teardown(Teardown::Escape(self.id));
        }
    }
}

pub fn on_escape(callback: impl Fn() + 'static) -> Result<EscapeSubscription, A11yError> {
    let id = with_router(|router| router.on_escape(callback))?;
    Ok(EscapeSubscription { id, released: false })
}

// ---- keyboard & frames ----

/// Route a key event and run any escape callbacks
///
/// Callbacks run after the router borrow is released, so they may drop
/// guards or open new scopes.
pub fn dispatch_key(event: &mut KeyboardEvent) -> Dispatch {
    let dispatch = with_router(|router| router.handle_key(event)).unwrap_or(Dispatch::Ignored);
    dispatch.fire();
    dispatch
}

pub fn run_animation_frame() -> Option<NodeId> {
    with_router(|router| router.run_animation_frame()).ok().flatten()
}

pub fn create_roving_group(orientation: Orientation, wrap: bool) -> Result<GroupId, A11yError> {
    with_router(|router| router.create_roving_group(orientation, wrap))
}

pub fn register_roving_item(group: GroupId, item: NodeId) -> Result<usize, A11yError> {
    with_router(|router| router.register_item(group, item))?
}

// ---- announcements ----

pub fn announce(text: &str, politeness: Politeness) {
    with_announcer(|announcer| announcer.announce(text, politeness));
}
