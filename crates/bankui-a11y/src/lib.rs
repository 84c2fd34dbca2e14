//! Bank UI Interaction Layer
//!
//! Keyboard and assistive-technology behaviour for the loan application UI.
//!
//! Features:
//! - Focus traps for modal dialogs, with focus restore
//! - Roving tabindex for tabs and steppers
//! - Switch controls
//! - Live-region announcements
//! - Session timeout warning and step wizard flows

pub mod aria;
pub mod platform;
pub mod resolver;
pub mod scope;
pub mod router;
pub mod roving;
pub mod switch;
pub mod announcer;
pub mod config;
pub mod registry;
pub mod countdown;
pub mod wizard;

pub use aria::{AriaRole, Orientation, Politeness};
pub use platform::{DomFocusAdapter, FocusableElement, PlatformFocusAdapter};
pub use resolver::{FocusableSetResolver, TagRule};
pub use scope::{FocusScope, ScopeHandle, ScopeState, TabOutcome};
pub use router::{Dispatch, EscapeListenerId, KeyRouter};
pub use roving::{GroupId, RovingFocusGroup};
pub use switch::SwitchControl;
pub use announcer::{
    AnnouncementMessage, Announcer, Clock, LiveRegionMutation, ManualClock, MutationKind,
    SystemClock,
};
pub use config::{A11yConfig, AnnouncerConfig, FocusConfig, SessionConfig};
pub use registry::{EscapeSubscription, ScopeGuard};
pub use countdown::{CountdownEvent, SessionTimeoutCountdown};
pub use wizard::{FieldError, StepOutcome, StepWizard, WizardStep};

/// Interaction layer error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Index {index} out of range for group of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown roving group {0:?}")]
    UnknownGroup(GroupId),

    #[error("Interaction registry used before init()")]
    NotInitialized,

    #[error("Invalid config value for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
