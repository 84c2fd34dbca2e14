//! Keyboard Events
//!
//! `keydown` events as delivered by the platform, with the cancelation and
//! propagation flags handlers use to suppress the default action.

use crate::NodeId;

/// Logical key, named after the DOM `KeyboardEvent.key` values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    /// Any other key value, e.g. a printable character
    Other(String),
}

impl Key {
    /// Parse a DOM `key` string
    pub fn parse(value: &str) -> Self {
        match value {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            other => Self::Other(other.to_string()),
        }
    }

    /// DOM `key` string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tab => "Tab",
            Self::Escape => "Escape",
            Self::Enter => "Enter",
            Self::Space => " ",
            Self::ArrowUp => "ArrowUp",
            Self::ArrowDown => "ArrowDown",
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
            Self::Home => "Home",
            Self::End => "End",
            Self::Other(s) => s,
        }
    }
}

/// Modifier keys held during the event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// `keydown` event
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    /// Element the event was dispatched to (the focused element)
    pub target: NodeId,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl KeyboardEvent {
    pub fn new(key: Key, target: NodeId) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
            target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Tab or, with `shift`, Shift+Tab
    pub fn tab(target: NodeId, shift: bool) -> Self {
        Self::new(Key::Tab, target).with_shift(shift)
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.modifiers.shift = shift;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[inline]
    pub fn shift(&self) -> bool {
        self.modifiers.shift
    }

    /// Key events are always cancelable
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
