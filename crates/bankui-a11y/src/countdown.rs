//! Session Timeout Countdown
//!
//! State behind the "session is about to expire" dialog. The dialog itself
//! is a focus scope; this type only counts down and decides when the
//! remaining time is worth announcing. Announcing every second would drown
//! out everything else, so only checkpoints and explicit extensions speak.

use crate::announcer::Announcer;
use crate::aria::Politeness;
use crate::config::SessionConfig;

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Seconds left
    Running(u32),
    /// Time is up; the caller logs out and closes the dialog
    Expired,
}

#[derive(Debug, Clone)]
pub struct SessionTimeoutCountdown {
    remaining: u32,
    extend_secs: u32,
    announce_every: u32,
    last_announced: Option<String>,
}

impl SessionTimeoutCountdown {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            remaining: config.warning_secs,
            extend_secs: config.extend_secs,
            announce_every: config.announce_every_secs.max(1),
            last_announced: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Visible (and announced) countdown text
    pub fn display_text(&self) -> String {
        format!("Tid kvar: {} sekunder", self.remaining)
    }

    /// Announce the starting value when the dialog opens
    pub fn open(&mut self, announcer: &mut Announcer) {
        self.announce_if_changed(announcer);
    }

    /// One second elapsed
    pub fn tick(&mut self, announcer: &mut Announcer) -> CountdownEvent {
        if self.remaining == 0 {
            return CountdownEvent::Expired;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            tracing::info!("session warning expired");
            return CountdownEvent::Expired;
        }
        if self.remaining % self.announce_every == 0 {
            self.announce_if_changed(announcer);
        }
        CountdownEvent::Running(self.remaining)
    }

    /// "Förläng session": reset to the extension period
    pub fn extend(&mut self, announcer: &mut Announcer) {
        self.remaining = self.extend_secs;
        tracing::debug!("session extended to {}s", self.extend_secs);
        self.announce_if_changed(announcer);
    }

    fn announce_if_changed(&mut self, announcer: &mut Announcer) -> bool {
        let text = self.display_text();
        if self.last_announced.as_deref() == Some(text.as_str()) {
            return false;
        }
        announcer.announce(&text, Politeness::Assertive);
        self.last_announced = Some(text);
        true
    }
}
