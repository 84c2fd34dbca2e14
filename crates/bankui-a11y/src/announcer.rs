//! Announcer
//!
//! Transient messages for assistive technology through one polite and one
//! assertive live region. Assistive technology only speaks live-region
//! *changes*, so writing the text already shown first clears the region;
//! every announcement is therefore an observable mutation. Messages clear
//! themselves after a fixed dwell time.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use crate::aria::Politeness;
use crate::config::AnnouncerConfig;

/// Millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self { start: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Text handed to assistive technology
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementMessage {
    pub text: String,
    pub politeness: Politeness,
}

/// Kind of live-region change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Region emptied (re-announcement discriminator or dwell expiry)
    Cleared,
    /// Region now shows this text
    Set(String),
}

/// One observable change of a live region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRegionMutation {
    pub politeness: Politeness,
    pub kind: MutationKind,
    pub at_ms: u64,
}

#[derive(Debug, Default)]
struct LiveRegion {
    content: String,
    expires_at: Option<u64>,
}

/// Process-wide announcement channel
pub struct Announcer {
    polite: LiveRegion,
    assertive: LiveRegion,
    mutations: VecDeque<LiveRegionMutation>,
    pending: VecDeque<AnnouncementMessage>,
    dwell_ms: u64,
    max_pending: usize,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Announcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Announcer")
            .field("polite", &self.polite)
            .field("assertive", &self.assertive)
            .field("pending", &self.pending.len())
            .field("dwell_ms", &self.dwell_ms)
            .finish()
    }
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new(&AnnouncerConfig::default())
    }
}

impl Announcer {
    pub fn new(config: &AnnouncerConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock::default()))
    }

    pub fn with_clock(config: &AnnouncerConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            polite: LiveRegion::default(),
            assertive: LiveRegion::default(),
            mutations: VecDeque::new(),
            pending: VecDeque::new(),
            dwell_ms: config.dwell_ms,
            max_pending: config.max_pending,
            clock,
        }
    }

    fn region_mut(&mut self, politeness: Politeness) -> &mut LiveRegion {
        match politeness {
            Politeness::Polite => &mut self.polite,
            Politeness::Assertive => &mut self.assertive,
        }
    }

    fn record(&mut self, politeness: Politeness, kind: MutationKind, at_ms: u64) {
        self.mutations.push_back(LiveRegionMutation { politeness, kind, at_ms });
        while self.mutations.len() > self.max_pending {
            self.mutations.pop_front();
        }
    }

    /// Surface `text` to assistive technology
    ///
    /// Empty text just clears the region.
    pub fn announce(&mut self, text: &str, politeness: Politeness) {
        let now = self.clock.now_ms();
        self.expire(now);

        let dwell = self.dwell_ms;
        let region = self.region_mut(politeness);
        let had_content = !region.content.is_empty();
        let repeat = region.content == text;
        region.content.clear();
        region.expires_at = None;

        if text.is_empty() {
            if had_content {
                self.record(politeness, MutationKind::Cleared, now);
            }
            return;
        }
        if repeat {
            self.record(politeness, MutationKind::Cleared, now);
        }

        let region = self.region_mut(politeness);
        region.content = text.to_string();
        region.expires_at = Some(now + dwell);
        self.record(politeness, MutationKind::Set(text.to_string()), now);

        tracing::debug!("announce ({}): {}", politeness.as_str(), text);
        self.pending.push_back(AnnouncementMessage {
            text: text.to_string(),
            politeness,
        });
        while self.pending.len() > self.max_pending {
            self.pending.pop_front();
        }
    }

    /// Clear regions whose dwell time has elapsed
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        self.expire(now);
    }

    fn expire(&mut self, now: u64) {
        for politeness in [Politeness::Polite, Politeness::Assertive] {
            let region = self.region_mut(politeness);
            if region.expires_at.is_some_and(|at| at <= now) {
                region.content.clear();
                region.expires_at = None;
                self.record(politeness, MutationKind::Cleared, now);
            }
        }
    }

    /// Current text of a region
    pub fn content(&self, politeness: Politeness) -> &str {
        match politeness {
            Politeness::Polite => &self.polite.content,
            Politeness::Assertive => &self.assertive.content,
        }
    }

    /// Recorded mutations, oldest first; only the newest `max_pending` are kept
    pub fn mutations(&self) -> impl Iterator<Item = &LiveRegionMutation> {
        self.mutations.iter()
    }

    /// Take all recorded mutations
    pub fn drain_mutations(&mut self) -> Vec<LiveRegionMutation> {
        self.mutations.drain(..).collect()
    }

    /// Next message to speak; assertive messages go first
    pub fn next_announcement(&mut self) -> Option<AnnouncementMessage> {
        if let Some(pos) = self
            .pending
            .iter()
            .position(|m| m.politeness == Politeness::Assertive)
        {
            return self.pending.remove(pos);
        }
        self.pending.pop_front()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Messages not yet taken, in arrival order
    pub fn pending(&self) -> impl Iterator<Item = &AnnouncementMessage> {
        self.pending.iter()
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }
}
