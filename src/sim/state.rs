//! Sequence state and event types
//!
//! Everything the sequence knows lives in [`SequenceState`]; the rest of the
//! `sim` module is functions over it.

use super::anchor::Anchor;
use super::shake::ShakeTimeline;
use crate::config::SequenceConfig;

/// Where the session is
///
/// The overlay lock is the `AwaitingOverlay` variant itself, so "locked while
/// completed" or "playing while an overlay runs" cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Asset gate still pending
    Loading,
    /// Accepting pulls
    Playing,
    /// A highlight clip holds the playback lock
    AwaitingOverlay { ticket: OverlayTicket },
    /// Terminal celebratory state, waiting for reset
    Completed,
}

/// Identifies one overlay playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayTicket(pub u64);

/// Classification of a single pull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueCategory {
    Normal,
    Milestone5,
    Milestone10,
    Final,
}

/// A successful pull
#[derive(Debug, Clone, PartialEq)]
pub struct Advanced {
    pub counter: u32,
    pub category: CueCategory,
    /// Clip tied to this exact counter value
    pub highlight: Option<String>,
}

/// Why a pull was not honored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// Assets still loading
    NotReady,
    /// A highlight clip is playing
    OverlayPlaying,
    /// Sequence finished, waiting for reset
    Completed,
    /// Counter already at the last pull
    AtLimit,
    /// Scene has been torn down
    TornDown,
}

/// Values derived from the counter for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedVisual {
    pub rope_end: Anchor,
    /// Target actor height, percent of container height
    pub height: f32,
    pub opacity: f32,
}

/// Complete sequence state
#[derive(Debug, Clone)]
pub struct SequenceState {
    /// Pull counter, `0..=total_pulls`
    pub counter: u32,
    pub phase: SessionPhase,
    /// Asset gate resolved (success or best-effort)
    pub assets_ready: bool,
    /// Render cache for the current counter
    pub visual: DerivedVisual,
    /// Rope start, follows the layout until the first pull
    pub rope_start: Anchor,
    pub shake: ShakeTimeline,
    /// Set once the scene is destroyed; later callbacks are no-ops
    pub torn_down: bool,
    next_ticket: u64,
}

impl SequenceState {
    /// Fresh state waiting on the asset gate
    pub fn new(config: &SequenceConfig) -> Self {
        Self {
            counter: 0,
            phase: SessionPhase::Loading,
            assets_ready: false,
            visual: super::progression::derive(config, 0),
            rope_start: config.rope_start_default,
            shake: ShakeTimeline::default(),
            torn_down: false,
            next_ticket: 1,
        }
    }

    /// Whether the overlay playback lock is held
    pub fn is_locked(&self) -> bool {
        matches!(self.phase, SessionPhase::AwaitingOverlay { .. })
    }

    /// Rope start stops following the layout after the first pull
    pub fn rope_start_frozen(&self) -> bool {
        self.counter > 0
    }

    /// Allocate a ticket for a new overlay playback
    pub fn next_overlay_ticket(&mut self) -> OverlayTicket {
        let ticket = OverlayTicket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }
}
