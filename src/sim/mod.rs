//! Deterministic sequence core
//!
//! All sequence logic lives here. This module must stay platform-free:
//! - Time comes in as explicit `now_ms` / `dt` arguments
//! - Media and DOM effects go out through the `Presenter` trait
//! - Confetti randomness is seeded
//! - Derived values are closed-form functions of the counter

pub mod anchor;
pub mod clip;
pub mod completion;
pub mod confetti;
pub mod dispatch;
pub mod gate;
pub mod progression;
pub mod rope;
pub mod sequencer;
pub mod shake;
pub mod state;

pub use anchor::{Anchor, Layout, Rect};
pub use clip::{CLIP_END_EVENTS, ClipWatch};
pub use confetti::{ConfettiBurst, ConfettiField, Confetto, PALETTE};
pub use dispatch::{PresentError, Presenter, SoundCue};
pub use gate::{AssetGate, GateOutcome};
pub use rope::{RopeRender, Segment, TextureSize, segments};
pub use sequencer::{PrimaryOutcome, Sequencer};
pub use shake::{REST, ShakeFrame, ShakeTimeline};
pub use state::{
    Advanced, CueCategory, DerivedVisual, OverlayTicket, Rejected, SequenceState, SessionPhase,
};
