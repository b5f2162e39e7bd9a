//! Rope Pull - a single-screen pulling sequence with milestone video cues
//!
//! Core modules:
//! - `sim`: Deterministic sequence core (progression, rope geometry, cues, completion)
//! - `config`: Tunable constants, loadable from JSON
//! - `input`: Keyboard shortcut rules
//! - `renderer`: Canvas 2D drawing of the rope and confetti (web only)
//! - `platform`: DOM, media and asset loading glue (web only)
//! - `audio`: Cue sound bank (web only)

pub mod config;
pub mod input;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use config::{ConfigError, SequenceConfig};
pub use sim::Sequencer;

use glam::Vec2;

/// Sequence configuration defaults
pub mod consts {
    /// Number of pulls needed to finish the sequence
    pub const TOTAL_PULLS: u32 = 30;

    /// Counter values that play a highlight clip, and the clip to play
    pub const HIGHLIGHT_VIDEOS: [(u32, &str); 3] = [
        (10, "videos/highlight-10.mp4"),
        (20, "videos/highlight-20.mp4"),
        (30, "videos/highlight-30.mp4"),
    ];

    /// Target opacity per counter value (last entry holds for larger counters)
    pub const OPACITY_TABLE: [f32; 6] = [0.0, 0.33, 0.66, 0.66, 1.0, 1.0];

    /// Rope end on the target actor, in percent of the container
    pub const INITIAL_ROPE_END: (f32, f32) = (71.5, 38.2);
    pub const FINAL_ROPE_END: (f32, f32) = (38.0, 62.5);

    /// Target actor height, in percent of the container height
    pub const INITIAL_ACTOR_HEIGHT: f32 = 14.0;
    pub const FINAL_ACTOR_HEIGHT: f32 = 32.0;

    /// Shake window and per-actor impulse (pixels)
    pub const SHAKE_DURATION_MS: u32 = 300;
    pub const SHAKE_PULLER: f32 = 6.0;
    pub const SHAKE_ROPE: f32 = 4.0;
    pub const SHAKE_TARGET: f32 = 10.0;

    /// Minimum time the loading screen stays up
    pub const MIN_LOADING_MS: u32 = 1500;
    /// Fade-out applied to the loading screen once the gate resolves
    pub const LOADING_FADE_MS: u32 = 400;

    /// Highlight clip volume
    pub const OVERLAY_VOLUME: f32 = 0.8;

    /// Rendered rope thickness (pixels)
    pub const ROPE_THICKNESS: f32 = 14.0;
    /// Point on the puller's box the rope is held at, in percent of the box
    pub const ROPE_GRIP: (f32, f32) = (78.0, 34.0);
    /// Rope start used before the first layout is known
    pub const ROPE_START_DEFAULT: (f32, f32) = (34.0, 66.0);

    /// Confetti: immediate burst, then a smaller echo
    pub const CONFETTI_MAIN: u32 = 160;
    pub const CONFETTI_ECHO: u32 = 70;
    pub const CONFETTI_ECHO_DELAY_MS: u32 = 1500;
}

/// Linear interpolation written out as `a + (b - a) * t`
///
/// Kept in this exact form so derived values match the closed-form formula bit for bit.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise [`lerp`] for points
#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}
