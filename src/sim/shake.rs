//! Transient shake applied to the movable actors
//!
//! One timeline drives all actors. The impulse pushes every actor left for the
//! first half of the window, returns to rest at the half mark, and the timeline
//! clears itself at the end of the window. Triggering again restarts it.

use glam::Vec2;

use crate::config::{Actor, ShakeStrength};

/// Per-actor render offsets, indexed by [`Actor::index`]
pub type ShakeFrame = [Vec2; 3];

/// Offsets with no shake applied
pub const REST: ShakeFrame = [Vec2::ZERO; 3];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Impulse {
    started_ms: f64,
    duration_ms: f64,
    strength: ShakeStrength,
}

/// Shake state owned by the cue dispatcher
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShakeTimeline {
    active: Option<Impulse>,
}

impl ShakeTimeline {
    /// Start (or restart) the impulse at `now_ms`
    pub fn trigger(&mut self, now_ms: f64, duration_ms: u32, strength: ShakeStrength) {
        self.active = Some(Impulse {
            started_ms: now_ms,
            duration_ms: duration_ms as f64,
            strength,
        });
    }

    /// Drop any running impulse
    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Advance to `now_ms` and return the offsets to render
    ///
    /// Clears the timeline once the window has elapsed.
    pub fn sample(&mut self, now_ms: f64) -> ShakeFrame {
        let Some(impulse) = self.active else {
            return REST;
        };

        let elapsed = (now_ms - impulse.started_ms).max(0.0);
        if elapsed >= impulse.duration_ms {
            self.active = None;
            return REST;
        }
        if elapsed >= impulse.duration_ms / 2.0 {
            return REST;
        }

        let mut frame = REST;
        for actor in Actor::ALL {
            frame[actor.index()] = Vec2::new(-impulse.strength.for_actor(actor), 0.0);
        }
        frame
    }
}
