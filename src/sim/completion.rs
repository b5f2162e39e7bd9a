//! Completion and reset
//!
//! Runs the victory sequence exactly once when the last pull (and its clip)
//! is done, and restores the initial state when the player starts over.

use super::anchor::Anchor;
use super::confetti::ConfettiBurst;
use super::dispatch::{Presenter, SoundCue};
use super::progression;
use super::state::{SequenceState, SessionPhase};
use crate::config::SequenceConfig;

/// Confetti launch point, percent of the container
const CONFETTI_ORIGIN: Anchor = Anchor::new(50.0, 62.0);

/// The two victory bursts: a large immediate one and a smaller delayed echo
pub fn victory_bursts(config: &SequenceConfig) -> [ConfettiBurst; 2] {
    [
        ConfettiBurst {
            particles: config.confetti.main_particles,
            origin: CONFETTI_ORIGIN,
            spread_deg: 70.0,
            speed: 1100.0,
            delay_ms: 0,
        },
        ConfettiBurst {
            particles: config.confetti.echo_particles,
            origin: CONFETTI_ORIGIN,
            spread_deg: 110.0,
            speed: 850.0,
            delay_ms: config.confetti.echo_delay_ms,
        },
    ]
}

/// Enter the terminal state
///
/// No-op if already completed or torn down, so the sequence fires once.
pub fn complete(state: &mut SequenceState, config: &SequenceConfig, fx: &mut impl Presenter) {
    if state.torn_down || state.phase == SessionPhase::Completed {
        return;
    }

    fx.stop_ambient();
    fx.play_sound(SoundCue::Victory);
    for burst in victory_bursts(config) {
        fx.burst_confetti(burst);
    }
    state.phase = SessionPhase::Completed;
    fx.show_victory(true);

    log::info!("Sequence completed after {} pulls", state.counter);
}

/// Start over from the terminal state (or any other)
pub fn restart(state: &mut SequenceState, config: &SequenceConfig, fx: &mut impl Presenter) {
    let was_completed = state.phase == SessionPhase::Completed;
    progression::reset(state, config);
    if was_completed {
        fx.show_victory(false);
    }
    log::info!("Sequence reset");
}
