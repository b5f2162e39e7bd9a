//! Pull progression
//!
//! Owns the counter. Every derived value is a closed-form function of it, so the
//! render cache can always be rebuilt from the counter alone.

use super::anchor::Anchor;
use super::state::{Advanced, CueCategory, DerivedVisual, Rejected, SequenceState, SessionPhase};
use crate::config::SequenceConfig;
use crate::{lerp, lerp_vec2};

/// Normalized progress for a counter value
#[inline]
pub fn progress(config: &SequenceConfig, counter: u32) -> f32 {
    counter as f32 / config.total_pulls as f32
}

/// Stepped opacity lookup, clamped to the last table entry
pub fn opacity_at(table: &[f32], counter: u32) -> f32 {
    match table.last() {
        Some(&last) => table.get(counter as usize).copied().unwrap_or(last),
        None => 1.0,
    }
}

/// Derived visuals for a counter value
pub fn derive(config: &SequenceConfig, counter: u32) -> DerivedVisual {
    let t = progress(config, counter);
    DerivedVisual {
        rope_end: Anchor::from(lerp_vec2(
            config.initial_rope_end.as_vec2(),
            config.final_rope_end.as_vec2(),
            t,
        )),
        height: lerp(config.initial_actor_height, config.final_actor_height, t),
        opacity: opacity_at(&config.opacity_table, counter),
    }
}

/// Classify the counter value reached by a pull
///
/// `Final` wins over the milestone checks.
pub fn classify(counter: u32, total: u32) -> CueCategory {
    if counter == total {
        CueCategory::Final
    } else if counter % 10 == 0 {
        CueCategory::Milestone10
    } else if counter % 5 == 0 {
        CueCategory::Milestone5
    } else {
        CueCategory::Normal
    }
}

/// Check whether a pull would be honored right now
pub fn check_pull(state: &SequenceState, config: &SequenceConfig) -> Result<(), Rejected> {
    if state.torn_down {
        return Err(Rejected::TornDown);
    }
    if !state.assets_ready {
        return Err(Rejected::NotReady);
    }
    match state.phase {
        SessionPhase::Playing => {}
        SessionPhase::Loading => return Err(Rejected::NotReady),
        SessionPhase::AwaitingOverlay { .. } => return Err(Rejected::OverlayPlaying),
        SessionPhase::Completed => return Err(Rejected::Completed),
    }
    if state.counter >= config.total_pulls {
        return Err(Rejected::AtLimit);
    }
    Ok(())
}

/// Advance the counter by one
///
/// A rejected pull leaves the state untouched.
pub fn pull(state: &mut SequenceState, config: &SequenceConfig) -> Result<Advanced, Rejected> {
    check_pull(state, config)?;

    state.counter += 1;
    state.visual = derive(config, state.counter);

    Ok(Advanced {
        counter: state.counter,
        category: classify(state.counter, config.total_pulls),
        highlight: config.highlight_for(state.counter).map(str::to_owned),
    })
}

/// Return to the initial tuple
///
/// Clears the lock and any shake. The phase goes back to `Playing`, or stays
/// `Loading` while the asset gate has not resolved.
pub fn reset(state: &mut SequenceState, config: &SequenceConfig) {
    state.counter = 0;
    state.visual = derive(config, 0);
    state.shake.clear();
    state.phase = if state.assets_ready {
        SessionPhase::Playing
    } else {
        SessionPhase::Loading
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ready_state(config: &SequenceConfig) -> SequenceState {
        let mut state = SequenceState::new(config);
        state.assets_ready = true;
        state.phase = SessionPhase::Playing;
        state
    }

    #[test]
    fn test_opacity_clamps_at_table_end() {
        let table = [0.0, 0.33, 0.66, 0.66, 1.0];
        let got: Vec<f32> = (0..=5).map(|c| opacity_at(&table, c)).collect();
        assert_eq!(got, vec![0.0, 0.33, 0.66, 0.66, 1.0, 1.0]);
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify(1, 30), CueCategory::Normal);
        assert_eq!(classify(5, 30), CueCategory::Milestone5);
        assert_eq!(classify(10, 30), CueCategory::Milestone10);
        assert_eq!(classify(25, 30), CueCategory::Milestone5);
        assert_eq!(classify(30, 30), CueCategory::Final);
        // Final wins even when not a multiple of 5
        assert_eq!(classify(7, 7), CueCategory::Final);
    }

    #[test]
    fn test_pull_rejected_before_gate() {
        let config = SequenceConfig::default();
        let mut state = SequenceState::new(&config);
        assert_eq!(pull(&mut state, &config), Err(Rejected::NotReady));
        assert_eq!(state.counter, 0);
    }

    #[test]
    fn test_pull_at_limit_is_noop() {
        let config = SequenceConfig::default();
        let mut state = ready_state(&config);
        state.counter = config.total_pulls;
        state.visual = derive(&config, state.counter);
        let before = state.visual;

        assert_eq!(pull(&mut state, &config), Err(Rejected::AtLimit));
        assert_eq!(state.counter, config.total_pulls);
        assert_eq!(state.visual, before);
    }

    #[test]
    fn test_pull_carries_highlight() {
        let config = SequenceConfig::default();
        let mut state = ready_state(&config);
        for _ in 0..9 {
            let adv = pull(&mut state, &config).unwrap();
            assert!(adv.highlight.is_none());
        }
        let adv = pull(&mut state, &config).unwrap();
        assert_eq!(adv.counter, 10);
        assert_eq!(adv.category, CueCategory::Milestone10);
        assert_eq!(adv.highlight.as_deref(), Some("videos/highlight-10.mp4"));
    }

    #[test]
    fn test_reset_before_gate_stays_loading() {
        let config = SequenceConfig::default();
        let mut state = SequenceState::new(&config);
        reset(&mut state, &config);
        assert_eq!(state.phase, SessionPhase::Loading);
    }

    proptest! {
        #[test]
        fn prop_n_pulls_match_closed_form(n in 0u32..=30) {
            let config = SequenceConfig::default();
            let mut state = ready_state(&config);
            for _ in 0..n {
                pull(&mut state, &config).unwrap();
            }

            let t = n as f32 / config.total_pulls as f32;
            let (a, b) = (config.initial_rope_end, config.final_rope_end);
            prop_assert_eq!(state.counter, n);
            prop_assert_eq!(state.visual.rope_end.x, a.x + (b.x - a.x) * t);
            prop_assert_eq!(state.visual.rope_end.y, a.y + (b.y - a.y) * t);
            prop_assert_eq!(
                state.visual.height,
                config.initial_actor_height
                    + (config.final_actor_height - config.initial_actor_height) * t
            );
            let idx = (n as usize).min(config.opacity_table.len() - 1);
            prop_assert_eq!(state.visual.opacity, config.opacity_table[idx]);
        }

        #[test]
        fn prop_reset_restores_initial_tuple(n in 0u32..=30, locked in any::<bool>()) {
            let config = SequenceConfig::default();
            let mut state = ready_state(&config);
            for _ in 0..n {
                pull(&mut state, &config).unwrap();
            }
            if locked {
                let ticket = state.next_overlay_ticket();
                state.phase = SessionPhase::AwaitingOverlay { ticket };
            }
            state.shake.trigger(0.0, 300, Default::default());

            reset(&mut state, &config);
            prop_assert_eq!(state.counter, 0);
            prop_assert_eq!(state.visual.rope_end, config.initial_rope_end);
            prop_assert_eq!(state.visual.height, config.initial_actor_height);
            prop_assert_eq!(state.phase, SessionPhase::Playing);
            prop_assert!(!state.is_locked());
            prop_assert!(!state.shake.is_active());
        }
    }
}
