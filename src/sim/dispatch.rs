//! Cue dispatch
//!
//! Turns each successful pull into sound, shake and (for highlight values) an
//! exclusive overlay clip. Media goes through [`Presenter`] so the core never
//! touches the DOM; the browser implementation lives in `platform`.

use thiserror::Error;

use super::completion;
use super::confetti::ConfettiBurst;
use super::state::{Advanced, CueCategory, OverlayTicket, SequenceState, SessionPhase};
use crate::config::SequenceConfig;

/// Sounds the sequence can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Ordinary pull
    Pull,
    /// Every fifth pull
    Milestone5,
    /// Every tenth pull and the final pull
    Milestone10,
    /// One-shot completion fanfare
    Victory,
}

impl SoundCue {
    /// Sound for a pull category (`Final` shares the tenth-pull sound)
    pub fn for_category(category: CueCategory) -> Self {
        match category {
            CueCategory::Final | CueCategory::Milestone10 => SoundCue::Milestone10,
            CueCategory::Milestone5 => SoundCue::Milestone5,
            CueCategory::Normal => SoundCue::Pull,
        }
    }
}

/// A presenter could not start an effect
#[derive(Debug, Error)]
pub enum PresentError {
    #[error("element #{0} not found")]
    MissingElement(&'static str),
    #[error("playback refused: {0}")]
    Playback(String),
}

/// Side effects the sequence drives
///
/// Implementations must restart a sound from the beginning if it is already
/// playing, and report the end of an overlay (natural end or a late playback
/// failure) back through `Sequencer::overlay_finished` with the same ticket.
pub trait Presenter {
    fn play_sound(&mut self, cue: SoundCue);

    /// Load and play a highlight clip
    ///
    /// An `Err` is treated as the clip ending immediately.
    fn start_overlay(
        &mut self,
        ticket: OverlayTicket,
        clip: &str,
        volume: f32,
    ) -> Result<(), PresentError>;

    /// Hide the overlay surface after a clip ends
    fn end_overlay(&mut self);

    /// Silence the ambient music owned by the page
    fn stop_ambient(&mut self);

    fn burst_confetti(&mut self, burst: ConfettiBurst);

    /// Show or dismiss the completion acknowledgement
    fn show_victory(&mut self, visible: bool);

    /// Pause every media element and rewind it to zero
    fn halt_media(&mut self);
}

/// Run the cues for a successful pull
///
/// Must not be called while the overlay lock is held; pull preconditions
/// guarantee that.
pub fn dispatch(
    state: &mut SequenceState,
    config: &SequenceConfig,
    event: &Advanced,
    now_ms: f64,
    fx: &mut impl Presenter,
) {
    debug_assert!(!state.is_locked(), "dispatch while overlay lock held");

    fx.play_sound(SoundCue::for_category(event.category));
    state
        .shake
        .trigger(now_ms, config.shake_duration_ms, config.shake_strength);

    if let Some(clip) = &event.highlight {
        let ticket = state.next_overlay_ticket();
        state.phase = SessionPhase::AwaitingOverlay { ticket };
        log::info!("Overlay {clip} started at pull {}", event.counter);

        if let Err(e) = fx.start_overlay(ticket, clip, config.overlay_volume) {
            log::warn!("Overlay {clip} could not start ({e}), continuing");
            finish_overlay(state, config, ticket, fx);
        }
    } else if event.counter >= config.total_pulls {
        completion::complete(state, config, fx);
    }
}

/// Release the overlay lock for `ticket`
///
/// Returns `false` for a stale or unknown ticket, which changes nothing.
pub fn finish_overlay(
    state: &mut SequenceState,
    config: &SequenceConfig,
    ticket: OverlayTicket,
    fx: &mut impl Presenter,
) -> bool {
    if state.torn_down {
        return false;
    }
    match state.phase {
        SessionPhase::AwaitingOverlay { ticket: held } if held == ticket => {}
        _ => {
            log::debug!("Ignoring stale overlay end {ticket:?}");
            return false;
        }
    }

    fx.end_overlay();
    state.phase = SessionPhase::Playing;
    log::info!("Overlay finished at pull {}", state.counter);

    if state.counter >= config.total_pulls {
        completion::complete(state, config, fx);
    }
    true
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Every presenter call, in order
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Sound(SoundCue),
        StartOverlay(OverlayTicket, String, f32),
        EndOverlay,
        StopAmbient,
        Confetti(ConfettiBurst),
        Victory(bool),
        Halt,
    }

    /// Presenter that records calls and can refuse overlays
    #[derive(Debug, Default)]
    pub struct RecordingPresenter {
        pub calls: Vec<Call>,
        pub refuse_overlays: bool,
    }

    impl RecordingPresenter {
        pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }

        pub fn last_ticket(&self) -> Option<OverlayTicket> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::StartOverlay(ticket, ..) => Some(*ticket),
                _ => None,
            })
        }
    }

    impl Presenter for RecordingPresenter {
        fn play_sound(&mut self, cue: SoundCue) {
            self.calls.push(Call::Sound(cue));
        }

        fn start_overlay(
            &mut self,
            ticket: OverlayTicket,
            clip: &str,
            volume: f32,
        ) -> Result<(), PresentError> {
            self.calls
                .push(Call::StartOverlay(ticket, clip.to_string(), volume));
            if self.refuse_overlays {
                Err(PresentError::Playback("NotAllowedError".into()))
            } else {
                Ok(())
            }
        }

        fn end_overlay(&mut self) {
            self.calls.push(Call::EndOverlay);
        }

        fn stop_ambient(&mut self) {
            self.calls.push(Call::StopAmbient);
        }

        fn burst_confetti(&mut self, burst: ConfettiBurst) {
            self.calls.push(Call::Confetti(burst));
        }

        fn show_victory(&mut self, visible: bool) {
            self.calls.push(Call::Victory(visible));
        }

        fn halt_media(&mut self) {
            self.calls.push(Call::Halt);
        }
    }
}
