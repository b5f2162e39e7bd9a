//! Sequencer facade
//!
//! Owns the config and state and is the only thing the platform layer talks to.
//! Every input (pull, overlay end, resize, reset, teardown) comes in here.

use glam::Vec2;

use super::anchor::{Anchor, Layout};
use super::completion;
use super::dispatch::{self, Presenter};
use super::gate::GateOutcome;
use super::progression;
use super::rope::{RopeRender, TextureSize};
use super::shake::ShakeFrame;
use super::state::{
    Advanced, DerivedVisual, OverlayTicket, Rejected, SequenceState, SessionPhase,
};
use crate::config::SequenceConfig;

/// What the primary control did
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryOutcome {
    Pulled(Advanced),
    Reset,
    Rejected(Rejected),
}

/// The pull sequence
#[derive(Debug, Clone)]
pub struct Sequencer {
    config: SequenceConfig,
    state: SequenceState,
    layout: Option<Layout>,
}

impl Sequencer {
    pub fn new(config: SequenceConfig) -> Self {
        let state = SequenceState::new(&config);
        Self {
            config,
            state,
            layout: None,
        }
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn state(&self) -> &SequenceState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn counter(&self) -> u32 {
        self.state.counter
    }

    pub fn visual(&self) -> DerivedVisual {
        self.state.visual
    }

    pub fn rope_start(&self) -> Anchor {
        self.state.rope_start
    }

    /// Open the scene once the asset gate has resolved
    pub fn assets_resolved(&mut self, outcome: &GateOutcome) {
        if self.state.assets_ready || self.state.torn_down {
            return;
        }
        match outcome {
            GateOutcome::Ready => log::info!("Assets ready"),
            GateOutcome::Failed { missing } => {
                log::info!("Assets ready, {} missing", missing.len())
            }
        }
        self.state.assets_ready = true;
        if self.state.phase == SessionPhase::Loading {
            self.state.phase = SessionPhase::Playing;
        }
    }

    /// Record a new layout; moves the rope start until the first pull
    pub fn update_layout(&mut self, layout: Layout) {
        self.layout = Some(layout);
        self.refresh_rope_start();
    }

    fn refresh_rope_start(&mut self) {
        if self.state.rope_start_frozen() {
            return;
        }
        if let Some(start) = self
            .layout
            .and_then(|layout| layout.rope_start(self.config.rope_grip))
        {
            log::debug!("Rope start -> ({:.2}%, {:.2}%)", start.x, start.y);
            self.state.rope_start = start;
        }
    }

    /// One pull: advance the counter and run its cues
    pub fn pull(&mut self, now_ms: f64, fx: &mut impl Presenter) -> Result<Advanced, Rejected> {
        let event = match progression::pull(&mut self.state, &self.config) {
            Ok(event) => event,
            Err(reason) => {
                log::debug!("Pull rejected: {reason:?}");
                return Err(reason);
            }
        };
        log::debug!("Pull {} ({:?})", event.counter, event.category);
        dispatch::dispatch(&mut self.state, &self.config, &event, now_ms, fx);
        Ok(event)
    }

    /// The main button: pulls while playing, starts over once completed
    pub fn primary_action(&mut self, now_ms: f64, fx: &mut impl Presenter) -> PrimaryOutcome {
        if self.state.phase == SessionPhase::Completed && !self.state.torn_down {
            self.reset(fx);
            return PrimaryOutcome::Reset;
        }
        match self.pull(now_ms, fx) {
            Ok(event) => PrimaryOutcome::Pulled(event),
            Err(reason) => PrimaryOutcome::Rejected(reason),
        }
    }

    /// Back to the initial state; valid from any phase
    pub fn reset(&mut self, fx: &mut impl Presenter) {
        if self.state.is_locked() {
            fx.end_overlay();
        }
        completion::restart(&mut self.state, &self.config, fx);
        self.state.rope_start = self.config.rope_start_default;
        self.refresh_rope_start();
    }

    /// An overlay clip ended (or failed after starting)
    pub fn overlay_finished(&mut self, ticket: OverlayTicket, fx: &mut impl Presenter) -> bool {
        dispatch::finish_overlay(&mut self.state, &self.config, ticket, fx)
    }

    /// Shake offsets to render at `now_ms`
    pub fn shake_frame(&mut self, now_ms: f64) -> ShakeFrame {
        self.state.shake.sample(now_ms)
    }

    /// Container size from the last layout
    pub fn container(&self) -> Option<Vec2> {
        self.layout.map(|l| l.container)
    }

    /// Rope render plan for the current anchors and layout
    pub fn rope(&self, texture: Option<TextureSize>) -> RopeRender {
        match self.container() {
            Some(container) => RopeRender::plan(
                self.state.rope_start,
                self.state.visual.rope_end,
                container,
                texture,
                self.config.rope_thickness,
            ),
            None => RopeRender::Hidden,
        }
    }

    /// The page was hidden
    ///
    /// A page kept in the back/forward cache comes back as it was, so only a
    /// page that is really unloading is torn down. Returns `true` on teardown.
    pub fn page_hidden(&mut self, persisted: bool, fx: &mut impl Presenter) -> bool {
        if persisted {
            log::info!("Page cached at pull {}, keeping the session", self.state.counter);
            return false;
        }
        self.teardown(fx);
        true
    }

    /// The scene is going away: stop all media and ignore later callbacks
    pub fn teardown(&mut self, fx: &mut impl Presenter) {
        if self.state.torn_down {
            return;
        }
        fx.halt_media();
        self.state.shake.clear();
        if self.state.is_locked() {
            self.state.phase = SessionPhase::Playing;
        }
        self.state.torn_down = true;
        log::info!("Sequence torn down at pull {}", self.state.counter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::anchor::Rect;
    use crate::sim::dispatch::SoundCue;
    use crate::sim::dispatch::testing::{Call, RecordingPresenter};
    use crate::sim::state::CueCategory;

    fn started() -> Sequencer {
        let mut seq = Sequencer::new(SequenceConfig::default());
        seq.assets_resolved(&GateOutcome::Ready);
        seq
    }

    fn layout(puller_x: f32) -> Layout {
        Layout {
            container: Vec2::new(400.0, 800.0),
            puller: Rect::new(puller_x, 400.0, 200.0, 400.0),
        }
    }

    #[test]
    fn test_loading_rejects_pulls() {
        let mut seq = Sequencer::new(SequenceConfig::default());
        let mut fx = RecordingPresenter::default();
        assert_eq!(seq.phase(), SessionPhase::Loading);
        assert_eq!(seq.pull(0.0, &mut fx), Err(Rejected::NotReady));
        assert!(fx.calls.is_empty());

        seq.assets_resolved(&GateOutcome::Failed {
            missing: vec!["images/rope.png".into()],
        });
        assert_eq!(seq.phase(), SessionPhase::Playing);
        assert!(seq.pull(0.0, &mut fx).is_ok());
    }

    #[test]
    fn test_thirty_pull_scenario() {
        let mut seq = started();
        let mut fx = RecordingPresenter::default();

        for n in 1..=9 {
            let event = seq.pull(n as f64, &mut fx).unwrap();
            let expected = if n == 5 {
                CueCategory::Milestone5
            } else {
                CueCategory::Normal
            };
            assert_eq!(event.category, expected);
            assert!(event.highlight.is_none());
        }
        assert_eq!(fx.count(|c| matches!(c, Call::StartOverlay(..))), 0);

        let tenth = seq.pull(10.0, &mut fx).unwrap();
        assert_eq!(tenth.category, CueCategory::Milestone10);
        assert!(seq.state().is_locked());
        assert_eq!(seq.pull(11.0, &mut fx), Err(Rejected::OverlayPlaying));
        let ticket = fx.last_ticket().unwrap();
        assert!(seq.overlay_finished(ticket, &mut fx));

        for n in 11..30 {
            seq.pull(n as f64, &mut fx).unwrap();
            if let SessionPhase::AwaitingOverlay { ticket } = seq.phase() {
                seq.overlay_finished(ticket, &mut fx);
            }
        }

        let last = seq.pull(30.0, &mut fx).unwrap();
        assert_eq!(last.category, CueCategory::Final);
        assert!(seq.state().is_locked());
        assert_eq!(fx.count(|c| *c == Call::StopAmbient), 0);

        let ticket = fx.last_ticket().unwrap();
        seq.overlay_finished(ticket, &mut fx);
        assert_eq!(seq.phase(), SessionPhase::Completed);
        assert_eq!(fx.count(|c| *c == Call::StopAmbient), 1);
        assert_eq!(fx.count(|c| *c == Call::Sound(SoundCue::Victory)), 1);

        // Nothing fires twice, and pulls stay refused
        assert!(!seq.overlay_finished(ticket, &mut fx));
        assert_eq!(seq.pull(31.0, &mut fx), Err(Rejected::Completed));
        assert_eq!(fx.count(|c| *c == Call::Sound(SoundCue::Victory)), 1);
    }

    #[test]
    fn test_primary_action_resets_when_completed() {
        let mut config = SequenceConfig::default();
        config.total_pulls = 2;
        config.highlight_videos.clear();
        let mut seq = Sequencer::new(config);
        seq.assets_resolved(&GateOutcome::Ready);
        let mut fx = RecordingPresenter::default();

        assert!(matches!(
            seq.primary_action(0.0, &mut fx),
            PrimaryOutcome::Pulled(_)
        ));
        seq.primary_action(1.0, &mut fx);
        assert_eq!(seq.phase(), SessionPhase::Completed);

        assert_eq!(seq.primary_action(2.0, &mut fx), PrimaryOutcome::Reset);
        assert_eq!(seq.counter(), 0);
        assert_eq!(seq.phase(), SessionPhase::Playing);
        assert_eq!(fx.calls.last(), Some(&Call::Victory(false)));
    }

    #[test]
    fn test_rope_start_freezes_after_first_pull() {
        let mut seq = started();
        let mut fx = RecordingPresenter::default();

        seq.update_layout(layout(0.0));
        let before = seq.rope_start();
        seq.update_layout(layout(20.0));
        assert_ne!(seq.rope_start(), before);

        seq.pull(0.0, &mut fx).unwrap();
        let frozen = seq.rope_start();
        seq.update_layout(layout(60.0));
        assert_eq!(seq.rope_start(), frozen);

        // Reset follows the layout again
        seq.reset(&mut fx);
        assert_eq!(
            seq.rope_start(),
            layout(60.0).rope_start(seq.config().rope_grip).unwrap()
        );
    }

    #[test]
    fn test_reset_during_overlay_releases_lock() {
        let mut seq = started();
        let mut fx = RecordingPresenter::default();
        for n in 0..10 {
            seq.pull(n as f64, &mut fx).unwrap();
        }
        let ticket = fx.last_ticket().unwrap();

        seq.reset(&mut fx);
        assert!(!seq.state().is_locked());
        assert_eq!(seq.phase(), SessionPhase::Playing);
        assert_eq!(seq.visual().rope_end, seq.config().initial_rope_end);
        // The old clip ending later changes nothing
        assert!(!seq.overlay_finished(ticket, &mut fx));
    }

    #[test]
    fn test_teardown_halts_and_ignores_callbacks() {
        let mut seq = started();
        let mut fx = RecordingPresenter::default();
        for n in 0..10 {
            seq.pull(n as f64, &mut fx).unwrap();
        }
        let ticket = fx.last_ticket().unwrap();

        seq.teardown(&mut fx);
        seq.teardown(&mut fx);
        assert_eq!(fx.count(|c| *c == Call::Halt), 1);
        assert!(!seq.overlay_finished(ticket, &mut fx));
        assert_eq!(seq.pull(0.0, &mut fx), Err(Rejected::TornDown));
    }

    #[test]
    fn test_cached_page_keeps_running() {
        let mut seq = started();
        let mut fx = RecordingPresenter::default();
        for n in 0..10 {
            seq.pull(n as f64, &mut fx).unwrap();
        }
        let ticket = fx.last_ticket().unwrap();

        assert!(!seq.page_hidden(true, &mut fx));
        assert!(!seq.state().torn_down);
        assert_eq!(fx.count(|c| *c == Call::Halt), 0);

        // Restored from the cache: the clip still ends and pulls resume
        assert!(seq.overlay_finished(ticket, &mut fx));
        assert_eq!(seq.pull(11.0, &mut fx).map(|e| e.counter), Ok(11));

        assert!(seq.page_hidden(false, &mut fx));
        assert!(seq.state().torn_down);
        assert_eq!(seq.pull(12.0, &mut fx), Err(Rejected::TornDown));
    }

    #[test]
    fn test_rope_needs_layout() {
        let mut seq = started();
        assert_eq!(seq.rope(None), RopeRender::Hidden);
        seq.update_layout(layout(0.0));
        assert!(matches!(seq.rope(None), RopeRender::Stroke { .. }));
        let texture = TextureSize {
            width: 120.0,
            height: 20.0,
        };
        assert!(matches!(seq.rope(Some(texture)), RopeRender::Tiled(_)));
    }
}
