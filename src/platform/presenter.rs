//! DOM-backed presenter

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlAudioElement};

use super::listeners::Listeners;
use super::overlay::{EndedQueue, OverlayPlayer};
use super::set_hidden;
use crate::audio::CueBank;
use crate::config::SequenceConfig;
use crate::sim::{ConfettiBurst, ConfettiField, OverlayTicket, PresentError, Presenter, SoundCue};

/// Ambient music element owned by the page
pub const AMBIENT_ID: &str = "ambient-music";
/// Completion acknowledgement
pub const VICTORY_ID: &str = "victory";

/// Particle cap for the confetti field
const MAX_CONFETTI: usize = 600;

/// Presenter that drives real media elements
pub struct DomPresenter {
    cues: CueBank,
    overlay: OverlayPlayer,
    ambient: Option<HtmlAudioElement>,
    victory: Option<Element>,
    /// Confetti is simulated here and drawn by the renderer
    pub confetti: ConfettiField,
}

impl DomPresenter {
    pub fn new(document: &Document, config: &SequenceConfig, ended: EndedQueue) -> Self {
        let seed = js_sys::Date::now() as u64;
        Self {
            cues: CueBank::new(&config.assets.sounds),
            overlay: OverlayPlayer::new(document, ended),
            ambient: document
                .get_element_by_id(AMBIENT_ID)
                .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok()),
            victory: document.get_element_by_id(VICTORY_ID),
            confetti: ConfettiField::new(seed, MAX_CONFETTI),
        }
    }

    pub fn attach(&self, listeners: &mut Listeners) {
        self.overlay.attach(listeners);

        // The acknowledgement can be dismissed without starting over
        if let Some(victory) = &self.victory {
            let el = victory.clone();
            listeners.attach(victory, "click", move |_| set_hidden(&el, true));
        }
    }
}

impl Presenter for DomPresenter {
    fn play_sound(&mut self, cue: SoundCue) {
        self.cues.play(cue);
    }

    fn start_overlay(
        &mut self,
        ticket: OverlayTicket,
        clip: &str,
        volume: f32,
    ) -> Result<(), PresentError> {
        self.overlay.start(ticket, clip, volume)
    }

    fn end_overlay(&mut self) {
        self.overlay.stop();
    }

    fn stop_ambient(&mut self) {
        if let Some(ambient) = &self.ambient {
            let _ = ambient.pause();
        }
    }

    fn burst_confetti(&mut self, burst: ConfettiBurst) {
        self.confetti.launch(burst);
    }

    fn show_victory(&mut self, visible: bool) {
        match &self.victory {
            Some(el) => set_hidden(el, !visible),
            None => log::warn!("No #{VICTORY_ID} element"),
        }
        if !visible {
            self.confetti.clear();
        }
    }

    fn halt_media(&mut self) {
        self.cues.halt();
        self.overlay.stop();
    }
}
