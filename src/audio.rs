//! Cue sounds using HTML media elements
//!
//! Pull cues share one channel: starting a cue cuts off whatever cue was
//! playing and restarts from the beginning. The victory sound plays alongside.

use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlAudioElement;

use crate::config::SoundFiles;
use crate::sim::SoundCue;

/// Preloaded cue sounds
pub struct CueBank {
    pull: Option<HtmlAudioElement>,
    milestone_5: Option<HtmlAudioElement>,
    milestone_10: Option<HtmlAudioElement>,
    victory: Option<HtmlAudioElement>,
}

impl CueBank {
    pub fn new(files: &SoundFiles) -> Self {
        Self {
            pull: load(&files.pull),
            milestone_5: load(&files.milestone_5),
            milestone_10: load(&files.milestone_10),
            victory: load(&files.victory),
        }
    }

    fn element(&self, cue: SoundCue) -> Option<&HtmlAudioElement> {
        match cue {
            SoundCue::Pull => self.pull.as_ref(),
            SoundCue::Milestone5 => self.milestone_5.as_ref(),
            SoundCue::Milestone10 => self.milestone_10.as_ref(),
            SoundCue::Victory => self.victory.as_ref(),
        }
    }

    /// Play a cue from the start
    pub fn play(&self, cue: SoundCue) {
        if cue != SoundCue::Victory {
            for other in [SoundCue::Pull, SoundCue::Milestone5, SoundCue::Milestone10] {
                if let Some(el) = self.element(other) {
                    rewind(el);
                }
            }
        }

        let Some(el) = self.element(cue) else { return };
        rewind(el);
        start(el, cue);
    }

    /// Pause everything and rewind to zero
    pub fn halt(&self) {
        for el in [&self.pull, &self.milestone_5, &self.milestone_10, &self.victory]
            .into_iter()
            .flatten()
        {
            rewind(el);
        }
    }
}

fn load(src: &str) -> Option<HtmlAudioElement> {
    match HtmlAudioElement::new_with_src(src) {
        Ok(el) => {
            el.set_preload("auto");
            Some(el)
        }
        Err(e) => {
            log::warn!("Failed to create audio element for {src}: {e:?}");
            None
        }
    }
}

fn rewind(el: &HtmlAudioElement) {
    let _ = el.pause();
    el.set_current_time(0.0);
}

/// Start playback; autoplay refusals are logged and otherwise ignored
fn start(el: &HtmlAudioElement, cue: SoundCue) {
    match el.play() {
        Ok(promise) => spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("{cue:?} sound refused: {e:?}");
            }
        }),
        Err(e) => log::warn!("{cue:?} sound failed to start: {e:?}"),
    }
}
