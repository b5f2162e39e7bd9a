//! Highlight clip overlay
//!
//! A single `<video>` inside an overlay container. The end of a clip (natural,
//! a media error, or a refused `play()`) is queued as the clip's ticket for
//! the frame loop to hand back to the sequencer.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Element, HtmlVideoElement};

use super::listeners::Listeners;
use super::set_hidden;
use crate::sim::{CLIP_END_EVENTS, ClipWatch, OverlayTicket, PresentError};

/// Shared clip state; ended tickets are drained once per frame
pub type EndedQueue = Rc<RefCell<ClipWatch>>;

pub const OVERLAY_ID: &str = "overlay";
pub const VIDEO_ID: &str = "overlay-video";

/// Overlay video player
pub struct OverlayPlayer {
    container: Option<Element>,
    video: Option<HtmlVideoElement>,
    watch: EndedQueue,
}

impl OverlayPlayer {
    pub fn new(document: &Document, watch: EndedQueue) -> Self {
        let video = document
            .get_element_by_id(VIDEO_ID)
            .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok());
        if video.is_none() {
            log::warn!("No #{VIDEO_ID} element, highlight clips will be skipped");
        }
        Self {
            container: document.get_element_by_id(OVERLAY_ID),
            video,
            watch,
        }
    }

    /// Queue the running ticket when the video ends or fails mid-clip
    pub fn attach(&self, listeners: &mut Listeners) {
        let Some(video) = &self.video else { return };
        for event in CLIP_END_EVENTS {
            let watch = self.watch.clone();
            listeners.attach(video, event, move |_| {
                if watch.borrow_mut().media_event(event) {
                    log::info!("Overlay clip over ({event})");
                }
            });
        }
    }

    /// Load and play `clip`
    pub fn start(
        &mut self,
        ticket: OverlayTicket,
        clip: &str,
        volume: f32,
    ) -> Result<(), PresentError> {
        let video = self
            .video
            .as_ref()
            .ok_or(PresentError::MissingElement(VIDEO_ID))?;

        video.set_src(clip);
        video.set_volume(volume.clamp(0.0, 1.0) as f64);
        video.set_current_time(0.0);
        if let Some(container) = &self.container {
            set_hidden(container, false);
        }
        self.watch.borrow_mut().begin(ticket);

        let promise = video
            .play()
            .map_err(|e| PresentError::Playback(format!("{e:?}")))?;

        let watch = self.watch.clone();
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("Overlay clip refused: {e:?}");
                watch.borrow_mut().refused(ticket);
            }
        });
        Ok(())
    }

    /// Pause, rewind and hide
    pub fn stop(&mut self) {
        self.watch.borrow_mut().cancel();
        if let Some(video) = &self.video {
            let _ = video.pause();
            video.set_current_time(0.0);
        }
        if let Some(container) = &self.container {
            set_hidden(container, true);
        }
    }
}
