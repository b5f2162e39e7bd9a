//! Overlay clip bookkeeping between media events and the frame loop

use super::state::OverlayTicket;

/// Media events after which the running clip counts as over
pub const CLIP_END_EVENTS: [&str; 2] = ["ended", "error"];

/// Tracks the clip on screen and the tickets whose clips are over
#[derive(Debug, Default)]
pub struct ClipWatch {
    current: Option<OverlayTicket>,
    ended: Vec<OverlayTicket>,
}

impl ClipWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clip started playing for `ticket`
    pub fn begin(&mut self, ticket: OverlayTicket) {
        self.current = Some(ticket);
    }

    /// The clip was stopped on purpose; nothing gets reported
    pub fn cancel(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<OverlayTicket> {
        self.current
    }

    /// A media event fired on the overlay element
    ///
    /// Returns `true` if it ended the running clip.
    pub fn media_event(&mut self, event: &str) -> bool {
        if !CLIP_END_EVENTS.contains(&event) {
            return false;
        }
        self.finish_current()
    }

    /// `play()` was refused for `ticket`; ignored if another clip took over
    pub fn refused(&mut self, ticket: OverlayTicket) -> bool {
        if self.current != Some(ticket) {
            return false;
        }
        self.finish_current()
    }

    /// Tickets to hand back to the sequencer
    pub fn drain_ended(&mut self) -> Vec<OverlayTicket> {
        std::mem::take(&mut self.ended)
    }

    fn finish_current(&mut self) -> bool {
        match self.current.take() {
            Some(ticket) => {
                self.ended.push(ticket);
                true
            }
            None => false,
        }
    }
}
