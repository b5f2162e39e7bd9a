//! Scoped DOM event listeners
//!
//! Every closure registered through [`Listeners`] is owned by it and removed
//! from its target on `detach` (or drop), so a torn-down scene leaves nothing
//! behind on `window` or `document`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

struct Entry {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Owned set of attached listeners
#[derive(Default)]
pub struct Listeners {
    entries: Vec<Entry>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event` on `target`
    pub fn attach<F>(&mut self, target: &EventTarget, event: &'static str, handler: F)
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        if let Err(e) =
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to attach {event} listener: {e:?}");
            return;
        }
        self.entries.push(Entry {
            target: target.clone(),
            event,
            closure,
        });
    }

    /// Remove every listener
    ///
    /// Never call this from inside one of the owned handlers; defer it with
    /// `spawn_local` instead, since detaching drops the running closure.
    pub fn detach(&mut self) {
        for entry in self.entries.drain(..) {
            let _ = entry.target.remove_event_listener_with_callback(
                entry.event,
                entry.closure.as_ref().unchecked_ref(),
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.detach();
    }
}
