//! Image preloading behind the asset gate

use std::collections::HashMap;

use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, HtmlImageElement};

use super::{now_ms, set_hidden, sleep};
use crate::consts::LOADING_FADE_MS;
use crate::sim::{AssetGate, GateOutcome};

/// Decoded images keyed by URL
pub type ImageCache = HashMap<String, HtmlImageElement>;

/// Decode every image, then hold until the minimum loading time has passed
///
/// Failed images are logged by the gate and left out of the cache.
pub async fn preload(urls: &[String], min_loading_ms: u32) -> (GateOutcome, ImageCache) {
    let mut gate = AssetGate::begin(urls.iter().cloned(), now_ms(), min_loading_ms);

    // Start every decode before awaiting any of them
    let mut started = Vec::with_capacity(urls.len());
    for url in urls {
        match HtmlImageElement::new() {
            Ok(img) => {
                img.set_src(url);
                let decode = JsFuture::from(img.decode());
                started.push((url.clone(), img, decode));
            }
            Err(e) => gate.failed(url, &format!("{e:?}")),
        }
    }

    let mut cache = ImageCache::new();
    for (url, img, decode) in started {
        match decode.await {
            Ok(_) => {
                gate.loaded(&url);
                cache.insert(url, img);
            }
            Err(e) => gate.failed(&url, &format!("{e:?}")),
        }
    }

    sleep(gate.remaining_ms(now_ms())).await;
    let outcome = gate.poll(now_ms()).unwrap_or(GateOutcome::Ready);
    (outcome, cache)
}

/// Locks page scrolling while the loading screen is up
pub struct ScrollLock {
    body: Option<HtmlElement>,
    previous: String,
}

impl ScrollLock {
    pub fn engage() -> Self {
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body());
        let previous = body
            .as_ref()
            .and_then(|b| b.style().get_property_value("overflow").ok())
            .unwrap_or_default();
        if let Some(body) = &body {
            let _ = body.style().set_property("overflow", "hidden");
        }
        Self { body, previous }
    }

    /// Restore scrolling
    pub fn release(self) {
        if let Some(body) = &self.body {
            let style = body.style();
            let _ = if self.previous.is_empty() {
                style.remove_property("overflow").map(|_| ())
            } else {
                style.set_property("overflow", &self.previous)
            };
        }
    }
}

/// Fade the loading screen out, then hide it
pub async fn dismiss_loading_screen(id: &str) {
    let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    else {
        return;
    };
    let _ = el.class_list().add_1("fade-out");
    sleep(LOADING_FADE_MS as f64).await;
    set_hidden(&el, true);
}
