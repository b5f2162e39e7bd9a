//! Browser platform layer
//!
//! Handles everything the `sim` core keeps out of:
//! - Time (`performance.now()`, timer promises)
//! - Scoped DOM listeners
//! - Image preloading behind the asset gate
//! - Overlay video and the DOM-backed `Presenter`

pub mod assets;
pub mod listeners;
pub mod overlay;
pub mod presenter;
pub mod scene;

pub use listeners::Listeners;
pub use presenter::DomPresenter;
pub use scene::SceneDom;

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// High resolution timestamp, same clock as `requestAnimationFrame`
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Resolve after `ms` milliseconds
pub async fn sleep(ms: f64) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms.max(0.0) as i32)
                .ok()
        });
        if scheduled.is_none() {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Show or hide an element through the `hidden` class
pub fn set_hidden(el: &web_sys::Element, hidden: bool) {
    let classes = el.class_list();
    let _ = if hidden {
        classes.add_1("hidden")
    } else {
        classes.remove_1("hidden")
    };
}
