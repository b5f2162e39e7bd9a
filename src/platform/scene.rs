//! Scene elements: measuring the layout and applying derived visuals

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::config::Actor;
use crate::sim::{DerivedVisual, Layout, Rect, SessionPhase, ShakeFrame};

pub const SCENE_ID: &str = "scene";
pub const PULLER_ID: &str = "puller";
pub const TARGET_ID: &str = "target";
pub const PRIMARY_ID: &str = "primary-btn";
pub const BACK_ID: &str = "back-btn";

const PULL_LABEL: &str = "Pull!";
const RESET_LABEL: &str = "Play again";

/// Handles to the scene's DOM elements
pub struct SceneDom {
    pub container: Element,
    pub puller: Option<HtmlElement>,
    pub target: Option<HtmlElement>,
    pub primary: Option<HtmlElement>,
    pub back: Option<Element>,
    last_label: Option<&'static str>,
}

fn html(document: &Document, id: &str) -> Option<HtmlElement> {
    let el = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    if el.is_none() {
        log::warn!("Scene element #{id} not found");
    }
    el
}

impl SceneDom {
    /// Look up the scene; `None` without the `#scene` container
    pub fn find(document: &Document) -> Option<Self> {
        Some(Self {
            container: document.get_element_by_id(SCENE_ID)?,
            puller: html(document, PULLER_ID),
            target: html(document, TARGET_ID),
            primary: html(document, PRIMARY_ID),
            back: document.get_element_by_id(BACK_ID),
            last_label: None,
        })
    }

    /// Current container size and puller box
    pub fn measure(&self) -> Option<Layout> {
        let outer = self.container.get_bounding_client_rect();
        let puller = self.puller.as_ref()?.get_bounding_client_rect();
        Some(Layout {
            container: Vec2::new(outer.width() as f32, outer.height() as f32),
            puller: Rect::new(
                (puller.left() - outer.left()) as f32,
                (puller.top() - outer.top()) as f32,
                puller.width() as f32,
                puller.height() as f32,
            ),
        })
    }

    /// Push derived visuals, shake offsets and the button state to the DOM
    pub fn apply(&mut self, visual: &DerivedVisual, shake: &ShakeFrame, phase: SessionPhase) {
        if let Some(target) = &self.target {
            let offset = shake[Actor::Target.index()];
            let style = target.style();
            let _ = style.set_property("left", &format!("{}%", visual.rope_end.x));
            let _ = style.set_property("top", &format!("{}%", visual.rope_end.y));
            let _ = style.set_property("height", &format!("{}%", visual.height));
            let _ = style.set_property("opacity", &visual.opacity.to_string());
            let _ = style.set_property(
                "transform",
                &format!(
                    "translate(calc(-50% + {}px), calc(-30% + {}px))",
                    offset.x, offset.y
                ),
            );
        }

        if let Some(puller) = &self.puller {
            let offset = shake[Actor::Puller.index()];
            let _ = puller.style().set_property(
                "transform",
                &format!("translate({}px, {}px)", offset.x, offset.y),
            );
        }

        if let Some(primary) = &self.primary {
            let label = if phase == SessionPhase::Completed {
                RESET_LABEL
            } else {
                PULL_LABEL
            };
            if self.last_label != Some(label) {
                primary.set_text_content(Some(label));
                self.last_label = Some(label);
            }
            let disabled = matches!(
                phase,
                SessionPhase::Loading | SessionPhase::AwaitingOverlay { .. }
            );
            let _ = if disabled {
                primary.set_attribute("disabled", "")
            } else {
                primary.remove_attribute("disabled")
            };
        }
    }
}
