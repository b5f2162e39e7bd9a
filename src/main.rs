//! Rope Pull entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Element, KeyboardEvent, PageTransitionEvent};

    use rope_pull::config::{Actor, SequenceConfig};
    use rope_pull::input::is_primary_shortcut;
    use rope_pull::platform::assets::{self, ScrollLock};
    use rope_pull::platform::overlay::EndedQueue;
    use rope_pull::platform::{DomPresenter, Listeners, SceneDom, now_ms};
    use rope_pull::renderer::CanvasRenderer;
    use rope_pull::sim::{PrimaryOutcome, Sequencer};

    const LOADING_ID: &str = "loading";

    /// Game instance holding all state
    struct Game {
        seq: Sequencer,
        fx: DomPresenter,
        scene: SceneDom,
        renderer: Option<CanvasRenderer>,
        overlay_ended: EndedQueue,
        last_time: f64,
    }

    impl Game {
        /// Re-measure after a resize
        fn relayout(&mut self) {
            let Some(layout) = self.scene.measure() else {
                return;
            };
            self.seq.update_layout(layout);
            if let Some(renderer) = &mut self.renderer {
                let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
                renderer.resize(layout.container, dpr);
            }
        }

        fn primary(&mut self) {
            match self.seq.primary_action(now_ms(), &mut self.fx) {
                PrimaryOutcome::Pulled(event) => {
                    log::debug!("Pulled to {}", event.counter)
                }
                PrimaryOutcome::Reset => log::info!("Starting over"),
                PrimaryOutcome::Rejected(_) => {}
            }
        }

        /// Advance effects and draw
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0).min(0.1) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let ended = self.overlay_ended.borrow_mut().drain_ended();
            for ticket in ended {
                self.seq.overlay_finished(ticket, &mut self.fx);
            }

            let shake = self.seq.shake_frame(time);
            let visual = self.seq.visual();
            self.scene.apply(&visual, &shake, self.seq.phase());

            if let Some(renderer) = &self.renderer {
                self.fx.confetti.advance(dt, renderer.size);
                let rope = self.seq.rope(renderer.texture_size());
                renderer.render(&rope, shake[Actor::Rope.index()], &self.fx.confetti);
            }
        }

        fn is_torn_down(&self) -> bool {
            self.seq.state().torn_down
        }

        fn teardown(&mut self) {
            self.seq.teardown(&mut self.fx);
        }

        fn page_hidden(&mut self, persisted: bool) -> bool {
            self.seq.page_hidden(persisted, &mut self.fx)
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Rope Pull starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let config = SequenceConfig::load();

        // Asset gate: nothing is interactive until images have settled
        let scroll_lock = ScrollLock::engage();
        let (outcome, mut images) =
            assets::preload(&config.assets.images, config.min_loading_ms).await;
        scroll_lock.release();
        spawn_local(assets::dismiss_loading_screen(LOADING_ID));

        let Some(scene) = SceneDom::find(&document) else {
            log::error!("No #scene element, nothing to run");
            return;
        };
        let rope_texture = images.remove(&config.assets.rope_texture);
        let renderer = CanvasRenderer::new(&document, rope_texture);
        if renderer.is_none() {
            log::warn!("Rope canvas unavailable, rope and confetti will not be drawn");
        }

        let entry_url = config.assets.entry_url.clone();
        let overlay_ended = EndedQueue::default();
        let fx = DomPresenter::new(&document, &config, overlay_ended.clone());

        let mut seq = Sequencer::new(config);
        seq.assets_resolved(&outcome);

        let game = Rc::new(RefCell::new(Game {
            seq,
            fx,
            scene,
            renderer,
            overlay_ended,
            last_time: 0.0,
        }));
        game.borrow_mut().relayout();

        let listeners = Rc::new(RefCell::new(Listeners::new()));
        attach_listeners(&game, &listeners, entry_url);
        log::info!("{} listeners attached", listeners.borrow().len());

        request_animation_frame(game);

        log::info!("Rope Pull running!");
    }

    fn attach_listeners(
        game: &Rc<RefCell<Game>>,
        listeners: &Rc<RefCell<Listeners>>,
        entry_url: String,
    ) {
        let window = web_sys::window().expect("no window");
        let mut list = listeners.borrow_mut();

        game.borrow().fx.attach(&mut list);

        // Primary control: pull, or start over once completed
        if let Some(btn) = game.borrow().scene.primary.clone() {
            let game = game.clone();
            list.attach(&btn, "click", move |_| game.borrow_mut().primary());
        }

        // Keyboard shortcut for the primary control
        {
            let game = game.clone();
            list.attach(&window, "keydown", move |event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|k| k.key()) else {
                    return;
                };
                let focused = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .map(|el| el.tag_name());
                if is_primary_shortcut(&key, focused.as_deref()) {
                    event.prevent_default();
                    game.borrow_mut().primary();
                }
            });
        }

        // Layout changes move the rope start until the first pull
        {
            let game = game.clone();
            list.attach(&window, "resize", move |_| game.borrow_mut().relayout());
        }

        // Page going away: stop media, drop listeners. A page entering the
        // back/forward cache keeps everything for when it is shown again.
        {
            let game = game.clone();
            let listeners = listeners.clone();
            list.attach(&window, "pagehide", move |event| {
                let persisted = event
                    .dyn_ref::<PageTransitionEvent>()
                    .is_some_and(|e| e.persisted());
                if game.borrow_mut().page_hidden(persisted) {
                    release_listeners(listeners.clone());
                }
            });
        }

        // Return to the entry page
        if let Some(back) = game.borrow().scene.back.clone() {
            let game = game.clone();
            let listeners = listeners.clone();
            list.attach(&back, "click", move |_| {
                game.borrow_mut().teardown();
                release_listeners(listeners.clone());
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href(&entry_url);
                }
            });
        }
    }

    /// Detach after the current handler has returned
    fn release_listeners(listeners: Rc<RefCell<Listeners>>) {
        spawn_local(async move {
            let mut list = listeners.borrow_mut();
            if list.is_empty() {
                return;
            }
            log::info!("Detaching {} listeners", list.len());
            list.detach();
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.is_torn_down() {
                log::info!("Frame loop stopped");
                return;
            }
            g.frame(time);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rope Pull (native) starting...");
    log::info!("Native mode has no scene - run with `trunk serve` for the web version");

    println!("\nRunning headless walkthrough...");
    walkthrough();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Presenter that logs instead of playing anything
#[cfg(not(target_arch = "wasm32"))]
struct LogPresenter {
    overlay: Option<rope_pull::sim::OverlayTicket>,
}

#[cfg(not(target_arch = "wasm32"))]
impl rope_pull::sim::Presenter for LogPresenter {
    fn play_sound(&mut self, cue: rope_pull::sim::SoundCue) {
        log::info!("sound: {cue:?}");
    }

    fn start_overlay(
        &mut self,
        ticket: rope_pull::sim::OverlayTicket,
        clip: &str,
        volume: f32,
    ) -> Result<(), rope_pull::sim::PresentError> {
        log::info!("overlay: {clip} at volume {volume}");
        self.overlay = Some(ticket);
        Ok(())
    }

    fn end_overlay(&mut self) {
        log::info!("overlay hidden");
    }

    fn stop_ambient(&mut self) {
        log::info!("ambient stopped");
    }

    fn burst_confetti(&mut self, burst: rope_pull::sim::ConfettiBurst) {
        log::info!(
            "confetti: {} particles after {} ms",
            burst.particles,
            burst.delay_ms
        );
    }

    fn show_victory(&mut self, visible: bool) {
        log::info!("victory visible: {visible}");
    }

    fn halt_media(&mut self) {
        log::info!("media halted");
    }
}

/// Drive a full session with every clip ending immediately
#[cfg(not(target_arch = "wasm32"))]
fn walkthrough() {
    use glam::Vec2;
    use rope_pull::SequenceConfig;
    use rope_pull::sim::{GateOutcome, Layout, Rect, RopeRender, Sequencer, SessionPhase};

    let mut seq = Sequencer::new(SequenceConfig::default());
    let mut fx = LogPresenter { overlay: None };

    seq.assets_resolved(&GateOutcome::Ready);
    seq.update_layout(Layout {
        container: Vec2::new(430.0, 932.0),
        puller: Rect::new(-21.5, 466.0, 215.0, 466.0),
    });

    let mut now = 0.0;
    while seq.phase() != SessionPhase::Completed {
        now += 250.0;
        match seq.pull(now, &mut fx) {
            Ok(event) => {
                let visual = seq.visual();
                println!(
                    "pull {:>2} {:<12} end=({:.1}%, {:.1}%) height={:.1}% opacity={:.2}",
                    event.counter,
                    format!("{:?}", event.category),
                    visual.rope_end.x,
                    visual.rope_end.y,
                    visual.height,
                    visual.opacity,
                );
            }
            Err(reason) => println!("pull rejected: {reason:?}"),
        }
        if let Some(ticket) = fx.overlay.take() {
            seq.overlay_finished(ticket, &mut fx);
        }
    }

    let rope_len = match seq.rope(None) {
        RopeRender::Stroke { from, to, .. } => from.distance(to),
        _ => 0.0,
    };
    println!("rope length at completion: {rope_len:.1}px");
    println!("✓ Sequence completed after {} pulls", seq.counter());
}
