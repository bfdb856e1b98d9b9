//! Skyhop entry point
//!
//! Handles platform-specific initialization and runs the frame loop. Meshes are
//! drawn by a JavaScript hook (`window.skyhopRender`) that receives each
//! frame's snapshot; this binary only owns input, HUD text and the clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent};

    use skyhop::platform::InputState;
    use skyhop::sim::{FrameSnapshot, autopilot_input};
    use skyhop::{Session, SessionPhase, Tuning};

    // Render hook provided by the page's scene script
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            if (typeof window.skyhopRender === 'function') {
                window.skyhopRender(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
    }

    /// Game instance holding all host-side state
    struct Game {
        session: Session,
        input: InputState,
        last_height: Option<u32>,
        last_phase: SessionPhase,
    }

    impl Game {
        fn new(session: Session) -> Self {
            Self {
                session,
                input: InputState::default(),
                last_height: None,
                last_phase: SessionPhase::Menu,
            }
        }

        /// Run one frame of simulation and hand the result to the renderer
        fn update(&mut self, time: f64) {
            let mut tick_input = self.input.tick_input();
            if self.input.autopilot {
                if let Some(world) = self.session.world() {
                    tick_input = skyhop::TickInput {
                        pause: tick_input.pause,
                        ..autopilot_input(world)
                    };
                }
            }

            let snapshot = self.session.frame(time, &tick_input);
            self.input.clear_one_shots();

            if let Some(snapshot) = snapshot {
                self.render(&snapshot);
                self.update_height(snapshot.height);
            }
        }

        fn render(&self, snapshot: &FrameSnapshot) {
            match serde_json::to_string(snapshot) {
                Ok(json) => render_frame(&json),
                Err(e) => log::warn!("Failed to encode frame: {e}"),
            }
        }

        /// Update the height readout only when it changes
        fn update_height(&mut self, height: u32) {
            if self.last_height == Some(height) {
                return;
            }
            self.last_height = Some(height);
            if let Some(el) = document().and_then(|d| d.get_element_by_id("hud")) {
                el.set_text_content(Some(&format!("Height: {height}")));
            }
        }

        /// Show the overlay matching the current phase
        fn update_overlays(&mut self) {
            let phase = self.session.phase();
            if phase == self.last_phase {
                return;
            }
            self.last_phase = phase;

            let Some(document) = document() else {
                return;
            };
            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            show("menu", phase == SessionPhase::Menu);
            show("pause-menu", phase == SessionPhase::Paused);
            show("hud", phase != SessionPhase::Menu);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Tuning overrides from `<script id="tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {e}");
                Tuning::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Skyhop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let session = match Session::new(load_tuning(&document)) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid tuning: {e}");
                return;
            }
        };
        let game = Rc::new(RefCell::new(Game::new(session)));

        setup_keyboard(game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        request_animation_frame(game);

        log::info!("Skyhop running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.input.key_down(&event.code(), event.repeat()).is_some() {
                    event.prevent_default();
                }
                if g.input.take_fullscreen() {
                    toggle_fullscreen();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn toggle_fullscreen() {
        let Some(document) = document() else {
            return;
        };
        if document.fullscreen_element().is_some() {
            document.exit_fullscreen();
        } else if let Some(container) = document.get_element_by_id("canvas-container") {
            if let Err(e) = container.request_fullscreen() {
                log::warn!("Fullscreen request failed: {e:?}");
            }
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let on_click = |id: &str, action: Box<dyn Fn(&mut Game)>| {
            let Some(btn) = document.get_element_by_id(id) else {
                return;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                action(&mut game.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        };

        on_click(
            "start-btn",
            Box::new(|g| g.session.start(js_sys::Date::now() as u64, now_ms())),
        );
        on_click(
            "restart-btn",
            Box::new(|g| g.session.restart(js_sys::Date::now() as u64, now_ms())),
        );
        // Resume goes through the frame loop so the clock restarts on a frame timestamp
        on_click("resume-btn", Box::new(|g| g.input.request_pause()));
        on_click("menu-btn", Box::new(|g| g.session.quit_to_menu()));
    }

    /// Same clock as requestAnimationFrame timestamps
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.release_all();
                    if g.session.phase() == SessionPhase::Playing {
                        g.session.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.release_all();
                if g.session.phase() == SessionPhase::Playing {
                    g.session.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.update_overlays();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Skyhop (native) starting...");
    log::info!("Native mode runs a headless autopilot session - serve the wasm build to play");

    if let Err(e) = native::run_demo() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use skyhop::consts::{DEMO_FRAME_MS, DEMO_FRAMES, DEMO_LOG_INTERVAL};
    use skyhop::sim::autopilot_input;
    use skyhop::{Session, Tuning, TuningError};

    /// Optional tuning JSON path as the first argument, seed as the second
    fn load_args() -> Result<(Tuning, u64), TuningError> {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next() {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(json) => Tuning::from_json(&json)?,
                Err(e) => {
                    log::warn!("Could not read {path}: {e}; using defaults");
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        };
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
        Ok((tuning, seed))
    }

    pub fn run_demo() -> Result<(), TuningError> {
        let (tuning, seed) = load_args()?;
        let mut session = Session::new(tuning)?;
        session.start(seed, 0.0);

        let mut best = 0;
        let mut falls = 0;
        for frame in 1..=DEMO_FRAMES {
            let Some(world) = session.world() else {
                break;
            };
            let input = autopilot_input(world);
            let Some(snapshot) = session.frame(frame as f64 * DEMO_FRAME_MS, &input) else {
                continue;
            };

            best = best.max(snapshot.height);
            if snapshot.fell {
                falls += 1;
            }
            if frame % DEMO_LOG_INTERVAL == 0 {
                let p = snapshot.player.position;
                log::info!(
                    "frame {frame}: height {} (best {best}), player ({:.1}, {:.1}, {:.1})",
                    snapshot.height,
                    p.x,
                    p.y,
                    p.z
                );
            }
        }

        println!("Demo finished: best height {best}, {falls} falls over {DEMO_FRAMES} frames");
        Ok(())
    }
}
