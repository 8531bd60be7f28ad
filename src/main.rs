//! Glass Toss entry point
//!
//! Handles platform-specific initialization and runs the game loop. Drawing
//! is left to the page: every frame the host hands the outbox events and a
//! frame snapshot to a JS hook as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use glass_toss::consts::*;
    use glass_toss::sim::{Game, GamePhase, ThrowAttempt, TickInput, tick};
    use glass_toss::{LevelTable, Settings, Tuning};

    // Bridge to the page: config lookup and per-frame presentation
    #[wasm_bindgen(inline_js = "
        export function read_config(key) {
            const cfg = window.GLASS_TOSS_CONFIG;
            if (!cfg || cfg[key] === undefined) {
                return undefined;
            }
            return typeof cfg[key] === 'string' ? cfg[key] : JSON.stringify(cfg[key]);
        }

        export function present(events_json, frame_json) {
            const hook = window.glassToss;
            if (hook && typeof hook.onFrame === 'function') {
                hook.onFrame(JSON.parse(events_json), JSON.parse(frame_json));
            }
        }
    ")]
    extern "C" {
        fn read_config(key: &str) -> Option<String>;
        fn present(events_json: &str, frame_json: &str);
    }

    /// Maps canvas CSS pixels to playfield coordinates (letterboxed)
    #[derive(Debug, Clone, Copy)]
    struct View {
        scale: f32,
        offset: Vec2,
    }

    impl View {
        fn fit(client_w: f32, client_h: f32) -> Self {
            let scale = (client_w / PLAYFIELD_WIDTH)
                .min(client_h / PLAYFIELD_HEIGHT)
                .max(f32::EPSILON);
            let offset = Vec2::new(
                (client_w - PLAYFIELD_WIDTH * scale) * 0.5,
                (client_h - PLAYFIELD_HEIGHT * scale) * 0.5,
            );
            Self { scale, offset }
        }

        fn to_playfield(&self, x: f32, y: f32) -> Vec2 {
            (Vec2::new(x, y) - self.offset) / self.scale
        }
    }

    /// Host instance holding the game and loop state
    struct Host {
        game: Game,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        view: View,
    }

    impl Host {
        fn new(game: Game, view: View) -> Self {
            Self {
                game,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                view,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = std::mem::take(&mut self.input);
                tick(&mut self.game, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                // Drop the backlog instead of spiralling
                self.accumulator = 0.0;
            }
        }

        /// Hand events and the frame to the page
        fn present(&mut self) {
            let events = self.game.drain_events();
            let frame = self.game.frame();
            match (serde_json::to_string(&events), serde_json::to_string(&frame)) {
                (Ok(events), Ok(frame)) => present(&events, &frame),
                (Err(e), _) | (_, Err(e)) => log::warn!("Frame serialization failed: {}", e),
            }
        }
    }

    fn load_config() -> (Tuning, Settings, LevelTable) {
        let tuning = match read_config("tuning").map(|json| Tuning::from_json(&json)) {
            Some(Ok(tuning)) => tuning,
            Some(Err(e)) => {
                log::warn!("Ignoring tuning override: {}", e);
                Tuning::default()
            }
            None => Tuning::default(),
        };
        let settings = match read_config("settings").map(|json| Settings::from_json(&json)) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Ignoring settings: {}", e);
                Settings::default()
            }
            None => Settings::default(),
        };
        let levels = match read_config("levels").map(|json| LevelTable::from_json(&json)) {
            Some(Ok(levels)) => levels,
            Some(Err(e)) => {
                log::warn!("Ignoring level table: {}", e);
                LevelTable::builtin()
            }
            None => LevelTable::builtin(),
        };
        (tuning, settings, levels)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }
        log::info!("Glass Toss starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element on the page");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let (tuning, settings, levels) = load_config();
        let seed = js_sys::Date::now() as u64;
        let view = View::fit(canvas.client_width() as f32, canvas.client_height() as f32);
        let host = Rc::new(RefCell::new(Host::new(
            Game::with_config(tuning, settings, levels, seed),
            view,
        )));
        log::info!("Game initialized with seed: {}", seed);

        setup_pointer_handlers(&canvas, host.clone());
        setup_keyboard(host.clone());
        setup_auto_pause(host.clone());

        request_animation_frame(host);
        log::info!("Glass Toss running!");
    }

    fn pointer_position(host: &Host, canvas: &HtmlCanvasElement, event: &PointerEvent) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let x = event.client_x() as f32 - rect.left() as f32;
        let y = event.client_y() as f32 - rect.top() as f32;
        host.view.to_playfield(x, y)
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Pointer down - start a drag
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let _ = canvas_clone.set_pointer_capture(event.pointer_id());
                let mut h = host.borrow_mut();
                h.view = View::fit(
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                let point = pointer_position(&h, &canvas_clone, &event);
                h.game.pointer_down(point, event.time_stamp() / 1000.0);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move - aim
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut h = host.borrow_mut();
                let point = pointer_position(&h, &canvas_clone, &event);
                h.game.pointer_move(point, event.time_stamp() / 1000.0);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up - throw
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut h = host.borrow_mut();
                match h.game.pointer_up(event.time_stamp() / 1000.0) {
                    ThrowAttempt::Accepted(params) => {
                        log::debug!("Throw with force {:.1}", params.force)
                    }
                    ThrowAttempt::Rejected(reason) => log::debug!("Throw rejected: {}", reason),
                    ThrowAttempt::Discarded | ThrowAttempt::NoGesture => {}
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer cancel - drop the drag
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                host.borrow_mut().game.pointer_cancel();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointercancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut h = host.borrow_mut();
            let phase = h.game.phase();
            match event.key().as_str() {
                "Escape" | "p" | "P" => h.input.pause = true,
                "Enter" | " " => match phase {
                    GamePhase::Menu | GamePhase::GameOver => h.input.start = true,
                    GamePhase::LevelComplete => h.input.next_level = true,
                    _ => {}
                },
                "r" | "R" => h.input.restart = true,
                "m" | "M" => h.input.menu = true,
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();

            // Calculate delta time
            let dt = if h.last_time > 0.0 {
                ((time - h.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            h.last_time = time;

            h.update(dt);
            h.present();
        }

        request_animation_frame(host);
    }

    fn setup_auto_pause(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let host = host.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut h = host.borrow_mut();
                    if h.game.settings().auto_pause && h.game.phase() == GamePhase::Playing {
                        h.game.pause();
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
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut h = host.borrow_mut();
                if h.game.settings().auto_pause && h.game.phase() == GamePhase::Playing {
                    h.game.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
    log::info!("Glass Toss (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in the browser");

    if let Err(e) = demo::run(std::env::args().nth(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session that exercises the full throw pipeline without a window
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;

    use glam::Vec2;
    use glass_toss::consts::*;
    use glass_toss::sim::{Game, GameEvent, GamePhase, ShotPhase, ThrowAttempt, TickInput, tick};
    use glass_toss::{LevelTable, Settings, Tuning};

    /// Drags tried in order, cycling (playfield px, up is negative y)
    const DRAGS: [(f32, f32); 4] = [(90.0, -190.0), (60.0, -190.0), (100.0, -180.0), (0.0, -200.0)];

    pub fn run(tuning_path: Option<String>) -> Result<(), Box<dyn Error>> {
        let tuning = match tuning_path {
            Some(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::from_json(&std::fs::read_to_string(path)?)?
            }
            None => Tuning::default(),
        };

        let mut game = Game::with_config(tuning, Settings::default(), LevelTable::builtin(), 42);
        tick(
            &mut game,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );

        let origin = Vec2::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT - 100.0);
        let mut clock = 0.0f64;
        let mut throws = 0usize;

        // Ten simulated minutes at most
        for _ in 0..(600.0 / SIM_DT) as u32 {
            match game.phase() {
                GamePhase::Playing => {
                    if game.shot_phase() == ShotPhase::Ready {
                        let (x, y) = DRAGS[throws % DRAGS.len()];
                        game.pointer_down(origin, clock);
                        for i in 1..=60 {
                            game.pointer_move(origin + Vec2::new(x, y), clock + i as f64 / 60.0);
                        }
                        if let ThrowAttempt::Accepted(_) = game.pointer_up(clock + 1.0) {
                            throws += 1;
                        }
                    }
                    tick(&mut game, &TickInput::default(), SIM_DT);
                }
                GamePhase::LevelComplete => tick(
                    &mut game,
                    &TickInput {
                        next_level: true,
                        ..Default::default()
                    },
                    SIM_DT,
                ),
                GamePhase::GameOver | GamePhase::Menu | GamePhase::Paused => break,
            }
            clock += SIM_DT as f64;

            for event in game.drain_events() {
                log_event(&event);
            }
        }

        log::info!(
            "Demo finished after {} throws: phase {}, run score {}",
            throws,
            game.phase().as_str(),
            game.run_score()
        );
        Ok(())
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::AimUpdated(_) | GameEvent::AimCleared | GameEvent::Hud(_) => {}
            GameEvent::ShotResolved(record) => log::info!(
                "{:?} after {} bounces: +{}",
                record.outcome,
                record.bounce_count,
                record.points_awarded
            ),
            GameEvent::LevelLoaded { level, name, .. } => {
                log::info!("Level {}: {}", level, name)
            }
            other => log::debug!("{:?}", other),
        }
    }
}
