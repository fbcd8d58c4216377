//! Dome Defense entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use dome_defense::audio::{AudioManager, SoundEffect};
    use dome_defense::consts::*;
    use dome_defense::renderer::{Assets, CanvasRenderer, client_to_canvas, fit_canvas};
    use dome_defense::sim::{Arena, GamePhase, GameState, Hud, MissionReport, TickInput, tick};
    use dome_defense::{GameTuning, Settings};

    /// Game instance holding all state
    struct Game {
        /// `None` until the player presses start
        state: Option<GameState>,
        tuning: GameTuning,
        settings: Settings,
        assets: Assets,
        renderer: CanvasRenderer,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        document: Document,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Last HUD values written to the DOM
        last_hud: Option<Hud>,
        /// Whether a requestAnimationFrame callback is pending
        loop_running: bool,
    }

    impl Game {
        /// Reset everything for a fresh mission
        fn start(&mut self, seed: u64) {
            let arena = Arena::new(self.canvas.width() as f32, self.canvas.height() as f32);
            let mut state = GameState::new(seed, self.tuning.clone(), arena);
            if let Some(offset) = self.assets.launcher_offset() {
                state.launcher_offset = offset;
            }
            self.state = Some(state);
            self.accumulator = 0.0;
            self.last_time = 0.0;
            self.input = TickInput {
                idle_mode: self.input.idle_mode,
                ..Default::default()
            };
            self.last_hud = None;
            self.audio.resume();

            set_display(&self.document, "intro", "none");
            set_display(&self.document, "endScreen", "none");
            set_display(&self.document, "ui", "block");
            let _ = self.canvas.style().set_property("display", "block");
            self.resize();
            self.update_hud();

            log::info!("Mission started with seed: {}", seed);
        }

        /// Fit the canvas to the window and follow it in the simulation
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let inner_w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
            let inner_h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
            let (w, h) = fit_canvas(inner_w as f32, inner_h as f32);
            self.canvas.set_width(w as u32);
            self.canvas.set_height(h as u32);
            if let Some(state) = self.state.as_mut() {
                state.set_arena(Arena::new(w.floor(), h.floor()));
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let Some(state) = self.state.as_mut() else { return };
            self.accumulator += dt.min(MAX_FRAME_DT);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.fire.clear();
                self.input.pause = false;
            }

            for event in state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(state) = &self.state {
                if let Err(e) = self.renderer.render(state, &self.assets, &self.settings) {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(state) = &self.state else { return };
            let hud = Hud::from_state(state);
            if self.last_hud == Some(hud) {
                return;
            }
            self.last_hud = Some(hud);

            set_text(&self.document, "droneCount", &hud.drones.to_string());
            set_text(&self.document, "cruiseCount", &hud.cruise.to_string());
            set_text(&self.document, "ballisticCount", &hud.ballistic.to_string());
            set_text(&self.document, "hits", &hud.hits.to_string());
            if let Some(bar) = element(&self.document, "progressBar") {
                let _ = bar
                    .style()
                    .set_property("width", &format!("{}%", hud.progress_percent));
            }
        }

        /// Swap the HUD for the end screen with mission statistics
        fn show_end_screen(&self, report: &MissionReport) {
            if let Some(el) = element(&self.document, "endMessage") {
                el.set_text_content(Some(report.headline()));
                let color = if report.victory { "#4CAF50" } else { "#f44336" };
                let _ = el.style().set_property("color", color);
            }
            if let Some(el) = element(&self.document, "statsMessage") {
                el.set_inner_html(&format!(
                    "<strong>Mission Statistics:</strong><br>{}",
                    report.lines().join("<br>")
                ));
            }
            set_display(&self.document, "ui", "none");
            set_display(&self.document, "endScreen", "block");
        }

        fn is_over(&self) -> bool {
            self.state.as_ref().is_some_and(|s| s.is_over())
        }
    }

    fn element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_display(document: &Document, id: &str, display: &str) {
        if let Some(el) = element(document, id) {
            let _ = el.style().set_property("display", display);
        }
    }

    /// Balance override from the canvas `data-tuning` attribute
    fn load_tuning(canvas: &HtmlCanvasElement) -> GameTuning {
        let Some(json) = canvas.get_attribute("data-tuning") else {
            return GameTuning::default();
        };
        match GameTuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Using tuning override ({} threats)", tuning.total_threats());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring invalid tuning override: {}", e);
                GameTuning::default()
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Dome Defense starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        // Intro screen until the player presses start
        set_display(&document, "intro", "block");
        set_display(&document, "ui", "none");
        let _ = canvas.style().set_property("display", "none");

        let settings = Settings::load();
        let renderer = CanvasRenderer::new(&canvas, js_sys::Date::now() as u64)?;
        let audio = AudioManager::new(&settings);
        let tuning = load_tuning(&canvas);
        let assets = Assets::load(&document).await;

        let game = Rc::new(RefCell::new(Game {
            state: None,
            tuning,
            settings,
            assets,
            renderer,
            audio,
            canvas: canvas.clone(),
            document: document.clone(),
            accumulator: 0.0,
            last_time: 0.0,
            input: TickInput::default(),
            last_hud: None,
            loop_running: false,
        }));
        game.borrow_mut().resize();

        setup_input_handlers(&canvas, game.clone())?;
        setup_buttons(&document, game.clone())?;
        setup_resize(game.clone())?;
        setup_auto_pause(&document, game)?;

        log::info!("Dome Defense ready");
        Ok(())
    }

    fn start_game(game: &Rc<RefCell<Game>>) {
        let seed = js_sys::Date::now() as u64;
        let needs_loop = {
            let mut g = game.borrow_mut();
            g.start(seed);
            !std::mem::replace(&mut g.loop_running, true)
        };
        if needs_loop {
            request_animation_frame(game.clone());
        }
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Click to fire at the pointer
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if !g.state.as_ref().is_some_and(|s| s.phase == GamePhase::Playing) {
                    return;
                }
                let rect = canvas_clone.get_bounding_client_rect();
                let target = client_to_canvas(
                    Vec2::new(event.client_x() as f32, event.client_y() as f32),
                    Vec2::new(rect.left() as f32, rect.top() as f32),
                    Vec2::new(rect.width() as f32, rect.height() as f32),
                    Vec2::new(canvas_clone.width() as f32, canvas_clone.height() as f32),
                );
                g.input.fire.push(target);
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => g.input.pause = true,
                    "i" | "I" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Autopilot: {}", g.input.idle_mode);
                    }
                    "m" | "M" => {
                        g.settings.muted = !g.settings.muted;
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        settings.save();
                    }
                    "q" | "Q" => {
                        let preset = g.settings.cycle_quality();
                        log::info!("Quality: {}", preset.as_str());
                        g.settings.save();
                    }
                    "t" | "T" => {
                        g.settings.trails = !g.settings.trails;
                        log::info!("Trails: {}", g.settings.effective_trails());
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Start on the intro screen, restart on the end screen
        for id in ["startBtn", "endButton"] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{} button", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                start_game(&game);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_resize(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.state.as_ref().is_some_and(|s| s.phase == GamePhase::Playing) {
                    g.input.pause = true;
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        )?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();

            if g.is_over() {
                if let Some(report) = g.state.as_ref().and_then(MissionReport::from_state) {
                    g.show_end_screen(&report);
                }
                g.loop_running = false;
            }
            g.loop_running
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dome Defense (native) starting...");
    log::info!("Native mode runs a headless autopilot mission - use `trunk serve` to play");

    run_headless_mission();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a full mission with the autopilot and print the report
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_mission() {
    use dome_defense::GameTuning;
    use dome_defense::consts::SIM_DT;
    use dome_defense::sim::{Arena, GameState, MissionReport, TickInput, tick};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(seed, GameTuning::default(), Arena::new(800.0, 600.0));
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    // Fifteen simulated minutes covers the whole default wave schedule
    let max_ticks = (900.0 / SIM_DT) as u64;
    while !state.is_over() && state.time_ticks < max_ticks {
        tick(&mut state, &input, SIM_DT);
        state.events.clear();
    }

    match MissionReport::from_state(&state) {
        Some(report) => {
            println!("\n{}", report.headline());
            for line in report.lines() {
                println!("  {}", line);
            }
        }
        None => log::warn!("Mission still running after {} ticks", state.time_ticks),
    }
}
