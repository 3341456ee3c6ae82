//! Retro Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use retro_racer::GameConfig;
    use retro_racer::app::{Game, InputEvent};
    use retro_racer::audio::{AudioManager, platform_sink};
    use retro_racer::consts::*;
    use retro_racer::random::SeededRandom;
    use retro_racer::renderer::{RenderState, scene};
    use retro_racer::settings::Settings;
    use retro_racer::sim::GamePhase;

    /// Browser-side wrapper: game, GPU state and frame timing
    struct WebGame {
        game: Game,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        last_phase: GamePhase,
    }

    impl WebGame {
        fn new(game: Game) -> Self {
            let last_phase = game.state().phase;
            Self {
                game,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                last_phase,
            }
        }

        fn config(&self) -> &GameConfig {
            &self.game.state().config
        }

        /// Map a canvas-relative position to game coordinates
        fn canvas_to_game(&self, canvas: &HtmlCanvasElement, x: i32, y: i32) -> InputEvent {
            let w = canvas.client_width().max(1) as f32;
            let h = canvas.client_height().max(1) as f32;
            let config = self.config();
            InputEvent::PointerMove(
                x as f32 / w * config.screen_width,
                y as f32 / h * config.screen_height,
            )
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS && self.game.is_running()
            {
                self.game.step(SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let frame = self.game.snapshot();
            let vertices = scene(&frame, self.config());
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let frame = self.game.snapshot();

            let fields = [
                ("#hud-speed .hud-value", frame.speed_kmh.to_string()),
                ("#hud-distance .hud-value", frame.distance_m.to_string()),
                ("#hud-level .hud-value", frame.level.to_string()),
                ("#hud-score .hud-value", frame.score.to_string()),
            ];
            for (selector, text) in fields {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(&text));
                }
            }

            if frame.phase == self.last_phase {
                return;
            }
            self.last_phase = frame.phase;

            let overlays = [
                ("start-screen", GamePhase::Start),
                ("hud", GamePhase::Playing),
                ("game-over", GamePhase::GameOver),
            ];
            for (id, phase) in overlays {
                if let Some(el) = document.get_element_by_id(id) {
                    let class = if frame.phase == phase { "" } else { "hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }
            if frame.phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&frame.score.to_string()));
                }
                if let Some(el) = document.get_element_by_id("final-distance") {
                    el.set_text_content(Some(&frame.distance_m.to_string()));
                }
            }
        }

        /// Show the goodbye screen once the player quits
        fn shut_down(&self) {
            log::info!("Player quit after {} ticks", self.game.ticks());
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            for id in ["start-screen", "hud", "game-over"] {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
            if let Some(el) = document.get_element_by_id("goodbye") {
                let _ = el.set_attribute("class", "");
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Retro Racer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let config = GameConfig::default();
        let screen = (config.screen_width, config.screen_height);
        let seed = js_sys::Date::now() as u64;
        let audio = AudioManager::new(platform_sink(), Settings::default());
        let game = match Game::new(config, Box::new(SeededRandom::new(seed)), audio) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Invalid game configuration: {}", e);
                return;
            }
        };
        let game = Rc::new(RefCell::new(WebGame::new(game)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, screen).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Renderer unavailable: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());

        if let Some(el) = document.get_element_by_id("start-screen") {
            let _ = el.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Retro Racer running!");
    }

    fn key_down(key: &str, repeat: bool) -> Option<InputEvent> {
        match key {
            "ArrowLeft" => Some(InputEvent::SteerLeft(true)),
            "ArrowRight" => Some(InputEvent::SteerRight(true)),
            _ if repeat => None,
            " " | "Enter" => Some(InputEvent::Confirm),
            "Escape" => Some(InputEvent::Cancel),
            _ => None,
        }
    }

    /// Volume step for the - / = keys
    const VOLUME_STEP: f32 = 0.1;

    /// Audio keys: M mutes, - and = change the master volume
    fn audio_key(game: &mut Game, key: &str) -> bool {
        let audio = game.audio_mut();
        match key {
            "m" | "M" => {
                let muted = audio.toggle_mute();
                log::info!("Sound {}", if muted { "muted" } else { "on" });
            }
            "-" => log::info!("Volume {:.1}", audio.change_volume(-VOLUME_STEP)),
            "=" | "+" => log::info!("Volume {:.1}", audio.change_volume(VOLUME_STEP)),
            _ => return false,
        }
        true
    }

    fn key_up(key: &str) -> Option<InputEvent> {
        match key {
            "ArrowLeft" => Some(InputEvent::SteerLeft(false)),
            "ArrowRight" => Some(InputEvent::SteerRight(false)),
            _ => None,
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if !event.repeat() && audio_key(&mut game.borrow_mut().game, &event.key()) {
                    return;
                }
                if let Some(input) = key_down(&event.key(), event.repeat()) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                    game.borrow_mut().game.handle_event(input);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(input) = key_up(&event.key()) {
                    game.borrow_mut().game.handle_event(input);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - hover tracking for menu buttons
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let input = g.canvas_to_game(&canvas_clone, event.offset_x(), event.offset_y());
                g.game.handle_event(input);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - menu buttons
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let input = g.canvas_to_game(&canvas_clone, event.offset_x(), event.offset_y());
                g.game.handle_event(input);
                g.game.handle_event(InputEvent::PointerClick);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            if !g.game.is_running() {
                g.shut_down();
                return;
            }
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless native run: an autopilot plays one round at 60 Hz
///
/// Usage: `retro-racer [seed]`. `RETRO_RACER_CONFIG` may point at a JSON
/// [`GameConfig`](retro_racer::GameConfig) to override the default layout.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use retro_racer::GameConfig;
    use retro_racer::app::{Autopilot, Game, RealtimeClock};
    use retro_racer::audio::{AudioManager, platform_sink};
    use retro_racer::consts::TICK_RATE;
    use retro_racer::random::SeededRandom;
    use retro_racer::settings::Settings;

    env_logger::init();
    log::info!("Retro Racer (native) starting...");

    let config = match std::env::var("RETRO_RACER_CONFIG") {
        Ok(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Could not load config from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(_) => GameConfig::default(),
    };

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    log::info!("Seed: {}", seed);

    let audio = AudioManager::new(platform_sink(), Settings::default());
    let mut game = match Game::new(config.clone(), Box::new(SeededRandom::new(seed)), audio) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid game configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut pilot = Autopilot::new(60 * u64::from(TICK_RATE), &config);
    let mut clock = RealtimeClock::new(TICK_RATE);
    let ticks = game.run(&mut pilot, &mut clock);
    log::info!("Finished after {} ticks", ticks);

    if let Some(frame) = pilot.last_frame() {
        match serde_json::to_string_pretty(frame) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("Could not serialize final frame: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: &str) -> Result<retro_racer::GameConfig, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let config: retro_racer::GameConfig = serde_json::from_str(&text)?;
    config.validate()?;
    Ok(config)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
