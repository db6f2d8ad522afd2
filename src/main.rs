//! River Raid entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use river_raid::audio::{AudioManager, SoundEffect};
    use river_raid::consts::*;
    use river_raid::sim::{GameConfig, GameEvent, GameState, TickInput, tick};
    use river_raid::view::frame_view;
    use river_raid::{HighScore, RunOutcome, RunSummary, Screen, Settings};

    /// Cap on catch-up ticks after a long frame (tab throttling etc.)
    const MAX_SUBSTEPS: u32 = 5;

    // The page owns the canvas and the sprite atlas; we hand it one JSON
    // snapshot per animation frame.
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            if (window.renderFrame) {
                window.renderFrame(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        screen: Screen,
        state: GameState,
        input: TickInput,
        settings: Settings,
        high_score: HighScore,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            // Write back so the stored record always carries every current
            // field, including ones added since it was last saved
            settings.save();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);

            Self {
                screen: Screen::Preload,
                state: GameState::new(seed, GameConfig::default()),
                input: TickInput::default(),
                settings,
                high_score: HighScore::load(),
                audio,
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Begin a fresh run on the Play screen
        fn start_run(&mut self, seed: u64) {
            self.state = GameState::new(seed, GameConfig::default());
            self.accumulator = 0.0;
            self.input = TickInput::default();
            self.input.start = true;
            self.screen = Screen::Play;
            self.audio.resume();
            log::info!("Run started with seed: {}", self.state.seed);
        }

        /// The start key either advances a presentation screen or is
        /// forwarded into the running simulation as the fire key.
        fn on_start_key(&mut self) {
            match self.screen.on_start_key() {
                Some(Screen::Play) => {
                    let seed = js_sys::Date::now() as u64;
                    self.start_run(seed);
                }
                Some(next) => self.screen = next,
                None => self.input.fire = true,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            if self.screen == Screen::Play {
                let dt = dt.min(0.1);
                self.accumulator += dt;

                let mut substeps = 0;
                while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
                    let input = self.input.clone();
                    tick(&mut self.state, &input);
                    self.accumulator -= FRAME_DT;
                    substeps += 1;

                    // Clear one-shot inputs after processing
                    self.input.start = false;
                }

                self.handle_events();
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Drain simulation events into sounds and screen transitions
        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Started => {
                        self.audio.play(SoundEffect::GameStart);
                        self.audio.start_engine();
                    }
                    GameEvent::BulletFired => self.audio.play(SoundEffect::Bullet),
                    GameEvent::ExplosionSound => self.audio.play(SoundEffect::Explosion),
                    GameEvent::EngineRate(rate) => self.audio.set_engine_rate(rate),
                    GameEvent::LifeLost { remaining } => {
                        log::info!("Life lost, {} remaining", remaining);
                    }
                    GameEvent::Won { score } => self.finish_run(RunOutcome::Won, score),
                    GameEvent::Lost { score } => self.finish_run(RunOutcome::Lost, score),
                    // Spawns, destruction and the plane explosion are
                    // presented through the frame snapshot's animations.
                    GameEvent::EnemySpawned { .. }
                    | GameEvent::HelicoptersFly
                    | GameEvent::EnemyDestroyed { .. }
                    | GameEvent::PlaneExploding => {}
                }
            }
        }

        fn finish_run(&mut self, outcome: RunOutcome, score: u32) {
            self.audio.stop_engine();
            if self.high_score.record(score) {
                log::info!("New high score: {}", score);
            }
            let summary = RunSummary {
                score,
                high_score: self.high_score.value(),
            };
            self.screen = self.screen.on_run_over(outcome, summary);

            match outcome {
                RunOutcome::Won => self.audio.play(SoundEffect::Winner),
                RunOutcome::Lost => self.audio.play(SoundEffect::GameOver),
            }
        }

        /// Render the current frame
        fn render(&self) {
            let view = frame_view(&self.state, &self.input, self.high_score.value());
            match serde_json::to_string(&view) {
                Ok(json) => render_frame(&json),
                Err(e) => log::warn!("Render snapshot error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            // Update score
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            // Update lives
            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.lives.to_string()));
            }

            // Update high score
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.high_score.value().to_string()));
            }

            // Update FPS
            if self.settings.show_fps {
                if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            // Banner (start prompt / win / game over)
            if let Some(el) = document.get_element_by_id("banner") {
                match self.screen.banner() {
                    Some(text) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            // Final score shown on the Win and Game-Over screens
            if let (Screen::Win(summary) | Screen::GameOver(summary), Some(el)) =
                (self.screen, document.get_element_by_id("final-score"))
            {
                el.set_text_content(Some(&summary.score.to_string()));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("River Raid starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        setup_input_handlers(game.clone());
        setup_blur_mute(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("River Raid running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keydown
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "ArrowUp" => g.input.accelerate = true,
                    "ArrowDown" => g.input.brake = true,
                    " " => {
                        event.prevent_default();
                        if !event.repeat() {
                            g.on_start_key();
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    "ArrowUp" => g.input.accelerate = false,
                    "ArrowDown" => g.input.brake = false,
                    " " => g.input.fire = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_blur_mute(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden =
                    document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(hidden);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur / focus
        {
            let game_blur = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game_blur.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
                // Drop held keys so nothing sticks while unfocused
                g.input = TickInput::default();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(false);
                }
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use river_raid::sim::{GameConfig, GameState, TickInput, Tier, tick};

    env_logger::init();
    log::info!("River Raid (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(seed, GameConfig::default());

    // Fly straight up the river for ten simulated seconds
    let mut input = TickInput::default();
    input.start = true;
    tick(&mut state, &input);
    input.start = false;
    input.accelerate = true;

    for _ in 0..600 {
        tick(&mut state, &input);
        state.drain_events();
        // Nothing is dodging, so keep the channel clear
        state.enemies.clear();
        state.schedules.clear();
    }

    println!(
        "seed {}: score {} ({}), {} lives left",
        state.seed,
        state.score,
        Tier::for_score(state.score).as_str(),
        state.lives
    );
}
