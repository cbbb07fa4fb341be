//! Dino Runner entry point
//!
//! The browser build drives the engine from requestAnimationFrame; the native
//! build runs a headless autopilot session and prints ASCII frames.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent,
        TouchEvent, Window,
    };

    use dino_runner::audio::AudioManager;
    use dino_runner::engine::Engine;
    use dino_runner::persistence::LocalStorageStore;
    use dino_runner::platform::{WebAudioSink, command_for_key, command_for_tap, suppress_default};
    use dino_runner::renderer::CanvasRenderer;
    use dino_runner::sim::{Command, RunnerConfig};

    /// Game instance holding the engine and its canvas
    struct Game {
        engine: Engine,
        renderer: CanvasRenderer,
    }

    fn js_err(msg: &str) -> JsValue {
        JsValue::from_str(msg)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| js_err(&e.to_string()))?;

        log::info!("Dino Runner starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()
            .map_err(|_| js_err("not a canvas"))?;

        let config = RunnerConfig::default();
        canvas.set_width(config.field.width as u32);
        canvas.set_height(config.field.height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| js_err("no 2d context"))?
            .dyn_into()
            .map_err(|_| js_err("not a 2d context"))?;

        let seed = js_sys::Date::now() as u64;
        let engine = Engine::new(
            config,
            seed,
            Box::new(LocalStorageStore::new()),
            AudioManager::new(Box::new(WebAudioSink::new())),
        );
        let game = Rc::new(RefCell::new(Game {
            engine,
            renderer: CanvasRenderer::new(ctx),
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&window, &canvas, game.clone());
        setup_visibility(&document, game.clone());

        start(game);

        log::info!("Dino Runner running!");
        Ok(())
    }

    /// Start the engine and kick off a frame loop tied to the new epoch.
    /// Does nothing if the engine was already running (its loop is live).
    fn start(game: Rc<RefCell<Game>>) {
        let epoch = {
            let mut g = game.borrow_mut();
            if !g.engine.start() {
                return;
            }
            g.engine.epoch()
        };
        request_animation_frame(game, epoch);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, epoch: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, epoch, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, epoch: u64, time: f64) {
        {
            let mut g = game.borrow_mut();
            // Loop scheduled before the last stop/start; let it die
            if !g.engine.is_running() || g.engine.epoch() != epoch {
                return;
            }
            let Game { engine, renderer } = &mut *g;
            engine.frame(time, renderer);
        }

        request_animation_frame(game, epoch);
    }

    fn setup_input_handlers(window: &Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Key presses
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if suppress_default(&code) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                match code.as_str() {
                    "KeyI" => {
                        let enabled = !g.engine.autopilot_enabled();
                        g.engine.set_autopilot(enabled);
                    }
                    "KeyM" => {
                        let muted = g.engine.audio_mut().toggle_muted();
                        log::info!("Muted: {}", muted);
                    }
                    _ => {
                        if let Some(command) = command_for_key(&code, true) {
                            g.engine.command(command);
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key releases
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(command) = command_for_key(&event.code(), false) {
                    game.borrow_mut().engine.command(command);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus loss never delivers the keyup
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().engine.command(Command::DuckRelease);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().engine.command(command_for_tap());
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().engine.command(command_for_tap());
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Stop while the tab is hidden, come back to the menu when it returns
    fn setup_visibility(document: &Document, game: Rc<RefCell<Game>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                game.borrow_mut().engine.stop();
                log::info!("Stopped (tab hidden)");
            } else {
                start(game.clone());
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Frames simulated by the headless run when none are given
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAMES: u32 = 3600;

/// Print every n-th frame
#[cfg(not(target_arch = "wasm32"))]
const ASCII_INTERVAL: u64 = 30;

/// Usage: `dino-runner [FRAMES] [CONFIG.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use dino_runner::audio::{AudioManager, LogSink};
    use dino_runner::engine::Engine;
    use dino_runner::persistence::{FileStore, KeyValueStore, MemoryStore};
    use dino_runner::renderer::AsciiRenderer;
    use dino_runner::sim::RunnerConfig;

    env_logger::init();
    log::info!("Dino Runner (native) starting...");

    let mut args = std::env::args().skip(1);
    let frames = match args.next() {
        None => DEFAULT_FRAMES,
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Invalid frame count {:?}, using {}", arg, DEFAULT_FRAMES);
            DEFAULT_FRAMES
        }),
    };
    let config = match args.next() {
        None => RunnerConfig::default(),
        Some(path) => RunnerConfig::load(Path::new(&path)).unwrap_or_else(|e| {
            log::error!("Could not load config {}: {}; using defaults", path, e);
            RunnerConfig::default()
        }),
    };

    let store: Box<dyn KeyValueStore> = match FileStore::in_data_dir() {
        Ok(store) => {
            log::info!("High score file: {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            log::warn!("No data directory ({}); high score will not persist", e);
            Box::new(MemoryStore::new())
        }
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut engine = Engine::new(config, seed, store, AudioManager::new(Box::new(LogSink)));
    let mut renderer = AsciiRenderer::new(std::io::stdout().lock(), ASCII_INTERVAL);
    engine.play_session(frames, &mut renderer);

    let state = engine.state();
    log::info!(
        "Session over after {} frames: run {}, score {}, high score {}",
        frames,
        state.run,
        engine.score(),
        engine.high_score()
    );
    println!(
        "runs: {}  score: {}  high score: {}",
        state.run,
        engine.score(),
        engine.high_score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
