//! Box Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use box_dodge::GameConfig;
    use box_dodge::input::PointerCell;
    use box_dodge::presentation::{FrameSnapshot, Presenter};
    use box_dodge::renderer::{RenderError, SceneRenderer};
    use box_dodge::sim::{Session, SessionPhase, TickInput, tick};

    fn js_error(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Host clock in the same timebase as animation frame timestamps
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    /// Game instance holding all state
    struct Game {
        config: GameConfig,
        session: Session,
        renderer: Option<SceneRenderer>,
        pointer: Rc<PointerCell>,
        /// Whether an animation frame is currently scheduled
        loop_running: bool,
        last_phase: SessionPhase,
    }

    impl Game {
        fn new(config: GameConfig, seed: u64) -> Result<Self, JsValue> {
            let session = Session::new(config.clone(), seed).map_err(js_error)?;
            Ok(Self {
                config,
                session,
                renderer: None,
                pointer: Rc::new(PointerCell::default()),
                loop_running: false,
                last_phase: SessionPhase::NotStarted,
            })
        }

        /// Advance the simulation and draw one frame
        fn frame(&mut self, time: f64) {
            let input = TickInput {
                now_ms: time,
                pointer_offset: self.pointer.load(),
            };
            tick(&mut self.session, &input);

            let snapshot = FrameSnapshot::capture(&self.session, time);
            self.render(&snapshot);
            self.update_hud(&snapshot);

            if snapshot.phase != self.last_phase {
                log::info!("Phase: {}", snapshot.phase.as_str());
                self.last_phase = snapshot.phase;
            }
        }

        fn render(&mut self, snapshot: &FrameSnapshot) {
            if let Some(ref mut renderer) = self.renderer {
                match renderer.present(snapshot) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = renderer.size();
                        renderer.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, snapshot: &FrameSnapshot) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-time .hud-value").ok().flatten() {
                el.set_text_content(Some(&snapshot.elapsed.to_string()));
            }

            if let Some(el) = document.get_element_by_id("paused") {
                let class = if snapshot.phase == SessionPhase::Paused { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                match snapshot.survival {
                    Some(survival) => {
                        let _ = el.set_attribute("class", "");
                        if let Some(time_el) = document.get_element_by_id("final-time") {
                            time_el.set_text_content(Some(&survival.to_string()));
                        }
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }

        /// Throw away the session and start a fresh one
        fn restart(&mut self, seed: u64, now: f64) -> Result<(), JsValue> {
            self.session = Session::new(self.config.clone(), seed).map_err(js_error)?;
            self.session.start(now);
            self.last_phase = SessionPhase::NotStarted;
            Ok(())
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;

        log::info!("Box Dodge starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let config = GameConfig::load();

        // Fixed logical resolution, scaled for the display
        let dpr = window.device_pixel_ratio();
        let width = (config.display_width as f64 * dpr) as u32;
        let height = (config.display_height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(config.clone(), seed)?));
        log::info!(
            "Game initialized with seed: {} (after game over: {})",
            seed,
            config.after_game_over.as_str()
        );

        match init_renderer(canvas.clone(), width, height, &config).await {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("Rendering unavailable: {}", e),
        }

        let pointer = game.borrow().pointer.clone();
        setup_input_handlers(&canvas, pointer, &config);
        setup_buttons(game.clone());

        game.borrow_mut().session.start(now_ms());
        request_animation_frame(game);

        log::info!("Box Dodge running!");
        Ok(())
    }

    async fn init_renderer(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
        config: &GameConfig,
    ) -> Result<SceneRenderer, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        SceneRenderer::new(surface, &adapter, width, height, config).await
    }

    /// Pointer events only write the shared offset cell
    fn setup_input_handlers(canvas: &HtmlCanvasElement, pointer: Rc<PointerCell>, config: &GameConfig) {
        let logical_height = config.display_height;
        let field_limit = config.field_limit;

        // Mouse move
        {
            let pointer = pointer.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                pointer.record_client_y(
                    event.client_y() as f32,
                    rect.top() as f32,
                    rect.height() as f32,
                    logical_height,
                    field_limit,
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    pointer.record_client_y(
                        touch.client_y() as f32,
                        rect.top() as f32,
                        rect.height() as f32,
                        logical_height,
                        field_limit,
                    );
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        let Some(btn) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("start-btn", move |_| {
                let mut g = game.borrow_mut();
                let now = now_ms();
                if !g.session.resume(now) {
                    g.session.start(now);
                }
            });
        }

        {
            let game = game.clone();
            on_click("stop-btn", move |_| {
                game.borrow_mut().session.pause(now_ms());
            });
        }

        on_click("restart-btn", move |_| {
            let seed = js_sys::Date::now() as u64;
            let resume_loop = {
                let mut g = game.borrow_mut();
                if let Err(e) = g.restart(seed, now_ms()) {
                    log::error!("Restart failed: {:?}", e);
                    return;
                }
                log::info!("Game restarted with seed: {}", seed);
                !g.loop_running
            };
            // Frozen loop (Freeze policy) needs a new first frame
            if resume_loop {
                request_animation_frame(game.clone());
            }
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        game.borrow_mut().loop_running = true;
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let reschedule = {
            let mut g = game.borrow_mut();
            g.frame(time);
            let ended = g.session.phase() == SessionPhase::Ended;
            let reschedule = g.config.after_game_over.reschedule(ended);
            g.loop_running = reschedule;
            reschedule
        };

        if reschedule {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Box Dodge (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for the web version");

    if let Err(e) = headless::run(std::env::args().skip(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: a scripted pointer sweeps the field until a box connects
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use box_dodge::presentation::{FrameSnapshot, LogPresenter, Presenter};
    use box_dodge::sim::{Session, TickInput, TickOutcome, tick};
    use box_dodge::{ConfigError, GameConfig};

    /// 60 Hz display
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after five simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 5;

    /// Usage: box-dodge [config.json] [seed]
    pub fn run(mut args: impl Iterator<Item = String>) -> Result<(), ConfigError> {
        let config_path = args.next().map(PathBuf::from);
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);

        let config = GameConfig::load_file(config_path.as_deref())?;
        let mut session = Session::new(config, seed)?;
        let mut presenter = LogPresenter::new();

        let mut now = 0.0;
        session.start(now);

        let sweep = session.config().field_limit;
        for frame in 0..MAX_FRAMES {
            now += FRAME_MS;
            let pointer_offset = (frame as f32 * 0.02).sin() * sweep;
            let outcome = tick(&mut session, &TickInput { now_ms: now, pointer_offset });

            let snapshot = FrameSnapshot::capture(&session, now);
            let _ = presenter.present(&snapshot);

            if let TickOutcome::Ended { slot, survival } = outcome {
                println!(
                    "Seed {}: hit by box {} after {}s ({} frames)",
                    seed,
                    slot,
                    survival,
                    presenter.frames()
                );
                return Ok(());
            }
        }

        println!(
            "Seed {}: survived the full {} frames",
            seed,
            presenter.frames()
        );
        Ok(())
    }
}
