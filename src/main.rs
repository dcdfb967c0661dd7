//! Flappy Gold entry point
//!
//! Handles platform-specific initialization and drives the session one step
//! per display frame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_gold::persistence::LocalStorageStore;
    use flappy_gold::renderer::{RenderState, build_scene};
    use flappy_gold::sim::{GameEvent, GamePhase, Viewport};
    use flappy_gold::{GameConfig, HighScore, Session};

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        /// A frame callback is queued and has not run yet
        frame_pending: bool,
    }

    impl Game {
        /// Match the canvas backing store to its laid-out size
        fn resize(&mut self) {
            let (w, h) = fit_canvas(&self.canvas);
            self.session.resize(Viewport::new(w as f32, h as f32));
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(w, h);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(self.session.state());
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
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = self.session.hud();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&hud.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("highScore") {
                el.set_text_content(Some(&hud.high_score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("gold") {
                el.set_text_content(Some(&hud.currency.to_string()));
            }
            if let Some(el) = document.get_element_by_id("playPauseBtn") {
                let label = if hud.phase == GamePhase::Running { "Pause" } else { "Play" };
                el.set_text_content(Some(label));
            }

            // Show/hide menu
            if let Some(menu) = document
                .query_selector(".game-menu")
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let display = if hud.menu_visible { "block" } else { "none" };
                let _ = menu.style().set_property("display", display);
            }
        }
    }

    /// Size the canvas backing store to its CSS box; returns the new size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let width = canvas.offset_width().max(1) as u32;
        let height = canvas.offset_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Gold starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let (width, height) = fit_canvas(&canvas);

        // Initialize game
        let store = LocalStorageStore::new();
        let config = GameConfig::load(&store);
        let high_score = HighScore::load(Box::new(store), config.high_score_key.clone());
        let session = match Session::new(
            config,
            Viewport::new(width as f32, height as f32),
            high_score,
        ) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };
        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: None,
            canvas: canvas.clone(),
            frame_pending: false,
        }));

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
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device, rendering disabled: {}", e),
        }

        setup_buttons(game.clone());
        setup_input_handlers(game.clone());
        setup_resize(game.clone());

        // Idle: draw the start position once, the loop starts with the first Play
        {
            let mut g = game.borrow_mut();
            g.render();
            g.update_hud();
        }

        log::info!("Flappy Gold ready!");
    }

    /// Queue one step, unless one is already queued or the game is not running
    fn request_animation_frame(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.frame_pending || !g.session.is_running() {
                return;
            }
            g.frame_pending = true;
        }

        let window = web_sys::window().unwrap();
        let game = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.frame_pending = false;

            // Paused or restarted-and-ended while the frame was queued
            if !g.session.is_running() {
                return;
            }

            let events = g.session.step();
            g.render();
            g.update_hud();

            for event in &events {
                match event {
                    GameEvent::NewHighScore(score) => log::info!("New high score: {}", score),
                    GameEvent::GameOver => log::info!("Game over at {}", g.session.hud().score),
                    _ => {}
                }
            }
        }

        request_animation_frame(&game);
    }

    /// Run a UI action, refresh the HUD and (re)start the frame loop if needed
    fn dispatch(game: &Rc<RefCell<Game>>, action: impl FnOnce(&mut Session)) {
        {
            let mut g = game.borrow_mut();
            action(&mut g.session);
            g.update_hud();
        }
        request_animation_frame(game);
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Play / pause
        if let Some(btn) = document.get_element_by_id("playPauseBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&game, Session::play_pause);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart
        if let Some(btn) = document.get_element_by_id("restartBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&game, Session::restart);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch jump button
        if let Some(btn) = document.get_element_by_id("jumpBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().session.jump();
            });
            let _ = btn
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match event.code().as_str() {
                "Space" | "Enter" => {
                    game.borrow_mut().session.jump();
                }
                "Escape" => dispatch(&game, |s| {
                    s.toggle_pause();
                }),
                "KeyA" => {
                    let mut g = game.borrow_mut();
                    let enabled = !g.session.autopilot();
                    g.session.set_autopilot(enabled);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.resize();
            // Keep the still frame in sync while nothing is scheduled
            if !g.session.is_running() {
                g.render();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), flappy_gold::ConfigError> {
    use flappy_gold::persistence::FileStore;
    use flappy_gold::sim::{GameEvent, Viewport};
    use flappy_gold::{GameConfig, HighScore, Session};

    /// One minute of frames at 60 Hz
    const DEMO_FRAMES: u32 = 60 * 60;

    env_logger::init();
    log::info!("Flappy Gold (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    let store = FileStore::new(std::env::temp_dir().join("flappy-gold.json"));
    log::info!("High score file: {}", store.path().display());
    let config = GameConfig::load(&store);
    let high_score = HighScore::load(Box::new(store), config.high_score_key.clone());

    let mut session = Session::new(config, Viewport::new(480.0, 400.0), high_score)?;
    session.set_autopilot(true);
    session.start();

    let mut frames = 0;
    while session.is_running() && frames < DEMO_FRAMES {
        for event in session.step() {
            match event {
                GameEvent::ObstaclePassed { score } => log::debug!("Passed a pipe ({})", score),
                GameEvent::BonusCollected { currency, .. } => log::info!("Gold! ({})", currency),
                GameEvent::NewHighScore(score) => log::info!("New high score: {}", score),
                GameEvent::GameOver => log::info!("Game over"),
            }
        }
        frames += 1;
    }

    let hud = session.hud();
    println!(
        "\nDemo finished after {} frames: score {}, gold {}, high score {}",
        frames, hud.score, hud.currency, hud.high_score
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
