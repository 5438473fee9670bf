//! Drop Merge entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use drop_merge::SimConfig;
    use drop_merge::renderer::CanvasRenderer;
    use drop_merge::sim::{SimEvent, Simulation, Surface, tick};

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        renderer: CanvasRenderer,
        canvas: HtmlCanvasElement,
        /// Timestamp of the last animation frame (ms)
        last_time: f64,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            self.last_time = time;
            tick(&mut self.sim, &mut self.renderer, time);
            for event in self.sim.drain_events() {
                self.handle_event(event);
            }
        }

        /// Surface outcome events in the DOM
        fn handle_event(&self, event: SimEvent) {
            match event {
                SimEvent::GameOver { id } => {
                    log::info!("Game over (body {id})");
                    set_visible("game-over", true);
                }
                SimEvent::Won => {
                    log::info!("You win!");
                    set_visible("win", true);
                }
                SimEvent::Restarted => {
                    set_visible("game-over", false);
                    set_visible("win", false);
                }
                SimEvent::Resumed => log::info!("Accepting spawns again"),
                SimEvent::Spawned { .. } | SimEvent::SpawnRejected { .. } | SimEvent::Merged { .. } => {}
            }
        }

        /// Match the canvas to the window and tell the simulation
        fn resize_to_window(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let width = window.inner_width().ok().and_then(|v| v.as_f64());
            let height = window.inner_height().ok().and_then(|v| v.as_f64());
            if let (Some(w), Some(h)) = (width, height) {
                self.canvas.set_width(w as u32);
                self.canvas.set_height(h as u32);
                self.sim.resize(w as f32, h as f32);
            } else {
                log::warn!("Could not read window size");
            }
        }
    }

    fn set_visible(id: &str, visible: bool) {
        let el = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id));
        if let Some(el) = el {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Drop Merge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let renderer = CanvasRenderer::new(&canvas).expect("no 2d context");
        let config = SimConfig::load();
        let seed = js_sys::Date::now() as u64;
        let surface = Surface::new(canvas.width() as f32, canvas.height() as f32);

        let game = Rc::new(RefCell::new(Game {
            sim: Simulation::new(config, surface, seed),
            renderer,
            canvas: canvas.clone(),
            last_time: 0.0,
        }));
        {
            let mut g = game.borrow_mut();
            g.resize_to_window();
            g.sim.init();
        }
        log::info!("Simulation initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);

        log::info!("Drop Merge running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Click spawns a body; applied at the start of the next frame
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
            game.borrow_mut().sim.queue_spawn(pos);
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let now = g.last_time;
                g.sim.restart(now);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No #restart-btn element, restart disabled");
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize_to_window();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        game.borrow_mut().frame(time);
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
    log::info!("Drop Merge (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the web version");

    headless::run(std::env::args().skip(1).collect());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use drop_merge::renderer::StatsRenderer;
    use drop_merge::sim::{RunPhase, SimEvent, Simulation, Surface, tick};
    use drop_merge::{SimConfig, SpawnPolicy};

    const FRAMES: u32 = 1800;
    const SPAWN_EVERY: u32 = 15;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Usage: drop-merge [seed] [reject|clamp]
    pub fn run(args: Vec<String>) {
        let seed = args.first().and_then(|s| s.parse().ok()).unwrap_or(42u64);
        let mut config = SimConfig::default();
        if let Some(policy) = args.get(1) {
            match SpawnPolicy::from_str(policy) {
                Some(p) => config.spawn_policy = p,
                None => log::warn!("Unknown spawn policy '{policy}', using {}", config.spawn_policy.as_str()),
            }
        }

        let surface = Surface::new(800.0, 600.0);
        let mut sim = Simulation::new(config, surface, seed);
        let mut clicks = Pcg32::seed_from_u64(seed.wrapping_add(1));
        let mut stats = StatsRenderer::default();
        sim.init();

        for frame in 0..FRAMES {
            if frame % SPAWN_EVERY == 0 {
                let pos = Vec2::new(
                    clicks.random_range(0.0..surface.width),
                    clicks.random_range(0.0..surface.height * 0.6),
                );
                sim.queue_spawn(pos);
            }

            tick(&mut sim, &mut stats, frame as f64 * FRAME_MS);

            for event in sim.drain_events() {
                match event {
                    SimEvent::GameOver { id } => log::info!("Frame {frame}: game over (body {id})"),
                    SimEvent::Won => log::info!("Frame {frame}: board cleared"),
                    SimEvent::Merged { a, b } => log::info!("Frame {frame}: {a} + {b} merged"),
                    other => log::debug!("Frame {frame}: {other:?}"),
                }
            }

            if matches!(sim.phase, RunPhase::GameOver | RunPhase::Won) {
                break;
            }
        }

        log::info!(
            "Finished in {:?} after {} frames: {} live bodies, {} discs drawn",
            sim.phase,
            sim.frame,
            sim.bodies.len(),
            stats.discs
        );

        match serde_json::to_string_pretty(&sim.bodies) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Could not serialize bodies: {e}"),
        }
    }
}
