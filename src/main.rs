//! Neon Dodge entry point
//!
//! Browser: wires DOM input, HUD and WebGPU to the simulation and runs the
//! animation-frame loop. Native: plays seeded headless runs from the command
//! line.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, PointerEvent};

    use neon_dodge::platform::time_seed;
    use neon_dodge::renderer::{FrameEffects, RenderState, build_frame};
    use neon_dodge::sim::{
        GameEvent, GameState, HeldKeys, Joystick, MoveKey, RunPhase, TickInput, aggregate, steer,
        tick,
    };
    use neon_dodge::{BestScore, RunSummary, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        best: BestScore,
        settings: Settings,
        effects: FrameEffects,
        render_state: Option<RenderState>,
        keys: HeldKeys,
        joystick: Joystick,
        /// Edge inputs (dash, pause) gathered since the last frame
        pending: TickInput,
        last_time: f64,
        /// Idle/demo mode - autopilot plays the game
        autopilot: bool,
        /// Summary of the last finished run
        summary: Option<RunSummary>,
    }

    impl Game {
        fn new(width: f32, height: f32) -> Self {
            Self {
                state: GameState::new(time_seed(), width, height),
                best: BestScore::load(),
                settings: Settings::load(),
                effects: FrameEffects::new(),
                render_state: None,
                keys: HeldKeys::default(),
                joystick: Joystick::default(),
                pending: TickInput::default(),
                last_time: 0.0,
                autopilot: false,
                summary: None,
            }
        }

        /// Start a fresh run (start button, retry, restart, `r`)
        fn restart(&mut self) {
            self.state.restart(time_seed());
            self.effects.clear();
            self.pending = TickInput::default();
            self.summary = None;
        }

        /// Advance one animation frame
        fn update(&mut self, dt: f32) {
            let mut input = TickInput {
                dash: self.pending.dash,
                pause: self.pending.pause,
                ..TickInput::from_devices(&self.keys, self.joystick.vector())
            };
            if self.autopilot {
                let steering = steer(&self.state);
                input.direction = aggregate(&HeldKeys::default(), steering.direction);
                input.dash |= steering.dash;
            }

            tick(&mut self.state, &input, dt);
            self.pending = TickInput::default();

            let events: Vec<GameEvent> = self.state.drain_events().collect();
            for event in events {
                match event {
                    GameEvent::DashStarted => self.effects.trigger_pulse(),
                    GameEvent::RunEnded => self.finish_run(),
                    _ => {}
                }
            }

            if self.state.is_running() {
                self.effects.record(&self.state);
            }
            self.effects.update(dt);
        }

        fn finish_run(&mut self) {
            let summary = RunSummary::record(&self.state, &mut self.best);
            if summary.new_best {
                self.best.save();
            }
            self.summary = Some(summary);
        }

        /// Render the current frame
        fn render(&mut self) {
            // The grid scrolls with run time, so it freezes while paused
            let time_ms = f64::from(self.state.elapsed) * 1000.0;
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_frame(&self.state, &self.settings, &self.effects, time_ms);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            set_text(document, "score", &self.state.display_score().to_string());
            set_text(document, "level", &self.state.level.to_string());
            set_text(document, "best", &self.best.value.to_string());

            let phase = self.state.phase;
            set_disabled(document, "pauseBtn", phase != RunPhase::Running);
            set_disabled(document, "resumeBtn", phase != RunPhase::Paused);
            set_display(document, "startOverlay", phase == RunPhase::Idle, "grid");
            set_display(document, "gameOver", phase == RunPhase::Ended, "grid");

            if let Some(summary) = &self.summary {
                set_text(document, "summary", &summary.line());
            }
        }

        /// Size the canvas to its container and follow with sim and surface
        fn fit_canvas(&mut self, canvas: &HtmlCanvasElement) {
            let Some(parent) = canvas.parent_element() else {
                return;
            };
            let rect = parent.get_bounding_client_rect();
            let (w, h) = (rect.width().floor().max(1.0), rect.height().floor().max(1.0));
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
            self.state.resize(w as f32, h as f32);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(w as u32, h as u32, (w as f32, h as f32));
            }
        }
    }

    fn element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_disabled(document: &Document, id: &str, disabled: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if disabled {
                el.set_attribute("disabled", "")
            } else {
                el.remove_attribute("disabled")
            };
        }
    }

    fn set_display(document: &Document, id: &str, visible: bool, display: &str) {
        if let Some(el) = element(document, id) {
            let value = if visible { display } else { "none" };
            let _ = el.style().set_property("display", value);
        }
    }

    /// Register a click handler on an element by id
    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(el) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handler();
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    async fn init_renderer(canvas: &HtmlCanvasElement) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (w, h) = (canvas.width(), canvas.height());
        match RenderState::new(surface, &adapter, w, h, (w as f32, h as f32)).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Neon Dodge starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .ok_or("no #game canvas")?
            .dyn_into()?;

        let game = Rc::new(RefCell::new(Game::new(
            canvas.width() as f32,
            canvas.height() as f32,
        )));
        game.borrow_mut().fit_canvas(&canvas);

        // Rendering is optional: without WebGPU the HUD still works
        let render_state = init_renderer(&canvas).await;
        if render_state.is_none() {
            log::warn!("WebGPU unavailable, running without canvas rendering");
        }
        game.borrow_mut().render_state = render_state;

        setup_keyboard(game.clone())?;
        setup_joystick(&document, game.clone())?;
        setup_buttons(&document, game.clone());
        setup_resize(&canvas, game.clone())?;
        setup_auto_pause(&document, game.clone())?;

        game.borrow().update_hud(&document);
        request_animation_frame(game);

        log::info!("Neon Dodge running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(key) = MoveKey::from_key(&event.key()) {
                    g.keys.press(key);
                    event.prevent_default();
                }
                if event.code() == "Space" {
                    g.pending.dash = true;
                    event.prevent_default();
                }
                match event.key().to_ascii_lowercase().as_str() {
                    "p" => g.pending.pause = true,
                    "r" => g.restart(),
                    "i" => {
                        g.autopilot = !g.autopilot;
                        log::info!("Autopilot: {}", g.autopilot);
                    }
                    "m" => {
                        g.settings.reduced_motion = !g.settings.reduced_motion;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(key) = MoveKey::from_key(&event.key()) {
                game.borrow_mut().keys.release(key);
            }
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
    }

    /// Pointer offset from the pad centre, plus the pad radius
    fn joystick_offset(pad: &HtmlElement, event: &PointerEvent) -> (Vec2, f32) {
        let rect = pad.get_bounding_client_rect();
        let center = Vec2::new(
            (rect.left() + rect.width() / 2.0) as f32,
            (rect.top() + rect.height() / 2.0) as f32,
        );
        let point = Vec2::new(event.client_x() as f32, event.client_y() as f32);
        (point - center, rect.width() as f32 / 2.0)
    }

    fn move_stick(document: &Document, joystick: &Joystick) {
        if let Some(stick) = element(document, "stick") {
            let style = stick.style();
            if joystick.is_active() {
                let offset = joystick.offset();
                let _ = style.set_property(
                    "transform",
                    &format!("translate({}px, {}px)", offset.x, offset.y),
                );
                let _ = style.set_property("left", "50%");
                let _ = style.set_property("top", "50%");
            } else {
                let _ = style.set_property("transform", "translate(-50%, -50%)");
            }
        }
    }

    fn setup_joystick(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let Some(pad) = element(document, "joystick") else {
            log::info!("No joystick element, touch steering disabled");
            return Ok(());
        };

        for (event_name, starts) in [("pointerdown", true), ("pointermove", false)] {
            let game = game.clone();
            let pad_clone = pad.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let (offset, radius) = joystick_offset(&pad_clone, &event);
                let mut g = game.borrow_mut();
                if starts {
                    g.joystick.begin(offset, radius);
                    event.prevent_default();
                } else {
                    g.joystick.move_to(offset, radius);
                }
                move_stick(&document, &g.joystick);
            });
            pad.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let window = web_sys::window().ok_or("no window")?;
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
            let mut g = game.borrow_mut();
            g.joystick.end();
            move_stick(&document, &g.joystick);
        });
        window.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["startBtn", "restartBtn", "retryBtn"] {
            let game = game.clone();
            on_click(document, id, move || game.borrow_mut().restart());
        }

        {
            let game = game.clone();
            on_click(document, "pauseBtn", move || game.borrow_mut().state.pause());
        }
        {
            let game = game.clone();
            on_click(document, "resumeBtn", move || game.borrow_mut().state.resume());
        }
        {
            let game = game.clone();
            on_click(document, "dashBtn", move || game.borrow_mut().pending.dash = true);
        }

        let document_clone = document.clone();
        on_click(document, "shareBtn", move || {
            let score = game
                .borrow()
                .summary
                .map(|s| s.score)
                .unwrap_or_else(|| game.borrow().state.display_score());
            share(document_clone.clone(), neon_dodge::summary::share_text(score));
        });
    }

    /// Copy the share text, falling back to an alert
    fn share(document: Document, text: String) {
        wasm_bindgen_futures::spawn_local(async move {
            let Some(window) = web_sys::window() else {
                return;
            };
            let promise = window.navigator().clipboard().write_text(&text);
            match wasm_bindgen_futures::JsFuture::from(promise).await {
                Ok(_) => {
                    set_text(&document, "shareBtn", "Copied!");
                    let reset = Closure::once_into_js(move || {
                        set_text(&document, "shareBtn", "Share");
                    });
                    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                        reset.unchecked_ref(),
                        1200,
                    );
                }
                Err(e) => {
                    log::warn!("Clipboard write failed: {:?}", e);
                    let _ = window.alert_with_message(&text);
                }
            }
        });
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().fit_canvas(&canvas);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.is_running() {
                        g.state.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside): held keys would otherwise stick
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            g.keys.clear();
            if g.state.is_running() {
                g.state.pause();
                log::info!("Auto-paused (window blur)");
            }
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
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

            // The simulation clamps dt; the first frame advances nothing
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use neon_dodge::platform::time_seed;
    use neon_dodge::sim::{GameEvent, GameState, HeldKeys, RunPhase, TickInput, aggregate, steer, tick};
    use neon_dodge::{BestScore, RunSummary, Tuning};

    /// Play Neon Dodge without a window and report how the runs went
    #[derive(Parser, Debug)]
    #[command(name = "neon-dodge", version)]
    pub struct Args {
        /// Seed of the first run (defaults to the clock)
        #[arg(long)]
        pub seed: Option<u64>,
        /// Number of runs; each uses the next seed
        #[arg(long, default_value_t = 1)]
        pub runs: u32,
        /// Cap on simulated seconds per run
        #[arg(long, default_value_t = 120.0)]
        pub seconds: f32,
        /// Frame delta in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        pub dt: f32,
        /// Arena width in px
        #[arg(long, default_value_t = 800.0)]
        pub width: f32,
        /// Arena height in px
        #[arg(long, default_value_t = 600.0)]
        pub height: f32,
        /// Dodge with the autopilot instead of standing still
        #[arg(long)]
        pub autopilot: bool,
        /// JSON file with tuning overrides
        #[arg(long)]
        pub tuning: Option<PathBuf>,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Cannot read tuning file {}: {}", path.display(), e);
                return Tuning::default();
            }
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::error!("Invalid tuning file {}: {}", path.display(), e);
                Tuning::default()
            }
        }
    }

    /// Play one run to its end or the time cap
    fn play(args: &Args, seed: u64, tuning: &Tuning) -> (GameState, u32) {
        let mut state = GameState::with_tuning(seed, args.width, args.height, tuning.clone());
        state.start();

        let dt = neon_dodge::clamp_frame_dt(args.dt).max(0.001);
        let frames = (args.seconds.max(0.0) / dt).ceil() as u64;
        let mut dashes = 0;

        for _ in 0..frames {
            let input = if args.autopilot {
                let steering = steer(&state);
                TickInput {
                    direction: aggregate(&HeldKeys::default(), steering.direction),
                    dash: steering.dash,
                    pause: false,
                }
            } else {
                TickInput::default()
            };

            tick(&mut state, &input, dt);
            dashes += state
                .drain_events()
                .filter(|e| *e == GameEvent::DashStarted)
                .count() as u32;

            if state.phase == RunPhase::Ended {
                break;
            }
        }

        (state, dashes)
    }

    pub fn run(args: Args) {
        let tuning = load_tuning(args.tuning.as_ref());
        let first_seed = args.seed.unwrap_or_else(time_seed);
        let mut best = BestScore::load();

        for i in 0..args.runs {
            let seed = first_seed.wrapping_add(i as u64);
            let (state, dashes) = play(&args, seed, &tuning);
            let summary = RunSummary::record(&state, &mut best);
            let outcome = if state.phase == RunPhase::Ended {
                "hit"
            } else {
                "survived"
            };
            println!(
                "seed {:>20}  {:<8} {:>6.1}s  {} dashes  {}",
                seed,
                outcome,
                state.elapsed,
                dashes,
                summary.line()
            );
        }

        best.save();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Neon Dodge (native) starting...");
    headless::run(headless::Args::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
