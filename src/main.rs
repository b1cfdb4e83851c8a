//! Obby Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent, WheelEvent};

    use glam::Vec3;
    use obby_rush::audio::AudioManager;
    use obby_rush::consts::MAX_FRAME_DT;
    use obby_rush::input::{InputSampler, TouchZones};
    use obby_rush::leaderboard::{
        self, LeaderboardEntry, LeaderboardStore, MemoryStore, QueryOptions,
    };
    use obby_rush::scene::{SceneObject, SceneSink};
    use obby_rush::sim::{
        CameraPose, GameEvent, Level, OrbitCamera, Session, SessionPhase, tick,
    };
    use obby_rush::Settings;

    /// Scene sink that forwards transforms to an optional JS hook
    /// (`window.obbyScene(kind, index, x, y, z, yaw, visible)`). Without the
    /// hook every write is discarded; the simulation does not care.
    struct JsSceneSink {
        hook: Option<js_sys::Function>,
    }

    impl JsSceneSink {
        fn new() -> Self {
            let hook = web_sys::window()
                .and_then(|w| {
                    js_sys::Reflect::get(&w, &JsValue::from_str("obbyScene")).ok()
                })
                .and_then(|v| v.dyn_into::<js_sys::Function>().ok());
            if hook.is_none() {
                log::info!("no window.obbyScene hook, scene writes discarded");
            }
            Self { hook }
        }

        fn emit(&self, kind: &str, index: f64, pos: Vec3, yaw: f32, visible: bool) {
            let Some(hook) = &self.hook else { return };
            let args = js_sys::Array::new();
            args.push(&JsValue::from_str(kind));
            args.push(&JsValue::from_f64(index));
            args.push(&JsValue::from_f64(pos.x as f64));
            args.push(&JsValue::from_f64(pos.y as f64));
            args.push(&JsValue::from_f64(pos.z as f64));
            args.push(&JsValue::from_f64(yaw as f64));
            args.push(&JsValue::from_bool(visible));
            let _ = hook.apply(&JsValue::NULL, &args);
        }
    }

    impl SceneSink for JsSceneSink {
        fn set_transform(&mut self, object: SceneObject, position: Vec3, yaw: f32) {
            let (kind, index) = describe(object);
            self.emit(kind, index, position, yaw, true);
        }

        fn set_visible(&mut self, object: SceneObject, visible: bool) {
            let (kind, index) = describe(object);
            self.emit(&format!("{kind}:visible"), index, Vec3::ZERO, 0.0, visible);
        }

        fn set_camera(&mut self, pose: CameraPose) {
            self.emit("camera", 0.0, pose.eye, 0.0, true);
            self.emit("look", 0.0, pose.look_at, 0.0, true);
        }
    }

    fn describe(object: SceneObject) -> (&'static str, f64) {
        match object {
            SceneObject::Player => ("player", 0.0),
            SceneObject::Platform(i) => ("platform", i as f64),
            SceneObject::Obstacle(i) => ("obstacle", i as f64),
            SceneObject::Pickup(id) => ("pickup", id as f64),
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        camera: OrbitCamera,
        sampler: InputSampler,
        zones: TouchZones,
        audio: AudioManager,
        settings: Settings,
        scene: JsSceneSink,
        scores: MemoryStore,
        last_time: f64,
        last_phase: SessionPhase,
        /// Handle of the 1 Hz countdown interval while Playing
        interval_id: Option<i32>,
        // Pointer state
        mouse_dragging: bool,
        joystick_touch: Option<i32>,
        jump_touch: Option<i32>,
        camera_touch: Option<(i32, f32, f32)>,
        /// Second free touch; two free touches pinch-zoom instead of orbiting
        pinch_touch: Option<(i32, f32, f32)>,
        last_pinch_dist: Option<f32>,
        last_mouse: (f32, f32),
        muted_by_blur: bool,
    }

    impl Game {
        fn new() -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            let (width, height) = viewport_size();
            Self {
                session: Session::new(),
                camera: OrbitCamera::new(),
                sampler: InputSampler::default(),
                zones: TouchZones::new(width, height),
                audio,
                settings,
                scene: JsSceneSink::new(),
                scores: MemoryStore::new(),
                last_time: 0.0,
                last_phase: SessionPhase::Menu,
                interval_id: None,
                mouse_dragging: false,
                joystick_touch: None,
                jump_touch: None,
                camera_touch: None,
                pinch_touch: None,
                last_pinch_dist: None,
                last_mouse: (0.0, 0.0),
                muted_by_blur: false,
            }
        }

        /// One animation frame: sample input, advance the sim, trail the
        /// camera, write the scene, refresh the HUD.
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(MAX_FRAME_DT)
            } else {
                1.0 / 60.0
            };
            self.last_time = time;

            let input = self.sampler.sample();
            let events = tick(&mut self.session, &input, dt);
            self.audio.play_events(&events);
            for event in &events {
                if *event == GameEvent::Won {
                    self.save_score();
                }
            }

            let pose = self.camera.update(self.session.player.position);
            obby_rush::scene::sync(&self.session, pose, &mut self.scene);
            self.update_hud();
        }

        fn start_level(&mut self, level: Level) {
            self.audio.resume();
            self.session.start(level);
            self.camera = OrbitCamera::new();
            self.sampler = InputSampler::default();
        }

        /// Record the finished run locally and log the standings. The hosted
        /// store is not wired in this build, so the local store doubles as
        /// the fallback target.
        fn save_score(&mut self) {
            let score =
                u32::from(self.session.lives) * 100 + 600u32.saturating_sub(self.session.elapsed_secs);
            let entry = LeaderboardEntry {
                player_name: leaderboard::sanitize_name(&player_name()),
                leadership_score: score,
                choices: vec![format!("level-{}", self.session.level.index())],
                created_at: js_sys::Date::now(),
            };
            if self.scores.insert(entry).is_ok() {
                if let Ok(rows) = self.scores.query(QueryOptions::default()) {
                    log::info!("local leaderboard: {} entries", rows.len());
                }
            }
        }

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-lives") {
                el.set_text_content(Some(&self.session.lives.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-time") {
                el.set_text_content(Some(&self.session.format_elapsed()));
            }
            if let Some(el) = document.get_element_by_id("hud-level") {
                el.set_text_content(Some(&format!(
                    "Level {} - {}",
                    self.session.level.index(),
                    self.session.level.name()
                )));
            }
            if let Some(el) = document.get_element_by_id("hud-powers") {
                let powers: Vec<String> = self
                    .session
                    .powers
                    .iter()
                    .map(|p| format!("{} {}s", p.kind.name(), p.remaining_secs))
                    .collect();
                el.set_text_content(Some(&powers.join("  ")));
            }
            if let Some(el) = document.get_element_by_id("hud-best") {
                if let Some(top) = self.scores.top_score() {
                    el.set_text_content(Some(&format!("Best {top}")));
                }
            }

            // Phase overlays
            set_overlay(&document, "menu-screen", self.session.phase == SessionPhase::Menu);
            set_overlay(&document, "win-screen", self.session.phase == SessionPhase::Won);
            set_overlay(&document, "lose-screen", self.session.phase == SessionPhase::Lost);
        }
    }

    fn set_overlay(document: &web_sys::Document, id: &str, shown: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let class = if shown { "overlay" } else { "overlay hidden" };
            let _ = el.set_attribute("class", class);
        }
    }

    fn viewport_size() -> (f32, f32) {
        let window = web_sys::window().expect("no window");
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1280.0) as f32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(720.0) as f32;
        (width, height)
    }

    fn player_name() -> String {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("player-name"))
            .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Obby Rush starting");

        let game = Rc::new(RefCell::new(Game::new()));

        setup_keyboard(game.clone());
        setup_mouse(game.clone());
        setup_touch(game.clone());
        setup_buttons(game.clone());
        setup_focus(game.clone());

        request_animation_frame(game);
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.sampler.keys.apply(&event.key(), true) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.sampler.keys.apply(&event.key(), false) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mouse(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.mouse_dragging = true;
                g.last_mouse = (event.client_x() as f32, event.client_y() as f32);
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if !g.mouse_dragging {
                    return;
                }
                let (x, y) = (event.client_x() as f32, event.client_y() as f32);
                let (sx, sy) = g.settings.camera_drag_scale();
                let (lx, ly) = g.last_mouse;
                g.camera.drag((x - lx) * sx, (y - ly) * sy);
                g.last_mouse = (x, y);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().mouse_dragging = false;
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                game.borrow_mut().camera.zoom(event.delta_y() as f32);
            });
            let _ = window
                .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.item(i) else { continue };
                    let (id, x, y) = (
                        touch.identifier(),
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    // Controls claim their hot-zones; everything else is a
                    // camera drag
                    let zones = g.zones;
                    if g.joystick_touch.is_none() && g.sampler.stick.press(&zones, x, y) {
                        g.joystick_touch = Some(id);
                    } else if g.jump_touch.is_none() && zones.in_jump(x, y) {
                        g.jump_touch = Some(id);
                        g.sampler.jump_held = true;
                    } else if g.camera_touch.is_none() {
                        g.camera_touch = Some((id, x, y));
                    } else if g.pinch_touch.is_none() {
                        g.pinch_touch = Some((id, x, y));
                        g.last_pinch_dist = None;
                    }
                }
                event.prevent_default();
            });
            let _ = window.add_event_listener_with_callback(
                "touchstart",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.item(i) else { continue };
                    let (id, x, y) = (
                        touch.identifier(),
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    if g.joystick_touch == Some(id) {
                        let zones = g.zones;
                        g.sampler.stick.update(&zones, x, y);
                    } else if let Some((cam_id, lx, ly)) = g.camera_touch {
                        if cam_id == id {
                            if g.pinch_touch.is_none() {
                                let (sx, sy) = g.settings.camera_drag_scale();
                                g.camera.drag((x - lx) * sx, (y - ly) * sy);
                            }
                            g.camera_touch = Some((id, x, y));
                        } else if g.pinch_touch.map(|(pid, _, _)| pid) == Some(id) {
                            g.pinch_touch = Some((id, x, y));
                        }
                    }
                    // Two free touches: spread change drives the zoom
                    if let (Some((_, ax, ay)), Some((_, bx, by))) = (g.camera_touch, g.pinch_touch)
                    {
                        let dist = (ax - bx).hypot(ay - by);
                        if let Some(prev) = g.last_pinch_dist {
                            g.camera.zoom((prev - dist) * 5.0);
                        }
                        g.last_pinch_dist = Some(dist);
                    }
                }
                event.prevent_default();
            });
            let _ = window.add_event_listener_with_callback(
                "touchmove",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.item(i) else { continue };
                    let id = touch.identifier();
                    if g.joystick_touch == Some(id) {
                        g.joystick_touch = None;
                        g.sampler.stick.release();
                    }
                    if g.jump_touch == Some(id) {
                        g.jump_touch = None;
                        g.sampler.jump_held = false;
                    }
                    if g.camera_touch.map(|(cam_id, _, _)| cam_id) == Some(id) {
                        g.camera_touch = None;
                        g.pinch_touch = None;
                        g.last_pinch_dist = None;
                    }
                    if g.pinch_touch.map(|(pid, _, _)| pid) == Some(id) {
                        g.pinch_touch = None;
                        g.last_pinch_dist = None;
                    }
                }
            });
            for kind in ["touchend", "touchcancel"] {
                let _ = window
                    .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        for (id, level) in [
            ("level-easy-btn", Level::Easy),
            ("level-medium-btn", Level::Medium),
            ("level-hard-btn", Level::Hard),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start_level(level);
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.to_menu();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("replay-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let level = game.borrow().session.level;
                game.borrow_mut().start_level(level);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("next-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let next = game.borrow().session.level.next();
                if let Some(level) = next {
                    game.borrow_mut().start_level(level);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.toggle_muted();
                g.settings.muted = g.audio.is_muted();
                g.settings.save();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur && !g.audio.is_muted() {
                    g.audio.set_muted(true);
                    g.muted_by_blur = true;
                }
                // Drop held inputs so nothing sticks across the blur
                g.sampler = InputSampler::default();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.muted_by_blur {
                    g.audio.set_muted(false);
                    g.muted_by_blur = false;
                }
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Start the 1 Hz countdown interval. Runs independently of the frame
    /// loop; slight drift between the two domains is expected.
    fn start_second_interval(game: Rc<RefCell<Game>>) -> Option<i32> {
        let window = web_sys::window()?;
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = game.borrow_mut();
            let events = g.session.second_tick();
            g.audio.play_events(&events);
        });
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                1000,
            )
            .ok();
        closure.forget();
        id
    }

    fn stop_second_interval(id: i32) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(id);
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
            g.frame(time);
        }

        // Phase transitions own the countdown interval: started on entering
        // Playing, torn down on leaving so countdowns never fire against a
        // stale session
        let (phase, last_phase) = {
            let g = game.borrow();
            (g.session.phase, g.last_phase)
        };
        if phase != last_phase {
            if last_phase == SessionPhase::Playing {
                if let Some(id) = game.borrow_mut().interval_id.take() {
                    stop_second_interval(id);
                }
            }
            if phase == SessionPhase::Playing {
                let id = start_second_interval(game.clone());
                game.borrow_mut().interval_id = id;
            }
            game.borrow_mut().last_phase = phase;
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
    use obby_rush::consts::MAX_FRAME_DT;
    use obby_rush::scene::{NullSink, sync};
    use obby_rush::sim::{Level, OrbitCamera, Session, SessionPhase, TickInput, tick};

    env_logger::init();
    log::info!("Obby Rush (native) starting - headless scripted run");

    // Drive a straight sprint through the easy level to exercise the full
    // loop without a browser
    let mut session = Session::new();
    session.start(Level::Easy);
    let mut camera = OrbitCamera::new();
    let mut sink = NullSink;

    let forward = TickInput {
        dir_z: -1.0,
        jump: false,
        ..Default::default()
    };
    let mut frames = 0u32;
    while session.phase == SessionPhase::Playing && frames < 20_000 {
        let events = tick(&mut session, &forward, MAX_FRAME_DT);
        for event in events {
            log::info!("event: {event:?}");
        }
        // The 1 Hz domain, approximated every 30 frames at this fixed dt
        if frames % 30 == 0 {
            session.second_tick();
        }
        let pose = camera.update(session.player.position);
        sync(&session, pose, &mut sink);
        frames += 1;
    }

    log::info!(
        "run finished: phase={:?} lives={} time={}",
        session.phase,
        session.lives,
        session.format_elapsed()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
