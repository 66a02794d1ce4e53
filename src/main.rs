//! Egg Clicker entry point
//!
//! Wires the page's DOM to the sim on the web; runs a headless demo natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement};

    use egg_clicker::audio::AudioManager;
    use egg_clicker::consts::MAX_FRAME_DT;
    use egg_clicker::sim::{self, ClickerState, GameEvent, ParticleView, TickOutput};
    use egg_clicker::settings::QualityPreset;
    use egg_clicker::{Settings, Tuning};

    /// Seconds the shake/bounce classes stay on after a tap
    const SHAKE_DURATION: f32 = 1.2;
    /// Halo diameter relative to the larger window dimension
    const HALO_SCALE: f64 = 1.4;

    fn add_class(el: &HtmlElement, class: &str) {
        let _ = el.class_list().add_1(class);
    }

    fn remove_class(el: &HtmlElement, class: &str) {
        let _ = el.class_list().remove_1(class);
    }

    fn set_style(el: &HtmlElement, property: &str, value: &str) {
        let _ = el.style().set_property(property, value);
    }

    /// DOM nodes the clicker drives
    struct Elements {
        document: Document,
        clicker: HtmlElement,
        clicker_top: HtmlElement,
        clicker_bottom: HtmlElement,
        particles: HtmlElement,
        reward: HtmlElement,
        halo: HtmlElement,
    }

    impl Elements {
        fn query(document: &Document) -> Option<Self> {
            let get = |selector: &str| -> Option<HtmlElement> {
                let el = document.query_selector(selector).ok()??;
                el.dyn_into().ok()
            };
            Some(Self {
                document: document.clone(),
                clicker: get(".clicker")?,
                clicker_top: get(".clicker__shell--top")?,
                clicker_bottom: get(".clicker__shell--bottom")?,
                particles: get(".particles-container")?,
                reward: get(".clicker__reward")?,
                halo: get(".halo")?,
            })
        }
    }

    /// Game instance holding all state
    struct Game {
        state: ClickerState,
        settings: Settings,
        audio: AudioManager,
        el: Elements,
        /// Particle divs keyed by particle id
        particle_nodes: HashMap<u32, HtmlElement>,
        last_time: f64,
        /// Shake classes go on next frame so the CSS animation restarts
        shake_pending: bool,
        shake_timer: f32,
    }

    impl Game {
        fn new(state: ClickerState, settings: Settings, el: Elements) -> Self {
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());

            set_style(&el.clicker_top, "background-image", "url('assets/images/shell-top-egg.png')");
            set_style(
                &el.clicker_bottom,
                "background-image",
                "url('assets/images/shell-bottom-egg.png')",
            );
            add_class(&el.clicker, "clickable");

            Self {
                state,
                settings,
                audio,
                el,
                particle_nodes: HashMap::new(),
                last_time: 0.0,
                shake_pending: false,
                shake_timer: 0.0,
            }
        }

        /// Tap on the shell
        fn tap_shell(&mut self) {
            if !self.state.progression.phase.accepts_taps() {
                return;
            }

            let interaction = sim::register_interaction(&mut self.state);
            self.remove_animation_classes();

            let count = self.settings.particle_count(interaction.particles_to_spawn);
            for view in sim::spawn(&mut self.state, count) {
                self.create_particle_node(&view);
            }

            if !interaction.shell_opened && !self.settings.reduced_motion {
                self.shake_pending = true;
            }

            self.handle_events();
        }

        /// Tap on the revealed reward
        fn tap_reward(&mut self) {
            if sim::click_reward(&mut self.state) {
                self.handle_events();
            }
        }

        /// Advance one display frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;
            let dt = dt.clamp(0.0, MAX_FRAME_DT);

            if self.shake_pending {
                self.shake_pending = false;
                self.add_animation_classes();
                self.shake_timer = SHAKE_DURATION;
            } else if self.shake_timer > 0.0 {
                self.shake_timer -= dt;
                if self.shake_timer <= 0.0 {
                    self.remove_animation_classes();
                }
            }

            match sim::tick(&mut self.state, dt) {
                Ok(out) => self.apply_particles(out),
                Err(e) => {
                    log::error!("Tick failed: {}", e);
                    self.sync_particles();
                }
            }
            self.handle_events();
        }

        fn create_particle_node(&mut self, view: &ParticleView) {
            let Ok(node) = self.el.document.create_element("div") else {
                return;
            };
            let Ok(node) = node.dyn_into::<HtmlElement>() else {
                return;
            };
            add_class(&node, "particle");
            set_style(&node, "transform", &view.css_transform());
            let _ = self.el.particles.append_child(&node);
            self.particle_nodes.insert(view.id, node);
        }

        fn apply_particles(&mut self, out: TickOutput) {
            for id in out.expired {
                if let Some(node) = self.particle_nodes.remove(&id) {
                    node.remove();
                }
            }
            for view in &out.live {
                if let Some(node) = self.particle_nodes.get(&view.id) {
                    set_style(node, "transform", &view.css_transform());
                }
            }
        }

        /// Sync divs straight from the engine when a tick returned no output
        fn sync_particles(&mut self) {
            let alive: HashSet<u32> = self.state.particles.particles().iter().map(|p| p.id).collect();
            self.particle_nodes.retain(|id, node| {
                let keep = alive.contains(id);
                if !keep {
                    node.remove();
                }
                keep
            });
            for particle in self.state.particles.particles() {
                if let Some(node) = self.particle_nodes.get(&particle.id) {
                    set_style(node, "transform", &particle.view().css_transform());
                }
            }
        }

        /// Reflect queued sim events in the DOM and play their cues
        fn handle_events(&mut self) {
            let events = self.state.drain_events();
            let el = &self.el;

            for event in &events {
                match event {
                    GameEvent::RewardSelected(selection) => match &selection.reward {
                        Some(reward) => {
                            set_style(
                                &el.reward,
                                "background-image",
                                &format!("url('assets/images/reward-{}.png')", reward.name),
                            );
                            set_style(
                                &el.halo,
                                "background-image",
                                &format!("url('assets/images/halo-{}.png')", reward.rarity),
                            );
                        }
                        None => {
                            set_style(&el.reward, "background-image", "none");
                            set_style(&el.halo, "background-image", "none");
                        }
                    },
                    GameEvent::Tap { .. } => {}
                    GameEvent::ShellOpened { .. } => {
                        add_class(&el.clicker, "clicker--open");
                        remove_class(&el.clicker, "clickable");
                    }
                    GameEvent::RewardShown { .. } => {
                        add_class(&el.reward, "animation--bounce-appear");
                    }
                    GameEvent::RewardClickable => {
                        remove_class(&el.reward, "animation--bounce-appear");
                        add_class(&el.reward, "animation--attention");
                        add_class(&el.reward, "clickable");
                    }
                    GameEvent::ShellClosing => {
                        remove_class(&el.reward, "animation--attention");
                        remove_class(&el.reward, "clickable");
                        add_class(&el.reward, "animation--evaporate");
                    }
                    GameEvent::ShellClosed => {
                        add_class(&el.clicker, "animation--bounce-appear");
                        remove_class(&el.clicker, "clicker--open");
                    }
                    GameEvent::ShellReady => {
                        remove_class(&el.reward, "animation--evaporate");
                        remove_class(&el.clicker, "animation--bounce-appear");
                        add_class(&el.clicker, "clickable");
                    }
                }
            }

            for cue in sim::audio_cues(&self.state, &events) {
                self.audio.play(cue);
            }
        }

        fn add_animation_classes(&self) {
            add_class(&self.el.clicker, "animation--shake");
            add_class(&self.el.clicker_top, "animation--bounce-up");
            add_class(&self.el.clicker_bottom, "animation--bounce-down");
        }

        fn remove_animation_classes(&mut self) {
            self.shake_timer = 0.0;
            remove_class(&self.el.clicker, "animation--shake");
            remove_class(&self.el.clicker_top, "animation--bounce-up");
            remove_class(&self.el.clicker_bottom, "animation--bounce-down");
            remove_class(&self.el.clicker, "animation--bounce-appear");
        }

        fn resize_halo(&self) {
            let Some(window) = web_sys::window() else { return };
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let size = format!("{}px", w.max(h) * HALO_SCALE);
            set_style(&self.el.halo, "width", &size);
            set_style(&self.el.halo, "height", &size);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Egg Clicker starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let Some(elements) = Elements::query(&document) else {
            log::error!("Clicker markup missing, nothing to do");
            return;
        };

        // Variant comes from <div class="clicker" data-variant="duo">
        let variant = elements
            .clicker
            .get_attribute("data-variant")
            .unwrap_or_else(|| "egg".to_string());
        let tuning = Tuning::preset(&variant).unwrap_or_else(|| {
            log::warn!("Unknown variant '{}', using egg", variant);
            Tuning::egg()
        });

        let seed = js_sys::Date::now() as u64;
        let state = match ClickerState::new(seed, tuning) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Failed to start: {}", e);
                return;
            }
        };
        log::info!("Game initialized with seed: {} ({})", seed, variant);

        // Markup may override stored preferences, e.g. data-quality="low"
        let mut settings = Settings::load();
        let mut overridden = false;
        if let Some(quality) = elements
            .clicker
            .get_attribute("data-quality")
            .and_then(|q| QualityPreset::parse(&q))
        {
            settings.quality = quality;
            overridden = true;
        }
        if elements.clicker.has_attribute("data-muted") {
            settings.muted = true;
            overridden = true;
        }
        if overridden {
            settings.save();
        }
        log::info!("Particle quality: {}", settings.quality.as_str());

        let game = Rc::new(RefCell::new(Game::new(state, settings, elements)));
        {
            let mut g = game.borrow_mut();
            g.resize_halo();
            g.handle_events();
        }

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Egg Clicker running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let (clicker, reward) = {
            let g = game.borrow();
            (g.el.clicker.clone(), g.el.reward.clone())
        };

        for event_name in ["mousedown", "touchstart"] {
            // Shell taps
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    game.borrow_mut().tap_shell();
                });
                let _ = clicker
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }

            // Reward taps must not also count as shell taps
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.stop_propagation();
                    game.borrow_mut().tap_reward();
                });
                let _ = reward
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Halo follows the window size
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow().resize_halo();
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
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
        game.borrow_mut().update(time);
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
    log::info!("Egg Clicker (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let variant = std::env::args().nth(1).unwrap_or_else(|| "egg".to_string());
    let Some(tuning) = egg_clicker::Tuning::preset(&variant) else {
        eprintln!("unknown variant '{}' (expected egg, duo or shell-only)", variant);
        std::process::exit(2);
    };

    if let Err(e) = run_demo(0xE66, tuning) {
        eprintln!("demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Tap through two simulated minutes at 60 Hz and report what hatched
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(seed: u64, tuning: egg_clicker::Tuning) -> egg_clicker::Result<()> {
    use std::collections::BTreeMap;

    use egg_clicker::sim::{self, ClickerState, GameEvent, ShellPhase};
    use egg_clicker::Settings;

    const FRAME_DT: f32 = 1.0 / 60.0;
    const FRAMES: u32 = 120 * 60;
    /// Frames between simulated taps
    const TAP_EVERY: u32 = 15;

    let settings = Settings::default();
    let mut state = ClickerState::new(seed, tuning)?;
    let mut hatched: BTreeMap<String, u32> = BTreeMap::new();
    let mut peak_particles = 0;

    for frame in 0..FRAMES {
        if frame % TAP_EVERY == 0 {
            match state.progression.phase {
                ShellPhase::Closed => {
                    let interaction = sim::register_interaction(&mut state);
                    let count = settings.particle_count(interaction.particles_to_spawn);
                    sim::spawn(&mut state, count);
                }
                ShellPhase::Revealed => {
                    sim::click_reward(&mut state);
                }
                _ => {}
            }
        }

        let out = sim::tick(&mut state, FRAME_DT)?;
        peak_particles = peak_particles.max(out.live.len());

        for event in state.drain_events() {
            if let GameEvent::RewardShown { reward } = event {
                let name = sim::state::reward_name(&reward).to_string();
                *hatched.entry(name).or_default() += 1;
            }
        }
    }

    println!("\nHatched in {} simulated seconds:", FRAMES / 60);
    for (name, count) in &hatched {
        println!("  {:<16} {}", name, count);
    }
    println!("Peak live particles: {}", peak_particles);
    Ok(())
}
