//! Mining Rush entry point
//!
//! Handles platform-specific initialization and wires DOM events to the session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, KeyboardEvent, PointerEvent, TouchEvent};

    use mining_rush::platform::{WebScheduler, Wakeup};
    use mining_rush::sim::{Direction, SessionMode};
    use mining_rush::{AnalyticsEvent, GameOverSummary, LogSink, Session, Tuning};

    // Page-side renderer hooks: the sprite layer and the score-card composer
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            const hook = window.miningRush && window.miningRush.renderFrame;
            if (hook) { hook(JSON.parse(json)); }
        }

        export function show_score_card(json) {
            const hook = window.miningRush && window.miningRush.showScoreCard;
            if (hook) { hook(JSON.parse(json)); }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
        fn show_score_card(json: &str);
    }

    type WebSession = Session<WebScheduler, LogSink>;

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<WebSession>>>> = const { RefCell::new(None) };
    }

    fn with_game(f: impl FnOnce(&mut WebSession)) {
        GAME.with(|game| {
            if let Some(game) = game.borrow().as_ref() {
                f(&mut *game.borrow_mut());
            }
        });
    }

    /// Push the current HUD to the page
    fn update_hud(session: &WebSession) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
            el.set_text_content(Some(&session.state().score.to_string()));
        }
        if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
            el.set_text_content(Some(&"❤️".repeat(session.state().lives as usize)));
        }

        toggle_hidden(&document, "pause-menu", session.mode() != SessionMode::Paused);
        toggle_hidden(&document, "game-over", session.mode() != SessionMode::GameOver);
        toggle_hidden(&document, "start-prompt", session.mode() != SessionMode::Idle);

        match serde_json::to_string(&session.hud()) {
            Ok(json) => render_frame(&json),
            Err(e) => log::warn!("HUD encode failed: {}", e),
        }
    }

    fn toggle_hidden(document: &web_sys::Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn hand_off_game_over(summary: GameOverSummary) {
        match serde_json::to_string(&summary) {
            Ok(json) => show_score_card(&json),
            Err(e) => log::warn!("Score card encode failed: {}", e),
        }
    }

    /// Scheduler callback: advance the game and refresh the page
    fn on_wakeup(game: &Weak<RefCell<WebSession>>, wakeup: Wakeup) {
        let Some(game) = game.upgrade() else {
            return;
        };
        let mut g = game.borrow_mut();
        g.wake(wakeup);
        if wakeup == Wakeup::Frame {
            update_hud(&g);
            if let Some(summary) = g.take_game_over() {
                hand_off_game_over(summary);
            }
        }
    }

    /// Convert a client x coordinate to field percent
    fn client_to_percent(area: &Element, client_x: f64) -> Option<f32> {
        let rect = area.get_bounding_client_rect();
        if rect.width() <= 0.0 {
            return None;
        }
        Some(((client_x - rect.left()) / rect.width() * 100.0) as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mining Rush starting...");

        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::load();
        let game: Rc<RefCell<WebSession>> = Rc::new_cyclic(|weak: &Weak<RefCell<WebSession>>| {
            let weak = weak.clone();
            let scheduler = WebScheduler::new(move |wakeup| on_wakeup(&weak, wakeup));
            RefCell::new(Session::new(seed, tuning, scheduler, LogSink))
        });
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_game_area(game.clone());
        setup_direction_buttons(game.clone());
        setup_command_buttons(game.clone());
        setup_auto_pause(game.clone());

        update_hud(&game.borrow());
        log::info!("Mining Rush running!");
    }

    fn setup_keyboard(game: Rc<RefCell<WebSession>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if key == " " {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                g.key_down(&key);
                update_hud(&g);
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().key_up(&event.key());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_game_area(game: Rc<RefCell<WebSession>>) {
        let document = web_sys::window().and_then(|w| w.document()).expect("no document");
        let Some(area) = document.get_element_by_id("game-area") else {
            log::warn!("No #game-area element; pointer input disabled");
            return;
        };

        // Touch start/move: seek toward the finger
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let area_clone = area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if game.borrow().mode() != SessionMode::Playing {
                    return;
                }
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    if let Some(x) = client_to_percent(&area_clone, touch.client_x() as f64) {
                        game.borrow_mut().point_at_finger(x);
                    }
                }
            });
            let _ = area.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse/pen press and drag
        {
            let game = game.clone();
            let area_clone = area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.pointer_type() == "touch" {
                    return;
                }
                if event.type_() == "pointermove" && event.buttons() == 0 {
                    return;
                }
                if let Some(x) = client_to_percent(&area_clone, event.client_x() as f64) {
                    game.borrow_mut().point_at_finger(x);
                }
            });
            for name in ["pointerdown", "pointermove"] {
                let _ = area.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Lifting the finger drops the target
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().release_pointer();
            });
            for name in ["touchend", "touchcancel"] {
                let _ = area.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn setup_direction_buttons(game: Rc<RefCell<WebSession>>) {
        let document = web_sys::window().and_then(|w| w.document()).expect("no document");

        for (id, direction) in [("btn-left", Direction::Left), ("btn-right", Direction::Right)] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    game.borrow_mut().press_button(direction);
                });
                for name in ["pointerdown", "touchstart"] {
                    let _ = btn.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                }
                closure.forget();
            }

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    game.borrow_mut().release_button(direction);
                });
                for name in ["pointerup", "pointerleave", "touchend", "touchcancel"] {
                    let _ = btn.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                }
                closure.forget();
            }
        }
    }

    fn setup_command_buttons(game: Rc<RefCell<WebSession>>) {
        let document = web_sys::window().and_then(|w| w.document()).expect("no document");

        let commands: [(&str, fn(&mut WebSession)); 5] = [
            ("start-btn", |g| g.start()),
            ("restart-btn", |g| g.start()),
            ("pause-btn", |g| {
                g.toggle_pause();
            }),
            ("resume-btn", |g| g.resume()),
            ("character-btn", |g| g.open_character_selection()),
        ];

        for (id, command) in commands {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                command(&mut *g);
                update_hud(&g);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<WebSession>>) {
        let document = web_sys::window().and_then(|w| w.document()).expect("no document");

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.mode() == SessionMode::Playing {
                    g.pause();
                    update_hud(&g);
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    // === Page-facing commands (character gallery, share flow, header links) ===

    #[wasm_bindgen]
    pub fn select_character(id: &str) -> bool {
        let mut selected = false;
        with_game(|g| match g.select_character(id) {
            Ok(_) => selected = true,
            Err(e) => log::warn!("{}", e),
        });
        selected
    }

    /// Roster for the character gallery, as JSON
    #[wasm_bindgen]
    pub fn character_roster() -> String {
        let mut json = String::from("[]");
        with_game(|g| match g.roster().to_json() {
            Ok(encoded) => json = encoded,
            Err(e) => log::warn!("Roster encode failed: {}", e),
        });
        json
    }

    #[wasm_bindgen]
    pub fn how_to_play_opened() {
        with_game(|g| g.track(AnalyticsEvent::HowToPlayOpened));
    }

    #[wasm_bindgen]
    pub fn buy_gem_clicked(source: &str) {
        with_game(|g| {
            g.track(AnalyticsEvent::BuyGemClicked {
                source: source.to_string(),
            })
        });
    }

    #[wasm_bindgen]
    pub fn social_share(platform: &str) {
        with_game(|g| {
            let score = g.state().score;
            g.track(AnalyticsEvent::SocialShare {
                platform: platform.to_string(),
                score,
            });
        });
    }

    #[wasm_bindgen]
    pub fn image_action(action: &str) {
        with_game(|g| {
            let score = g.state().score;
            g.track(AnalyticsEvent::ImageAction {
                action: action.to_string(),
                score,
            });
        });
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
    log::info!("Mining Rush (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let summary = demo::autopilot(0x5eed, 60 * 60);
    println!(
        "Autopilot finished: score {}, lives {}, mode {:?}",
        summary.score, summary.lives, summary.mode
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use mining_rush::platform::{HeadlessScheduler, Wakeup};
    use mining_rush::sim::{EntityKind, SessionMode, SpawnTimer};
    use mining_rush::{LogSink, Session, Tuning};

    /// Display refresh period
    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub struct Outcome {
        pub score: u32,
        pub lives: u32,
        pub mode: SessionMode,
    }

    /// Play `frames` frames, steering toward the lowest gem on screen
    pub fn autopilot(seed: u64, frames: u32) -> Outcome {
        let tuning = Tuning::default();
        let scheduler = HeadlessScheduler::new();
        let mut session = Session::new(seed, tuning.clone(), scheduler.clone(), LogSink);
        session.start();

        let mut elapsed = [0.0f64; 2];
        for _ in 0..frames {
            if session.mode() != SessionMode::Playing {
                break;
            }
            scheduler.advance_clock(FRAME_MS);

            for (i, timer) in SpawnTimer::ALL.iter().enumerate() {
                elapsed[i] += FRAME_MS;
                let period = timer.period_ms(&tuning) as f64;
                while elapsed[i] >= period {
                    elapsed[i] -= period;
                    session.wake(Wakeup::Timer(*timer));
                }
            }

            let target = session
                .state()
                .entities
                .iter()
                .filter(|e| e.kind != EntityKind::Hazard && e.pos.y < 88.0)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|e| e.pos.x);
            if let Some(x) = target {
                session.point_at(x);
            }

            session.wake(Wakeup::Frame);
        }

        let state = session.state();
        Outcome {
            score: state.score,
            lives: state.lives,
            mode: state.mode,
        }
    }
}
