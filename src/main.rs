//! Door Rush entry point
//!
//! On wasm32, wires page events to the effects. Natively, runs both effects
//! headless on a manual clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_fx {
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, IntersectionObserver, IntersectionObserverEntry,
        IntersectionObserverInit, KeyboardEvent, MouseEvent, PointerEvent,
    };

    use door_rush::consts::VISIBILITY_THRESHOLDS;
    use door_rush::fx::{DoorGame, ZoomSequencer, parse_zoom_steps};
    use door_rush::platform::selectors::*;
    use door_rush::platform::{BrowserScheduler, DomDoorRenderer, DomZoomRenderer};
    use door_rush::schedule::Scheduler;
    use door_rush::settings::FxSettings;

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Door Rush starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(scheduler) = BrowserScheduler::new() else {
            log::error!("No window to schedule on");
            return;
        };
        let scheduler: Rc<dyn Scheduler> = Rc::new(scheduler);
        let settings = FxSettings::load();

        let zoom_hosts = setup_zoom_hosts(&document, &settings, &scheduler);

        let door_game = match document.get_element_by_id(DOOR_ROOT_ID) {
            Some(root) => {
                setup_door_game(&root, &settings, &scheduler);
                "on"
            }
            None => "off",
        };

        log::info!(
            "Door Rush running ({} zoom hosts, door game {})",
            zoom_hosts,
            door_game
        );
    }

    fn setup_zoom_hosts(
        document: &Document,
        settings: &FxSettings,
        scheduler: &Rc<dyn Scheduler>,
    ) -> usize {
        let Ok(hosts) = document.query_selector_all(&format!("[{}]", ZOOM_ATTRIBUTE)) else {
            return 0;
        };

        let mut count = 0;
        for i in 0..hosts.length() {
            let Some(host) = hosts.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(renderer) = DomZoomRenderer::for_host(&host) else {
                continue;
            };

            let spec = host.get_attribute(ZOOM_ATTRIBUTE).unwrap_or_default();
            let steps = parse_zoom_steps(&spec);
            let unusable = steps.iter().filter(|s| !s.is_usable()).count();
            if unusable > 0 {
                log::warn!("{} of {} zoom steps in {:?} are not numbers", unusable, steps.len(), spec);
            }

            let seq = ZoomSequencer::new(renderer, steps, settings.zoom, scheduler.clone());

            // Hover enter plays once per continuous hover
            {
                let seq = seq.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    seq.play();
                });
                let _ = host
                    .add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            // Hover leave cancels and re-arms
            {
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    seq.stop();
                });
                let _ = host
                    .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            count += 1;
        }
        count
    }

    fn setup_door_game(root: &Element, settings: &FxSettings, scheduler: &Rc<dyn Scheduler>) {
        let renderer = DomDoorRenderer::from_root(root);
        let overlay = renderer.overlay().cloned();
        let game = DoorGame::new(renderer, settings, scheduler.clone());

        // Visibility crossings
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
                move |entries: js_sys::Array, _observer: IntersectionObserver| {
                    for entry in entries.iter() {
                        let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                            continue;
                        };
                        let ratio = entry.intersection_ratio();
                        if let Some(transition) = game.on_visibility_change(ratio) {
                            log::debug!("Visibility {:.2}: {:?}", ratio, transition);
                        }
                    }
                },
            );

            let thresholds = js_sys::Array::new();
            for t in VISIBILITY_THRESHOLDS {
                thresholds.push(&JsValue::from_f64(t));
            }
            let init = IntersectionObserverInit::new();
            init.set_threshold(&thresholds);

            match IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init) {
                Ok(observer) => observer.observe(root),
                Err(e) => log::warn!("IntersectionObserver unavailable: {:?}", e),
            }
            closure.forget();
        }

        // Clicks/taps on the overlay
        if let Some(overlay) = overlay {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.register_input();
            });
            let _ = overlay
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard equivalent
        {
            let settings = settings.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                // Held keys auto-repeat; only real presses count
                if event.repeat() || !settings.is_input_key(&event.key()) {
                    return;
                }
                if game.register_input() {
                    event.prevent_default();
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_fx::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Door Rush (native) starting...");
    log::info!("Effects need a page to drive - build for wasm32 and serve with `trunk serve`");

    println!("\nRunning headless zoom check...");
    headless_zoom();
    println!("\nRunning headless door check...");
    headless_door();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn headless_zoom() {
    use door_rush::fx::{ZoomSequencer, parse_zoom_steps};
    use door_rush::renderer::{RecordingRenderer, RenderCall};
    use door_rush::schedule::{ManualScheduler, Scheduler};
    use door_rush::settings::FxSettings;
    use std::rc::Rc;

    let settings = FxSettings::load();
    let sched = Rc::new(ManualScheduler::new());
    let renderer = RecordingRenderer::logged();
    let steps = parse_zoom_steps("10% 40% 3; 50% 50% 3");
    let seq = ZoomSequencer::new(renderer.clone(), steps, settings.zoom, sched.clone());

    seq.play();
    sched.advance(settings.zoom.revert_at(seq.step_count()));

    let zooms = renderer.count(|c| matches!(c, RenderCall::ApplyZoom(_)));
    assert_eq!(zooms, 2, "both steps should have played");
    assert_eq!(renderer.last(), Some(RenderCall::ResetZoom));
    assert!(!seq.is_armed());
    println!("✓ Zoom played {} steps and reverted at {}ms", zooms, sched.now_ms());
}

#[cfg(not(target_arch = "wasm32"))]
fn headless_door() {
    use door_rush::fx::DoorGame;
    use door_rush::renderer::RecordingRenderer;
    use door_rush::schedule::ManualScheduler;
    use door_rush::settings::{Difficulty, FxSettings};
    use door_rush::sim::LifecycleState;
    use std::rc::Rc;

    for preset in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
        let settings = FxSettings::from_preset(preset);
        let sim = settings.door.simulator();
        let estimate = |rate| match sim.ticks_to_full(rate) {
            Some(frames) => format!("{} frames", frames),
            None => "never".to_string(),
        };
        println!(
            "  {:<6} hold {:.1} clicks/s | 4/s: {} | 8/s: {}",
            preset.as_str(),
            sim.hold_rate(),
            estimate(4),
            estimate(8)
        );
    }

    let settings = FxSettings::default();
    let sched = Rc::new(ManualScheduler::new());
    let renderer = RecordingRenderer::logged();
    let game = DoorGame::new(renderer.clone(), &settings, sched.clone());

    game.on_visibility_change(0.7);

    // Eight clicks a second: one every 7.5 frames
    let mut frames = 0u32;
    while game.state() != LifecycleState::Completed && frames < 10_000 {
        if frames % 15 == 0 || frames % 15 == 8 {
            game.register_input();
        }
        sched.run_frame();
        frames += 1;
    }

    assert_eq!(game.state(), LifecycleState::Completed, "doors should open");
    assert_eq!(game.completions(), 1);
    println!(
        "✓ Doors opened after {} frames ({:.1}s) at 8 clicks/s",
        frames,
        frames as f64 * sched.frame_ms() / 1000.0
    );

    game.on_visibility_change(0.1);
    assert_eq!(game.state(), LifecycleState::Disarmed);
    println!("✓ Leaving the section reset the game");
}
