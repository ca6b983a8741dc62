//! Door mash mini-game
//!
//! Arms when the section scrolls into view, disarms when it scrolls away.
//! While armed, every frame feeds the click rate into the openness
//! simulator and pushes the result to the doors. Reaching full openness
//! reveals the content behind them, once, and stops the loop.
//!
//! ```text
//! Disarmed --enter--> Arming --first frame--> Armed --full--> Completed
//!    ^                   |                      |                 |
//!    +-------------------+--------leave---------+-----------------+
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::renderer::DoorRenderer;
use crate::schedule::{Scheduler, TaskHandle};
use crate::settings::FxSettings;
use crate::sim::{ClickRateTracker, LifecycleState, OpennessSim, VisibilityBand, VisibilityEdge};

/// Lifecycle transition caused by a visibility change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Armed,
    Disarmed,
}

struct DoorCore<R> {
    renderer: R,
    band: VisibilityBand,
    tracker: ClickRateTracker,
    sim: OpennessSim,
    state: LifecycleState,
    /// Outstanding frame callback; at most one
    frame: Option<TaskHandle>,
    completions: u32,
}

impl<R: DoorRenderer> DoorCore<R> {
    /// One simulation frame. Returns true when this frame completed the game.
    fn step(&mut self, now_ms: u64) -> bool {
        if self.state == LifecycleState::Arming {
            self.state = LifecycleState::Armed;
        }

        let rate = self.tracker.rate(now_ms);
        self.sim.step(rate);
        self.renderer.set_door_offset(self.sim.percent());

        // Same frame as the clamp
        if !self.sim.is_full() {
            return false;
        }

        self.renderer.hide_overlay();
        self.renderer.reveal_content();
        self.state = LifecycleState::Completed;
        self.completions += 1;
        log::info!(
            "Doors forced open (run {}), now {}",
            self.completions,
            self.state.as_str()
        );
        true
    }

    fn reset(&mut self) {
        self.tracker.clear();
        self.sim.reset();
    }
}

/// Handle to the door game. Clones share the same game.
pub struct DoorGame<R: DoorRenderer + 'static> {
    core: Rc<RefCell<DoorCore<R>>>,
    scheduler: Rc<dyn Scheduler>,
}

impl<R: DoorRenderer + 'static> Clone for DoorGame<R> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<R: DoorRenderer + 'static> DoorGame<R> {
    pub fn new(renderer: R, settings: &FxSettings, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            core: Rc::new(RefCell::new(DoorCore {
                renderer,
                band: settings.band,
                tracker: ClickRateTracker::new(settings.door.window_ms),
                sim: settings.door.simulator(),
                state: LifecycleState::Disarmed,
                frame: None,
                completions: 0,
            })),
            scheduler,
        }
    }

    /// Feed an observed visibility ratio. Above the band arms (from
    /// Disarmed only), below it disarms, inside it does nothing.
    pub fn on_visibility_change(&self, ratio: f64) -> Option<Transition> {
        let edge = self.core.borrow().band.classify(ratio)?;
        match edge {
            VisibilityEdge::Enter => self.arm().then_some(Transition::Armed),
            VisibilityEdge::Leave => self.disarm().then_some(Transition::Disarmed),
        }
    }

    /// Reset, slide the doors shut and start the frame loop.
    /// Only from Disarmed; returns whether it armed.
    pub fn arm(&self) -> bool {
        let mut core = self.core.borrow_mut();
        if core.state != LifecycleState::Disarmed {
            return false;
        }

        core.reset();
        core.renderer.play_entrance();
        core.state = LifecycleState::Arming;
        self.start_loop(&mut core);
        log::info!("Door game {}", core.state.as_str());
        true
    }

    /// Stop the loop, reset, park the doors offscreen and hide the content
    /// again so the next arm replays. Safe from any state; returns whether
    /// anything changed.
    pub fn disarm(&self) -> bool {
        let mut core = self.core.borrow_mut();
        if core.state == LifecycleState::Disarmed && core.frame.is_none() {
            return false;
        }

        if let Some(handle) = core.frame.take() {
            self.scheduler.cancel(handle);
        }
        core.reset();
        core.renderer.set_door_offset(100.0);
        core.renderer.show_overlay();
        core.renderer.hide_content();
        let previous = core.state;
        core.state = LifecycleState::Disarmed;
        log::info!("Door game {} -> {}", previous.as_str(), core.state.as_str());
        true
    }

    /// A click or an equivalent key press. Dropped unless armed.
    pub fn register_input(&self) -> bool {
        let mut core = self.core.borrow_mut();
        if !core.state.is_armed() {
            return false;
        }
        let now = now_ms(self.scheduler.as_ref());
        core.tracker.register(now);
        true
    }

    /// Run one frame now. The frame loop calls this itself; extra calls
    /// never schedule a second loop and do nothing once completed.
    pub fn tick(&self) {
        run_tick(&self.core, &self.scheduler);
    }

    pub fn state(&self) -> LifecycleState {
        self.core.borrow().state
    }

    pub fn openness(&self) -> f32 {
        self.core.borrow().sim.openness()
    }

    /// Clicks in the trailing window as of now
    pub fn current_rate(&self) -> u32 {
        let now = now_ms(self.scheduler.as_ref());
        self.core.borrow_mut().tracker.rate(now)
    }

    /// Whether a frame callback is outstanding
    pub fn is_looping(&self) -> bool {
        self.core.borrow().frame.is_some()
    }

    /// Completed runs this page lifetime
    pub fn completions(&self) -> u32 {
        self.core.borrow().completions
    }

    fn start_loop(&self, core: &mut DoorCore<R>) {
        if core.frame.is_some() {
            return;
        }
        core.frame = Some(schedule_tick(Rc::downgrade(&self.core), self.scheduler.clone()));
    }
}

fn now_ms(scheduler: &dyn Scheduler) -> u64 {
    scheduler.now_ms().max(0.0) as u64
}

fn schedule_tick<R: DoorRenderer + 'static>(
    weak: Weak<RefCell<DoorCore<R>>>,
    scheduler: Rc<dyn Scheduler>,
) -> TaskHandle {
    let sched = scheduler.clone();
    scheduler.schedule_frame(Box::new(move || {
        let Some(core) = weak.upgrade() else {
            return;
        };
        core.borrow_mut().frame = None;
        run_tick(&core, &sched);
    }))
}

fn run_tick<R: DoorRenderer + 'static>(
    core_rc: &Rc<RefCell<DoorCore<R>>>,
    scheduler: &Rc<dyn Scheduler>,
) {
    let mut core = core_rc.borrow_mut();
    if !core.state.is_armed() {
        return;
    }

    let completed = core.step(now_ms(scheduler.as_ref()));
    if completed {
        if let Some(handle) = core.frame.take() {
            scheduler.cancel(handle);
        }
    } else if core.frame.is_none() {
        core.frame = Some(schedule_tick(Rc::downgrade(core_rc), scheduler.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RecordingRenderer, RenderCall};
    use crate::schedule::ManualScheduler;

    fn setup() -> (Rc<ManualScheduler>, RecordingRenderer, DoorGame<RecordingRenderer>) {
        let sched = Rc::new(ManualScheduler::new());
        let renderer = RecordingRenderer::new();
        let game = DoorGame::new(renderer.clone(), &FxSettings::default(), sched.clone());
        (sched, renderer, game)
    }

    fn count(renderer: &RecordingRenderer, call: RenderCall) -> usize {
        renderer.count(|c| *c == call)
    }

    #[test]
    fn test_visibility_sequence_arms_and_disarms_once() {
        let (_sched, renderer, game) = setup();
        let transitions: Vec<_> = [0.0, 0.7, 0.5, 0.1]
            .into_iter()
            .map(|r| game.on_visibility_change(r))
            .collect();
        assert_eq!(
            transitions,
            vec![None, Some(Transition::Armed), None, Some(Transition::Disarmed)]
        );
        assert_eq!(count(&renderer, RenderCall::Entrance), 1);
        assert_eq!(game.state(), LifecycleState::Disarmed);
    }

    #[test]
    fn test_first_frame_promotes_arming() {
        let (sched, _renderer, game) = setup();
        game.on_visibility_change(0.7);
        assert_eq!(game.state(), LifecycleState::Arming);
        assert!(game.is_looping());
        sched.run_frame();
        assert_eq!(game.state(), LifecycleState::Armed);
        assert!(game.is_looping());
    }

    #[test]
    fn test_five_clicks_per_second_gain() {
        let (sched, renderer, game) = setup();
        game.on_visibility_change(0.7);
        // Clicks at 0, 200, 400, 600, 800
        for i in 0..5 {
            assert!(game.register_input());
            if i < 4 {
                sched.advance(200.0);
            }
        }
        sched.run_frame();
        assert_eq!(game.current_rate(), 5);
        assert!((game.openness() - 0.4).abs() < 1e-5);
        sched.run_frame();
        assert!((game.openness() - 0.8).abs() < 1e-5);
        let offset = renderer.last_door_offset().unwrap();
        assert!((offset - 0.8).abs() < 1e-5);

        // A full window after the first click it drops out
        sched.advance(200.0);
        assert_eq!(game.current_rate(), 4);
    }

    #[test]
    fn test_idle_doors_stay_shut() {
        let (sched, renderer, game) = setup();
        game.on_visibility_change(1.0);
        sched.run_frames(30);
        assert_eq!(game.openness(), 0.0);
        assert_eq!(renderer.last_door_offset(), Some(0.0));
        assert_eq!(game.state(), LifecycleState::Armed);
    }

    #[test]
    fn test_completion_fires_once() {
        let (sched, renderer, game) = setup();
        game.on_visibility_change(0.7);
        for _ in 0..200 {
            game.register_input();
        }
        // 200 * 0.2 - 0.6 = 39.4 per frame
        assert_eq!(sched.run_frames(100), 3);
        assert_eq!(game.state(), LifecycleState::Completed);
        assert_eq!(game.openness(), 100.0);
        assert_eq!(renderer.last_door_offset(), Some(100.0));
        assert!(!game.is_looping());
        assert_eq!(sched.pending_frames(), 0);

        for _ in 0..5 {
            game.tick();
        }
        sched.run_frames(10);
        assert_eq!(count(&renderer, RenderCall::HideOverlay), 1);
        assert_eq!(count(&renderer, RenderCall::RevealContent), 1);
        assert_eq!(game.completions(), 1);
        assert_eq!(game.state(), LifecycleState::Completed);
    }

    #[test]
    fn test_inputs_dropped_unless_armed() {
        let (sched, _renderer, game) = setup();
        assert!(!game.register_input());
        game.on_visibility_change(0.7);
        assert_eq!(game.current_rate(), 0);

        for _ in 0..200 {
            game.register_input();
        }
        sched.run_frames(100);
        assert_eq!(game.state(), LifecycleState::Completed);
        assert!(!game.register_input());
    }

    #[test]
    fn test_completed_stays_until_leave_then_replays() {
        let (sched, renderer, game) = setup();
        game.on_visibility_change(0.7);
        for _ in 0..200 {
            game.register_input();
        }
        sched.run_frames(100);
        assert_eq!(game.state(), LifecycleState::Completed);

        // Still in view: no replay
        assert_eq!(game.on_visibility_change(1.0), None);

        renderer.clear();
        assert_eq!(game.on_visibility_change(0.1), Some(Transition::Disarmed));
        assert_eq!(
            renderer.calls(),
            vec![
                RenderCall::DoorOffset(100.0),
                RenderCall::ShowOverlay,
                RenderCall::HideContent,
            ]
        );

        assert_eq!(game.on_visibility_change(0.7), Some(Transition::Armed));
        assert_eq!(game.openness(), 0.0);
        assert_eq!(game.current_rate(), 0);
        assert_eq!(renderer.last(), Some(RenderCall::Entrance));
    }

    #[test]
    fn test_rearm_resets_progress() {
        let (sched, _renderer, game) = setup();
        game.on_visibility_change(0.7);
        for _ in 0..10 {
            game.register_input();
        }
        sched.run_frames(5);
        assert!(game.openness() > 0.0);

        game.on_visibility_change(0.0);
        assert_eq!(game.openness(), 0.0);
        game.on_visibility_change(0.8);
        assert_eq!(game.openness(), 0.0);
        assert_eq!(game.current_rate(), 0);
    }

    #[test]
    fn test_disarm_before_arm_is_noop() {
        let (sched, renderer, game) = setup();
        assert_eq!(game.on_visibility_change(0.1), None);
        assert!(!game.disarm());
        assert!(!game.disarm());
        assert!(renderer.is_empty());
        assert_eq!(sched.pending_frames(), 0);
    }

    #[test]
    fn test_disarm_cancels_pending_frame() {
        let (sched, renderer, game) = setup();
        game.on_visibility_change(0.7);
        sched.run_frames(3);
        game.on_visibility_change(0.1);
        assert_eq!(sched.pending_frames(), 0);

        let len = renderer.len();
        sched.run_frames(10);
        sched.advance(5_000.0);
        assert_eq!(renderer.len(), len);
    }

    #[test]
    fn test_single_loop_while_armed() {
        let (sched, _renderer, game) = setup();
        game.on_visibility_change(0.7);
        game.on_visibility_change(0.9);
        assert!(!game.arm());
        assert_eq!(sched.pending_frames(), 1);

        // A manual tick with a frame already queued adds nothing
        game.tick();
        assert_eq!(sched.pending_frames(), 1);
        sched.run_frame();
        assert_eq!(sched.pending_frames(), 1);
    }

    #[test]
    fn test_dead_band_is_ignored() {
        let (sched, renderer, game) = setup();
        for ratio in [0.2, 0.3, 0.45, 0.6] {
            assert_eq!(game.on_visibility_change(ratio), None);
        }
        assert!(renderer.is_empty());
        assert_eq!(sched.pending_frames(), 0);
    }

    #[test]
    fn test_sustained_mashing_beats_decay() {
        let (sched, _renderer, game) = setup();
        game.on_visibility_change(0.7);
        // One click every 100ms is ten per window, well above the hold rate
        let mut frames = 0;
        while game.state() != LifecycleState::Completed && frames < 2_000 {
            if frames % 6 == 0 {
                game.register_input();
            }
            sched.run_frame();
            frames += 1;
        }
        assert_eq!(game.state(), LifecycleState::Completed);
        assert_eq!(game.completions(), 1);
    }
}
