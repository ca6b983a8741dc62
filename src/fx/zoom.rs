//! Hover zoom timer-chain
//!
//! `play` lays out every step of the sequence as a delayed one-shot at
//! increasing offsets, plus a final revert. `stop` cancels whatever has not
//! fired yet. One sequencer per zoomable element.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::ZoomStep;
use crate::renderer::ZoomRenderer;
use crate::schedule::{Scheduler, TaskHandle};
use crate::settings::ZoomTiming;

struct ZoomRun<R> {
    renderer: R,
    steps: Vec<ZoomStep>,
    timing: ZoomTiming,
    /// Allowed to start on the next `play`
    armed: bool,
    /// A playback is in flight
    running: bool,
    /// Scheduled but not yet fired
    pending: Vec<TaskHandle>,
}

impl<R: ZoomRenderer> ZoomRun<R> {
    fn cancel_pending(&mut self, scheduler: &dyn Scheduler) {
        for handle in self.pending.drain(..) {
            scheduler.cancel(handle);
        }
    }
}

/// Handle to one element's zoom sequence. Clones share the same state.
pub struct ZoomSequencer<R: ZoomRenderer + 'static> {
    run: Rc<RefCell<ZoomRun<R>>>,
    scheduler: Rc<dyn Scheduler>,
}

impl<R: ZoomRenderer + 'static> Clone for ZoomSequencer<R> {
    fn clone(&self) -> Self {
        Self {
            run: self.run.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<R: ZoomRenderer + 'static> ZoomSequencer<R> {
    pub fn new(
        renderer: R,
        steps: Vec<ZoomStep>,
        timing: ZoomTiming,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            run: Rc::new(RefCell::new(ZoomRun {
                renderer,
                steps,
                timing,
                armed: true,
                running: false,
                pending: Vec::new(),
            })),
            scheduler,
        }
    }

    /// Start the sequence from step one. Ignored while running, while
    /// unarmed, or with no steps. Returns whether playback started.
    pub fn play(&self) -> bool {
        let mut run = self.run.borrow_mut();
        if !run.armed || run.running || run.steps.is_empty() {
            return false;
        }

        run.cancel_pending(self.scheduler.as_ref());
        run.renderer.reset_to_neutral();
        run.running = true;

        let timing = run.timing;
        let count = run.steps.len();
        let mut pending = Vec::with_capacity(count + 1);

        for (i, step) in run.steps.iter().copied().enumerate() {
            let weak = Rc::downgrade(&self.run);
            let handle = self.scheduler.schedule_after(
                timing.step_at(i),
                Box::new(move || apply_step(&weak, i, &step)),
            );
            pending.push(handle);
        }

        let weak = Rc::downgrade(&self.run);
        let handle = self
            .scheduler
            .schedule_after(timing.revert_at(count), Box::new(move || finish(&weak)));
        pending.push(handle);

        run.pending = pending;
        log::debug!("zoom: playing {} steps", count);
        true
    }

    /// Cancel anything pending, snap back to neutral and re-arm.
    /// Safe at any time, including when idle.
    pub fn stop(&self) {
        let mut run = self.run.borrow_mut();
        run.cancel_pending(self.scheduler.as_ref());
        run.renderer.reset_to_neutral();
        run.running = false;
        run.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.run.borrow().armed
    }

    pub fn is_running(&self) -> bool {
        self.run.borrow().running
    }

    /// Scheduled actions that have not fired yet
    pub fn pending(&self) -> usize {
        self.run.borrow().pending.len()
    }

    pub fn step_count(&self) -> usize {
        self.run.borrow().steps.len()
    }
}

fn apply_step<R: ZoomRenderer>(weak: &Weak<RefCell<ZoomRun<R>>>, index: usize, step: &ZoomStep) {
    let Some(run) = weak.upgrade() else {
        return;
    };
    let mut run = run.borrow_mut();
    // Steps fire in order, so the fired one is at the front
    if !run.pending.is_empty() {
        run.pending.remove(0);
    }
    log::debug!("zoom: step {} {:?}", index + 1, step);
    run.renderer.apply_focus_and_scale(step);
}

fn finish<R: ZoomRenderer>(weak: &Weak<RefCell<ZoomRun<R>>>) {
    let Some(run) = weak.upgrade() else {
        return;
    };
    let mut run = run.borrow_mut();
    run.pending.clear();
    run.renderer.reset_to_neutral();
    run.running = false;
    // Stays unarmed until the pointer leaves
    run.armed = false;
}
