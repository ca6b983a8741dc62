//! Deterministic scheduler driven by hand
//!
//! Time only moves when the owner calls [`ManualScheduler::advance`] or
//! [`ManualScheduler::run_frame`]. Timers fire in due order (ties in
//! scheduling order) with the clock set to their due time.

use std::cell::RefCell;

use super::{Scheduler, Task, TaskHandle};
use crate::consts::FRAME_MS;

struct Timer {
    handle: TaskHandle,
    due: f64,
    task: Task,
}

#[derive(Default)]
struct Queue {
    now: f64,
    next_id: u64,
    timers: Vec<Timer>,
    frames: Vec<(TaskHandle, Task)>,
}

impl Queue {
    fn next_handle(&mut self) -> TaskHandle {
        self.next_id += 1;
        TaskHandle(self.next_id)
    }

    /// Earliest timer due at or before `limit`
    fn take_due(&mut self, limit: f64) -> Option<Task> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= limit)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.handle.0.cmp(&b.handle.0)))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(idx);
        self.now = self.now.max(timer.due);
        Some(timer.task)
    }
}

pub struct ManualScheduler {
    queue: RefCell<Queue>,
    frame_ms: f64,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::with_frame_ms(FRAME_MS)
    }

    pub fn with_frame_ms(frame_ms: f64) -> Self {
        Self {
            queue: RefCell::new(Queue::default()),
            frame_ms,
        }
    }

    /// Move the clock forward, firing every timer that comes due.
    /// Frame tasks are left alone. Returns the number of timers fired.
    pub fn advance(&self, ms: f64) -> usize {
        let target = self.queue.borrow().now + ms.max(0.0);
        let mut fired = 0;
        loop {
            // Borrow is released before the task runs so it can reschedule
            let next = self.queue.borrow_mut().take_due(target);
            match next {
                Some(task) => {
                    task();
                    fired += 1;
                }
                None => break,
            }
        }
        let mut q = self.queue.borrow_mut();
        q.now = q.now.max(target);
        fired
    }

    /// Advance one frame length, then run the frame tasks that were queued
    /// before this call. Tasks they queue run on the next frame.
    pub fn run_frame(&self) -> usize {
        self.advance(self.frame_ms);
        let batch: Vec<TaskHandle> = self.queue.borrow().frames.iter().map(|(h, _)| *h).collect();
        let mut ran = 0;
        for handle in batch {
            let task = {
                let mut q = self.queue.borrow_mut();
                q.frames
                    .iter()
                    .position(|(h, _)| *h == handle)
                    .map(|i| q.frames.remove(i).1)
            };
            // Cancelled by an earlier task in the same frame
            if let Some(task) = task {
                task();
                ran += 1;
            }
        }
        ran
    }

    /// Run frames until none are pending or `limit` is hit. Returns frames run.
    pub fn run_frames(&self, limit: usize) -> usize {
        let mut count = 0;
        while count < limit && self.pending_frames() > 0 {
            self.run_frame();
            count += 1;
        }
        count
    }

    pub fn pending_frames(&self) -> usize {
        self.queue.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.queue.borrow().timers.len()
    }

    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.queue.borrow().now
    }

    fn schedule_frame(&self, task: Task) -> TaskHandle {
        let mut q = self.queue.borrow_mut();
        let handle = q.next_handle();
        q.frames.push((handle, task));
        handle
    }

    fn schedule_after(&self, delay_ms: f64, task: Task) -> TaskHandle {
        let mut q = self.queue.borrow_mut();
        let handle = q.next_handle();
        let due = q.now + delay_ms.max(0.0);
        q.timers.push(Timer { handle, due, task });
        handle
    }

    fn cancel(&self, handle: TaskHandle) {
        let mut q = self.queue.borrow_mut();
        q.timers.retain(|t| t.handle != handle);
        q.frames.retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn log_task(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Task {
        let log = log.clone();
        Box::new(move || log.borrow_mut().push(name))
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let sched = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        sched.schedule_after(300.0, log_task(&log, "c"));
        sched.schedule_after(100.0, log_task(&log, "a"));
        sched.schedule_after(100.0, log_task(&log, "b"));

        assert_eq!(sched.advance(99.0), 0);
        assert_eq!(sched.advance(1.0), 2);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(sched.now_ms(), 100.0);

        sched.advance(1_000.0);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(sched.now_ms(), 1_100.0);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let sched = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let handle = sched.schedule_after(50.0, log_task(&log, "x"));
        sched.cancel(handle);
        sched.advance(1_000.0);
        assert!(log.borrow().is_empty());
        // Cancelling twice is harmless
        sched.cancel(handle);
    }

    #[test]
    fn test_frame_tasks_requeue_for_next_frame() {
        let sched = Rc::new(ManualScheduler::new());
        let count = Rc::new(RefCell::new(0));

        fn schedule_loop(sched: &Rc<ManualScheduler>, count: &Rc<RefCell<u32>>) {
            let s = sched.clone();
            let c = count.clone();
            sched.schedule_frame(Box::new(move || {
                *c.borrow_mut() += 1;
                if *c.borrow() < 3 {
                    schedule_loop(&s, &c);
                }
            }));
        }

        schedule_loop(&sched, &count);
        assert_eq!(sched.run_frame(), 1);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(sched.run_frames(10), 2);
        assert_eq!(*count.borrow(), 3);
        assert_eq!(sched.pending_frames(), 0);
    }

    #[test]
    fn test_frame_cancelled_by_sibling() {
        let sched = Rc::new(ManualScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let victim = Rc::new(RefCell::new(None));

        let s = sched.clone();
        let v = victim.clone();
        sched.schedule_frame(Box::new(move || {
            if let Some(h) = v.borrow_mut().take() {
                s.cancel(h);
            }
        }));
        *victim.borrow_mut() = Some(sched.schedule_frame(log_task(&log, "late")));

        sched.run_frame();
        assert!(log.borrow().is_empty());
    }
}
