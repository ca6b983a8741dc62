//! Scheduling seam
//!
//! Effects never touch `requestAnimationFrame` or `setTimeout` directly.
//! They go through [`Scheduler`], so the same logic runs against the browser
//! (`platform::BrowserScheduler`) or a [`ManualScheduler`] clock in tests.
//!
//! Cancelling a handle must drop its task: a cancelled callback never runs.

pub mod manual;

pub use manual::ManualScheduler;

/// Deferred one-shot callback
pub type Task = Box<dyn FnOnce() + 'static>;

/// Opaque handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub(crate) u64);

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Single-threaded cooperative scheduler.
///
/// Takes `&self` because tasks routinely schedule follow-ups while running.
pub trait Scheduler {
    /// Monotonic clock in milliseconds
    fn now_ms(&self) -> f64;

    /// Run `task` on the next frame boundary
    fn schedule_frame(&self, task: Task) -> TaskHandle;

    /// Run `task` once, `delay_ms` from now
    fn schedule_after(&self, delay_ms: f64, task: Task) -> TaskHandle;

    /// Drop a pending task. Unknown or already-fired handles are ignored.
    fn cancel(&self, handle: TaskHandle);
}
