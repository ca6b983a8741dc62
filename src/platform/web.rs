//! Browser scheduler and DOM renderers

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, Performance, Window};

use super::selectors::*;
use crate::fx::ZoomStep;
use crate::renderer::{DoorRenderer, ZoomRenderer};
use crate::schedule::{Scheduler, Task, TaskHandle};

#[derive(Debug, Clone, Copy)]
enum TaskKind {
    Frame,
    Timer,
}

struct LiveTask {
    kind: TaskKind,
    js_id: i32,
    task: Task,
}

#[derive(Default)]
struct LiveTasks {
    next_id: u64,
    live: HashMap<u64, LiveTask>,
}

/// Scheduler backed by `requestAnimationFrame` and `setTimeout`.
///
/// Tasks live in a table until they fire. The JS callback only carries the
/// task id, so cancelling removes the task and a late callback finds nothing.
pub struct BrowserScheduler {
    window: Window,
    performance: Option<Performance>,
    tasks: Rc<RefCell<LiveTasks>>,
}

impl BrowserScheduler {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let performance = window.performance();
        if performance.is_none() {
            log::warn!("No performance clock, falling back to Date.now()");
        }
        Some(Self {
            window,
            performance,
            tasks: Rc::new(RefCell::new(LiveTasks::default())),
        })
    }

    fn insert(&self, kind: TaskKind, task: Task) -> u64 {
        let mut tasks = self.tasks.borrow_mut();
        tasks.next_id += 1;
        let id = tasks.next_id;
        tasks.live.insert(
            id,
            LiveTask {
                kind,
                js_id: 0,
                task,
            },
        );
        id
    }

    fn bind(&self, id: u64, scheduled: Result<i32, JsValue>) {
        let mut tasks = self.tasks.borrow_mut();
        match scheduled {
            Ok(js_id) => {
                if let Some(live) = tasks.live.get_mut(&id) {
                    live.js_id = js_id;
                }
            }
            Err(e) => {
                log::warn!("Failed to schedule task {}: {:?}", id, e);
                tasks.live.remove(&id);
            }
        }
    }

    /// Pull the task out of the table, then run it with no borrow held
    fn runner(tasks: Weak<RefCell<LiveTasks>>, id: u64) -> impl FnOnce() {
        move || {
            let live = tasks
                .upgrade()
                .and_then(|tasks| tasks.borrow_mut().live.remove(&id));
            if let Some(live) = live {
                (live.task)();
            }
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        }
    }

    fn schedule_frame(&self, task: Task) -> TaskHandle {
        let id = self.insert(TaskKind::Frame, task);
        let run = Self::runner(Rc::downgrade(&self.tasks), id);
        let callback = Closure::once_into_js(move |_time: f64| run());
        let scheduled = self
            .window
            .request_animation_frame(callback.unchecked_ref());
        self.bind(id, scheduled);
        TaskHandle(id)
    }

    fn schedule_after(&self, delay_ms: f64, task: Task) -> TaskHandle {
        let id = self.insert(TaskKind::Timer, task);
        let run = Self::runner(Rc::downgrade(&self.tasks), id);
        let callback = Closure::once_into_js(move || run());
        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms.max(0.0).round() as i32,
            );
        self.bind(id, scheduled);
        TaskHandle(id)
    }

    fn cancel(&self, handle: TaskHandle) {
        let removed = self.tasks.borrow_mut().live.remove(&handle.id());
        if let Some(live) = removed {
            match live.kind {
                TaskKind::Frame => {
                    if let Err(e) = self.window.cancel_animation_frame(live.js_id) {
                        log::warn!("cancelAnimationFrame failed: {:?}", e);
                    }
                }
                TaskKind::Timer => self.window.clear_timeout_with_handle(live.js_id),
            }
        }
    }
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        log::warn!("Failed to set {}: {:?}", property, e);
    }
}

fn clear_style(el: &HtmlElement, property: &str) {
    if let Err(e) = el.style().remove_property(property) {
        log::warn!("Failed to clear {}: {:?}", property, e);
    }
}

fn find_html(root: &Element, selector: &str) -> Option<HtmlElement> {
    let found = root
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    if found.is_none() {
        log::warn!("Door game: no element matches {}", selector);
    }
    found
}

/// Door overlay built from `#door-game` markup. Missing parts are skipped.
pub struct DomDoorRenderer {
    left: Option<HtmlElement>,
    right: Option<HtmlElement>,
    overlay: Option<HtmlElement>,
    content: Option<Element>,
}

impl DomDoorRenderer {
    pub fn from_root(root: &Element) -> Self {
        Self {
            left: find_html(root, DOOR_LEFT),
            right: find_html(root, DOOR_RIGHT),
            overlay: find_html(root, DOOR_OVERLAY),
            content: root.query_selector(DOOR_CONTENT).ok().flatten(),
        }
    }

    /// Element that should receive click input
    pub fn overlay(&self) -> Option<&HtmlElement> {
        self.overlay.as_ref()
    }
}

impl DoorRenderer for DomDoorRenderer {
    fn set_door_offset(&mut self, percent: f32) {
        if let Some(left) = &self.left {
            set_style(left, "transform", &format!("translateX(-{}%)", percent));
        }
        if let Some(right) = &self.right {
            set_style(right, "transform", &format!("translateX({}%)", percent));
        }
    }

    fn show_overlay(&mut self) {
        if let Some(overlay) = &self.overlay {
            clear_style(overlay, "display");
            set_style(overlay, "pointer-events", "auto");
        }
    }

    fn hide_overlay(&mut self) {
        if let Some(overlay) = &self.overlay {
            set_style(overlay, "display", "none");
            set_style(overlay, "pointer-events", "none");
        }
    }

    fn reveal_content(&mut self) {
        match &self.content {
            Some(content) => {
                if let Err(e) = content.class_list().add_1(REVEALED_CLASS) {
                    log::warn!("Failed to add .{}: {:?}", REVEALED_CLASS, e);
                }
            }
            None => log::debug!("Nothing to reveal"),
        }
    }

    fn hide_content(&mut self) {
        if let Some(content) = &self.content {
            if let Err(e) = content.class_list().remove_1(REVEALED_CLASS) {
                log::warn!("Failed to remove .{}: {:?}", REVEALED_CLASS, e);
            }
        }
    }
}

/// Transforms one element for a hover zoom
pub struct DomZoomRenderer {
    target: HtmlElement,
}

impl DomZoomRenderer {
    pub fn new(target: HtmlElement) -> Self {
        Self { target }
    }

    /// The host's `img`, or the host itself
    pub fn for_host(host: &Element) -> Option<Self> {
        let target = host
            .query_selector(ZOOM_TARGET)
            .ok()
            .flatten()
            .unwrap_or_else(|| host.clone());
        target.dyn_into::<HtmlElement>().ok().map(Self::new)
    }
}

impl ZoomRenderer for DomZoomRenderer {
    fn apply_focus_and_scale(&mut self, step: &ZoomStep) {
        set_style(&self.target, "transform-origin", &step.origin_css());
        set_style(&self.target, "transform", &step.transform_css());
    }

    fn reset_to_neutral(&mut self) {
        set_style(&self.target, "transform-origin", "50% 50%");
        set_style(&self.target, "transform", "scale(1)");
    }
}
