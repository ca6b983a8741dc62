//! Call-log renderer for tests and the native headless run

use std::cell::RefCell;
use std::rc::Rc;

use super::{DoorRenderer, ZoomRenderer};
use crate::fx::ZoomStep;

/// One renderer call, in order
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    ApplyZoom(ZoomStep),
    ResetZoom,
    Entrance,
    DoorOffset(f32),
    ShowOverlay,
    HideOverlay,
    RevealContent,
    HideContent,
}

/// Shared call log. Clones record into the same log, so a test can keep one
/// clone and hand the other to an effect.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    calls: Rc<RefCell<Vec<RenderCall>>>,
    log_calls: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit every call at debug level
    pub fn logged() -> Self {
        Self {
            log_calls: true,
            ..Self::default()
        }
    }

    fn record(&self, call: RenderCall) {
        if self.log_calls {
            log::debug!("render: {:?}", call);
        }
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    pub fn count(&self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|&c| pred(c)).count()
    }

    pub fn last(&self) -> Option<RenderCall> {
        self.calls.borrow().last().cloned()
    }

    /// Most recent door offset, if any was set
    pub fn last_door_offset(&self) -> Option<f32> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            RenderCall::DoorOffset(p) => Some(*p),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl ZoomRenderer for RecordingRenderer {
    fn apply_focus_and_scale(&mut self, step: &ZoomStep) {
        self.record(RenderCall::ApplyZoom(*step));
    }

    fn reset_to_neutral(&mut self) {
        self.record(RenderCall::ResetZoom);
    }
}

impl DoorRenderer for RecordingRenderer {
    fn set_door_offset(&mut self, percent: f32) {
        self.record(RenderCall::DoorOffset(percent));
    }

    fn play_entrance(&mut self) {
        self.record(RenderCall::Entrance);
    }

    fn show_overlay(&mut self) {
        self.record(RenderCall::ShowOverlay);
    }

    fn hide_overlay(&mut self) {
        self.record(RenderCall::HideOverlay);
    }

    fn reveal_content(&mut self) {
        self.record(RenderCall::RevealContent);
    }

    fn hide_content(&mut self) {
        self.record(RenderCall::HideContent);
    }
}
