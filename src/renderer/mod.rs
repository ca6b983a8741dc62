//! Rendering seams
//!
//! Effects push visual state out through these traits and never read it
//! back. The browser implementations write element styles
//! (`platform::DomDoorRenderer`, `platform::DomZoomRenderer`);
//! [`RecordingRenderer`] keeps a call log for tests and headless runs.

pub mod recording;

pub use recording::{RecordingRenderer, RenderCall};

use crate::fx::ZoomStep;

/// Target of a hover zoom sequence
pub trait ZoomRenderer {
    /// Move the transform origin and scale
    fn apply_focus_and_scale(&mut self, step: &ZoomStep);
    /// Back to scale 1, centered
    fn reset_to_neutral(&mut self);
}

/// The door overlay and the content behind it
pub trait DoorRenderer {
    /// Slide each door out by `percent` of its width. 0 is shut, 100 is
    /// fully offscreen.
    fn set_door_offset(&mut self, percent: f32);

    /// Entrance animation when the game arms
    fn play_entrance(&mut self) {
        self.set_door_offset(0.0);
    }

    /// Overlay visible and intercepting input
    fn show_overlay(&mut self);
    /// Overlay hidden and click-through
    fn hide_overlay(&mut self);

    /// No-op when there is nothing to reveal
    fn reveal_content(&mut self);
    fn hide_content(&mut self);
}
