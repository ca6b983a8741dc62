//! Platform abstraction layer
//!
//! Browser implementations of the crate's seams:
//! - Time and scheduling (`requestAnimationFrame`, `setTimeout`)
//! - Door and zoom renderers writing element styles
//!
//! Native builds use `schedule::ManualScheduler` and
//! `renderer::RecordingRenderer` instead.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{BrowserScheduler, DomDoorRenderer, DomZoomRenderer};

/// Page hooks the browser build looks for
pub mod selectors {
    /// Section holding the door game
    pub const DOOR_ROOT_ID: &str = "door-game";
    pub const DOOR_LEFT: &str = ".door-left";
    pub const DOOR_RIGHT: &str = ".door-right";
    /// Element covering the section that receives clicks
    pub const DOOR_OVERLAY: &str = ".door-overlay";
    /// Content revealed once the doors are open
    pub const DOOR_CONTENT: &str = ".door-content";
    /// Class toggled on the content when revealed
    pub const REVEALED_CLASS: &str = "revealed";

    /// Attribute carrying a zoom step list
    pub const ZOOM_ATTRIBUTE: &str = "data-zoom-steps";
    /// Element inside a zoom host that gets transformed
    pub const ZOOM_TARGET: &str = "img";
}
