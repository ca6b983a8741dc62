//! Effect controllers
//!
//! Each controller is an explicit per-element object holding its own state,
//! driving a renderer through a [`crate::schedule::Scheduler`].

pub mod door;
pub mod zoom;
pub mod zoom_steps;

pub use door::{DoorGame, Transition};
pub use zoom::ZoomSequencer;
pub use zoom_steps::{ZoomParseError, ZoomStep, parse_zoom_steps, parse_zoom_steps_strict};
