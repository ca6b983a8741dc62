//! Door Rush - scroll and hover effects for a long-form page
//!
//! Core modules:
//! - `sim`: Deterministic door game state (click window, openness, visibility band)
//! - `schedule`: Frame/timer scheduling seam plus a manual clock for tests
//! - `renderer`: Visual seams the effects drive (doors, zoomed images)
//! - `fx`: Effect controllers (hover zoom timer-chain, door lifecycle)
//! - `platform`: Browser implementations of the seams (wasm32 only)
//! - `settings`: Declarative tuning loaded from the page

pub mod fx;
pub mod platform;
pub mod renderer;
pub mod schedule;
pub mod settings;
pub mod sim;

pub use fx::{DoorGame, Transition, ZoomSequencer, ZoomStep, parse_zoom_steps};
pub use settings::{Difficulty, FxSettings};

/// Effect configuration constants
pub mod consts {
    /// Trailing click window (ms). Rate is reported as clicks per window.
    pub const CLICK_WINDOW_MS: u64 = 1000;

    /// Openness gained per frame for each click in the window
    pub const GAIN_PER_RATE: f32 = 0.2;
    /// Openness lost per frame regardless of input
    pub const DECAY_PER_TICK: f32 = 0.6;
    /// Fully open; reaching this completes the game
    pub const MAX_OPENNESS: f32 = 100.0;

    /// Visibility ratio above which the game arms
    pub const ARM_RATIO: f64 = 0.6;
    /// Visibility ratio below which the game disarms
    pub const DISARM_RATIO: f64 = 0.2;
    /// Ratios the visibility observer reports crossings for
    pub const VISIBILITY_THRESHOLDS: [f64; 4] = [0.0, 0.2, 0.6, 1.0];

    /// Hover zoom timing defaults (ms)
    pub const ZOOM_START_DELAY_MS: f64 = 80.0;
    pub const ZOOM_DWELL_MS: f64 = 1200.0;
    pub const ZOOM_TRANSITION_MS: f64 = 300.0;
    pub const ZOOM_OUTRO_MS: f64 = 300.0;

    /// Frame length used by the manual scheduler (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
