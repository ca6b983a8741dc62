//! Deterministic door game state
//!
//! Everything here is pure and clock-free:
//! - Timestamps come in as arguments
//! - One `step` per frame, driven by the caller
//! - No rendering, scheduling or platform dependencies

pub mod clicks;
pub mod openness;
pub mod state;
pub mod visibility;

pub use clicks::ClickRateTracker;
pub use openness::OpennessSim;
pub use state::LifecycleState;
pub use visibility::{VisibilityBand, VisibilityEdge};
