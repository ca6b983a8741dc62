//! Door game lifecycle phases

use serde::{Deserialize, Serialize};

/// Current phase of the door game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Out of view, nothing runs
    #[default]
    Disarmed,
    /// Armed and doors sliding shut, first frame not run yet
    Arming,
    /// Counting input and stepping openness every frame
    Armed,
    /// Doors fully opened, content revealed; stays here until a disarm
    Completed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Disarmed => "disarmed",
            LifecycleState::Arming => "arming",
            LifecycleState::Armed => "armed",
            LifecycleState::Completed => "completed",
        }
    }

    /// Input is counted and the frame loop runs
    pub fn is_armed(&self) -> bool {
        matches!(self, LifecycleState::Arming | LifecycleState::Armed)
    }
}
