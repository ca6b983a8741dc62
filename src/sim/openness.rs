//! Door openness integrator
//!
//! One call to [`OpennessSim::step`] per frame. Clicks push the doors apart,
//! a constant decay pulls them shut.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpennessSim {
    openness: f32,
    /// Openness per frame per click in the window
    pub gain_per_rate: f32,
    /// Openness lost per frame
    pub decay_per_tick: f32,
    pub max: f32,
}

impl Default for OpennessSim {
    fn default() -> Self {
        Self::new(GAIN_PER_RATE, DECAY_PER_TICK, MAX_OPENNESS)
    }
}

impl OpennessSim {
    pub fn new(gain_per_rate: f32, decay_per_tick: f32, max: f32) -> Self {
        Self {
            openness: 0.0,
            gain_per_rate,
            decay_per_tick,
            max: max.max(0.0),
        }
    }

    /// Advance one frame with the current click rate. Returns the new openness.
    pub fn step(&mut self, rate: u32) -> f32 {
        // Net delta first so the hold rate is an exact steady state
        let delta = rate as f32 * self.gain_per_rate - self.decay_per_tick;
        let next = self.openness + delta;
        // NaN tuning must not escape the bounds
        self.openness = if next.is_nan() {
            0.0
        } else {
            next.clamp(0.0, self.max)
        };
        self.openness
    }

    pub fn reset(&mut self) {
        self.openness = 0.0;
    }

    pub fn openness(&self) -> f32 {
        self.openness
    }

    /// Openness as a percentage of `max` (door offset)
    pub fn percent(&self) -> f32 {
        if self.max > 0.0 {
            self.openness / self.max * 100.0
        } else {
            100.0
        }
    }

    /// Checked after the clamp, in the same frame
    pub fn is_full(&self) -> bool {
        self.openness >= self.max
    }

    /// Clicks per window needed just to hold position
    pub fn hold_rate(&self) -> f32 {
        if self.gain_per_rate > 0.0 {
            self.decay_per_tick / self.gain_per_rate
        } else {
            f32::INFINITY
        }
    }

    /// Frames until fully open at a constant rate, `None` if that rate never gets there
    pub fn ticks_to_full(&self, rate: u32) -> Option<u32> {
        if self.is_full() {
            return Some(0);
        }
        let delta = rate as f32 * self.gain_per_rate - self.decay_per_tick;
        if delta <= 0.0 {
            return None;
        }
        Some(((self.max - self.openness) / delta).ceil() as u32)
    }
}
