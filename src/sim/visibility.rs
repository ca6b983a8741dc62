//! Visibility hysteresis
//!
//! The observer reports crossings of a few fixed ratios. Only two of them
//! matter: above `arm_ratio` is an enter, below `disarm_ratio` is a leave.
//! Anything in between is the dead band and produces nothing.

use serde::{Deserialize, Serialize};

use crate::consts::{ARM_RATIO, DISARM_RATIO};

/// Edge detected from a visibility ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEdge {
    Enter,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityBand {
    pub arm_ratio: f64,
    pub disarm_ratio: f64,
}

impl Default for VisibilityBand {
    fn default() -> Self {
        Self {
            arm_ratio: ARM_RATIO,
            disarm_ratio: DISARM_RATIO,
        }
    }
}

impl VisibilityBand {
    pub fn new(arm_ratio: f64, disarm_ratio: f64) -> Self {
        Self {
            arm_ratio,
            disarm_ratio,
        }
    }

    /// Both bounds are strict: exactly `arm_ratio` does not arm.
    pub fn classify(&self, ratio: f64) -> Option<VisibilityEdge> {
        if ratio > self.arm_ratio {
            Some(VisibilityEdge::Enter)
        } else if ratio < self.disarm_ratio {
            Some(VisibilityEdge::Leave)
        } else {
            None
        }
    }

    /// A band with `disarm_ratio >= arm_ratio` has no dead zone and will flicker
    pub fn is_valid(&self) -> bool {
        self.disarm_ratio < self.arm_ratio
            && (0.0..=1.0).contains(&self.disarm_ratio)
            && (0.0..=1.0).contains(&self.arm_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_band() {
        let band = VisibilityBand::default();
        assert!(band.is_valid());
        assert_eq!(band.classify(0.7), Some(VisibilityEdge::Enter));
        assert_eq!(band.classify(1.0), Some(VisibilityEdge::Enter));
        assert_eq!(band.classify(0.1), Some(VisibilityEdge::Leave));
        assert_eq!(band.classify(0.0), Some(VisibilityEdge::Leave));
    }

    #[test]
    fn test_dead_band_is_silent() {
        let band = VisibilityBand::default();
        for ratio in [0.2, 0.3, 0.5, 0.6] {
            assert_eq!(band.classify(ratio), None, "ratio {ratio}");
        }
    }

    #[test]
    fn test_inverted_band_is_invalid() {
        assert!(!VisibilityBand::new(0.2, 0.6).is_valid());
        assert!(!VisibilityBand::new(1.5, 0.2).is_valid());
    }
}
