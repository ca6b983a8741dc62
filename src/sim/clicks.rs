//! Sliding click window
//!
//! Counts inputs over the trailing window. Eviction happens lazily in
//! [`ClickRateTracker::rate`], never on a timer.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::CLICK_WINDOW_MS;

/// Registered inputs, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickRateTracker {
    window_ms: u64,
    /// Millisecond timestamps, non-decreasing
    clicks: VecDeque<u64>,
}

impl Default for ClickRateTracker {
    fn default() -> Self {
        Self::new(CLICK_WINDOW_MS)
    }
}

impl ClickRateTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms: window_ms.max(1),
            clicks: VecDeque::new(),
        }
    }

    /// Record an input. No bound is enforced here; `rate` trims.
    pub fn register(&mut self, now_ms: u64) {
        self.clicks.push_back(now_ms);
    }

    /// Evict everything a full window old or older, then return the count.
    ///
    /// With millisecond timestamps the retained set is the trailing
    /// `window_ms - 1` milliseconds, so a click exactly one window old is gone.
    pub fn rate(&mut self, now_ms: u64) -> u32 {
        while let Some(&oldest) = self.clicks.front() {
            if now_ms.saturating_sub(oldest) >= self.window_ms {
                self.clicks.pop_front();
            } else {
                break;
            }
        }
        self.clicks.len() as u32
    }

    /// Drop all recorded inputs (arm/disarm)
    pub fn clear(&mut self) {
        self.clicks.clear();
    }

    /// Retained entries without evicting
    pub fn len(&self) -> usize {
        self.clicks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clicks.is_empty()
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}
