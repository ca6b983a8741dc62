//! Effect settings
//!
//! Declared on the page as JSON in `<body data-fx-config="...">`. Missing
//! fields fall back to defaults. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{OpennessSim, VisibilityBand};

/// Door game difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Openness per frame per click in the window
    pub fn gain_per_rate(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.25,
            Difficulty::Normal => GAIN_PER_RATE,
            Difficulty::Hard => 0.2,
        }
    }

    /// Openness lost per frame
    pub fn decay_per_tick(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => DECAY_PER_TICK,
            Difficulty::Hard => 0.8,
        }
    }
}

/// Door game physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorTuning {
    pub gain_per_rate: f32,
    pub decay_per_tick: f32,
    pub max_openness: f32,
    pub window_ms: u64,
}

impl Default for DoorTuning {
    fn default() -> Self {
        Self {
            gain_per_rate: GAIN_PER_RATE,
            decay_per_tick: DECAY_PER_TICK,
            max_openness: MAX_OPENNESS,
            window_ms: CLICK_WINDOW_MS,
        }
    }
}

impl DoorTuning {
    pub fn simulator(&self) -> OpennessSim {
        OpennessSim::new(self.gain_per_rate, self.decay_per_tick, self.max_openness)
    }

    /// Clicks per window needed to hold the doors still
    pub fn hold_rate(&self) -> f32 {
        self.simulator().hold_rate()
    }
}

/// Hover zoom timeline (ms)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomTiming {
    /// Before the first step
    pub start_delay_ms: f64,
    /// Between consecutive steps
    pub dwell_ms: f64,
    /// CSS transition length of one step
    pub transition_ms: f64,
    /// Hold after the last transition before reverting
    pub outro_ms: f64,
}

impl Default for ZoomTiming {
    fn default() -> Self {
        Self {
            start_delay_ms: ZOOM_START_DELAY_MS,
            dwell_ms: ZOOM_DWELL_MS,
            transition_ms: ZOOM_TRANSITION_MS,
            outro_ms: ZOOM_OUTRO_MS,
        }
    }
}

impl ZoomTiming {
    /// Offset of step `index` from `play`
    pub fn step_at(&self, index: usize) -> f64 {
        self.start_delay_ms + index as f64 * self.dwell_ms
    }

    /// Offset of the neutral revert for a sequence of `steps`
    pub fn revert_at(&self, steps: usize) -> f64 {
        self.step_at(steps.saturating_sub(1)) + self.transition_ms + self.outro_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxSettings {
    pub difficulty: Difficulty,
    pub door: DoorTuning,
    pub band: VisibilityBand,
    pub zoom: ZoomTiming,
    /// `KeyboardEvent.key` values that count as a click
    pub input_keys: Vec<String>,
}

impl Default for FxSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            door: DoorTuning::default(),
            band: VisibilityBand::default(),
            zoom: ZoomTiming::default(),
            input_keys: vec![" ".to_string(), "Enter".to_string()],
        }
    }
}

impl FxSettings {
    /// Settings with a difficulty preset applied
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Overwrite gain/decay with the preset's values
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.door.gain_per_rate = preset.gain_per_rate();
        self.door.decay_per_tick = preset.decay_per_tick();
    }

    /// Parse page JSON. Explicit `door` values win over the preset's.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let mut settings: Self = serde_json::from_value(value.clone())?;

        let door = value.get("door");
        let explicit = |key: &str| door.and_then(|d| d.get(key)).is_some();
        let preset = settings.difficulty;
        if !explicit("gain_per_rate") {
            settings.door.gain_per_rate = preset.gain_per_rate();
        }
        if !explicit("decay_per_tick") {
            settings.door.decay_per_tick = preset.decay_per_tick();
        }

        if !settings.band.is_valid() {
            log::warn!(
                "Visibility band {:?} has no dead zone, using defaults",
                settings.band
            );
            settings.band = VisibilityBand::default();
        }
        Ok(settings)
    }

    pub fn is_input_key(&self, key: &str) -> bool {
        self.input_keys.iter().any(|k| k == key)
    }

    /// Page attribute holding the JSON
    const CONFIG_ATTRIBUTE: &'static str = "data-fx-config";

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .and_then(|b| b.get_attribute(Self::CONFIG_ATTRIBUTE));

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!(
                        "Loaded fx settings ({} difficulty)",
                        settings.difficulty.as_str()
                    );
                    return settings;
                }
                Err(e) => log::warn!("Ignoring bad {}: {}", Self::CONFIG_ATTRIBUTE, e),
            }
        }

        log::info!("Using default fx settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No page to read {} from", Self::CONFIG_ATTRIBUTE);
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let s = FxSettings::default();
        assert_eq!(s.difficulty, Difficulty::Normal);
        assert_eq!(s.door.gain_per_rate, GAIN_PER_RATE);
        assert_eq!(s.door.decay_per_tick, DECAY_PER_TICK);
        assert_eq!(s.band.arm_ratio, ARM_RATIO);
        assert!(s.is_input_key(" "));
        assert!(s.is_input_key("Enter"));
        assert!(!s.is_input_key("a"));
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("medium"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("brutal"), None);
        assert_eq!(Difficulty::Easy.as_str(), "Easy");
    }

    #[test]
    fn test_preset_hold_rates() {
        let hold = |d| FxSettings::from_preset(d).door.hold_rate();
        assert!((hold(Difficulty::Easy) - 2.0).abs() < 1e-5);
        assert!((hold(Difficulty::Normal) - 3.0).abs() < 1e-5);
        assert!((hold(Difficulty::Hard) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_from_json_partial() {
        let s = FxSettings::from_json(r#"{"zoom": {"dwell_ms": 900}}"#).unwrap();
        assert_eq!(s.zoom.dwell_ms, 900.0);
        assert_eq!(s.zoom.start_delay_ms, ZOOM_START_DELAY_MS);
        assert_eq!(s.door, DoorTuning::default());
    }

    #[test]
    fn test_from_json_preset_and_override() {
        let s = FxSettings::from_json(r#"{"difficulty": "Hard"}"#).unwrap();
        assert_eq!(s.door.decay_per_tick, 0.8);

        let s = FxSettings::from_json(r#"{"difficulty": "Hard", "door": {"decay_per_tick": 1.0}}"#)
            .unwrap();
        assert_eq!(s.door.decay_per_tick, 1.0);
        assert_eq!(s.door.gain_per_rate, 0.2);
    }

    #[test]
    fn test_from_json_rejects_inverted_band() {
        let s = FxSettings::from_json(r#"{"band": {"arm_ratio": 0.1, "disarm_ratio": 0.5}}"#)
            .unwrap();
        assert_eq!(s.band, VisibilityBand::default());
    }

    #[test]
    fn test_from_json_custom_input_keys() {
        let s = FxSettings::from_json(r#"{"input_keys": ["x"]}"#).unwrap();
        assert!(s.is_input_key("x"));
        assert!(!s.is_input_key(" "));
        assert!(!s.is_input_key("Enter"));
    }

    #[test]
    fn test_from_json_syntax_error() {
        assert!(FxSettings::from_json("{not json").is_err());
    }

    #[test]
    fn test_zoom_timeline() {
        let t = ZoomTiming::default();
        assert_eq!(t.step_at(0), 80.0);
        assert_eq!(t.step_at(1), 1280.0);
        assert_eq!(t.revert_at(2), 1880.0);
    }
}
