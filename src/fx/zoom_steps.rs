//! Zoom step lists
//!
//! Declared on the page as a delimited string, e.g.
//! `"10% 40% 3; 50% 50% 3"`. Entries split on `;` or `|`, fields on
//! whitespace or `,`. Focus values are percentages, the `%` is optional.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One stop of a hover zoom: where to zoom and how far
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomStep {
    /// Transform origin in percent of the element box
    pub focus: Vec2,
    pub scale: f32,
}

impl ZoomStep {
    pub fn new(focus_x: f32, focus_y: f32, scale: f32) -> Self {
        Self {
            focus: Vec2::new(focus_x, focus_y),
            scale,
        }
    }

    /// All fields are real numbers
    pub fn is_usable(&self) -> bool {
        self.focus.is_finite() && self.scale.is_finite()
    }

    /// CSS `transform-origin` value
    pub fn origin_css(&self) -> String {
        format!("{}% {}%", self.focus.x, self.focus.y)
    }

    /// CSS `transform` value. A NaN scale yields an invalid transform the
    /// browser ignores.
    pub fn transform_css(&self) -> String {
        format!("scale({})", self.scale)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoomParseError {
    #[error("zoom entry {entry}: missing {field}")]
    MissingField { entry: usize, field: &'static str },
    #[error("zoom entry {entry}: {field} is not a number: {value:?}")]
    InvalidNumber {
        entry: usize,
        field: &'static str,
        value: String,
    },
}

const FIELDS: [&str; 3] = ["focus x", "focus y", "scale"];

fn entries(spec: &str) -> impl Iterator<Item = &str> {
    spec.split([';', '|'])
        .map(str::trim)
        .filter(|e| !e.is_empty())
}

fn fields(entry: &str) -> Vec<&str> {
    entry
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|f| !f.is_empty())
        .collect()
}

fn parse_field(raw: &str, percent: bool) -> Option<f32> {
    let raw = if percent {
        raw.strip_suffix('%').unwrap_or(raw)
    } else {
        raw
    };
    raw.trim().parse::<f32>().ok()
}

/// Permissive parse: a bad or missing number becomes NaN and parsing carries
/// on. Only empty entries are dropped.
pub fn parse_zoom_steps(spec: &str) -> Vec<ZoomStep> {
    entries(spec)
        .map(|entry| {
            let f = fields(entry);
            let num = |i: usize| {
                f.get(i)
                    .and_then(|raw| parse_field(raw, i < 2))
                    .unwrap_or(f32::NAN)
            };
            ZoomStep::new(num(0), num(1), num(2))
        })
        .collect()
}

/// Strict parse: the first bad entry fails the whole list
pub fn parse_zoom_steps_strict(spec: &str) -> Result<Vec<ZoomStep>, ZoomParseError> {
    entries(spec)
        .enumerate()
        .map(|(entry, raw_entry)| -> Result<ZoomStep, ZoomParseError> {
            let f = fields(raw_entry);
            let mut values = [0.0f32; 3];
            for (i, field) in FIELDS.iter().copied().enumerate() {
                let raw = f
                    .get(i)
                    .ok_or(ZoomParseError::MissingField { entry, field })?;
                values[i] = parse_field(raw, i < 2)
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ZoomParseError::InvalidNumber {
                        entry,
                        field,
                        value: raw.to_string(),
                    })?;
            }
            Ok(ZoomStep::new(values[0], values[1], values[2]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_steps() {
        let steps = parse_zoom_steps("10% 40% 3; 50% 50% 3");
        assert_eq!(
            steps,
            vec![ZoomStep::new(10.0, 40.0, 3.0), ZoomStep::new(50.0, 50.0, 3.0)]
        );
    }

    #[test]
    fn test_parse_alternate_separators() {
        let steps = parse_zoom_steps("10,40,2 | 75%, 20%, 1.5|");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1], ZoomStep::new(75.0, 20.0, 1.5));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_zoom_steps("").is_empty());
        assert!(parse_zoom_steps(" ; ; ").is_empty());
    }

    #[test]
    fn test_bad_scale_is_kept_as_nan() {
        let steps = parse_zoom_steps("10% 40% big; 50% 50% 2");
        assert_eq!(steps.len(), 2);
        assert!(steps[0].scale.is_nan());
        assert_eq!(steps[0].focus, Vec2::new(10.0, 40.0));
        assert!(!steps[0].is_usable());
        assert!(steps[1].is_usable());
        assert_eq!(steps[0].transform_css(), "scale(NaN)");
    }

    #[test]
    fn test_missing_fields_are_nan() {
        let steps = parse_zoom_steps("20%");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].focus.x, 20.0);
        assert!(steps[0].focus.y.is_nan());
        assert!(steps[0].scale.is_nan());
    }

    #[test]
    fn test_strict_rejects_bad_scale() {
        let err = parse_zoom_steps_strict("10% 40% 3; 50% 50% big").unwrap_err();
        assert_eq!(
            err,
            ZoomParseError::InvalidNumber {
                entry: 1,
                field: "scale",
                value: "big".to_string(),
            }
        );
    }

    #[test]
    fn test_strict_missing_field() {
        let err = parse_zoom_steps_strict("10% 40%").unwrap_err();
        assert_eq!(
            err,
            ZoomParseError::MissingField {
                entry: 0,
                field: "scale",
            }
        );
        assert_eq!(err.to_string(), "zoom entry 0: missing scale");
    }

    #[test]
    fn test_strict_accepts_valid() {
        let steps = parse_zoom_steps_strict("10% 40% 3").unwrap();
        assert_eq!(steps, vec![ZoomStep::new(10.0, 40.0, 3.0)]);
    }

    #[test]
    fn test_css_values() {
        let step = ZoomStep::new(10.0, 40.0, 3.0);
        assert_eq!(step.origin_css(), "10% 40%");
        assert_eq!(step.transform_css(), "scale(3)");
    }
}
