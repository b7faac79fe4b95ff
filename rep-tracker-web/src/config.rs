//! Tracker configuration, optionally supplied by the host as JSON

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::motion::{DEFAULT_TRAIL_CAPACITY, MOBILE_TRAIL_CAPACITY};
use crate::reps::{DetectorSettings, Exercise, DEFAULT_DEBOUNCE_FRAMES, DEFAULT_MIN_REP_INTERVAL_MS};

/// Viewports narrower than this count as mobile
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerConfig {
    pub initial_exercise: Exercise,
    pub debounce_frames: u32,
    pub min_rep_interval_ms: f64,
    pub trail_capacity: usize,
    pub mobile_trail_capacity: usize,
    /// Force the mobile trail size; `None` means detect from the viewport
    pub mobile: Option<bool>,
    pub motion_enabled: bool,
    pub counting_enabled: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            initial_exercise: Exercise::Pushup,
            debounce_frames: DEFAULT_DEBOUNCE_FRAMES,
            min_rep_interval_ms: DEFAULT_MIN_REP_INTERVAL_MS,
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            mobile_trail_capacity: MOBILE_TRAIL_CAPACITY,
            mobile: None,
            motion_enabled: true,
            counting_enabled: true,
        }
    }
}

impl TrackerConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn detector_settings(&self) -> DetectorSettings {
        DetectorSettings {
            debounce_frames: self.debounce_frames.max(1),
            min_rep_interval_ms: self.min_rep_interval_ms.max(0.0),
        }
    }

    /// Trail size for the given display context
    pub fn trail_capacity_for(&self, viewport_width: Option<f64>) -> usize {
        let mobile = self
            .mobile
            .unwrap_or_else(|| viewport_width.is_some_and(|w| w < MOBILE_BREAKPOINT_PX));
        if mobile {
            self.mobile_trail_capacity
        } else {
            self.trail_capacity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use assert_matches::assert_matches;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = TrackerConfig::from_json(r#"{"initialExercise":"squat","debounceFrames":3}"#).unwrap();
        assert_eq!(config.initial_exercise, Exercise::Squat);
        assert_eq!(config.debounce_frames, 3);
        assert_eq!(config.min_rep_interval_ms, DEFAULT_MIN_REP_INTERVAL_MS);
        assert!(config.motion_enabled);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert_matches!(TrackerConfig::from_json("{not json"), Err(TrackerError::Config(_)));
        assert_matches!(
            TrackerConfig::from_json(r#"{"initialExercise":"lunge"}"#),
            Err(TrackerError::Config(_))
        );
    }

    #[test]
    fn test_json_round_trip() {
        let config = TrackerConfig { mobile: Some(true), ..TrackerConfig::default() };
        let parsed = TrackerConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_trail_capacity_by_viewport() {
        let config = TrackerConfig::default();
        assert_eq!(config.trail_capacity_for(Some(390.0)), MOBILE_TRAIL_CAPACITY);
        assert_eq!(config.trail_capacity_for(Some(1440.0)), DEFAULT_TRAIL_CAPACITY);
        assert_eq!(config.trail_capacity_for(None), DEFAULT_TRAIL_CAPACITY);

        let forced = TrackerConfig { mobile: Some(false), ..TrackerConfig::default() };
        assert_eq!(forced.trail_capacity_for(Some(390.0)), DEFAULT_TRAIL_CAPACITY);
    }

    #[test]
    fn test_zero_debounce_is_clamped() {
        let config = TrackerConfig { debounce_frames: 0, ..TrackerConfig::default() };
        assert_eq!(config.detector_settings().debounce_frames, 1);
    }
}
