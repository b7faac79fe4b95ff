//! Completed repetition record

use serde::{Deserialize, Serialize};

use super::exercise::Exercise;

/// One validated repetition. Immutable once emitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepRecord {
    pub exercise: Exercise,
    pub start_time: f64,
    pub end_time: f64,
    pub duration_ms: f64,
    pub descent_ms: f64,
    pub ascent_ms: f64,

    /// Primary joint (elbow for push-ups, knee for squats)
    pub min_angle: f64,
    pub max_angle: f64,
    pub range_of_motion: f64,

    /// Primary joint variance; holds the elbow variance for push-ups
    pub knee_variance: f64,
    pub hip_variance: f64,
    pub torso_variance: f64,

    /// Averages over the cycle, NaN when never measured
    pub body_straightness: f64,
    pub torso_inclination: f64,
    /// Hip angle when the bottom was reached, NaN for push-ups
    pub bottom_hip_angle: f64,

    /// Vertical head travel over mean torso length
    pub head_travel: f64,

    /// Descent time against a 3 s ceiling, 0-100
    pub intensity_score: Option<u8>,
}

/// Descent duration scaled into 0-100 against a 3 second ceiling
pub fn intensity_from_duration(duration_ms: f64) -> u8 {
    let normalized = (duration_ms / 3000.0 * 100.0).round();
    normalized.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_from_duration() {
        assert_eq!(intensity_from_duration(0.0), 0);
        assert_eq!(intensity_from_duration(1500.0), 50);
        assert_eq!(intensity_from_duration(9000.0), 100);
        assert_eq!(intensity_from_duration(-20.0), 0);
    }
}
