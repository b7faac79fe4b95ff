//! Per-cycle running statistics
//!
//! Lives from the moment a cycle starts (IDLE -> UP) until the rep is
//! counted, rejected, or tracking is lost.

use super::exercise::Exercise;
use super::record::{intensity_from_duration, RepRecord};
use super::thresholds::ExerciseThresholds;
use crate::geometry::AngleSnapshot;

/// Population variance (divides by n). Empty input gives 0.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Arithmetic mean. Empty input gives NaN.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Running aggregate for one in-progress cycle
#[derive(Clone, Debug, PartialEq)]
pub struct CycleAccumulator {
    pub start_time: f64,
    /// Time the bottom was reached, `None` until then
    pub down_time: Option<f64>,
    pub bottom_hip_angle: f64,

    pub min_angle: f64,
    pub max_angle: f64,
    pub primary_samples: Vec<f64>,
    pub hip_samples: Vec<f64>,
    pub inclination_samples: Vec<f64>,
    pub straightness_samples: Vec<f64>,

    pub min_head_y: f64,
    pub max_head_y: f64,
    pub torso_length_sum: f64,
    pub torso_length_count: u32,
}

impl CycleAccumulator {
    /// Start a cycle anchored at this frame
    pub fn begin(timestamp: f64, head_y: f64) -> Self {
        let (min_head_y, max_head_y) = if head_y.is_finite() {
            (head_y, head_y)
        } else {
            (f64::INFINITY, f64::NEG_INFINITY)
        };

        Self {
            start_time: timestamp,
            down_time: None,
            bottom_hip_angle: f64::NAN,
            min_angle: f64::INFINITY,
            max_angle: f64::NEG_INFINITY,
            primary_samples: Vec::new(),
            hip_samples: Vec::new(),
            inclination_samples: Vec::new(),
            straightness_samples: Vec::new(),
            min_head_y,
            max_head_y,
            torso_length_sum: 0.0,
            torso_length_count: 0,
        }
    }

    /// Fold one frame in. Non-finite readings are skipped field by field.
    pub fn sample(&mut self, primary: f64, snapshot: &AngleSnapshot) {
        if primary.is_finite() {
            self.min_angle = self.min_angle.min(primary);
            self.max_angle = self.max_angle.max(primary);
            self.primary_samples.push(primary);
        }

        if snapshot.head_y.is_finite() {
            self.min_head_y = self.min_head_y.min(snapshot.head_y);
            self.max_head_y = self.max_head_y.max(snapshot.head_y);
        }

        if snapshot.hip_angle.is_finite() {
            self.hip_samples.push(snapshot.hip_angle);
        }
        if snapshot.torso_inclination.is_finite() {
            self.inclination_samples.push(snapshot.torso_inclination);
        }
        if snapshot.body_straightness.is_finite() {
            self.straightness_samples.push(snapshot.body_straightness);
        }
        if snapshot.torso_length.is_finite() && snapshot.torso_length > 0.0 {
            self.torso_length_sum += snapshot.torso_length;
            self.torso_length_count += 1;
        }
    }

    pub fn mark_bottom(&mut self, timestamp: f64, hip_angle: f64) {
        self.down_time = Some(timestamp);
        self.bottom_hip_angle = hip_angle;
    }

    /// Max-min primary angle, 0 before any sample
    pub fn range_of_motion(&self) -> f64 {
        if self.primary_samples.is_empty() {
            0.0
        } else {
            self.max_angle - self.min_angle
        }
    }

    /// Vertical head displacement relative to the mean torso length
    pub fn head_travel(&self) -> f64 {
        if !self.min_head_y.is_finite() || !self.max_head_y.is_finite() {
            return 0.0;
        }
        if self.torso_length_count == 0 {
            return 0.0;
        }

        let mean_torso = self.torso_length_sum / self.torso_length_count as f64;
        if !mean_torso.is_finite() || mean_torso <= 0.0 {
            return 0.0;
        }
        (self.max_head_y - self.min_head_y).abs() / mean_torso
    }

    /// Build the rep record as if the cycle ended at `end_time`
    pub fn finish(&self, exercise: Exercise, end_time: f64) -> RepRecord {
        let down_time = self.down_time.unwrap_or(self.start_time);
        let descent_ms = (down_time - self.start_time).max(0.0);
        let ascent_ms = (end_time - down_time).max(0.0);

        RepRecord {
            exercise,
            start_time: self.start_time,
            end_time,
            duration_ms: (end_time - self.start_time).max(0.0),
            descent_ms,
            ascent_ms,
            min_angle: self.min_angle,
            max_angle: self.max_angle,
            range_of_motion: self.range_of_motion(),
            knee_variance: variance(&self.primary_samples),
            hip_variance: variance(&self.hip_samples),
            torso_variance: variance(&self.inclination_samples),
            body_straightness: average(&self.straightness_samples),
            torso_inclination: average(&self.inclination_samples),
            bottom_hip_angle: self.bottom_hip_angle,
            head_travel: self.head_travel(),
            intensity_score: Some(intensity_from_duration(descent_ms)),
        }
    }
}

/// Why a finished cycle was not counted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepRejection {
    NeverReachedBottom,
    ShallowBottom,
    IncompleteLockout,
    RangeOfMotion,
    DescentTooFast,
    AscentTooFast,
    HeadTravel,
    BottomHipAngle,
    Straightness,
    TooSoonAfterPrevious,
}

/// Run the validation gate over a candidate rep
///
/// `last_rep_end` is the end time of the previously counted rep, if any.
pub fn validate(
    cycle: &CycleAccumulator,
    rep: &RepRecord,
    thresholds: &ExerciseThresholds,
    last_rep_end: Option<f64>,
    min_rep_interval_ms: f64,
) -> Result<(), RepRejection> {
    if cycle.down_time.is_none() {
        return Err(RepRejection::NeverReachedBottom);
    }
    if !(rep.min_angle.is_finite() && thresholds.reaches_depth(rep.min_angle)) {
        return Err(RepRejection::ShallowBottom);
    }
    if !(rep.max_angle >= thresholds.up_angle) {
        return Err(RepRejection::IncompleteLockout);
    }
    if rep.range_of_motion < thresholds.min_rom {
        return Err(RepRejection::RangeOfMotion);
    }
    if rep.descent_ms < thresholds.min_descent_ms {
        return Err(RepRejection::DescentTooFast);
    }
    if rep.ascent_ms < thresholds.min_ascent_ms {
        return Err(RepRejection::AscentTooFast);
    }
    if rep.head_travel < thresholds.min_head_travel {
        return Err(RepRejection::HeadTravel);
    }
    if let Some(range) = thresholds.bottom_hip {
        if !range.contains(rep.bottom_hip_angle) {
            return Err(RepRejection::BottomHipAngle);
        }
    }
    if !(rep.body_straightness >= thresholds.min_rep_straightness) {
        return Err(RepRejection::Straightness);
    }
    if let Some(prev_end) = last_rep_end {
        if rep.end_time - prev_end < min_rep_interval_ms {
            return Err(RepRejection::TooSoonAfterPrevious);
        }
    }
    Ok(())
}
