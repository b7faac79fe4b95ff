//! Per-exercise threshold tables
//!
//! Both exercises run the same state machine; everything that differs
//! between them lives in one `ExerciseThresholds` record per exercise.

use serde::{Deserialize, Serialize};

use super::exercise::Exercise;
use crate::geometry::AngleSnapshot;

/// The joint whose flexion drives the rep phases
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryJoint {
    Elbow,
    Knee,
}

impl PrimaryJoint {
    pub fn read(&self, snapshot: &AngleSnapshot) -> f64 {
        match self {
            PrimaryJoint::Elbow => snapshot.elbow_angle,
            PrimaryJoint::Knee => snapshot.knee_angle,
        }
    }
}

/// Body alignment bounds. Each bound that is set requires a finite reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PostureBand {
    pub min_straightness: Option<f64>,
    pub min_inclination: Option<f64>,
    pub max_inclination: Option<f64>,
}

impl PostureBand {
    pub fn accepts(&self, snapshot: &AngleSnapshot) -> bool {
        let straightness = snapshot.body_straightness;
        let inclination = snapshot.torso_inclination;

        if let Some(min) = self.min_straightness {
            if !(straightness.is_finite() && straightness >= min) {
                return false;
            }
        }
        if let Some(min) = self.min_inclination {
            if !(inclination.is_finite() && inclination >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_inclination {
            if !(inclination.is_finite() && inclination <= max) {
                return false;
            }
        }
        true
    }
}

/// Inclusive angle range in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min: f64,
    pub max: f64,
}

impl AngleRange {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Everything exercise-specific about rep detection
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExerciseThresholds {
    pub exercise: Exercise,
    pub primary: PrimaryJoint,

    /// Primary angle must drop below this to reach the bottom
    pub down_angle: f64,
    /// Whether exactly `down_angle` already counts as the bottom
    pub down_inclusive: bool,
    /// Primary angle must reach this to count as extended
    pub up_angle: f64,
    /// Minimum max-min primary angle over the cycle
    pub min_rom: f64,
    /// Minimum head travel as a fraction of mean torso length
    pub min_head_travel: f64,
    pub min_descent_ms: f64,
    pub min_ascent_ms: f64,

    /// Posture needed to start a cycle and to finish a rep
    pub entry_posture: PostureBand,
    /// Posture that must hold on every frame of a cycle
    pub hold_posture: PostureBand,
    /// Minimum average straightness over a counted rep
    pub min_rep_straightness: f64,
    /// Hip angle window at the bottom, squat only
    pub bottom_hip: Option<AngleRange>,
}

pub const PUSHUP_THRESHOLDS: ExerciseThresholds = ExerciseThresholds {
    exercise: Exercise::Pushup,
    primary: PrimaryJoint::Elbow,
    down_angle: 105.0,
    down_inclusive: true,
    up_angle: 155.0,
    min_rom: 30.0,
    min_head_travel: 0.08,
    min_descent_ms: 180.0,
    min_ascent_ms: 180.0,
    entry_posture: PostureBand {
        min_straightness: Some(145.0),
        min_inclination: None,
        max_inclination: Some(62.0),
    },
    hold_posture: PostureBand {
        min_straightness: Some(145.0),
        min_inclination: None,
        max_inclination: Some(62.0),
    },
    min_rep_straightness: 145.0,
    bottom_hip: None,
};

pub const SQUAT_THRESHOLDS: ExerciseThresholds = ExerciseThresholds {
    exercise: Exercise::Squat,
    primary: PrimaryJoint::Knee,
    down_angle: 90.0,
    down_inclusive: false,
    up_angle: 165.0,
    min_rom: 45.0,
    min_head_travel: 0.05,
    min_descent_ms: 150.0,
    min_ascent_ms: 150.0,
    entry_posture: PostureBand {
        min_straightness: Some(145.0),
        min_inclination: Some(60.0),
        max_inclination: None,
    },
    // Torso leans forward at the bottom; only reject going horizontal
    hold_posture: PostureBand {
        min_straightness: None,
        min_inclination: Some(30.0),
        max_inclination: None,
    },
    min_rep_straightness: 125.0,
    bottom_hip: Some(AngleRange { min: 35.0, max: 110.0 }),
};

impl ExerciseThresholds {
    pub fn for_exercise(exercise: Exercise) -> &'static ExerciseThresholds {
        match exercise {
            Exercise::Pushup => &PUSHUP_THRESHOLDS,
            Exercise::Squat => &SQUAT_THRESHOLDS,
        }
    }

    pub fn primary_angle(&self, snapshot: &AngleSnapshot) -> f64 {
        self.primary.read(snapshot)
    }

    /// Primary angle is deep enough for the bottom of the movement
    pub fn reaches_depth(&self, primary: f64) -> bool {
        if self.down_inclusive {
            primary <= self.down_angle
        } else {
            primary < self.down_angle
        }
    }

    /// Extended and correctly aligned: starts a cycle, or ends a rep
    pub fn is_extended(&self, snapshot: &AngleSnapshot) -> bool {
        let primary = self.primary_angle(snapshot);
        primary.is_finite() && primary >= self.up_angle && self.entry_posture.accepts(snapshot)
    }

    /// At the bottom of the movement
    pub fn is_bottom(&self, snapshot: &AngleSnapshot) -> bool {
        let primary = self.primary_angle(snapshot);
        if !(primary.is_finite() && self.reaches_depth(primary)) {
            return false;
        }
        match self.bottom_hip {
            Some(range) => range.contains(snapshot.hip_angle),
            None => true,
        }
    }

    pub fn holds_posture(&self, snapshot: &AngleSnapshot) -> bool {
        self.hold_posture.accepts(snapshot)
    }
}
