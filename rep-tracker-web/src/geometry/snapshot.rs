//! Angle snapshot - the per-frame scalar bundle the rep detector consumes

use serde::{Deserialize, Serialize};

use super::angles;
use super::landmark::LandmarkFrame;

/// Derived angles and body metrics for one frame
///
/// Any field is NaN when the landmarks it needs were missing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleSnapshot {
    pub elbow_angle: f64,
    pub knee_angle: f64,
    pub hip_angle: f64,
    pub body_straightness: f64,
    pub torso_inclination: f64,
    pub head_y: f64,
    pub torso_length: f64,
    /// Frame time in milliseconds
    pub timestamp: f64,
}

impl AngleSnapshot {
    /// Compute every metric from a landmark frame
    pub fn from_frame(frame: &LandmarkFrame, timestamp: f64) -> Self {
        Self {
            elbow_angle: angles::elbow_angle(frame),
            knee_angle: angles::knee_angle(frame),
            hip_angle: angles::hip_angle(frame),
            body_straightness: angles::body_straightness(frame),
            torso_inclination: angles::torso_inclination(frame),
            head_y: angles::head_y(frame),
            torso_length: angles::torso_length(frame),
            timestamp,
        }
    }

    /// A snapshot with nothing measured
    pub fn empty(timestamp: f64) -> Self {
        Self {
            elbow_angle: f64::NAN,
            knee_angle: f64::NAN,
            hip_angle: f64::NAN,
            body_straightness: f64::NAN,
            torso_inclination: f64::NAN,
            head_y: f64::NAN,
            torso_length: f64::NAN,
            timestamp,
        }
    }

    /// Frames without a head position can't anchor head travel, so they
    /// never reach the detector.
    pub fn is_trackable(&self) -> bool {
        self.head_y.is_finite()
    }
}

/// What the host hands the tracker each frame
///
/// Raw landmarks are resolved into a snapshot once, at the entry point.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameInput {
    Landmarks(LandmarkFrame),
    Angles(AngleSnapshot),
}

impl FrameInput {
    /// Resolve into the canonical snapshot. `None` for untrackable frames.
    pub fn into_snapshot(self, timestamp: f64) -> Option<AngleSnapshot> {
        let snapshot = match self {
            FrameInput::Landmarks(frame) => AngleSnapshot::from_frame(&frame, timestamp),
            FrameInput::Angles(mut snapshot) => {
                snapshot.timestamp = timestamp;
                snapshot
            }
        };

        snapshot.is_trackable().then_some(snapshot)
    }

    pub fn landmarks(&self) -> Option<&LandmarkFrame> {
        match self {
            FrameInput::Landmarks(frame) => Some(frame),
            FrameInput::Angles(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::landmark::{Landmark, NOSE};

    #[test]
    fn test_frame_without_nose_is_dropped() {
        let input = FrameInput::Landmarks(LandmarkFrame::empty());
        assert!(input.into_snapshot(100.0).is_none());
    }

    #[test]
    fn test_frame_with_nose_only_has_nan_angles() {
        let mut frame = LandmarkFrame::empty();
        frame.set(NOSE, Some(Landmark::new(0.5, 0.2)));

        let snapshot = FrameInput::Landmarks(frame).into_snapshot(40.0).unwrap();
        assert_eq!(snapshot.head_y, 0.2);
        assert_eq!(snapshot.timestamp, 40.0);
        assert!(snapshot.elbow_angle.is_nan());
        assert!(snapshot.knee_angle.is_nan());
        assert!(snapshot.torso_length.is_nan());
    }

    #[test]
    fn test_angle_input_takes_frame_timestamp() {
        let mut snapshot = AngleSnapshot::empty(0.0);
        snapshot.head_y = 0.3;
        snapshot.knee_angle = 120.0;

        let resolved = FrameInput::Angles(snapshot).into_snapshot(500.0).unwrap();
        assert_eq!(resolved.timestamp, 500.0);
        assert_eq!(resolved.knee_angle, 120.0);
    }
}
