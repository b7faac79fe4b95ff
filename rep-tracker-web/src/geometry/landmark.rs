//! Landmark frame - one detected pose in MediaPipe's 33-point layout

use serde::{Deserialize, Serialize};

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

// ============================================================================
// LANDMARK DATA STRUCTURE
// ============================================================================

/// A single detected joint (normalized coordinates)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64, // 0-1 normalized
    pub y: f64, // 0-1 normalized
    #[serde(default)]
    pub z: f64, // Relative depth, 0 when the model omits it
    #[serde(default)]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0, visibility: None }
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Visibility confidence, 1.0 when the model didn't report one
    pub fn visibility_or_default(&self) -> f64 {
        match self.visibility {
            Some(v) if v.is_finite() => v,
            _ => 1.0,
        }
    }

    /// Both planar coordinates are usable
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One frame of pose landmarks. Missing joints are `None`, never half-filled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    points: Vec<Option<Landmark>>,
}

impl LandmarkFrame {
    /// Build a frame from an ordered landmark list. Short lists are padded
    /// with `None` so index lookups stay valid.
    pub fn new(mut points: Vec<Option<Landmark>>) -> Self {
        if points.len() < LANDMARK_COUNT {
            points.resize(LANDMARK_COUNT, None);
        }
        Self { points }
    }

    /// A frame where every landmark is missing
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_landmarks(points: impl IntoIterator<Item = Landmark>) -> Self {
        Self::new(points.into_iter().map(Some).collect())
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index).and_then(|p| p.as_ref())
    }

    pub fn set(&mut self, index: usize, landmark: Option<Landmark>) {
        if index < self.points.len() {
            self.points[index] = landmark;
        }
    }

    /// True when no landmark at all was detected
    pub fn is_empty(&self) -> bool {
        self.points.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

impl Default for LandmarkFrame {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_frame_is_padded() {
        let frame = LandmarkFrame::from_landmarks(vec![Landmark::new(0.5, 0.5)]);
        assert_eq!(frame.len(), LANDMARK_COUNT);
        assert!(frame.get(NOSE).is_some());
        assert!(frame.get(LEFT_ANKLE).is_none());
        assert!(!frame.is_empty());
        assert!(LandmarkFrame::empty().is_empty());
    }

    #[test]
    fn test_visibility_defaults_to_one() {
        assert_eq!(Landmark::new(0.1, 0.2).visibility_or_default(), 1.0);
        assert_eq!(Landmark::new(0.1, 0.2).with_visibility(0.3).visibility_or_default(), 0.3);
        assert_eq!(Landmark::new(0.1, 0.2).with_visibility(f64::NAN).visibility_or_default(), 1.0);
    }
}
