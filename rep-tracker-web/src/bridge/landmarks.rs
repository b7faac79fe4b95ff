//! Landmark decoding for the JS bridge
//!
//! JavaScript hands over MediaPipe pose results as one flat Float32Array.

use crate::error::{Result, TrackerError};
use crate::geometry::{Landmark, LandmarkFrame, LANDMARK_COUNT};

// ============================================================================
// WIRE LAYOUT
// ============================================================================

/// Values per landmark: x, y, z, visibility
pub const VALUES_PER_LANDMARK: usize = 4;

/// Length of a full frame on the wire
pub const FRAME_VALUES: usize = LANDMARK_COUNT * VALUES_PER_LANDMARK;

// ============================================================================
// DECODING
// ============================================================================

/// Decode a flat frame. `Ok(None)` means no pose was detected.
///
/// A NaN x marks a missing landmark. A NaN z or visibility just drops that
/// field.
pub fn decode_frame(data: &[f32]) -> Result<Option<LandmarkFrame>> {
    if data.is_empty() {
        return Ok(None);
    }
    if data.len() != FRAME_VALUES {
        return Err(TrackerError::InvalidFrameLength {
            expected: FRAME_VALUES,
            actual: data.len(),
        });
    }

    let points = data
        .chunks_exact(VALUES_PER_LANDMARK)
        .map(decode_landmark)
        .collect();

    Ok(Some(LandmarkFrame::new(points)))
}

fn decode_landmark(chunk: &[f32]) -> Option<Landmark> {
    let (x, y, z, visibility) = (chunk[0], chunk[1], chunk[2], chunk[3]);
    if x.is_nan() {
        return None;
    }

    let mut landmark = Landmark::new(x as f64, y as f64);
    if z.is_finite() {
        landmark = landmark.with_z(z as f64);
    }
    if visibility.is_finite() {
        landmark = landmark.with_visibility(visibility as f64);
    }
    Some(landmark)
}
