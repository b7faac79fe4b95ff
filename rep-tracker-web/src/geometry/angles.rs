//! Joint angle calculation using dot product
//!
//! Every function here returns NaN instead of failing: a missing landmark or
//! a zero-length limb just means "no reading this frame".

use nalgebra::Vector3;

use super::landmark::*;

const LEFT_ELBOW_CHAIN: [usize; 3] = [LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST];
const RIGHT_ELBOW_CHAIN: [usize; 3] = [RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST];
const LEFT_KNEE_CHAIN: [usize; 3] = [LEFT_HIP, LEFT_KNEE, LEFT_ANKLE];
const RIGHT_KNEE_CHAIN: [usize; 3] = [RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE];
const LEFT_HIP_CHAIN: [usize; 3] = [LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE];
const RIGHT_HIP_CHAIN: [usize; 3] = [RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE];

fn to_vector(p: &Landmark) -> Vector3<f64> {
    Vector3::new(p.x, p.y, p.z)
}

/// Calculate the angle at vertex `b` in degrees
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// Returns NaN when a point is missing or either ray has zero length.
pub fn angle(a: Option<&Landmark>, b: Option<&Landmark>, c: Option<&Landmark>) -> f64 {
    let (Some(a), Some(b), Some(c)) = (a, b, c) else {
        return f64::NAN;
    };

    // Rays from the vertex out to each end
    let v1 = to_vector(a) - to_vector(b);
    let v2 = to_vector(c) - to_vector(b);

    let mag1 = v1.norm();
    let mag2 = v2.norm();
    if mag1 == 0.0 || mag2 == 0.0 {
        return f64::NAN;
    }

    // Floating-point overshoot can push the ratio just past ±1
    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Midpoint of a left/right pair, `None` if either side is unusable
pub fn midpoint(a: Option<&Landmark>, b: Option<&Landmark>) -> Option<Landmark> {
    let (a, b) = (a?, b?);
    if !a.is_finite() || !b.is_finite() {
        return None;
    }

    let z = |p: &Landmark| if p.z.is_finite() { p.z } else { 0.0 };
    Some(Landmark::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0).with_z((z(a) + z(b)) / 2.0))
}

/// Planar distance between two points
pub fn distance_2d(a: Option<&Landmark>, b: Option<&Landmark>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a.is_finite() && b.is_finite() => (a.x - b.x).hypot(a.y - b.y),
        _ => f64::NAN,
    }
}

/// Pick the better-tracked side of a bilateral joint chain
///
/// Sums visibility over each side's landmarks (missing ones count 0).
/// Ties go to the left side.
pub fn pick_side<'a>(
    frame: &'a LandmarkFrame,
    left: [usize; 3],
    right: [usize; 3],
) -> [Option<&'a Landmark>; 3] {
    let score = |indices: &[usize; 3]| -> f64 {
        indices
            .iter()
            .filter_map(|&i| frame.get(i))
            .map(Landmark::visibility_or_default)
            .sum()
    };

    let chosen = if score(&left) >= score(&right) { left } else { right };
    chosen.map(|i| frame.get(i))
}

fn chain_angle(frame: &LandmarkFrame, left: [usize; 3], right: [usize; 3]) -> f64 {
    let [a, b, c] = pick_side(frame, left, right);
    angle(a, b, c)
}

/// Elbow angle (shoulder-elbow-wrist), 180° = arm straight
pub fn elbow_angle(frame: &LandmarkFrame) -> f64 {
    chain_angle(frame, LEFT_ELBOW_CHAIN, RIGHT_ELBOW_CHAIN)
}

/// Knee angle (hip-knee-ankle), 180° = leg straight
pub fn knee_angle(frame: &LandmarkFrame) -> f64 {
    chain_angle(frame, LEFT_KNEE_CHAIN, RIGHT_KNEE_CHAIN)
}

/// Hip angle (shoulder-hip-knee), closes as the torso folds over the thighs
pub fn hip_angle(frame: &LandmarkFrame) -> f64 {
    chain_angle(frame, LEFT_HIP_CHAIN, RIGHT_HIP_CHAIN)
}

fn shoulder_mid(frame: &LandmarkFrame) -> Option<Landmark> {
    midpoint(frame.get(LEFT_SHOULDER), frame.get(RIGHT_SHOULDER))
}

fn hip_mid(frame: &LandmarkFrame) -> Option<Landmark> {
    midpoint(frame.get(LEFT_HIP), frame.get(RIGHT_HIP))
}

/// Shoulder-hip-ankle angle measured at the hip midpoint
///
/// 180° = a straight plank or an upright stance.
pub fn body_straightness(frame: &LandmarkFrame) -> f64 {
    let ankle = midpoint(frame.get(LEFT_ANKLE), frame.get(RIGHT_ANKLE));
    angle(shoulder_mid(frame).as_ref(), hip_mid(frame).as_ref(), ankle.as_ref())
}

/// Angle of the shoulder→hip line from horizontal, in [0, 90]
///
/// 90° = torso vertical, 0° = torso horizontal.
pub fn torso_inclination(frame: &LandmarkFrame) -> f64 {
    let (Some(shoulder), Some(hip)) = (shoulder_mid(frame), hip_mid(frame)) else {
        return f64::NAN;
    };

    let dx = (shoulder.x - hip.x).abs();
    let dy = (shoulder.y - hip.y).abs();
    dy.atan2(dx).to_degrees()
}

/// Shoulder-midpoint to hip-midpoint distance in normalized units
pub fn torso_length(frame: &LandmarkFrame) -> f64 {
    distance_2d(shoulder_mid(frame).as_ref(), hip_mid(frame).as_ref())
}

/// Vertical head position (nose y)
pub fn head_y(frame: &LandmarkFrame) -> f64 {
    match frame.get(NOSE) {
        Some(nose) if nose.y.is_finite() => nose.y,
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Landmark {
        Landmark::new(x, y)
    }

    #[test]
    fn test_straight_arm() {
        let angle = angle(Some(&p(0.0, 0.0)), Some(&p(0.5, 0.0)), Some(&p(1.0, 0.0)));
        assert!((angle - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_bent_arm() {
        let angle = angle(Some(&p(0.0, 0.0)), Some(&p(0.5, 0.0)), Some(&p(0.5, 0.5)));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_uses_depth() {
        let a = p(1.0, 0.0);
        let b = p(0.0, 0.0);
        let c = p(0.0, 0.0).with_z(1.0);
        assert!((angle(Some(&a), Some(&b), Some(&c)) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_is_symmetric_and_bounded() {
        let triples = [
            (p(0.1, 0.9), p(0.4, 0.2), p(0.8, 0.7)),
            (p(0.3, 0.3).with_z(-0.2), p(0.5, 0.5), p(0.9, 0.1).with_z(0.4)),
            (p(0.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)),
            (p(0.2, 0.2), p(0.6, 0.6), p(1.0, 1.0000001)),
        ];

        for (a, b, c) in triples {
            let forward = angle(Some(&a), Some(&b), Some(&c));
            let backward = angle(Some(&c), Some(&b), Some(&a));
            assert!((forward - backward).abs() < 1e-9);
            assert!((0.0..=180.0).contains(&forward));
        }
    }

    #[test]
    fn test_degenerate_angle_is_nan() {
        let a = p(0.5, 0.5);
        assert!(angle(Some(&a), Some(&a), Some(&p(0.9, 0.9))).is_nan());
        assert!(angle(None, Some(&a), Some(&p(0.9, 0.9))).is_nan());
    }

    #[test]
    fn test_pick_side_prefers_visible_side() {
        let mut frame = LandmarkFrame::empty();
        frame.set(LEFT_SHOULDER, Some(p(0.4, 0.3).with_visibility(0.2)));
        frame.set(LEFT_ELBOW, Some(p(0.4, 0.5).with_visibility(0.2)));
        frame.set(LEFT_WRIST, Some(p(0.4, 0.7).with_visibility(0.2)));
        frame.set(RIGHT_SHOULDER, Some(p(0.6, 0.3).with_visibility(0.9)));
        frame.set(RIGHT_ELBOW, Some(p(0.6, 0.5).with_visibility(0.9)));
        frame.set(RIGHT_WRIST, Some(p(0.8, 0.5).with_visibility(0.9)));

        // Right arm is bent at 90°, left is straight
        assert!((elbow_angle(&frame) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_pick_side_tie_goes_left() {
        let mut frame = LandmarkFrame::empty();
        frame.set(LEFT_HIP, Some(p(0.4, 0.5)));
        frame.set(LEFT_KNEE, Some(p(0.4, 0.7)));
        frame.set(LEFT_ANKLE, Some(p(0.4, 0.9)));
        frame.set(RIGHT_HIP, Some(p(0.6, 0.5)));
        frame.set(RIGHT_KNEE, Some(p(0.6, 0.7)));
        frame.set(RIGHT_ANKLE, Some(p(0.8, 0.7)));

        assert!((knee_angle(&frame) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_joint_makes_angle_nan() {
        let mut frame = LandmarkFrame::empty();
        frame.set(LEFT_SHOULDER, Some(p(0.4, 0.3)));
        frame.set(LEFT_ELBOW, Some(p(0.4, 0.5)));
        assert!(elbow_angle(&frame).is_nan());
        assert!(body_straightness(&frame).is_nan());
        assert!(torso_inclination(&frame).is_nan());
        assert!(torso_length(&frame).is_nan());
        assert!(head_y(&frame).is_nan());
    }

    #[test]
    fn test_torso_metrics() {
        let mut frame = LandmarkFrame::empty();
        frame.set(LEFT_SHOULDER, Some(p(0.45, 0.3)));
        frame.set(RIGHT_SHOULDER, Some(p(0.55, 0.3)));
        frame.set(LEFT_HIP, Some(p(0.45, 0.6)));
        frame.set(RIGHT_HIP, Some(p(0.55, 0.6)));
        frame.set(LEFT_ANKLE, Some(p(0.45, 0.9)));
        frame.set(RIGHT_ANKLE, Some(p(0.55, 0.9)));

        assert!((torso_inclination(&frame) - 90.0).abs() < 1e-6);
        assert!((torso_length(&frame) - 0.3).abs() < 1e-9);
        assert!((body_straightness(&frame) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_finite_pair_breaks_midpoint() {
        let good = p(0.5, 0.5);
        let bad = p(f64::NAN, 0.5);
        assert!(midpoint(Some(&good), Some(&bad)).is_none());
        assert!(midpoint(Some(&good), None).is_none());
    }
}
