//! Geometry module - joint angles and body metrics from landmark frames
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod landmark;
mod snapshot;

pub use angles::{
    angle, body_straightness, distance_2d, elbow_angle, head_y, hip_angle, knee_angle, midpoint,
    pick_side, torso_inclination, torso_length,
};
pub use landmark::*;
pub use snapshot::{AngleSnapshot, FrameInput};
