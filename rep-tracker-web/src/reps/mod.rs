//! Reps module - rep detection state machine and its data
//!
//! Re-exports only. All logic in submodules.

mod cycle;
mod debounce;
mod detector;
mod exercise;
mod record;
mod thresholds;

pub use cycle::{average, validate, variance, CycleAccumulator, RepRejection};
pub use debounce::Debouncer;
pub use detector::{DetectorSettings, RepDetector, DEFAULT_DEBOUNCE_FRAMES, DEFAULT_MIN_REP_INTERVAL_MS};
pub use exercise::{Exercise, Phase};
pub use record::{intensity_from_duration, RepRecord};
pub use thresholds::{
    AngleRange, ExerciseThresholds, PostureBand, PrimaryJoint, PUSHUP_THRESHOLDS, SQUAT_THRESHOLDS,
};
