//! Rep quality scoring
//!
//! Heuristic composite of range of motion, stability and tempo. The equal
//! weighting is a placeholder, not a calibrated model.

use serde::{Deserialize, Serialize};

use crate::reps::RepRecord;

/// ROM that earns a full range-of-motion score, in degrees
pub const FULL_ROM_DEGREES: f64 = 70.0;

/// Stability penalty per degree² of mean joint variance
pub const VARIANCE_PENALTY: f64 = 120.0;

/// Rep duration that earns a full tempo score
pub const IDEAL_TEMPO_MS: f64 = 1800.0;

/// Score breakdown for one rep
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub rom_score: u8,
    pub stability_score: u8,
    pub tempo_score: u8,
    pub total_score: u8,
    /// End time of the scored rep
    pub timestamp: f64,
}

/// Round and clamp into 0-100. NaN scores 0.
fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

pub fn rom_score(range_of_motion: f64) -> u8 {
    clamp_score(range_of_motion / FULL_ROM_DEGREES * 100.0)
}

pub fn stability_score(knee_variance: f64, hip_variance: f64) -> u8 {
    let combined = (knee_variance + hip_variance) / 2.0;
    clamp_score(100.0 - combined * VARIANCE_PENALTY)
}

pub fn tempo_score(rep: &RepRecord) -> u8 {
    if let Some(intensity) = rep.intensity_score {
        return intensity.min(100);
    }

    let deviation = (rep.duration_ms - IDEAL_TEMPO_MS).abs();
    clamp_score(100.0 - deviation / IDEAL_TEMPO_MS * 100.0)
}

/// Score a completed rep. `None` only when there is no rep.
pub fn score(rep: Option<&RepRecord>) -> Option<ScoreRecord> {
    let rep = rep?;

    let rom = rom_score(rep.range_of_motion);
    let stability = stability_score(rep.knee_variance, rep.hip_variance);
    let tempo = tempo_score(rep);
    let total = clamp_score((rom as f64 + stability as f64 + tempo as f64) / 3.0);

    Some(ScoreRecord {
        rom_score: rom,
        stability_score: stability,
        tempo_score: tempo,
        total_score: total,
        timestamp: rep.end_time,
    })
}
