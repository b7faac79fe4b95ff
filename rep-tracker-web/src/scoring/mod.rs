//! Scoring module - turns a completed rep into a 0-100 score
//!
//! Re-exports only. All logic in submodules.

mod engine;

pub use engine::{rom_score, score, stability_score, tempo_score, ScoreRecord};
