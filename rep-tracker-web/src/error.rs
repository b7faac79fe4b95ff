//! Error types for the rep tracker.
//!
//! Only programmer errors live here. Bad geometry and failed reps are
//! absorbed inside the core as NaN values or phase fallbacks.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug, PartialEq)]
pub enum TrackerError {
    #[error("Tracker not initialized: call init_tracker first")]
    NotInitialized,

    #[error("Invalid landmark data length: expected {expected}, got {actual}")]
    InvalidFrameLength { expected: usize, actual: usize },

    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        TrackerError::Config(e.to_string())
    }
}

impl From<TrackerError> for JsValue {
    fn from(err: TrackerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
