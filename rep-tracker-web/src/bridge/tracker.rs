//! Tracker storage and JS bridge
//!
//! Owns the page's single `FormTracker`. JavaScript drives it once per
//! video frame and polls the readers for the UI.

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::landmarks::decode_frame;
use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::geometry::{AngleSnapshot, FrameInput};
use crate::pipeline::FormTracker;
use crate::reps::Exercise;

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static TRACKER: RefCell<Option<FormTracker>> = const { RefCell::new(None) };
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

fn with_tracker<T>(f: impl FnOnce(&mut FormTracker) -> T) -> Result<T> {
    TRACKER.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.as_mut().map(f).ok_or(TrackerError::NotInitialized)
    })
}

/// Readers fall back to a neutral value before init
fn read_tracker<T>(fallback: T, f: impl FnOnce(&FormTracker) -> T) -> T {
    TRACKER.with(|cell| cell.borrow().as_ref().map(f).unwrap_or(fallback))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to serialize tracker state");
        "null".to_string()
    })
}

fn viewport_width() -> Option<f64> {
    web_sys::window()?.inner_width().ok()?.as_f64()
}

fn process(input: Option<FrameInput>, timestamp: f64) -> Result<bool> {
    with_tracker(|tracker| tracker.process(input, timestamp).rep.is_some())
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Build the tracker. Replaces any existing one.
///
/// `config_json` is a partial `TrackerConfig`; missing fields use defaults.
#[wasm_bindgen]
pub fn init_tracker(
    config_json: Option<String>,
    overlay_width: f64,
    overlay_height: f64,
) -> std::result::Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) if !json.trim().is_empty() => TrackerConfig::from_json(json)?,
        _ => TrackerConfig::default(),
    };

    let viewport = viewport_width();
    let capacity = config.trail_capacity_for(viewport);
    tracing::info!(
        exercise = %config.initial_exercise,
        viewport = ?viewport,
        trail_capacity = capacity,
        "tracker initialized"
    );

    let tracker = FormTracker::new(config, (overlay_width, overlay_height), capacity);
    TRACKER.with(|cell| *cell.borrow_mut() = Some(tracker));
    Ok(())
}

/// Called from JavaScript with a flat Float32Array of 132 values
/// (33 landmarks × x, y, z, visibility), or an empty array when no pose
/// was found. Returns true when this frame completed a rep.
#[wasm_bindgen]
pub fn process_frame(data: &[f32], timestamp: f64) -> std::result::Result<bool, JsValue> {
    let frame = decode_frame(data).inspect_err(|e| tracing::warn!(error = %e, "dropping frame"))?;
    Ok(process(frame.map(FrameInput::Landmarks), timestamp)?)
}

/// Feed pre-computed angles instead of raw landmarks. NaN marks a value
/// the host could not measure.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn process_angles(
    elbow_angle: f64,
    knee_angle: f64,
    hip_angle: f64,
    body_straightness: f64,
    torso_inclination: f64,
    head_y: f64,
    torso_length: f64,
    timestamp: f64,
) -> std::result::Result<bool, JsValue> {
    let snapshot = AngleSnapshot {
        elbow_angle,
        knee_angle,
        hip_angle,
        body_straightness,
        torso_inclination,
        head_y,
        torso_length,
        timestamp,
    };
    Ok(process(Some(FrameInput::Angles(snapshot)), timestamp)?)
}

/// Select "pushup" or "squat". Clears all progress.
#[wasm_bindgen]
pub fn set_exercise(name: &str) -> std::result::Result<(), JsValue> {
    let exercise: Exercise = name.parse()?;
    Ok(with_tracker(|tracker| tracker.set_exercise(exercise))?)
}

#[wasm_bindgen]
pub fn reset_tracking() -> std::result::Result<(), JsValue> {
    Ok(with_tracker(FormTracker::reset)?)
}

#[wasm_bindgen]
pub fn set_counting_enabled(enabled: bool) -> std::result::Result<(), JsValue> {
    Ok(with_tracker(|tracker| tracker.set_counting_enabled(enabled))?)
}

#[wasm_bindgen]
pub fn set_motion_enabled(enabled: bool) -> std::result::Result<(), JsValue> {
    Ok(with_tracker(|tracker| tracker.set_motion_enabled(enabled))?)
}

#[wasm_bindgen]
pub fn resize_overlay(width: f64, height: f64) -> std::result::Result<(), JsValue> {
    Ok(with_tracker(|tracker| tracker.resize_overlay(width, height))?)
}

// ============================================================================
// READERS
// ============================================================================

#[wasm_bindgen]
pub fn get_rep_count() -> u32 {
    read_tracker(0, |tracker| tracker.snapshot().reps)
}

/// "idle" | "up" | "down"
#[wasm_bindgen]
pub fn get_phase() -> String {
    read_tracker("idle".to_string(), |tracker| tracker.snapshot().phase.as_str().to_string())
}

#[wasm_bindgen]
pub fn get_exercise() -> String {
    read_tracker(Exercise::default().as_str().to_string(), |tracker| {
        tracker.snapshot().exercise.as_str().to_string()
    })
}

/// JSON score of the most recent rep, or null
#[wasm_bindgen]
pub fn get_latest_score() -> JsValue {
    read_tracker(JsValue::NULL, |tracker| match tracker.latest_score() {
        Some(score) => JsValue::from_str(&to_json(score)),
        None => JsValue::NULL,
    })
}

#[wasm_bindgen]
pub fn get_rep_history_json() -> String {
    read_tracker("[]".to_string(), |tracker| to_json(tracker.rep_history()))
}

#[wasm_bindgen]
pub fn get_score_history_json() -> String {
    read_tracker("[]".to_string(), |tracker| to_json(tracker.score_history()))
}

#[wasm_bindgen]
pub fn get_motion_metrics_json() -> String {
    read_tracker("null".to_string(), |tracker| to_json(tracker.motion_metrics()))
}

/// Current joint positions and trails per chain, for the overlay renderer
#[wasm_bindgen]
pub fn get_motion_trails_json() -> String {
    read_tracker("[]".to_string(), |tracker| {
        let chains: Vec<_> = tracker
            .motion()
            .chains()
            .iter()
            .map(|chain| ChainView {
                chain: chain.kind.as_str(),
                speed: chain.speed,
                positions: chain.positions(),
                trails: chain.trails(),
            })
            .collect();
        to_json(&chains)
    })
}

#[derive(Serialize)]
struct ChainView {
    chain: &'static str,
    speed: f64,
    positions: Vec<Option<(f64, f64)>>,
    trails: Vec<Vec<(f64, f64)>>,
}
