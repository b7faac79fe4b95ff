//! Rep Tracker Web - in-browser exercise form tracking
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - Public re-exports for native consumers and tests
//! - The wasm_bindgen start hook

pub mod bridge;
pub mod config;
pub mod error;
pub mod geometry;
pub mod motion;
pub mod pipeline;
pub mod reps;
pub mod scoring;
pub mod session;

use wasm_bindgen::prelude::*;

pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use geometry::{AngleSnapshot, FrameInput, Landmark, LandmarkFrame};
pub use motion::{MotionMetrics, MotionTracker};
pub use pipeline::{FormTracker, FrameOutcome};
pub use reps::{Exercise, Phase, RepDetector, RepRecord};
pub use scoring::ScoreRecord;
pub use session::{SessionSnapshot, SessionState};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}
