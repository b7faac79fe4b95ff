//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod landmarks;
mod tracker;

pub use landmarks::{decode_frame, FRAME_VALUES, VALUES_PER_LANDMARK};

pub use tracker::{
    // Lifecycle and input
    init_tracker,
    process_frame,
    process_angles,
    set_exercise,
    reset_tracking,
    set_counting_enabled,
    set_motion_enabled,
    resize_overlay,
    // Readers
    get_rep_count,
    get_phase,
    get_exercise,
    get_latest_score,
    get_rep_history_json,
    get_score_history_json,
    get_motion_metrics_json,
    get_motion_trails_json,
};
