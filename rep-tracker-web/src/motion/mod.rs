//! Motion module - per-chain trails and speeds for the overlay
//!
//! Re-exports only. All logic in submodules.

mod trail;
mod tracker;

pub use trail::{TrailBuffer, DEFAULT_TRAIL_CAPACITY, MOBILE_TRAIL_CAPACITY};
pub use tracker::{ChainKind, ChainTrack, MotionMetrics, MotionTracker};
