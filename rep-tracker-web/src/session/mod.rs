//! Session module - the UI-facing tracking state
//!
//! Re-exports only. All logic in submodules.

mod store;

pub use store::{SessionSnapshot, SessionState};
