//! Frame debounce for phase transitions
//!
//! A transition only fires after its condition has held for N consecutive
//! frames, so single-frame detector jitter can't flip the phase.

/// Counts consecutive qualifying frames
#[derive(Clone, Debug)]
pub struct Debouncer {
    /// Frames required before firing (1 = fire immediately)
    required: u32,
    /// Current streak length
    streak: u32,
    /// Timestamp of the first frame in the current streak
    streak_start: Option<f64>,
}

impl Debouncer {
    pub fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            streak: 0,
            streak_start: None,
        }
    }

    /// Feed one frame's condition.
    ///
    /// Returns the timestamp of the first frame of the streak once the
    /// streak is long enough, so durations measure the real edge rather
    /// than the debounce delay.
    pub fn observe(&mut self, qualifies: bool, timestamp: f64) -> Option<f64> {
        if !qualifies {
            self.reset();
            return None;
        }

        if self.streak == 0 {
            self.streak_start = Some(timestamp);
        }
        self.streak += 1;

        if self.streak >= self.required {
            let start = self.streak_start.unwrap_or(timestamp);
            self.reset();
            Some(start)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.streak = 0;
        self.streak_start = None;
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn is_pending(&self) -> bool {
        self.streak > 0
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(1)
    }
}
