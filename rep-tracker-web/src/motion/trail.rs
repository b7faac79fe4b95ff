//! Rolling position trail for one joint
//!
//! Fixed-capacity ring buffer of recent overlay positions, oldest first.

/// Samples kept per joint on a desktop-sized overlay
pub const DEFAULT_TRAIL_CAPACITY: usize = 24;

/// Samples kept per joint on a small/mobile overlay
pub const MOBILE_TRAIL_CAPACITY: usize = 12;

/// Ring buffer of (x, y) pixel positions
#[derive(Clone, Debug)]
pub struct TrailBuffer {
    /// Circular storage, only the first `len` slots are meaningful
    data: Vec<(f64, f64)>,

    /// Current write position (points to next slot to write)
    write_index: usize,

    /// Number of valid samples, saturates at capacity
    len: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: vec![(0.0, 0.0); capacity],
            write_index: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a position, overwriting the oldest once full
    pub fn push(&mut self, pos: (f64, f64)) {
        self.data[self.write_index] = pos;
        self.write_index = (self.write_index + 1) % self.capacity();
        self.len = (self.len + 1).min(self.capacity());
    }

    /// Most recent position
    pub fn latest(&self) -> Option<(f64, f64)> {
        if self.len == 0 {
            return None;
        }
        let idx = (self.write_index + self.capacity() - 1) % self.capacity();
        Some(self.data[idx])
    }

    /// Positions in chronological order
    pub fn points(&self) -> Vec<(f64, f64)> {
        let start = (self.write_index + self.capacity() - self.len) % self.capacity();
        (0..self.len)
            .map(|i| self.data[(start + i) % self.capacity()])
            .collect()
    }

    pub fn clear(&mut self) {
        self.write_index = 0;
        self.len = 0;
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_CAPACITY)
    }
}
