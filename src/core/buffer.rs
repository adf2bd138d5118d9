//! Elastic byte buffer for the double-buffer hand-off
//!
//! A `SwapBuffer` is a contiguous append-only byte area with two cursors:
//! `read_pos..write_pos` is the readable window, `write_pos..capacity` the
//! writable tail. Invariant at all times:
//! `0 <= read_pos <= write_pos <= capacity`.
//!
//! The buffer is not synchronized; the worker that owns a pair of them
//! provides the locking.

/// Sizing knobs for a `SwapBuffer`. Taken from [`Config`](crate::config::Config)
/// in production, constructed directly in tests.
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Capacity the buffer starts with.
    pub initial_capacity: usize,
    /// Below this capacity a growing buffer triples; at or above it, growth
    /// is additive.
    pub growth_threshold: usize,
    /// Additive step once capacity has reached the threshold.
    pub linear_growth: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64 * 1024,
            growth_threshold: 8 * 1024 * 1024,
            linear_growth: 1024 * 1024,
        }
    }
}

pub struct SwapBuffer {
    storage: Vec<u8>,
    write_pos: usize,
    read_pos: usize,
    growth_threshold: usize,
    linear_growth: usize,
}

impl SwapBuffer {
    pub fn with_config(config: &BufferConfig) -> Self {
        Self {
            storage: vec![0; config.initial_capacity],
            write_pos: 0,
            read_pos: 0,
            growth_threshold: config.growth_threshold,
            linear_growth: config.linear_growth,
        }
    }

    /// Append `data` at the write cursor, growing at most once if it does
    /// not fit. A push exactly equal to the writable tail does not grow.
    pub fn push(&mut self, data: &[u8]) {
        self.ensure_capacity(data.len());
        self.storage[self.write_pos..self.write_pos + data.len()].copy_from_slice(data);
        self.write_pos += data.len();
    }

    /// The readable window, `read_pos..write_pos`.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.read_pos..self.write_pos]
    }

    pub fn readable(&self) -> usize {
        self.write_pos - self.read_pos
    }

    pub fn writable(&self) -> usize {
        self.storage.len() - self.write_pos
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.write_pos == self.read_pos
    }

    /// Consume `len` bytes from the readable window. Overrunning the window
    /// is a worker bug and aborts.
    pub fn advance_read(&mut self, len: usize) {
        assert!(len <= self.readable(), "advance_read past readable window");
        self.read_pos += len;
    }

    /// Claim `len` bytes of the writable tail as written.
    pub fn advance_write(&mut self, len: usize) {
        assert!(len <= self.writable(), "advance_write past writable tail");
        self.write_pos += len;
    }

    /// Exchange storage and both cursors with `other` in O(1). The caller
    /// holds whatever lock covers both buffers.
    pub fn swap(&mut self, other: &mut SwapBuffer) {
        std::mem::swap(&mut self.storage, &mut other.storage);
        std::mem::swap(&mut self.write_pos, &mut other.write_pos);
        std::mem::swap(&mut self.read_pos, &mut other.read_pos);
    }

    /// Rewind both cursors. Capacity is kept.
    pub fn reset(&mut self) {
        self.write_pos = 0;
        self.read_pos = 0;
    }

    /// One-shot growth: triple while under the threshold, add
    /// `linear_growth` once at or above it. The knobs must be sized so a
    /// single step covers any record; existing bytes stay at their offsets.
    fn ensure_capacity(&mut self, len: usize) {
        if len <= self.writable() {
            return;
        }
        let capacity = self.storage.len();
        let grown = if capacity < self.growth_threshold {
            3 * capacity
        } else {
            capacity + self.linear_growth
        };
        self.storage.resize(grown, 0);
        assert!(
            len <= self.writable(),
            "record of {} bytes exceeds a single growth step (capacity {} -> {})",
            len,
            capacity,
            grown
        );
    }
}
