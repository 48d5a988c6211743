//! Power-of-two circular history for per-sample filtering.
//!
//! Filters look back a fixed number of samples on every output, so history
//! is kept in a circular buffer addressed with `index & mask`. The bitmask
//! only works for power-of-two sizes; that constraint is checked when the
//! buffer is built instead of being assumed by the reader.
//!
//! # Example
//!
//! ```rust
//! use tarsos_filter_core::RingBuffer;
//!
//! let mut ring = RingBuffer::new(8).unwrap();
//! ring.write(1.0);
//! ring.write(2.0);
//! assert_eq!(ring.read(0), 2.0);
//! assert_eq!(ring.read(1), 1.0);
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::error::CoreError;

/// Circular buffer with power-of-two capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer {
    /// Sample storage, `len() == mask + 1`
    buffer: Vec<f64>,
    /// `len() - 1`
    mask: usize,
    /// Slot the next write lands in
    write_pos: usize,
}

impl RingBuffer {
    /// Creates a zeroed ring of exactly `size` samples.
    ///
    /// Returns [`CoreError::InvalidSize`] unless `size` is a non-zero power of two.
    pub fn new(size: usize) -> Result<Self, CoreError> {
        if !size.is_power_of_two() {
            return Err(CoreError::InvalidSize(size));
        }
        Ok(Self {
            buffer: vec![0.0; size],
            mask: size - 1,
            write_pos: 0,
        })
    }

    /// Creates a ring large enough to look back `history` samples behind the newest one.
    pub fn with_history(history: usize) -> Self {
        let size = (history + 1).next_power_of_two();
        Self {
            buffer: vec![0.0; size],
            mask: size - 1,
            write_pos: 0,
        }
    }

    /// Capacity in samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; a ring holds at least one slot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Index mask (`len() - 1`).
    #[inline]
    pub fn mask(&self) -> usize {
        self.mask
    }

    /// Stores a sample and advances the write position.
    #[inline]
    pub fn write(&mut self, sample: f64) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) & self.mask;
    }

    /// Reads the sample written `delay` writes ago (`0` = most recent).
    ///
    /// Delays at or beyond the capacity wrap around.
    #[inline]
    pub fn read(&self, delay: usize) -> f64 {
        let idx = self.write_pos.wrapping_sub(delay + 1) & self.mask;
        self.buffer[idx]
    }

    /// Zeroes the history without changing capacity.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
