//! Sliding history window for LZ77 back-references.
//!
//! DEFLATE matches reference at most 32 KiB of previously produced output.
//! The window keeps the last `2^window_bits` bytes in a power-of-two ring
//! so a back-reference is a masked index away.

use crate::error::{CodecError, Result};

/// Smallest supported window size, in bits (256 bytes).
pub const MIN_WINDOW_BITS: u8 = 8;

/// Largest supported window size, in bits (32 KiB, the DEFLATE maximum).
pub const MAX_WINDOW_BITS: u8 = 15;

/// Circular buffer over the most recent output bytes.
#[derive(Debug, Clone)]
pub struct Window {
    buffer: Vec<u8>,
    /// Index where the next byte is written.
    position: usize,
    /// Number of valid bytes, saturating at capacity.
    filled: usize,
    mask: usize,
}

impl Window {
    /// Create a window of `2^window_bits` bytes.
    ///
    /// Fails when `window_bits` is outside
    /// [`MIN_WINDOW_BITS`]`..=`[`MAX_WINDOW_BITS`].
    pub fn new(window_bits: u8) -> Result<Self> {
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&window_bits) {
            return Err(CodecError::invalid_window_bits(
                window_bits,
                MIN_WINDOW_BITS,
                MAX_WINDOW_BITS,
            ));
        }

        let capacity = 1usize << window_bits;
        Ok(Self {
            buffer: vec![0; capacity],
            position: 0,
            filled: 0,
            mask: capacity - 1,
        })
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of history bytes currently available.
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Whether no bytes have been written yet.
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Record an output byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buffer[self.position] = byte;
        self.position = (self.position + 1) & self.mask;
        if self.filled < self.buffer.len() {
            self.filled += 1;
        }
    }

    /// Record a run of output bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        // Only the tail can survive in the ring.
        let tail = &bytes[bytes.len().saturating_sub(self.buffer.len())..];
        for &byte in tail {
            self.push(byte);
        }
    }

    /// Check that `distance` can be resolved against the current history.
    #[inline]
    pub fn check_distance(&self, distance: usize) -> Result<()> {
        if distance == 0 || distance > self.filled {
            return Err(CodecError::invalid_distance(distance, self.filled));
        }
        Ok(())
    }

    /// Byte `distance` positions back; distance 1 is the most recent byte.
    ///
    /// The distance must have passed [`check_distance`](Self::check_distance).
    #[inline]
    pub fn byte_at(&self, distance: usize) -> u8 {
        debug_assert!(distance >= 1 && distance <= self.filled);
        self.buffer[self.position.wrapping_sub(distance) & self.mask]
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.position = 0;
        self.filled = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bits_range() {
        assert!(Window::new(7).is_err());
        assert!(Window::new(16).is_err());
        assert_eq!(Window::new(8).unwrap().capacity(), 256);
        assert_eq!(Window::new(15).unwrap().capacity(), 32768);
    }

    #[test]
    fn test_byte_at_distance() {
        let mut window = Window::new(8).unwrap();
        window.extend(b"ABCD");

        assert_eq!(window.byte_at(1), b'D');
        assert_eq!(window.byte_at(4), b'A');
        assert!(window.check_distance(4).is_ok());
        assert!(window.check_distance(5).is_err());
        assert!(window.check_distance(0).is_err());
    }

    #[test]
    fn test_window_wraps() {
        let mut window = Window::new(8).unwrap();
        let data: Vec<u8> = (0..300u32).map(|i| i as u8).collect();
        window.extend(&data);

        assert_eq!(window.len(), 256);
        assert_eq!(window.byte_at(1), 299u32 as u8);
        assert_eq!(window.byte_at(256), 44);
        assert!(window.check_distance(257).is_err());
    }

    #[test]
    fn test_overlapping_copy() {
        // "AB" + copy(distance=2, length=6) -> "ABABABAB"
        let mut window = Window::new(8).unwrap();
        window.extend(b"AB");

        let mut out = Vec::new();
        for _ in 0..6 {
            let byte = window.byte_at(2);
            window.push(byte);
            out.push(byte);
        }
        assert_eq!(out, b"ABABAB");
    }

    #[test]
    fn test_clear() {
        let mut window = Window::new(8).unwrap();
        window.extend(b"xyz");
        window.clear();
        assert!(window.is_empty());
        assert!(window.check_distance(1).is_err());
    }
}
