//! Decompression options.

use crate::error::{DecompressError, Result};
pub use gzdec_core::window::{MAX_WINDOW_BITS, MIN_WINDOW_BITS};

/// Default capacity of the read and write chunks, in bytes.
pub const CHUNK_SIZE: usize = 16384;

/// Largest accepted chunk capacity (64 MiB).
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Tunables for a [`FileDecompressor`](crate::FileDecompressor).
///
/// Neither setting changes the decompressed output of a valid stream;
/// `chunk_size` only trades memory for fewer read calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressOptions {
    /// Capacity of the read chunk and of the write chunk.
    pub chunk_size: usize,
    /// Base-two logarithm of the history window (8-15).
    ///
    /// Streams that reference further back than the window fail to decode.
    pub window_bits: u8,
}

impl DecompressOptions {
    /// Default options: 16 KiB chunks, 32 KiB window.
    pub const DEFAULT: Self = Self {
        chunk_size: CHUNK_SIZE,
        window_bits: MAX_WINDOW_BITS,
    };

    /// Create options with default values.
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Set the chunk capacity.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the history window size.
    pub fn with_window_bits(mut self, window_bits: u8) -> Self {
        self.window_bits = window_bits;
        self
    }

    /// Check that an engine can be built from these options.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DecompressError::engine_init("chunk size must be non-zero"));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(DecompressError::engine_init(format!(
                "chunk size {} exceeds maximum of {}",
                self.chunk_size, MAX_CHUNK_SIZE
            )));
        }
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&self.window_bits) {
            return Err(DecompressError::engine_init(format!(
                "window bits {} outside {}..={}",
                self.window_bits, MIN_WINDOW_BITS, MAX_WINDOW_BITS
            )));
        }
        Ok(())
    }
}

impl Default for DecompressOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecompressOptions::default();
        assert_eq!(options.chunk_size, 16384);
        assert_eq!(options.window_bits, 15);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = DecompressOptions::new()
            .with_chunk_size(1)
            .with_window_bits(MIN_WINDOW_BITS);
        assert_eq!(options.chunk_size, 1);
        assert_eq!(options.window_bits, 8);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let err = DecompressOptions::new().with_chunk_size(0).validate().unwrap_err();
        assert!(matches!(err, DecompressError::EngineInitFailed { .. }));

        for size in [MAX_CHUNK_SIZE + 1, usize::MAX] {
            let err = DecompressOptions::new()
                .with_chunk_size(size)
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("exceeds maximum"), "size {}", size);
        }
        assert!(
            DecompressOptions::new()
                .with_chunk_size(MAX_CHUNK_SIZE)
                .validate()
                .is_ok()
        );

        for bits in [0, 7, 16, 31] {
            let err = DecompressOptions::new()
                .with_window_bits(bits)
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("window bits"), "bits {}", bits);
        }
    }
}
