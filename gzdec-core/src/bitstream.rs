//! Checkpointed bit-level input buffer for streaming decoders.
//!
//! A streaming decoder receives compressed input in arbitrary slices, so a
//! single Huffman code, block header, or trailer may be split across two
//! calls. [`BitBuffer`] owns every byte the decoder has been handed but not
//! yet decoded. Decode steps run against it directly; a step that runs past
//! the end of the buffered data fails with
//! [`CodecError::UnexpectedEof`](crate::error::CodecError::UnexpectedEof),
//! and the decoder [`rewind`](BitBuffer::rewind)s to the
//! [`Checkpoint`] taken before the step and waits for more input.
//!
//! # Bit Ordering
//!
//! DEFLATE packs bits LSB-first within each byte, and multi-byte fields are
//! little-endian, so an aligned `read_bits(16)` is a little-endian `u16`.
//!
//! # Example
//!
//! ```
//! use gzdec_core::bitstream::BitBuffer;
//!
//! let mut bits = BitBuffer::new();
//! bits.extend(&[0b1100_0101]);
//!
//! let cp = bits.checkpoint();
//! assert_eq!(bits.read_bits(3).unwrap(), 0b101);
//! assert!(bits.read_bits(8).unwrap_err().is_starved());
//!
//! bits.rewind(cp);
//! bits.extend(&[0xFF]);
//! assert_eq!(bits.read_bits(3).unwrap(), 0b101);
//! assert_eq!(bits.read_bits(8).unwrap(), 0b1111_1000);
//! ```

use crate::error::{CodecError, Result};

/// A saved read position inside a [`BitBuffer`].
///
/// Valid until the next call to [`BitBuffer::compact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    bit_pos: usize,
}

/// Growable LSB-first bit reader over buffered input.
#[derive(Debug, Default, Clone)]
pub struct BitBuffer {
    /// Buffered input; bytes before `bit_pos / 8` are already decoded.
    data: Vec<u8>,
    /// Position of the next unread bit within `data`.
    bit_pos: usize,
    /// Bytes dropped from the front by `compact`, for absolute offsets.
    discarded: u64,
}

impl BitBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append newly received input.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Number of unread bits.
    #[inline]
    pub fn available_bits(&self) -> usize {
        self.data.len() * 8 - self.bit_pos
    }

    /// Number of unread whole bytes after the current byte boundary.
    #[inline]
    pub fn available_bytes(&self) -> usize {
        self.data.len() - self.bit_pos.div_ceil(8)
    }

    /// Whether every buffered bit has been read.
    pub fn is_empty(&self) -> bool {
        self.available_bits() == 0
    }

    /// Absolute offset (in bytes) of the byte holding the next unread bit.
    pub fn byte_offset(&self) -> u64 {
        self.discarded + (self.bit_pos / 8) as u64
    }

    /// Whether the read position sits on a byte boundary.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.bit_pos % 8 == 0
    }

    /// Save the current read position.
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            bit_pos: self.bit_pos,
        }
    }

    /// Return to a previously saved read position.
    #[inline]
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.bit_pos <= self.data.len() * 8);
        self.bit_pos = checkpoint.bit_pos;
    }

    /// Peek at up to 32 bits without consuming them.
    #[inline]
    pub fn peek_bits(&self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot peek more than 32 bits at once");

        if count == 0 {
            return Ok(0);
        }

        let available = self.available_bits();
        if available < count as usize {
            return Err(CodecError::unexpected_eof(
                (count as usize - available) as u32,
            ));
        }

        let start = self.bit_pos / 8;
        let shift = self.bit_pos % 8;
        let end = (start + 5).min(self.data.len());

        let mut word = 0u64;
        for (i, &byte) in self.data[start..end].iter().enumerate() {
            word |= (byte as u64) << (8 * i);
        }

        let mask = (1u64 << count) - 1;
        Ok(((word >> shift) & mask) as u32)
    }

    /// Read up to 32 bits, first bit in the LSB position.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        let value = self.peek_bits(count)?;
        self.bit_pos += count as usize;
        Ok(value)
    }

    /// Skip bits previously inspected with [`peek_bits`](Self::peek_bits).
    #[inline]
    pub fn consume(&mut self, count: u8) {
        debug_assert!(count as usize <= self.available_bits());
        self.bit_pos += count as usize;
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Discard bits up to the next byte boundary.
    pub fn align_to_byte(&mut self) {
        self.bit_pos = self.bit_pos.div_ceil(8) * 8;
    }

    /// Read one byte. The position must be byte-aligned.
    pub fn read_u8(&mut self) -> Result<u8> {
        debug_assert!(self.is_aligned());
        Ok(self.read_bits(8)? as u8)
    }

    /// Read a little-endian `u16`. The position must be byte-aligned.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        debug_assert!(self.is_aligned());
        Ok(self.read_bits(16)? as u16)
    }

    /// Read a little-endian `u32`. The position must be byte-aligned.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        debug_assert!(self.is_aligned());
        self.read_bits(32)
    }

    /// Take up to `max` whole bytes. The position must be byte-aligned.
    ///
    /// Returns fewer bytes (possibly none) when the buffer runs short;
    /// this never fails.
    pub fn take_bytes(&mut self, max: usize) -> &[u8] {
        debug_assert!(self.is_aligned());
        let start = self.bit_pos / 8;
        let len = max.min(self.data.len() - start);
        self.bit_pos += len * 8;
        &self.data[start..start + len]
    }

    /// Bytes read since `checkpoint`, both ends rounded down to a byte.
    pub fn bytes_since(&self, checkpoint: Checkpoint) -> &[u8] {
        &self.data[checkpoint.bit_pos / 8..self.bit_pos / 8]
    }

    /// Drop fully consumed bytes from the front of the buffer.
    ///
    /// Invalidates outstanding checkpoints.
    pub fn compact(&mut self) {
        let consumed = self.bit_pos / 8;
        if consumed > 0 {
            self.data.drain(..consumed);
            self.bit_pos -= consumed * 8;
            self.discarded += consumed as u64;
        }
    }

    /// Forget all buffered input and reset offsets.
    pub fn clear(&mut self) {
        self.data.clear();
        self.bit_pos = 0;
        self.discarded = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_lsb_first() {
        let mut bits = BitBuffer::new();
        bits.extend(&[0b1010_1100, 0b0000_0011]);

        assert_eq!(bits.read_bits(2).unwrap(), 0b00);
        assert_eq!(bits.read_bits(3).unwrap(), 0b011);
        // Spans the byte boundary: 3 high bits of byte 0, 2 low bits of byte 1.
        assert_eq!(bits.read_bits(5).unwrap(), 0b11_101);
        assert_eq!(bits.available_bits(), 6);
    }

    #[test]
    fn test_read_32_bits_unaligned() {
        let mut bits = BitBuffer::new();
        bits.extend(&[0xFF, 0x78, 0x56, 0x34, 0x12]);

        bits.read_bits(8).unwrap();
        assert_eq!(bits.read_bits(32).unwrap(), 0x12345678);

        let mut bits = BitBuffer::new();
        bits.extend(&[0x01, 0x00, 0x00, 0x00, 0x01]);
        bits.read_bits(1).unwrap();
        assert_eq!(bits.read_bits(32).unwrap(), 0x8000_0000);
    }

    #[test]
    fn test_starved_read_leaves_position() {
        let mut bits = BitBuffer::new();
        bits.extend(&[0xAB]);

        bits.read_bits(4).unwrap();
        let err = bits.read_bits(8).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedEof { needed: 4 }));
        assert_eq!(bits.available_bits(), 4);
    }

    #[test]
    fn test_rewind_and_resume() {
        let mut bits = BitBuffer::new();
        bits.extend(&[0x34]);

        let cp = bits.checkpoint();
        assert!(bits.read_u16_le().is_err());
        bits.rewind(cp);

        bits.extend(&[0x12]);
        assert_eq!(bits.read_u16_le().unwrap(), 0x1234);
        assert!(bits.is_empty());
    }

    #[test]
    fn test_align_and_take_bytes() {
        let mut bits = BitBuffer::new();
        bits.extend(&[0xFF, b'a', b'b', b'c']);

        bits.read_bits(3).unwrap();
        assert_eq!(bits.available_bytes(), 3);
        bits.align_to_byte();
        assert!(bits.is_aligned());

        assert_eq!(bits.take_bytes(2), b"ab");
        assert_eq!(bits.take_bytes(10), b"c");
        assert_eq!(bits.take_bytes(10), b"");
    }

    #[test]
    fn test_bytes_since() {
        let mut bits = BitBuffer::new();
        bits.extend(b"header");

        let cp = bits.checkpoint();
        bits.read_u32_le().unwrap();
        assert_eq!(bits.bytes_since(cp), b"head");
    }

    #[test]
    fn test_compact_keeps_offsets() {
        let mut bits = BitBuffer::new();
        bits.extend(&[1, 2, 3, 4]);

        bits.read_bits(20).unwrap();
        bits.compact();
        assert_eq!(bits.byte_offset(), 2);
        assert_eq!(bits.available_bits(), 12);
        assert_eq!(bits.read_bits(4).unwrap(), 0);
        bits.align_to_byte();
        assert_eq!(bits.read_u8().unwrap(), 4);
        assert_eq!(bits.byte_offset(), 4);
    }
}
