//! Canonical Huffman decoding tables for DEFLATE.
//!
//! DEFLATE transmits only code lengths; codes of the same length are
//! consecutive integers assigned in symbol order (RFC 1951 Section 3.2.2).
//! A [`HuffmanTable`] decodes the next symbol from a
//! [`BitBuffer`]:
//!
//! - codes up to `FAST_BITS` long resolve with a single table lookup;
//! - longer codes, and any lookup attempted with fewer than `FAST_BITS`
//!   bits buffered, walk the code one bit at a time using the per-length
//!   code counts.
//!
//! The bit-by-bit path never reads further than the code it decodes, so a
//! symbol at the very end of the buffered input still decodes without
//! waiting for more data.

use gzdec_core::bitstream::BitBuffer;
use gzdec_core::error::{CodecError, Result};

/// Maximum code length in DEFLATE (15 bits).
pub const MAX_CODE_LENGTH: usize = 15;

/// Number of bits resolved by the direct lookup table.
const FAST_BITS: u8 = 9;

/// Which DEFLATE alphabet a table decodes.
///
/// Determines how incomplete code sets are treated and how errors read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// The 19-symbol code length alphabet of a dynamic block header.
    CodeLengths,
    /// The literal/length alphabet (0-285).
    LiteralLength,
    /// The distance alphabet (0-29).
    Distance,
}

impl CodeKind {
    /// Human-readable alphabet name for error messages.
    pub fn alphabet(self) -> &'static str {
        match self {
            Self::CodeLengths => "code length",
            Self::LiteralLength => "literal/length",
            Self::Distance => "distance",
        }
    }
}

/// A decoding table for one canonical Huffman code.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    /// Indexed by the next `FAST_BITS` input bits: (symbol, code length).
    /// A length of 0 sends the decoder to the bit-by-bit path.
    fast: Box<[(u16, u8)]>,
    /// Number of codes of each length.
    counts: [u16; MAX_CODE_LENGTH + 1],
    /// Symbols sorted by code.
    symbols: Vec<u16>,
    kind: CodeKind,
}

impl HuffmanTable {
    /// Build a table from per-symbol code lengths (0 = symbol unused).
    ///
    /// Returns `None` for an over-subscribed set, or for an incomplete set
    /// other than a single one-bit code in the literal/length or distance
    /// alphabets. A set with no codes at all builds a table that rejects
    /// every input, which is how a block without back-references encodes
    /// its distance tree.
    pub fn from_code_lengths(lengths: &[u8], kind: CodeKind) -> Option<Self> {
        let mut counts = [0u16; MAX_CODE_LENGTH + 1];
        for &len in lengths {
            if len as usize > MAX_CODE_LENGTH {
                return None;
            }
            counts[len as usize] += 1;
        }
        counts[0] = 0;

        let max_length = (1..=MAX_CODE_LENGTH)
            .rev()
            .find(|&len| counts[len] != 0)
            .unwrap_or(0);

        // Remaining code space after each length; negative means
        // over-subscribed.
        let mut left: i32 = 1;
        for &count in &counts[1..] {
            left = (left << 1) - count as i32;
            if left < 0 {
                return None;
            }
        }
        if max_length > 0
            && left > 0
            && (kind == CodeKind::CodeLengths || max_length != 1)
        {
            return None;
        }

        // Offsets of the first symbol of each length in `symbols`.
        let mut offsets = [0u16; MAX_CODE_LENGTH + 2];
        for len in 1..=MAX_CODE_LENGTH {
            offsets[len + 1] = offsets[len] + counts[len];
        }

        let mut symbols = vec![0u16; offsets[MAX_CODE_LENGTH + 1] as usize];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len != 0 {
                let slot = &mut offsets[len as usize];
                symbols[*slot as usize] = symbol as u16;
                *slot += 1;
            }
        }

        let fast = Self::build_fast_table(lengths, &counts);

        Some(Self {
            fast,
            counts,
            symbols,
            kind,
        })
    }

    fn build_fast_table(lengths: &[u8], counts: &[u16; MAX_CODE_LENGTH + 1]) -> Box<[(u16, u8)]> {
        let mut fast = vec![(0u16, 0u8); 1 << FAST_BITS].into_boxed_slice();

        // First canonical code of each length (RFC 1951 algorithm).
        let mut next_code = [0u32; MAX_CODE_LENGTH + 1];
        let mut code = 0u32;
        for len in 1..=MAX_CODE_LENGTH {
            code = (code + counts[len - 1] as u32) << 1;
            next_code[len] = code;
        }

        for (symbol, &len) in lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let code = next_code[len as usize];
            next_code[len as usize] += 1;

            if len > FAST_BITS {
                continue;
            }

            // Codes are stored MSB-first but read LSB-first.
            let reversed = reverse_bits(code, len) as usize;
            let step = 1usize << len;
            let mut index = reversed;
            while index < fast.len() {
                fast[index] = (symbol as u16, len);
                index += step;
            }
        }

        fast
    }

    /// Decode one symbol.
    ///
    /// Fails with `UnexpectedEof` when the buffered input ends inside the
    /// code; the read position is then unspecified and the caller rewinds.
    #[inline]
    pub fn decode(&self, input: &mut BitBuffer) -> Result<u16> {
        if input.available_bits() >= FAST_BITS as usize {
            let bits = input.peek_bits(FAST_BITS)?;
            let (symbol, len) = self.fast[bits as usize];
            if len > 0 {
                input.consume(len);
                return Ok(symbol);
            }
        }

        self.decode_slow(input)
    }

    /// Walk the code one bit at a time.
    fn decode_slow(&self, input: &mut BitBuffer) -> Result<u16> {
        // `code` is the bits read so far; `first` is the first code of the
        // current length; `index` is the first symbol of the current length.
        let mut code: i32 = 0;
        let mut first: i32 = 0;
        let mut index: i32 = 0;

        for len in 1..=MAX_CODE_LENGTH {
            code |= input.read_bits(1)? as i32;
            let count = self.counts[len] as i32;
            if code - count < first {
                return Ok(self.symbols[(index + (code - first)) as usize]);
            }
            index += count;
            first = (first + count) << 1;
            code <<= 1;
        }

        Err(CodecError::invalid_huffman(
            self.kind.alphabet(),
            input.byte_offset(),
        ))
    }
}

fn reverse_bits(code: u32, len: u8) -> u32 {
    code.reverse_bits() >> (32 - len as u32)
}
