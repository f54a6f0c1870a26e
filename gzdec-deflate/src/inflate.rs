//! Streaming DEFLATE decompression (inflate).
//!
//! This module implements RFC 1951 decompression as a resumable state
//! machine. Input arrives in a [`BitBuffer`] that the caller keeps
//! topping up; output goes into whatever slice the caller provides.
//! Either side may run dry at any point:
//!
//! - every decode step (a block header including its dynamic code tables,
//!   a literal, or a length/distance pair) is read completely before any of
//!   its output is produced; a step that runs out of input is rewound and
//!   retried when more input arrives;
//! - a back-reference longer than the space left in the output slice is
//!   carried over and finished on the next call.
//!
//! All three block types are supported:
//! - Type 0: Stored (uncompressed)
//! - Type 1: Fixed Huffman codes
//! - Type 2: Dynamic Huffman codes

use crate::huffman::{CodeKind, HuffmanTable};
use crate::tables::{
    CODE_LENGTH_ORDER, DISTANCE_BASE, DISTANCE_EXTRA_BITS, END_OF_BLOCK, LENGTH_BASE,
    LENGTH_EXTRA_BITS, MAX_DISTANCE_CODES, MAX_LENGTH_SYMBOL, MAX_LITLEN_CODES,
    fixed_distance_table, fixed_litlen_table,
};
use gzdec_core::bitstream::BitBuffer;
use gzdec_core::error::{CodecError, Result};
use gzdec_core::traits::{DecompressStatus, Decompressor};
use gzdec_core::window::{MAX_WINDOW_BITS, Window};

/// Code tables for the current Huffman block.
#[derive(Debug)]
enum Tables {
    Fixed,
    Dynamic(Box<DynamicTables>),
}

#[derive(Debug)]
struct DynamicTables {
    litlen: HuffmanTable,
    dist: HuffmanTable,
}

impl Tables {
    fn get(&self) -> (&HuffmanTable, &HuffmanTable) {
        match self {
            Self::Fixed => (fixed_litlen_table(), fixed_distance_table()),
            Self::Dynamic(tables) => (&tables.litlen, &tables.dist),
        }
    }
}

#[derive(Debug)]
enum State {
    /// Expecting the 3-bit header of the next block.
    BlockHeader,
    /// Inside a stored block with this many bytes left to copy.
    Stored { remaining: usize },
    /// Inside a Huffman-coded block.
    Codes(Tables),
    /// The final block has ended.
    Done,
}

impl State {
    fn after_block(final_block: bool) -> Self {
        if final_block { Self::Done } else { Self::BlockHeader }
    }
}

/// A decoded back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    distance: usize,
    length: usize,
}

enum Symbol {
    Literal(u8),
    EndOfBlock,
    Match(Match),
}

/// Why a run of Huffman decoding stopped.
enum Step {
    EndOfBlock,
    OutputFull,
    Starved,
}

/// Caller-provided output slice plus fill position.
struct Sink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Sink<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn space(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.pos == self.buf.len()
    }

    #[inline]
    fn emit(&mut self, window: &mut Window, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos += 1;
        window.push(byte);
    }

    fn emit_all(&mut self, window: &mut Window, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        window.extend(bytes);
    }

    /// Copy as much of `m` as fits; returns whether it completed.
    fn copy_match(&mut self, window: &mut Window, m: &mut Match) -> bool {
        while m.length > 0 && !self.is_full() {
            let byte = window.byte_at(m.distance);
            self.emit(window, byte);
            m.length -= 1;
        }
        m.length == 0
    }
}

/// Resumable DEFLATE decompressor.
///
/// The inflater holds decoding state only; compressed input lives in a
/// [`BitBuffer`] owned by the caller so that framing layers (gzip) can read
/// their own header and trailer from the same buffer.
#[derive(Debug)]
pub struct Inflater {
    state: State,
    window: Window,
    /// Back-reference that did not fit in the previous output slice.
    pending: Option<Match>,
    final_block: bool,
    total_out: u64,
}

impl Inflater {
    /// Create an inflater with a history window of `2^window_bits` bytes.
    ///
    /// Streams produced with a larger window fail with
    /// [`CodecError::InvalidDistance`] when they reach back further than the
    /// window holds.
    pub fn new(window_bits: u8) -> Result<Self> {
        Ok(Self {
            state: State::BlockHeader,
            window: Window::new(window_bits)?,
            pending: None,
            final_block: false,
            total_out: 0,
        })
    }

    /// Reset to the start of a new stream, keeping the window allocation.
    pub fn reset(&mut self) {
        self.state = State::BlockHeader;
        self.window.clear();
        self.pending = None;
        self.final_block = false;
        self.total_out = 0;
    }

    /// Whether the final block has been fully decoded.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Done) && self.pending.is_none()
    }

    /// Total bytes produced since creation or the last reset.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Decode from `input` into `output`.
    ///
    /// Returns the number of bytes written to `output` and:
    /// - [`DecompressStatus::Done`] once the final block has ended (the
    ///   input position is left just after the last block, unaligned);
    /// - [`DecompressStatus::NeedsOutput`] when `output` was filled;
    /// - [`DecompressStatus::NeedsInput`] when `input` holds no complete
    ///   decode step.
    pub fn inflate(
        &mut self,
        input: &mut BitBuffer,
        output: &mut [u8],
    ) -> Result<(usize, DecompressStatus)> {
        let mut sink = Sink::new(output);
        let status = self.run(input, &mut sink);
        self.total_out += sink.pos as u64;
        Ok((sink.pos, status?))
    }

    fn run(&mut self, input: &mut BitBuffer, sink: &mut Sink<'_>) -> Result<DecompressStatus> {
        if let Some(mut m) = self.pending.take() {
            if !sink.copy_match(&mut self.window, &mut m) {
                self.pending = Some(m);
                return Ok(DecompressStatus::NeedsOutput);
            }
        }

        loop {
            match &mut self.state {
                State::Done => return Ok(DecompressStatus::Done),

                State::BlockHeader => {
                    let checkpoint = input.checkpoint();
                    match read_block_header(input) {
                        Ok((is_final, next)) => {
                            self.final_block = is_final;
                            self.state = next;
                        }
                        Err(e) if e.is_starved() => {
                            input.rewind(checkpoint);
                            return Ok(DecompressStatus::NeedsInput);
                        }
                        Err(e) => return Err(e),
                    }
                }

                State::Stored { remaining } => {
                    let left = *remaining;
                    if left == 0 {
                        self.state = State::after_block(self.final_block);
                        continue;
                    }
                    if sink.is_full() {
                        return Ok(DecompressStatus::NeedsOutput);
                    }

                    let bytes = input.take_bytes(left.min(sink.space()));
                    if bytes.is_empty() {
                        return Ok(DecompressStatus::NeedsInput);
                    }
                    *remaining = left - bytes.len();
                    sink.emit_all(&mut self.window, bytes);
                }

                State::Codes(tables) => {
                    let (litlen, dist) = tables.get();
                    let step = decode_codes(
                        input,
                        litlen,
                        dist,
                        &mut self.window,
                        sink,
                        &mut self.pending,
                    )?;
                    match step {
                        Step::EndOfBlock => self.state = State::after_block(self.final_block),
                        Step::OutputFull => return Ok(DecompressStatus::NeedsOutput),
                        Step::Starved => return Ok(DecompressStatus::NeedsInput),
                    }
                }
            }
        }
    }
}

/// Read a block header, including stored lengths or dynamic code tables.
fn read_block_header(input: &mut BitBuffer) -> Result<(bool, State)> {
    let is_final = input.read_bit()?;
    let btype = input.read_bits(2)?;

    let state = match btype {
        0 => read_stored_header(input)?,
        1 => State::Codes(Tables::Fixed),
        2 => State::Codes(Tables::Dynamic(Box::new(read_dynamic_tables(input)?))),
        _ => {
            return Err(CodecError::corrupted(
                input.byte_offset(),
                "invalid block type",
            ));
        }
    };

    Ok((is_final, state))
}

fn read_stored_header(input: &mut BitBuffer) -> Result<State> {
    input.align_to_byte();
    let len = input.read_u16_le()?;
    let nlen = input.read_u16_le()?;

    if len != !nlen {
        return Err(CodecError::corrupted(
            input.byte_offset(),
            format!("invalid stored block lengths: {} vs {}", len, !nlen),
        ));
    }

    Ok(State::Stored {
        remaining: len as usize,
    })
}

fn read_dynamic_tables(input: &mut BitBuffer) -> Result<DynamicTables> {
    let hlit = input.read_bits(5)? as usize + 257;
    let hdist = input.read_bits(5)? as usize + 1;
    let hclen = input.read_bits(4)? as usize + 4;

    if hlit > MAX_LITLEN_CODES || hdist > MAX_DISTANCE_CODES {
        return Err(CodecError::corrupted(
            input.byte_offset(),
            "too many length or distance symbols",
        ));
    }

    let mut code_length_lengths = [0u8; 19];
    for &symbol in &CODE_LENGTH_ORDER[..hclen] {
        code_length_lengths[symbol] = input.read_bits(3)? as u8;
    }

    let code_length_table =
        HuffmanTable::from_code_lengths(&code_length_lengths, CodeKind::CodeLengths)
            .ok_or_else(|| {
                CodecError::corrupted(input.byte_offset(), "invalid code lengths set")
            })?;

    let mut lengths = [0u8; MAX_LITLEN_CODES + MAX_DISTANCE_CODES];
    let total = hlit + hdist;
    let mut i = 0;

    while i < total {
        let symbol = code_length_table.decode(input)?;

        let (value, repeat) = match symbol {
            0..=15 => (symbol as u8, 1),
            16 => {
                if i == 0 {
                    return Err(CodecError::corrupted(
                        input.byte_offset(),
                        "invalid bit length repeat",
                    ));
                }
                (lengths[i - 1], 3 + input.read_bits(2)? as usize)
            }
            17 => (0, 3 + input.read_bits(3)? as usize),
            _ => (0, 11 + input.read_bits(7)? as usize),
        };

        if i + repeat > total {
            return Err(CodecError::corrupted(
                input.byte_offset(),
                "invalid bit length repeat",
            ));
        }
        lengths[i..i + repeat].fill(value);
        i += repeat;
    }

    if lengths[END_OF_BLOCK as usize] == 0 {
        return Err(CodecError::corrupted(
            input.byte_offset(),
            "invalid code -- missing end-of-block",
        ));
    }

    let litlen = HuffmanTable::from_code_lengths(&lengths[..hlit], CodeKind::LiteralLength)
        .ok_or_else(|| CodecError::corrupted(input.byte_offset(), "invalid literal/lengths set"))?;
    let dist = HuffmanTable::from_code_lengths(&lengths[hlit..total], CodeKind::Distance)
        .ok_or_else(|| CodecError::corrupted(input.byte_offset(), "invalid distances set"))?;

    Ok(DynamicTables { litlen, dist })
}

/// Decode one literal, end-of-block, or complete length/distance pair.
fn decode_symbol(
    input: &mut BitBuffer,
    litlen: &HuffmanTable,
    dist: &HuffmanTable,
) -> Result<Symbol> {
    let symbol = litlen.decode(input)?;

    if symbol < END_OF_BLOCK {
        return Ok(Symbol::Literal(symbol as u8));
    }
    if symbol == END_OF_BLOCK {
        return Ok(Symbol::EndOfBlock);
    }
    if symbol > MAX_LENGTH_SYMBOL {
        return Err(CodecError::corrupted(
            input.byte_offset(),
            format!("invalid literal/length code {}", symbol),
        ));
    }

    let index = (symbol - 257) as usize;
    let length = LENGTH_BASE[index] as usize + input.read_bits(LENGTH_EXTRA_BITS[index])? as usize;

    let dist_symbol = dist.decode(input)? as usize;
    if dist_symbol >= DISTANCE_BASE.len() {
        return Err(CodecError::corrupted(
            input.byte_offset(),
            format!("invalid distance code {}", dist_symbol),
        ));
    }
    let distance = DISTANCE_BASE[dist_symbol] as usize
        + input.read_bits(DISTANCE_EXTRA_BITS[dist_symbol])? as usize;

    Ok(Symbol::Match(Match { distance, length }))
}

/// Decode symbols of a Huffman block until it ends, output fills, or input
/// runs out.
fn decode_codes(
    input: &mut BitBuffer,
    litlen: &HuffmanTable,
    dist: &HuffmanTable,
    window: &mut Window,
    sink: &mut Sink<'_>,
    pending: &mut Option<Match>,
) -> Result<Step> {
    loop {
        if sink.is_full() {
            return Ok(Step::OutputFull);
        }

        let checkpoint = input.checkpoint();
        match decode_symbol(input, litlen, dist) {
            Ok(Symbol::Literal(byte)) => sink.emit(window, byte),
            Ok(Symbol::EndOfBlock) => return Ok(Step::EndOfBlock),
            Ok(Symbol::Match(mut m)) => {
                window.check_distance(m.distance)?;
                if !sink.copy_match(window, &mut m) {
                    *pending = Some(m);
                    return Ok(Step::OutputFull);
                }
            }
            Err(e) if e.is_starved() => {
                input.rewind(checkpoint);
                return Ok(Step::Starved);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Raw DEFLATE stream decoder that owns its input buffer.
#[derive(Debug)]
pub struct DeflateDecoder {
    input: BitBuffer,
    inflater: Inflater,
}

impl DeflateDecoder {
    /// Create a decoder with a `2^window_bits` byte history window.
    pub fn new(window_bits: u8) -> Result<Self> {
        Ok(Self {
            input: BitBuffer::new(),
            inflater: Inflater::new(window_bits)?,
        })
    }
}

impl Decompressor for DeflateDecoder {
    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize, DecompressStatus)> {
        if self.inflater.is_finished() {
            return Ok((0, 0, DecompressStatus::Done));
        }

        self.input.extend(input);
        let (produced, status) = self.inflater.inflate(&mut self.input, output)?;
        self.input.compact();

        Ok((input.len(), produced, status))
    }

    fn reset(&mut self) {
        self.input.clear();
        self.inflater.reset();
    }

    fn is_finished(&self) -> bool {
        self.inflater.is_finished()
    }
}

/// Decompress a complete raw DEFLATE stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    DeflateDecoder::new(MAX_WINDOW_BITS)?.decompress_all(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inflate_stored() {
        // Stored block: BFINAL=1, BTYPE=00, then aligned LEN=5, NLEN=!5, "Hello"
        let compressed = vec![
            0x01, // BFINAL=1, BTYPE=00, padding
            0x05, 0x00, // LEN=5
            0xFA, 0xFF, // NLEN
            b'H', b'e', b'l', b'l', b'o',
        ];

        assert_eq!(inflate(&compressed).unwrap(), b"Hello");
    }

    #[test]
    fn test_inflate_empty_stored() {
        let compressed = vec![0x01, 0x00, 0x00, 0xFF, 0xFF];
        assert!(inflate(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_inflate_fixed_empty() {
        // BFINAL=1, BTYPE=01, end-of-block (0000000): the empty fixed block
        // zlib emits for zero-length input.
        assert!(inflate(&[0x03, 0x00]).unwrap().is_empty());
    }

    #[test]
    fn test_inflate_fixed_with_match() {
        // "a" literal then <length 3, distance 1> then end-of-block:
        // the fixed-code encoding of "aaaa".
        assert_eq!(inflate(&[0x4B, 0x04, 0x02, 0x00]).unwrap(), b"aaaa");
    }

    #[test]
    fn test_stored_byte_at_a_time() {
        let compressed = [0x01, 0x03, 0x00, 0xFC, 0xFF, b'x', b'y', b'z'];

        let mut decoder = DeflateDecoder::new(15).unwrap();
        let mut output = Vec::new();
        let mut buf = [0u8; 2];
        let mut status = DecompressStatus::NeedsInput;

        for byte in compressed.iter() {
            let (_, produced, s) = decoder
                .decompress(std::slice::from_ref(byte), &mut buf)
                .unwrap();
            output.extend_from_slice(&buf[..produced]);
            status = s;
            while status == DecompressStatus::NeedsOutput {
                let (_, produced, s) = decoder.decompress(&[], &mut buf).unwrap();
                output.extend_from_slice(&buf[..produced]);
                status = s;
            }
        }

        assert_eq!(status, DecompressStatus::Done);
        assert_eq!(output, b"xyz");
    }

    #[test]
    fn test_pending_match_spans_output_slices() {
        let mut decoder = DeflateDecoder::new(15).unwrap();
        let mut buf = [0u8; 3];

        let (_, produced, status) = decoder.decompress(&[0x4B, 0x04, 0x02, 0x00], &mut buf).unwrap();
        assert_eq!((produced, status), (3, DecompressStatus::NeedsOutput));

        let (_, produced, status) = decoder.decompress(&[], &mut buf).unwrap();
        assert_eq!((produced, status), (1, DecompressStatus::Done));
        assert!(decoder.is_finished());
    }

    #[test]
    fn test_invalid_block_type() {
        // BFINAL=1, BTYPE=11
        let err = inflate(&[0x07]).unwrap_err();
        assert!(err.to_string().contains("invalid block type"));
    }

    #[test]
    fn test_invalid_stored_lengths() {
        let err = inflate(&[0x01, 0x05, 0x00, 0x00, 0x00]).unwrap_err();
        assert!(err.to_string().contains("invalid stored block lengths"));
    }

    #[test]
    fn test_distance_too_far_back() {
        // Fixed block whose first symbol is <length 3, distance 1>.
        let err = inflate(&[0x03, 0x02, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidDistance { distance: 1, .. }));
    }

    #[test]
    fn test_truncated_reports_eof() {
        let err = inflate(&[0x01, 0x05, 0x00, 0xFA, 0xFF, b'H']).unwrap_err();
        assert!(err.is_starved());
    }

    #[test]
    fn test_reset() {
        let mut decoder = DeflateDecoder::new(15).unwrap();
        assert_eq!(decoder.decompress_all(&[0x4B, 0x04, 0x02, 0x00]).unwrap(), b"aaaa");
        assert!(decoder.is_finished());

        decoder.reset();
        assert!(!decoder.is_finished());
        assert_eq!(decoder.decompress_all(&[0x03, 0x00]).unwrap(), b"");
    }
}
