//! Streaming GZIP member decoder.
//!
//! Wraps an [`Inflater`] with RFC 1952 framing: the header is parsed
//! before the first DEFLATE block, and the CRC-32 and ISIZE trailer are
//! verified after the final one. [`DecompressStatus::Done`] is only
//! reported once the trailer has checked out.

use super::header::GzipHeader;
use gzdec_core::bitstream::BitBuffer;
use gzdec_core::crc::Crc32;
use gzdec_core::error::{CodecError, Result};
use gzdec_core::traits::{DecompressStatus, Decompressor};
use gzdec_deflate::Inflater;
use log::{debug, warn};

/// Trailer length: CRC-32 plus ISIZE.
const TRAILER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Header,
    Body,
    Trailer,
    Done,
}

/// Single-member GZIP decoder.
///
/// Input handed to [`decompress`](Decompressor::decompress) is always taken
/// in full and buffered internally. Bytes following the member trailer are
/// counted and discarded.
#[derive(Debug)]
pub struct GzipDecoder {
    input: BitBuffer,
    inflater: Inflater,
    stage: Stage,
    header: Option<GzipHeader>,
    crc: Crc32,
    trailing: u64,
}

impl GzipDecoder {
    /// Create a decoder with a `2^window_bits` byte history window.
    ///
    /// Fails with [`CodecError::InvalidWindowBits`] outside `8..=15`.
    pub fn new(window_bits: u8) -> Result<Self> {
        Ok(Self {
            input: BitBuffer::new(),
            inflater: Inflater::new(window_bits)?,
            stage: Stage::Header,
            header: None,
            crc: Crc32::new(),
            trailing: 0,
        })
    }

    /// The member header, once it has been parsed.
    pub fn header(&self) -> Option<&GzipHeader> {
        self.header.as_ref()
    }

    /// Consume a finished decoder, returning the member header.
    ///
    /// Fails with [`CodecError::UnexpectedEof`] unless the trailer has been
    /// verified.
    pub fn finish(self) -> Result<GzipHeader> {
        match (self.stage, self.header) {
            (Stage::Done, Some(header)) => Ok(header),
            _ => Err(CodecError::unexpected_eof(8)),
        }
    }

    /// Decompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.inflater.total_out()
    }

    /// Bytes received after the member trailer and ignored.
    pub fn trailing_bytes(&self) -> u64 {
        self.trailing
    }

    fn run(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)> {
        let mut produced = 0;

        loop {
            match self.stage {
                Stage::Header => {
                    let checkpoint = self.input.checkpoint();
                    match GzipHeader::parse(&mut self.input) {
                        Ok(header) => {
                            debug!(
                                "gzip header: flags={:#04x} mtime={} os={} filename={:?}",
                                header.flags,
                                header.mtime,
                                header.os_name(),
                                header.filename
                            );
                            self.header = Some(header);
                            self.stage = Stage::Body;
                        }
                        Err(e) if e.is_starved() => {
                            self.input.rewind(checkpoint);
                            return Ok((produced, DecompressStatus::NeedsInput));
                        }
                        Err(e) => return Err(e),
                    }
                }

                Stage::Body => {
                    let out = &mut output[produced..];
                    let (written, status) = self.inflater.inflate(&mut self.input, out)?;
                    self.crc.update(&out[..written]);
                    produced += written;

                    match status {
                        DecompressStatus::Done => {
                            self.input.align_to_byte();
                            self.stage = Stage::Trailer;
                        }
                        other => return Ok((produced, other)),
                    }
                }

                Stage::Trailer => {
                    if self.input.available_bytes() < TRAILER_LEN {
                        return Ok((produced, DecompressStatus::NeedsInput));
                    }
                    self.check_trailer()?;
                    self.stage = Stage::Done;
                    debug!(
                        "gzip member complete: {} bytes, crc32 {:#010x}",
                        self.inflater.total_out(),
                        self.crc.value()
                    );
                    self.discard_trailing(0);
                }

                Stage::Done => return Ok((produced, DecompressStatus::Done)),
            }
        }
    }

    fn check_trailer(&mut self) -> Result<()> {
        let expected_crc = self.input.read_u32_le()?;
        let expected_len = self.input.read_u32_le()?;

        let computed_crc = self.crc.value();
        if expected_crc != computed_crc {
            return Err(CodecError::crc_mismatch(expected_crc, computed_crc));
        }

        // ISIZE is the length modulo 2^32.
        let produced = self.inflater.total_out() as u32;
        if expected_len != produced {
            return Err(CodecError::length_mismatch(expected_len, produced));
        }

        Ok(())
    }

    /// Drop whatever follows the trailer, plus `incoming` unbuffered bytes.
    fn discard_trailing(&mut self, incoming: usize) {
        let count = self.input.available_bytes() as u64 + incoming as u64;
        if count == 0 {
            return;
        }
        if self.trailing == 0 {
            warn!("ignoring trailing data after gzip member");
        }
        self.trailing += count;
        self.input.clear();
    }
}

impl Decompressor for GzipDecoder {
    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize, DecompressStatus)> {
        if self.stage == Stage::Done {
            self.discard_trailing(input.len());
            return Ok((input.len(), 0, DecompressStatus::Done));
        }

        self.input.extend(input);
        let result = self.run(output);
        self.input.compact();
        let (produced, status) = result?;

        Ok((input.len(), produced, status))
    }

    fn reset(&mut self) {
        self.input.clear();
        self.inflater.reset();
        self.stage = Stage::Header;
        self.header = None;
        self.crc.reset();
        self.trailing = 0;
    }

    fn is_finished(&self) -> bool {
        self.stage == Stage::Done
    }
}
