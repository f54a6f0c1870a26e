//! Error types for codec operations.
//!
//! Every failure the decompression engine can report is a [`CodecError`].
//! The `Display` text of the stream-level variants follows the messages
//! zlib uses for the same conditions, so they read familiarly in logs.

use thiserror::Error;

/// The error type for engine-level operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The buffered input ended before the current decode step completed.
    ///
    /// Streaming decoders treat this as "needs more input"; it only escapes
    /// to callers of the one-shot helpers.
    #[error("Unexpected end of input: needed {needed} more bits")]
    UnexpectedEof {
        /// Number of bits that were required but not available.
        needed: u32,
    },

    /// Invalid magic number in a stream header.
    #[error("incorrect header check: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Unsupported compression method.
    #[error("unknown compression method: {method}")]
    UnsupportedMethod {
        /// The compression method identifier.
        method: u8,
    },

    /// Invalid header format.
    #[error("invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Header CRC-16 does not match the header bytes.
    #[error("header crc mismatch: expected {expected:#06x}, computed {computed:#06x}")]
    HeaderCrcMismatch {
        /// CRC-16 stored in the header.
        expected: u16,
        /// CRC-16 computed over the header bytes.
        computed: u16,
    },

    /// Trailer CRC-32 does not match the decompressed data.
    #[error("incorrect data check: expected {expected:#010x}, computed {computed:#010x}")]
    CrcMismatch {
        /// CRC-32 stored in the trailer.
        expected: u32,
        /// CRC-32 computed over the output.
        computed: u32,
    },

    /// Trailer length does not match the decompressed size (mod 2^32).
    #[error("incorrect length check: expected {expected}, produced {produced}")]
    LengthMismatch {
        /// ISIZE stored in the trailer.
        expected: u32,
        /// Output size modulo 2^32.
        produced: u32,
    },

    /// Invalid Huffman code encountered during decompression.
    #[error("invalid {alphabet} code at byte offset {offset}")]
    InvalidHuffmanCode {
        /// Which alphabet was being decoded ("literal/length", "distance", ...).
        alphabet: &'static str,
        /// Absolute byte offset in the compressed stream.
        offset: u64,
    },

    /// Corrupted data in the stream.
    #[error("{message} (at byte offset {offset})")]
    CorruptedData {
        /// Absolute byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Back-reference points before the start of the available history.
    #[error("invalid distance too far back: {distance} exceeds history of {history} bytes")]
    InvalidDistance {
        /// The offending distance.
        distance: usize,
        /// Bytes of history available.
        history: usize,
    },

    /// Window size outside the range the engine supports.
    #[error("invalid window bits {bits}: must be between {min} and {max}")]
    InvalidWindowBits {
        /// Requested window bits.
        bits: u8,
        /// Smallest supported value.
        min: u8,
        /// Largest supported value.
        max: u8,
    },
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Create an unexpected end of input error.
    pub fn unexpected_eof(needed: u32) -> Self {
        Self::UnexpectedEof { needed }
    }

    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unsupported method error.
    pub fn unsupported_method(method: u8) -> Self {
        Self::UnsupportedMethod { method }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a header CRC mismatch error.
    pub fn header_crc_mismatch(expected: u16, computed: u16) -> Self {
        Self::HeaderCrcMismatch { expected, computed }
    }

    /// Create a CRC mismatch error.
    pub fn crc_mismatch(expected: u32, computed: u32) -> Self {
        Self::CrcMismatch { expected, computed }
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(expected: u32, produced: u32) -> Self {
        Self::LengthMismatch { expected, produced }
    }

    /// Create an invalid Huffman code error.
    pub fn invalid_huffman(alphabet: &'static str, offset: u64) -> Self {
        Self::InvalidHuffmanCode { alphabet, offset }
    }

    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid distance error.
    pub fn invalid_distance(distance: usize, history: usize) -> Self {
        Self::InvalidDistance { distance, history }
    }

    /// Create an invalid window bits error.
    pub fn invalid_window_bits(bits: u8, min: u8, max: u8) -> Self {
        Self::InvalidWindowBits { bits, min, max }
    }

    /// Whether this error only means the decoder ran out of buffered input.
    pub fn is_starved(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}
