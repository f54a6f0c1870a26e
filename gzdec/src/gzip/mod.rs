//! GZIP format support (RFC 1952).
//!
//! A gzip member is a header, a raw DEFLATE stream, and an eight byte
//! trailer holding the CRC-32 and length of the uncompressed data.
//!
//! ## Example
//!
//! ```rust
//! use gzdec::gzip;
//!
//! // Header, a fixed-Huffman block holding "aaaa", then CRC-32 and ISIZE.
//! let member = [
//!     0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF,
//!     0x4B, 0x04, 0x02, 0x00,
//!     0x45, 0xE5, 0x98, 0xAD, 0x04, 0x00, 0x00, 0x00,
//! ];
//! assert_eq!(gzip::decode(&member).unwrap(), b"aaaa");
//! ```

mod decoder;
mod header;

pub use decoder::GzipDecoder;
pub use header::{CM_DEFLATE, GZIP_MAGIC, GzipHeader, flags};

use gzdec_core::error::Result;
use gzdec_core::traits::Decompressor;
use gzdec_core::window::MAX_WINDOW_BITS;

/// Decode a complete in-memory gzip member.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    GzipDecoder::new(MAX_WINDOW_BITS)?.decompress_all(data)
}
