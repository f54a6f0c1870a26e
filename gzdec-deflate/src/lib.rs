//! # gzdec deflate
//!
//! Pure Rust streaming DEFLATE decompression (RFC 1951).
//!
//! The [`Inflater`] is a resumable state machine: it accepts compressed
//! input in slices of any size, including a single byte, and writes output
//! into slices of any size, suspending wherever either side runs out.
//!
//! ## Example
//!
//! ```rust
//! use gzdec_deflate::inflate;
//!
//! // A fixed-Huffman block holding "aaaa".
//! let decompressed = inflate(&[0x4B, 0x04, 0x02, 0x00]).unwrap();
//! assert_eq!(decompressed, b"aaaa");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod huffman;
pub mod inflate;
pub mod tables;

// Re-exports
pub use huffman::{CodeKind, HuffmanTable};
pub use inflate::{DeflateDecoder, Inflater, inflate};
