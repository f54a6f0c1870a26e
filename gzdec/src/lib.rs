//! # gzdec
//!
//! Streaming gzip decompression of a file into a single owned buffer.
//!
//! Compressed input is read through a bounded chunk, decoded by a
//! pure Rust resumable inflate engine, and appended to a `Vec<u8>` that is
//! returned only when the gzip member has been fully decoded and its
//! CRC-32 and length verified.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gzdec::{DecompressOptions, FileDecompressor};
//!
//! let data = gzdec::decompress("input.gz").unwrap();
//!
//! // Smaller chunks, same output.
//! let decompressor = FileDecompressor::new(DecompressOptions::new().with_chunk_size(4096));
//! assert_eq!(decompressor.decompress("input.gz").unwrap(), data);
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`DecompressError`]; no partial output is ever
//! returned. Input that ends before the end of the gzip member is a
//! [`DecompressError::TruncatedStream`], not a short success.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decompress;
pub mod error;
pub mod gzip;

// Re-exports
pub use config::{CHUNK_SIZE, DecompressOptions, MAX_CHUNK_SIZE, MAX_WINDOW_BITS};
pub use decompress::{Decompressed, FileDecompressor, decompress};
pub use error::{DecompressError, Result};
pub use gzip::{GzipDecoder, GzipHeader};
