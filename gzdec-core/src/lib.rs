//! # gzdec core
//!
//! Core components shared by the gzdec decoder stack.
//!
//! - [`bitstream`]: Checkpointed LSB-first bit buffer for resumable decoding
//! - [`window`]: Sliding history window for LZ77 back-references
//! - [`crc`]: CRC-32 checksum
//! - [`traits`]: The streaming [`Decompressor`] trait
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: gzdec-cli                                           │
//! │     argument parsing, output sink, logging setup        │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: gzdec                                               │
//! │     gzip framing engine, file decompressor              │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: gzdec-deflate                                       │
//! │     resumable DEFLATE state machine                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: gzdec-core (this crate)                             │
//! │     BitBuffer, Window, CRC-32, traits, errors           │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod crc;
pub mod error;
pub mod traits;
pub mod window;

// Re-exports for convenience
pub use bitstream::{BitBuffer, Checkpoint};
pub use crc::Crc32;
pub use error::{CodecError, Result};
pub use traits::{DecompressStatus, Decompressor};
pub use window::{MAX_WINDOW_BITS, MIN_WINDOW_BITS, Window};
