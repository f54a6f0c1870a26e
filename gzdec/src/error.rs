//! Errors reported by the file decompressor.

use gzdec_core::CodecError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for [`FileDecompressor`](crate::FileDecompressor).
///
/// Every variant is terminal: no partially decompressed data accompanies
/// an error.
#[derive(Debug, Error)]
pub enum DecompressError {
    /// The source file could not be opened for reading.
    #[error("failed to open {}: {source}", .path.display())]
    OpenFailed {
        /// Path that was passed in.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The decompression engine rejected its configuration.
    #[error("failed to initialize decompression engine: {reason}")]
    EngineInitFailed {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// Reading compressed input failed.
    #[error("read error: {source}")]
    ReadFailed {
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The engine found the stream corrupt or invalid.
    #[error("decode failed: {0}")]
    DecodeFailed(#[from] CodecError),

    /// The input ended before the engine reached the end of the stream.
    #[error(
        "truncated gzip stream: input ended after {consumed} bytes \
         ({produced} bytes decompressed) before the end of the stream"
    )]
    TruncatedStream {
        /// Compressed bytes read before the input ran out.
        consumed: u64,
        /// Decompressed bytes produced (and discarded) by then.
        produced: u64,
    },
}

/// Result type alias for file decompression.
pub type Result<T> = std::result::Result<T, DecompressError>;

impl DecompressError {
    /// Create an engine initialization error.
    pub fn engine_init(reason: impl Into<String>) -> Self {
        Self::EngineInitFailed {
            reason: reason.into(),
        }
    }

    /// Whether the input ended before the stream did.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedStream { .. })
    }

    /// Whether the engine rejected the stream contents.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::DecodeFailed(_))
    }

    /// The engine error, for decode failures.
    pub fn codec_error(&self) -> Option<&CodecError> {
        match self {
            Self::DecodeFailed(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecompressError::OpenFailed {
            path: PathBuf::from("/no/such/file.gz"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to open /no/such/file.gz: not found");

        let err = DecompressError::TruncatedStream {
            consumed: 10,
            produced: 3,
        };
        assert!(err.to_string().contains("after 10 bytes"));
        assert!(err.is_truncated());
        assert!(!err.is_decode_failure());
    }

    #[test]
    fn test_from_codec_error() {
        let err: DecompressError = CodecError::crc_mismatch(1, 2).into();
        assert!(err.is_decode_failure());
        assert!(matches!(
            err.codec_error(),
            Some(CodecError::CrcMismatch { .. })
        ));
        assert!(err.to_string().starts_with("decode failed: incorrect data check"));
    }
}
