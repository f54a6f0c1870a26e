//! Whole-file gzip decompression.
//!
//! [`FileDecompressor`] reads compressed input one chunk at a time, feeds
//! each chunk to a [`GzipDecoder`], and drains the decoder through a
//! chunk-sized write buffer into a single growing `Vec<u8>`. Only the
//! decoder reaching the end of the gzip member counts as success; input
//! that runs out first is a [`DecompressError::TruncatedStream`].

use crate::config::DecompressOptions;
use crate::error::{DecompressError, Result};
use crate::gzip::{GzipDecoder, GzipHeader};
use gzdec_core::traits::{DecompressStatus, Decompressor};
use log::{debug, trace};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// A fully decompressed gzip member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressed {
    /// The decompressed payload; `data.len()` is its exact size.
    pub data: Vec<u8>,
    /// The member header.
    pub header: GzipHeader,
    /// Compressed bytes read from the source.
    pub compressed_len: u64,
}

/// Decompresses gzip files into memory.
#[derive(Debug, Clone, Default)]
pub struct FileDecompressor {
    options: DecompressOptions,
}

impl FileDecompressor {
    /// Create a decompressor with the given options.
    pub fn new(options: DecompressOptions) -> Self {
        Self { options }
    }

    /// Decompress the gzip file at `path`.
    pub fn decompress(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        Ok(self.decompress_with_header(path)?.data)
    }

    /// Decompress the gzip file at `path`, keeping its header.
    pub fn decompress_with_header(&self, path: impl AsRef<Path>) -> Result<Decompressed> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DecompressError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("opened {}", path.display());

        self.decompress_reader_with_header(file)
    }

    /// Decompress a gzip stream from any reader.
    pub fn decompress_reader<R: Read>(&self, reader: R) -> Result<Vec<u8>> {
        Ok(self.decompress_reader_with_header(reader)?.data)
    }

    /// Decompress a gzip stream from any reader, keeping its header.
    pub fn decompress_reader_with_header<R: Read>(&self, mut reader: R) -> Result<Decompressed> {
        let mut engine = self.init_engine()?;

        let chunk_size = self.options.chunk_size;
        let mut read_chunk = vec![0u8; chunk_size];
        let mut write_chunk = vec![0u8; chunk_size];
        let mut data = Vec::new();
        let mut compressed_len = 0u64;

        loop {
            let n = read_some(&mut reader, &mut read_chunk)?;
            if n == 0 {
                return Err(DecompressError::TruncatedStream {
                    consumed: compressed_len,
                    produced: data.len() as u64,
                });
            }
            compressed_len += n as u64;
            trace!("read {} compressed bytes ({} total)", n, compressed_len);

            let mut input = &read_chunk[..n];
            loop {
                let (consumed, produced, status) = engine.decompress(input, &mut write_chunk)?;
                input = &input[consumed..];
                data.extend_from_slice(&write_chunk[..produced]);

                match status {
                    DecompressStatus::NeedsOutput => continue,
                    DecompressStatus::NeedsInput => break,
                    DecompressStatus::Done => {
                        debug!(
                            "decompressed {} bytes from {} compressed bytes ({} trailing ignored)",
                            data.len(),
                            compressed_len,
                            engine.trailing_bytes()
                        );
                        return Ok(Decompressed {
                            header: engine.finish()?,
                            data,
                            compressed_len,
                        });
                    }
                }
            }
        }
    }

    fn init_engine(&self) -> Result<GzipDecoder> {
        self.options.validate()?;
        let engine = GzipDecoder::new(self.options.window_bits)
            .map_err(|e| DecompressError::engine_init(e.to_string()))?;
        debug!(
            "initialized gzip engine: window_bits={} chunk_size={}",
            self.options.window_bits, self.options.chunk_size
        );
        Ok(engine)
    }
}

/// Read once into `buf`, retrying reads that were interrupted.
fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => return Err(DecompressError::ReadFailed { source }),
        }
    }
}

/// Decompress the gzip file at `path` with default options.
///
/// # Example
///
/// ```rust,no_run
/// let data = gzdec::decompress("archive.gz").unwrap();
/// println!("{} bytes", data.len());
/// ```
pub fn decompress(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    FileDecompressor::default().decompress(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gzdec_core::crc::Crc32;
    use std::io::Cursor;

    fn member_aaaa() -> Vec<u8> {
        let mut data = vec![0x1F, 0x8B, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0x03];
        data.extend_from_slice(&[0x4B, 0x04, 0x02, 0x00]);
        data.extend_from_slice(&Crc32::compute(b"aaaa").to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data
    }

    #[test]
    fn test_decompress_reader() {
        let out = FileDecompressor::default()
            .decompress_reader_with_header(Cursor::new(member_aaaa()))
            .unwrap();
        assert_eq!(out.data, b"aaaa");
        assert_eq!(out.header.os, 3);
        assert_eq!(out.compressed_len, 22);
    }

    #[test]
    fn test_one_byte_chunks() {
        let decompressor = FileDecompressor::new(DecompressOptions::new().with_chunk_size(1));
        let data = decompressor
            .decompress_reader(Cursor::new(member_aaaa()))
            .unwrap();
        assert_eq!(data, b"aaaa");
    }

    #[test]
    fn test_missing_trailer_is_truncated() {
        let mut member = member_aaaa();
        member.truncate(member.len() - 3);

        let err = FileDecompressor::default()
            .decompress_reader(Cursor::new(member))
            .unwrap_err();
        assert!(matches!(
            err,
            DecompressError::TruncatedStream {
                consumed: 19,
                produced: 4
            }
        ));
    }

    #[test]
    fn test_init_failure_before_reading() {
        struct Unreadable;
        impl Read for Unreadable {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                panic!("reader must not be touched");
            }
        }

        let decompressor = FileDecompressor::new(DecompressOptions::new().with_window_bits(16));
        let err = decompressor.decompress_reader(Unreadable).unwrap_err();
        assert!(matches!(err, DecompressError::EngineInitFailed { .. }));
    }
}
