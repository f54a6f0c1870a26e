//! Machine-readable run summary for `--json`.

use gzdec::Decompressed;
use serde::Serialize;
use std::path::Path;

/// JSON summary of one decompression.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub compressed_size: u64,
    pub decompressed_size: u64,
    /// Compressed size over decompressed size; 1.0 for empty output.
    pub compression_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub mtime: u32,
    pub os: &'static str,
    pub text: bool,
}

impl Summary {
    pub fn new(input: &Path, output: Option<&Path>, decompressed: &Decompressed) -> Self {
        let header = &decompressed.header;
        let decompressed_size = decompressed.data.len() as u64;
        let compression_ratio = if decompressed_size == 0 {
            1.0
        } else {
            decompressed.compressed_len as f64 / decompressed_size as f64
        };

        Self {
            input: input.display().to_string(),
            output: output.map(|p| p.display().to_string()),
            compressed_size: decompressed.compressed_len,
            decompressed_size,
            compression_ratio,
            filename: header.filename.clone(),
            comment: header.comment.clone(),
            mtime: header.mtime,
            os: header.os_name(),
            text: header.is_text(),
        }
    }
}
