//! The streaming decompression interface.
//!
//! A [`Decompressor`] consumes compressed input slice by slice and produces
//! decompressed output into caller-supplied buffers, reporting after each
//! call whether it is waiting for input, has more output pending, or has
//! reached the end of the stream.

use crate::error::{CodecError, Result};

/// Status of a streaming decompression call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressStatus {
    /// All buffered input has been decoded; more input is needed to continue.
    NeedsInput,
    /// The output buffer was filled exactly; call again for pending output.
    NeedsOutput,
    /// The stream is complete and verified.
    Done,
}

/// A streaming decompressor (decoder).
pub trait Decompressor {
    /// Decompress data from input to output.
    ///
    /// # Arguments
    ///
    /// * `input` - Compressed bytes not yet handed to the decoder
    /// * `output` - Buffer for decompressed bytes
    ///
    /// # Returns
    ///
    /// A tuple of (bytes consumed from input, bytes written to output, status)
    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize, DecompressStatus)>;

    /// Reset the decompressor to its initial state.
    fn reset(&mut self);

    /// Check if the decompressor has finished.
    fn is_finished(&self) -> bool;

    /// Decompress a complete in-memory stream.
    ///
    /// Fails with [`CodecError::UnexpectedEof`]
    /// when `input` ends before the stream does.
    fn decompress_all(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut input_pos = 0;
        let mut buffer = vec![0u8; 32768];

        loop {
            let (consumed, produced, status) = self.decompress(&input[input_pos..], &mut buffer)?;

            input_pos += consumed;
            output.extend_from_slice(&buffer[..produced]);

            match status {
                DecompressStatus::Done => break,
                DecompressStatus::NeedsOutput => continue,
                DecompressStatus::NeedsInput if input_pos < input.len() => continue,
                DecompressStatus::NeedsInput => {
                    return Err(CodecError::unexpected_eof(8));
                }
            }
        }

        Ok(output)
    }
}
