//! # Huffman Error Types

use thiserror::Error;

/// Errors produced by the Huffman codec.
///
/// Every error means the whole operation must be discarded; the output
/// buffer holds no meaningful partial result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanError {
    /// The caller's output buffer is too small for the result.
    #[error("output buffer full after {written} bytes")]
    OutputFull {
        /// Bytes written before the buffer ran out.
        written: usize,
    },

    /// The input ran out of bits in the middle of a code.
    ///
    /// Raised for truncated streams and for garbage that never reaches the
    /// end-of-stream symbol.
    #[error("compressed stream ended inside a code")]
    UnexpectedEnd,

    /// A custom frequency table produced a code the accumulator cannot carry.
    #[error("code length {length} exceeds maximum {max}")]
    CodeTooLong {
        /// Longest code produced by the table.
        length: u16,
        /// Longest supported code.
        max: u16,
    },
}
