//! # TEEWIRE Huffman - Static Entropy Coder
//!
//! Compresses a packed message buffer with a Huffman tree that is built once
//! from a fixed, pre-trained frequency table. There is no per-message header
//! and no adaptive statistics: both peers build the same tree from the same
//! table, and the stream terminates itself with an explicit end-of-stream
//! code.
//!
//! ## Stream Layout
//!
//! ```text
//! ┌────────────┬────────────┬─────┬────────────┬──────────┬──────────────┐
//! │ code(b[0]) │ code(b[1]) │ ... │ code(b[n]) │ code(EOF)│ leftover byte│
//! └────────────┴────────────┴─────┴────────────┴──────────┴──────────────┘
//!   codes are written low bit first, bytes flushed as soon as 8 bits exist
//! ```
//!
//! ## Decoding
//!
//! Decoding uses a 1024-entry lookup table indexed by the next 10 bits of the
//! stream. Codes of up to 10 bits resolve in one lookup; longer codes resume
//! a bit-by-bit walk from the node the table reached. A stream whose bits run
//! out before a leaf is reached is rejected.
//!
//! ## Sharing
//!
//! A [`Huffman`] is immutable after construction and is `Send + Sync`. Build
//! it once and hand out an `Arc<Huffman>` to every component that needs it.
//!
//! ## Example
//!
//! ```rust
//! use teewire_huffman::Huffman;
//!
//! let huffman = Huffman::new();
//! let mut compressed = [0u8; 64];
//! let mut restored = [0u8; 64];
//!
//! let len = huffman.compress(b"hello", &mut compressed)?;
//! let out = huffman.decompress(&compressed[..len], &mut restored)?;
//! assert_eq!(&restored[..out], b"hello");
//! # Ok::<(), teewire_huffman::HuffmanError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod bits;
mod codec;
mod error;
mod table;
mod tree;

pub use codec::{Code, Huffman};
pub use error::HuffmanError;
pub use table::FREQUENCY_TABLE;

/// Symbol id of the end-of-stream marker.
pub const EOF_SYMBOL: usize = 256;

/// Number of symbols in the alphabet (256 byte values + end-of-stream).
pub const MAX_SYMBOLS: usize = EOF_SYMBOL + 1;

/// Number of nodes in a full tree over [`MAX_SYMBOLS`] leaves.
pub const MAX_NODES: usize = MAX_SYMBOLS * 2 - 1;

/// Bits resolved by one decode table lookup.
pub const LUT_BITS: u32 = 10;

/// Entries in the decode table.
pub const LUT_SIZE: usize = 1 << LUT_BITS;

/// Longest code the 32-bit bit accumulator can carry.
///
/// The encoder holds at most 7 pending bits when a code is appended, and the
/// decoder refills to at least 24 bits while input remains.
pub const MAX_CODE_BITS: u16 = 24;
