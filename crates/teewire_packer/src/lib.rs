//! # TEEWIRE Packer - Message Field Serialization
//!
//! Writes integers, NUL-terminated UTF-8 strings and raw byte runs into a
//! flat buffer in protocol order, and reads them back in the same order.
//! There are no implicit length prefixes and no type tags: both sides must
//! agree on the field sequence.
//!
//! ## Sticky Errors
//!
//! Neither side returns `Result` per field. The first failure (buffer
//! exhausted, malformed integer, invalid UTF-8, string over its limit) is
//! recorded, and from then on every write is a no-op and every read returns
//! its default. Check [`Packer::has_error`] / [`Unpacker::has_error`] once
//! after the whole message.
//!
//! ```text
//!        any failure
//!   OK ──────────────▶ ERROR
//!    ▲                   │
//!    └────── reset ──────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use teewire_packer::{Packer, Sanitize, Unpacker};
//!
//! let mut packer = Packer::new();
//! packer.add_int(-42);
//! packer.add_string("nameless tee", 0, true);
//! assert!(!packer.has_error());
//!
//! let mut data = packer.as_slice().to_vec();
//! let mut unpacker = Unpacker::new(&mut data);
//! assert_eq!(unpacker.get_int(), -42);
//! assert_eq!(unpacker.get_string(Sanitize::SANITIZE), "nameless tee");
//! assert!(!unpacker.has_error());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod packer;
pub mod unpacker;
pub mod utf8;
pub mod varint;

pub use error::{ErrorKind, WireError};
pub use packer::Packer;
pub use unpacker::{Sanitize, Unpacker};
pub use varint::{compress_ints, decompress_ints, IntCodec, VariableInt};

/// Default packer capacity in bytes.
pub const PACKER_BUFFER_SIZE: usize = 1024 * 2;
