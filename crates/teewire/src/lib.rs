//! # TEEWIRE - Wire-Level Message Codec
//!
//! Turns structured game messages into compact payloads and back.
//!
//! ## Pipeline
//!
//! ```text
//! SENDER                                            RECEIVER
//!   Packer ──▶ PayloadCodec::encode ──▶ transport ──▶ PayloadCodec::decode ──▶ Unpacker
//!   fields     Huffman if smaller        (flag)       Huffman if flagged         fields
//! ```
//!
//! The transport itself (sockets, sequencing, resends) lives elsewhere; it
//! only carries the payload bytes and the compression flag.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use teewire::{CodecConfig, Huffman, Packer, PayloadCodec, Sanitize, Unpacker, MAX_PAYLOAD_SIZE};
//!
//! let codec = PayloadCodec::new(Arc::new(Huffman::new()), CodecConfig::default());
//!
//! let mut packer = Packer::new();
//! packer.add_int(3);
//! packer.add_string("hello", 0, true);
//!
//! let mut wire = [0u8; MAX_PAYLOAD_SIZE];
//! let encoded = codec.encode(packer.as_slice(), &mut wire)?;
//!
//! let mut message = [0u8; MAX_PAYLOAD_SIZE];
//! let len = codec.decode(&wire[..encoded.len], encoded.compressed, &mut message)?;
//!
//! let mut unpacker = Unpacker::new(&mut message[..len]);
//! assert_eq!(unpacker.get_int(), 3);
//! assert_eq!(unpacker.get_string(Sanitize::SANITIZE), "hello");
//! # Ok::<(), teewire::Error>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod payload;

pub use config::CodecConfig;
pub use error::{ConfigError, Error, Result};
pub use payload::{EncodedPayload, PayloadCodec};

pub use teewire_huffman::{Huffman, HuffmanError, FREQUENCY_TABLE};
pub use teewire_packer::{
    compress_ints, decompress_ints, ErrorKind, IntCodec, Packer, Sanitize, Unpacker, VariableInt, WireError,
    PACKER_BUFFER_SIZE,
};

/// Largest datagram the transport sends.
pub const MAX_PACKET_SIZE: usize = 1400;

/// Transport header bytes in front of every payload.
pub const PACKET_HEADER_SIZE: usize = 3;

/// Largest payload carried by one packet.
pub const MAX_PAYLOAD_SIZE: usize = MAX_PACKET_SIZE - 6;
