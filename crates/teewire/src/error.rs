//! # Codec Error Types
//!
//! Field-level packing failures stay inside the sticky state of
//! [`crate::Packer`] and [`crate::Unpacker`]; these are the errors of the
//! payload stage and of configuration loading.

use std::path::PathBuf;

use teewire_huffman::HuffmanError;
use thiserror::Error;

/// Errors returned by the payload codec.
#[derive(Error, Debug)]
pub enum Error {
    /// Compression or decompression failed.
    #[error("huffman: {0}")]
    Huffman(#[from] HuffmanError),

    /// The payload is larger than the configured maximum.
    #[error("payload of {len} bytes exceeds limit of {max}")]
    PayloadTooLarge {
        /// Payload length.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The caller's output buffer cannot hold the result.
    #[error("output buffer of {capacity} bytes cannot hold {needed}")]
    OutputTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        capacity: usize,
    },

    /// Configuration could not be loaded.
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while loading a [`crate::CodecConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result alias for the payload codec.
pub type Result<T> = std::result::Result<T, Error>;
