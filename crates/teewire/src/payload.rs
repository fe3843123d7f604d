//! # Payload Codec
//!
//! Applies the transport's compression policy to a packed payload. A payload
//! goes out compressed only when compression is enabled and the result is
//! strictly smaller; otherwise it goes out as is. The caller carries the
//! choice in its packet flags and hands it back to [`PayloadCodec::decode`].

use std::sync::Arc;

use teewire_huffman::Huffman;

use crate::config::CodecConfig;
use crate::error::{Error, Result};

/// Where [`PayloadCodec::encode`] left the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedPayload {
    /// Bytes written to the output buffer.
    pub len: usize,
    /// True if the bytes are Huffman-compressed.
    pub compressed: bool,
}

/// Compression policy around a shared [`Huffman`] codec.
#[derive(Debug, Clone)]
pub struct PayloadCodec {
    huffman: Arc<Huffman>,
    config: CodecConfig,
}

impl PayloadCodec {
    /// Creates a codec over a shared Huffman instance.
    #[must_use]
    pub fn new(huffman: Arc<Huffman>, config: CodecConfig) -> Self {
        Self { huffman, config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The shared Huffman codec.
    #[must_use]
    pub fn huffman(&self) -> &Arc<Huffman> {
        &self.huffman
    }

    /// Writes `payload` to `out`, compressed if that saves space.
    ///
    /// # Errors
    ///
    /// - [`Error::PayloadTooLarge`] if `payload` exceeds `max_payload_size`
    /// - [`Error::OutputTooSmall`] if `out` cannot hold the raw payload
    pub fn encode(&self, payload: &[u8], out: &mut [u8]) -> Result<EncodedPayload> {
        if payload.len() > self.config.max_payload_size {
            return Err(Error::PayloadTooLarge {
                len: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        if self.config.compression_enabled {
            // Anything not strictly smaller is useless, so stop there.
            let budget = payload.len().saturating_sub(1).min(out.len());
            match self.huffman.compress(payload, &mut out[..budget]) {
                Ok(len) => {
                    return Ok(EncodedPayload {
                        len,
                        compressed: true,
                    })
                }
                Err(err) => {
                    tracing::trace!("Sending {} byte payload uncompressed: {}", payload.len(), err);
                }
            }
        }

        let capacity = out.len();
        let dst = out.get_mut(..payload.len()).ok_or(Error::OutputTooSmall {
            needed: payload.len(),
            capacity,
        })?;
        dst.copy_from_slice(payload);
        Ok(EncodedPayload {
            len: payload.len(),
            compressed: false,
        })
    }

    /// Restores a payload written by [`PayloadCodec::encode`] into `out`.
    ///
    /// Returns the payload length.
    ///
    /// # Errors
    ///
    /// - [`Error::Huffman`] if `compressed` is set and `data` does not decode
    ///   into `out`
    /// - [`Error::OutputTooSmall`] if `compressed` is clear and `out` is
    ///   shorter than `data`
    pub fn decode(&self, data: &[u8], compressed: bool, out: &mut [u8]) -> Result<usize> {
        if compressed {
            return self.huffman.decompress(data, out).map_err(|err| {
                tracing::debug!("Dropping {} byte compressed payload: {}", data.len(), err);
                Error::from(err)
            });
        }

        let capacity = out.len();
        let dst = out.get_mut(..data.len()).ok_or(Error::OutputTooSmall {
            needed: data.len(),
            capacity,
        })?;
        dst.copy_from_slice(data);
        Ok(data.len())
    }
}
