//! # Codec Configuration
//!
//! Loaded once at startup from TOML. Every key is optional:
//!
//! ```toml
//! compression_enabled = true
//! max_payload_size = 1394
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::MAX_PAYLOAD_SIZE;

/// Settings for [`crate::PayloadCodec`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Try Huffman compression on outgoing payloads.
    pub compression_enabled: bool,
    /// Largest payload accepted by `encode`, at most [`MAX_PAYLOAD_SIZE`].
    pub max_payload_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            compression_enabled: true,
            max_payload_size: MAX_PAYLOAD_SIZE,
        }
    }
}

impl CodecConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML or unknown keys,
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`CodecConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            "Loaded codec config from {}: compression={}, max_payload={}",
            path.display(),
            config.compression_enabled,
            config.max_payload_size
        );
        Ok(config)
    }

    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_payload_size == 0 || self.max_payload_size > MAX_PAYLOAD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "max_payload_size must be within 1..={MAX_PAYLOAD_SIZE}, got {}",
                self.max_payload_size
            )));
        }
        Ok(())
    }
}
