//! # Unpacker
//!
//! Reads message fields back from a borrowed buffer, in the order they were
//! packed.
//!
//! The view is `&mut` because strings are sanitized in place. Every string
//! and raw run handed out borrows from that buffer, so nothing is copied.

use std::marker::PhantomData;

use bitflags::bitflags;

use crate::error::WireError;
use crate::utf8;
use crate::varint::{IntCodec, VariableInt};

bitflags! {
    /// Clean-up applied by [`Unpacker::get_string`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Sanitize: u32 {
        /// Replace control characters except `\t`, `\n` and `\r` with spaces.
        const SANITIZE = 1 << 0;
        /// Replace every control character with a space.
        ///
        /// Ignored when [`Sanitize::SANITIZE`] is also set.
        const SANITIZE_CC = 1 << 1;
        /// Skip leading whitespace code points.
        const SKIP_START_WHITESPACES = 1 << 2;
    }
}

/// Message reader with a sticky error.
pub struct Unpacker<'a, C: IntCodec = VariableInt> {
    data: &'a mut [u8],
    error: Option<WireError>,
    codec: PhantomData<C>,
}

impl<'a> Unpacker<'a, VariableInt> {
    /// Creates a reader over `data` with the default integer codec.
    #[must_use]
    pub fn new(data: &'a mut [u8]) -> Self {
        Self::with_int_codec(data)
    }
}

impl<'a, C: IntCodec> Unpacker<'a, C> {
    /// Creates a reader over `data` for any integer codec.
    #[must_use]
    pub fn with_int_codec(data: &'a mut [u8]) -> Self {
        Self {
            data,
            error: None,
            codec: PhantomData,
        }
    }

    /// Starts over on a new buffer and clears the error.
    pub fn reset(&mut self, data: &'a mut [u8]) {
        self.data = data;
        self.error = None;
    }

    /// Bytes not read yet.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Returns true when every byte has been read.
    #[inline]
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true once any read has failed.
    #[inline]
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The failure that put the unpacker into its error state.
    #[inline]
    #[must_use]
    pub const fn error(&self) -> Option<WireError> {
        self.error
    }

    /// Reads a variable-length integer, or `0` on error.
    pub fn get_int(&mut self) -> i32 {
        if self.error.is_some() {
            return 0;
        }
        if self.data.is_empty() {
            self.fail(WireError::UnexpectedEnd);
            return 0;
        }
        match C::unpack(self.data) {
            Some((value, used)) => {
                self.advance(used);
                value
            }
            None => {
                self.fail(WireError::InvalidInt);
                0
            }
        }
    }

    /// Like [`Unpacker::get_int`], but an exhausted view yields `default`
    /// without an error.
    pub fn get_int_or_default(&mut self, default: i32) -> i32 {
        if self.error.is_some() {
            return 0;
        }
        if self.data.is_empty() {
            return default;
        }
        self.get_int()
    }

    /// Reads a 4-byte native-endian integer, or `0` on error.
    pub fn get_uncompressed_int(&mut self) -> i32 {
        const SIZE: usize = std::mem::size_of::<i32>();
        if self.error.is_some() {
            return 0;
        }
        if self.data.len() < SIZE {
            self.fail(WireError::UnexpectedEnd);
            return 0;
        }
        bytemuck::pod_read_unaligned(self.advance(SIZE))
    }

    /// Like [`Unpacker::get_uncompressed_int`], but an exhausted view yields
    /// `default` without an error.
    pub fn get_uncompressed_int_or_default(&mut self, default: i32) -> i32 {
        if self.error.is_some() {
            return 0;
        }
        if self.data.is_empty() {
            return default;
        }
        self.get_uncompressed_int()
    }

    /// Reads a NUL-terminated UTF-8 string, or `""` on error.
    ///
    /// The string must end before the view does and must be valid UTF-8.
    /// Sanitizing rewrites the underlying buffer.
    pub fn get_string(&mut self, flags: Sanitize) -> &'a str {
        if self.error.is_some() {
            return "";
        }
        if self.data.is_empty() {
            self.fail(WireError::UnexpectedEnd);
            return "";
        }
        let Some(nul) = self.data.iter().position(|&b| b == 0) else {
            self.fail(WireError::MissingTerminator);
            return "";
        };

        let taken = self.advance(nul + 1);
        let (text, _terminator) = taken.split_at_mut(nul);
        if std::str::from_utf8(text).is_err() {
            self.fail(WireError::InvalidUtf8);
            return "";
        }

        if flags.contains(Sanitize::SANITIZE) {
            utf8::sanitize(text);
        } else if flags.contains(Sanitize::SANITIZE_CC) {
            utf8::sanitize_cc(text);
        }

        // Sanitizing only swaps ASCII bytes, so this cannot fail.
        let text: &'a [u8] = text;
        let Ok(text) = std::str::from_utf8(text) else {
            return "";
        };

        if flags.contains(Sanitize::SKIP_START_WHITESPACES) {
            utf8::skip_whitespaces(text)
        } else {
            text
        }
    }

    /// Reads `size` bytes verbatim.
    ///
    /// Returns `None` and sets the error if `size` is negative or larger
    /// than what is left.
    pub fn get_raw(&mut self, size: i32) -> Option<&'a [u8]> {
        if self.error.is_some() {
            return None;
        }
        let remaining = self.data.len();
        match usize::try_from(size) {
            Ok(len) if len <= remaining => {
                let raw: &'a [u8] = self.advance(len);
                Some(raw)
            }
            _ => {
                self.fail(WireError::InvalidLength {
                    requested: size,
                    remaining,
                });
                None
            }
        }
    }

    /// Splits off the next `len` bytes (clamped to what is left).
    fn advance(&mut self, len: usize) -> &'a mut [u8] {
        let data = std::mem::take(&mut self.data);
        let len = len.min(data.len());
        let (head, tail) = data.split_at_mut(len);
        self.data = tail;
        head
    }

    fn fail(&mut self, error: WireError) {
        tracing::trace!("Unpacker error with {} bytes left: {}", self.data.len(), error);
        self.error = Some(error);
    }
}

impl<C: IntCodec> std::fmt::Debug for Unpacker<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unpacker")
            .field("remaining", &self.data.len())
            .field("error", &self.error)
            .finish()
    }
}
