//! # Packer
//!
//! Writes message fields into an owned fixed-capacity buffer.
//!
//! The buffer is reused across messages: call [`Packer::reset`] and pack the
//! next one. Nothing is allocated.

use std::marker::PhantomData;

use crate::error::WireError;
use crate::utf8;
use crate::varint::{IntCodec, VariableInt};
use crate::PACKER_BUFFER_SIZE;

/// Message writer with a sticky error.
///
/// `C` encodes integer fields; `N` is the capacity in bytes.
pub struct Packer<C: IntCodec = VariableInt, const N: usize = PACKER_BUFFER_SIZE> {
    buffer: [u8; N],
    position: usize,
    error: Option<WireError>,
    codec: PhantomData<C>,
}

impl Packer {
    /// Creates an empty packer with the default codec and capacity.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_int_codec()
    }
}

impl<C: IntCodec, const N: usize> Packer<C, N> {
    /// Creates an empty packer for any codec and capacity.
    #[must_use]
    pub const fn with_int_codec() -> Self {
        Self {
            buffer: [0u8; N],
            position: 0,
            error: None,
            codec: PhantomData,
        }
    }

    /// Rewinds to an empty buffer and clears the error.
    #[inline]
    pub fn reset(&mut self) {
        self.position = 0;
        self.error = None;
    }

    /// Bytes written so far.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.position
    }

    /// Returns true if nothing has been written.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// Total capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes left before the buffer is full.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        N - self.position
    }

    /// The packed bytes.
    ///
    /// After an error this is the content as it stood when the error was set.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    /// Returns true once any write has failed.
    #[inline]
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The failure that put the packer into its error state.
    #[inline]
    #[must_use]
    pub const fn error(&self) -> Option<WireError> {
        self.error
    }

    /// Appends a variable-length integer.
    pub fn add_int(&mut self, value: i32) {
        if self.error.is_some() {
            return;
        }
        match C::pack(value, &mut self.buffer[self.position..]) {
            Some(written) => self.position += written,
            None => self.fail(WireError::BufferFull {
                needed: C::MAX_BYTES.min(self.remaining() + 1),
                remaining: self.remaining(),
            }),
        }
    }

    /// Appends a 4-byte integer in native byte order.
    pub fn add_uncompressed_int(&mut self, value: i32) {
        self.add_raw(bytemuck::bytes_of(&value));
    }

    /// Appends `text` as a NUL-terminated UTF-8 string.
    ///
    /// `text` is read up to its first NUL, one code point at a time; invalid
    /// sequences are written as U+FFFD. `limit` caps the string's byte length
    /// without the terminator (`0` means no cap).
    ///
    /// A string over `limit` is cut at a code point boundary when
    /// `allow_truncation` is set, and rejected otherwise. A rejected string,
    /// or one that does not fit in the buffer along with its terminator,
    /// leaves the buffer as it was before the call and sets the error.
    pub fn add_string(&mut self, text: impl AsRef<[u8]>, limit: usize, allow_truncation: bool) {
        if self.error.is_some() {
            return;
        }

        let start = self.position;
        let mut budget = if limit == 0 { N } else { limit };

        for c in utf8::lossy_chars(text.as_ref()) {
            let mut scratch = [0u8; 4];
            let encoded = c.encode_utf8(&mut scratch).as_bytes();

            if budget < encoded.len() {
                if allow_truncation {
                    break;
                }
                self.position = start;
                self.fail(WireError::StringTooLong { limit });
                return;
            }

            // Keep one byte for the terminator.
            if self.remaining() < encoded.len() + 1 {
                let needed = self.position - start + encoded.len() + 1;
                self.position = start;
                self.fail(WireError::BufferFull {
                    needed,
                    remaining: self.remaining(),
                });
                return;
            }

            self.buffer[self.position..self.position + encoded.len()].copy_from_slice(encoded);
            self.position += encoded.len();
            budget -= encoded.len();
        }

        if self.position >= N {
            self.position = start;
            self.fail(WireError::BufferFull {
                needed: 1,
                remaining: 0,
            });
            return;
        }
        self.buffer[self.position] = 0;
        self.position += 1;
    }

    /// Appends `data` verbatim.
    pub fn add_raw(&mut self, data: &[u8]) {
        if self.error.is_some() {
            return;
        }
        if data.len() > self.remaining() {
            self.fail(WireError::BufferFull {
                needed: data.len(),
                remaining: self.remaining(),
            });
            return;
        }
        self.buffer[self.position..self.position + data.len()].copy_from_slice(data);
        self.position += data.len();
    }

    fn fail(&mut self, error: WireError) {
        tracing::trace!("Packer error at byte {}: {}", self.position, error);
        self.error = Some(error);
    }
}

impl<C: IntCodec, const N: usize> Default for Packer<C, N> {
    fn default() -> Self {
        Self::with_int_codec()
    }
}

impl<C: IntCodec, const N: usize> std::fmt::Debug for Packer<C, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packer")
            .field("len", &self.position)
            .field("capacity", &N)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSET: usize = PACKER_BUFFER_SIZE - 5;

    /// Packs `text` with 5 bytes left in the buffer. `None` expects an error.
    fn expect_add_string5(text: &[u8], limit: usize, allow_truncation: bool, expected: Option<&str>) {
        let mut packer = Packer::new();
        packer.add_raw(&[0u8; OFFSET]);
        packer.add_string(text, limit, allow_truncation);

        let context = format!("text={text:?} limit={limit} allow_truncation={allow_truncation}");
        match expected {
            None => {
                assert!(packer.has_error(), "{context}");
                assert_eq!(packer.len(), OFFSET, "{context}");
            }
            Some(expected) => {
                assert!(!packer.has_error(), "{context}");
                let written = &packer.as_slice()[OFFSET..];
                assert_eq!(written.len(), expected.len() + 1, "{context}");
                assert_eq!(&written[..expected.len()], expected.as_bytes(), "{context}");
                assert_eq!(written[expected.len()], 0, "{context}");
            }
        }
    }

    #[test]
    fn test_add_string_fits_buffer() {
        expect_add_string5(b"", 0, true, Some(""));
        expect_add_string5(b"a", 0, true, Some("a"));
        expect_add_string5(b"abcd", 0, true, Some("abcd"));
        expect_add_string5(b"abcde", 0, true, None);
    }

    #[test]
    fn test_add_string_limit() {
        expect_add_string5(b"", 1, true, Some(""));
        expect_add_string5(b"aa", 1, true, Some("a"));
        expect_add_string5("ä".as_bytes(), 1, true, Some(""));
        expect_add_string5("äöü".as_bytes(), 4, true, Some("äö"));
        expect_add_string5("äöü".as_bytes(), 5, true, Some("äö"));
        expect_add_string5("äöü".as_bytes(), 6, true, None);

        expect_add_string5(b"aa", 1, false, None);
        expect_add_string5("ä".as_bytes(), 1, false, None);
        expect_add_string5("äöü".as_bytes(), 4, false, None);
        expect_add_string5("äöü".as_bytes(), 5, false, None);
        expect_add_string5("äöü".as_bytes(), 6, false, None);
    }

    #[test]
    fn test_add_string_broken_utf8() {
        expect_add_string5(b"\x80", 0, true, Some("\u{FFFD}"));
        expect_add_string5(b"\x80\x80", 0, true, None);
        expect_add_string5(b"a\x80", 0, true, Some("a\u{FFFD}"));
        expect_add_string5(b"\x80a", 0, true, Some("\u{FFFD}a"));
        expect_add_string5(b"\x80", 1, true, Some(""));
        expect_add_string5(b"\x80", 3, true, Some("\u{FFFD}"));
        expect_add_string5(b"\x80\x80", 3, true, Some("\u{FFFD}"));
        expect_add_string5(b"\x80\x80", 5, true, Some("\u{FFFD}"));
        expect_add_string5(b"\x80\x80", 6, true, None);

        expect_add_string5(b"\x80", 1, false, None);
        expect_add_string5(b"\x80", 3, false, Some("\u{FFFD}"));
        expect_add_string5(b"\x80\x80", 3, false, None);
        expect_add_string5(b"\x80\x80", 5, false, None);
        expect_add_string5(b"\x80\x80", 6, false, None);
    }

    #[test]
    fn test_add_string_stops_at_nul() {
        let mut packer = Packer::new();
        packer.add_string(b"ab\0cd", 0, false);
        assert_eq!(packer.as_slice(), b"ab\0");
    }

    #[test]
    fn test_int_fills_last_byte() {
        let mut packer = Packer::new();
        packer.add_raw(&[0u8; PACKER_BUFFER_SIZE - 1]);
        assert!(!packer.has_error());
        packer.add_int(1);
        assert!(!packer.has_error());
        assert_eq!(packer.len(), PACKER_BUFFER_SIZE);

        packer.add_int(2);
        assert!(packer.has_error());
        packer.add_int(3);
        assert!(packer.has_error());
        assert_eq!(packer.len(), PACKER_BUFFER_SIZE);
    }

    #[test]
    fn test_raw_fills_last_byte() {
        let mut packer = Packer::new();
        packer.add_raw(&[0u8; PACKER_BUFFER_SIZE - 1]);
        packer.add_raw(&[1]);
        assert!(!packer.has_error());

        packer.add_raw(&[2]);
        assert_eq!(
            packer.error(),
            Some(WireError::BufferFull {
                needed: 1,
                remaining: 0
            })
        );
        assert_eq!(packer.as_slice().last(), Some(&1));
    }

    #[test]
    fn test_string_fills_last_bytes() {
        let mut packer = Packer::new();
        packer.add_raw(&[0u8; OFFSET]);
        packer.add_string("test", 0, true);
        assert!(!packer.has_error());
        assert_eq!(packer.len(), PACKER_BUFFER_SIZE);

        packer.add_string("", 0, true);
        assert!(packer.has_error());
        assert_eq!(packer.len(), PACKER_BUFFER_SIZE);
    }

    #[test]
    fn test_too_long_string_keeps_size() {
        let mut packer = Packer::new();
        packer.add_int(9);
        let before = packer.len();

        packer.add_string("0123456789", 5, false);
        assert_eq!(packer.error(), Some(WireError::StringTooLong { limit: 5 }));
        assert_eq!(packer.len(), before);
    }

    #[test]
    fn test_error_is_sticky_until_reset() {
        let mut packer = Packer::new();
        packer.add_string("toolong", 2, false);
        assert!(packer.has_error());

        packer.add_int(1);
        packer.add_raw(b"x");
        packer.add_string("ok", 0, true);
        assert!(packer.is_empty());

        packer.reset();
        assert!(!packer.has_error());
        packer.add_int(1);
        assert_eq!(packer.as_slice(), &[1]);
    }

    #[test]
    fn test_uncompressed_int_is_native_endian() {
        let mut packer = Packer::new();
        packer.add_uncompressed_int(0x0102_0304);
        assert_eq!(packer.as_slice(), &0x0102_0304i32.to_ne_bytes());
    }

    #[test]
    fn test_custom_capacity() {
        let mut packer: Packer<VariableInt, 4> = Packer::default();
        assert_eq!(packer.capacity(), 4);
        packer.add_int(64);
        packer.add_int(-1);
        assert_eq!(packer.remaining(), 1);
        packer.add_string("a", 0, true);
        assert!(packer.has_error());
        assert_eq!(packer.as_slice(), &[0x80, 0x01, 0x40]);
    }
}
