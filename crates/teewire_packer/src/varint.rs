//! # Variable-Length Integers
//!
//! Small magnitudes dominate game traffic, so integers are written in 1 to 5
//! bytes instead of a fixed 4.
//!
//! ```text
//! first byte:  E S d d d d d d     E = another byte follows
//!                                  S = sign (value stored as !value)
//! next bytes:  E d d d d d d d     7 more data bits each
//! fifth byte:  - - - - d d d d     last 4 bits, flag ignored
//! ```
//!
//! The codec is a seam: [`crate::Packer`] and [`crate::Unpacker`] are
//! generic over [`IntCodec`] and default to [`VariableInt`].

/// Longest [`VariableInt`] encoding in bytes.
pub const MAX_BYTES_PACKED: usize = 5;

const SIGN_BIT: u8 = 0x40;
const EXTEND_BIT: u8 = 0x80;

/// Data masks and shifts for the bytes after the first.
const TAIL_MASKS: [u8; 4] = [0x7F, 0x7F, 0x7F, 0x0F];
const TAIL_SHIFTS: [u32; 4] = [6, 6 + 7, 6 + 7 + 7, 6 + 7 + 7 + 7];

/// Encodes and decodes one integer field.
pub trait IntCodec {
    /// Longest encoding this codec produces.
    const MAX_BYTES: usize;

    /// Writes `value` at the start of `dst`.
    ///
    /// Returns the number of bytes written, or `None` if `dst` is too short.
    /// Nothing meaningful is written on `None`.
    fn pack(value: i32, dst: &mut [u8]) -> Option<usize>;

    /// Reads one value from the start of `src`.
    ///
    /// Returns the value and the number of bytes consumed, or `None` if the
    /// encoding runs past the end of `src`.
    fn unpack(src: &[u8]) -> Option<(i32, usize)>;
}

/// The protocol's variable-length integer format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariableInt;

impl IntCodec for VariableInt {
    const MAX_BYTES: usize = MAX_BYTES_PACKED;

    fn pack(value: i32, dst: &mut [u8]) -> Option<usize> {
        let mut encoded = [0u8; MAX_BYTES_PACKED];
        let magnitude = if value < 0 {
            encoded[0] = SIGN_BIT;
            !value
        } else {
            value
        };

        // Non-negative after the complement.
        let mut rest = magnitude.unsigned_abs();
        encoded[0] |= rest.to_le_bytes()[0] & 0x3F;
        rest >>= 6;

        let mut len = 1;
        while rest != 0 {
            encoded[len - 1] |= EXTEND_BIT;
            encoded[len] = rest.to_le_bytes()[0] & 0x7F;
            rest >>= 7;
            len += 1;
        }

        dst.get_mut(..len)?.copy_from_slice(&encoded[..len]);
        Some(len)
    }

    #[allow(clippy::cast_possible_wrap)]
    fn unpack(src: &[u8]) -> Option<(i32, usize)> {
        let (&first, tail) = src.split_first()?;
        let sign = u32::from((first >> 6) & 1);
        let mut value = u32::from(first & 0x3F);

        let mut previous = first;
        let mut used = 1;
        for (&mask, &shift) in TAIL_MASKS.iter().zip(&TAIL_SHIFTS) {
            if previous & EXTEND_BIT == 0 {
                break;
            }
            let &byte = tail.get(used - 1)?;
            value |= u32::from(byte & mask) << shift;
            previous = byte;
            used += 1;
        }

        value ^= sign.wrapping_neg();
        Some((value as i32, used))
    }
}

/// Packs every integer of `src` into `dst` back to back.
///
/// Returns the number of bytes written, or `None` if `dst` runs out.
#[must_use]
pub fn compress_ints(src: &[i32], dst: &mut [u8]) -> Option<usize> {
    let mut written = 0;
    for &value in src {
        written += VariableInt::pack(value, dst.get_mut(written..)?)?;
    }
    Some(written)
}

/// Unpacks integers from `src` until it is consumed.
///
/// Returns the number of integers written to `dst`, or `None` if `dst` is
/// full while input remains or the last encoding is truncated.
#[must_use]
pub fn decompress_ints(src: &[u8], dst: &mut [i32]) -> Option<usize> {
    let mut read = 0;
    let mut count = 0;
    while read < src.len() {
        let slot = dst.get_mut(count)?;
        let (value, used) = VariableInt::unpack(&src[read..])?;
        *slot = value;
        read += used;
        count += 1;
    }
    Some(count)
}
