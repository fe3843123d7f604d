//! # Bit Accumulator
//!
//! The 32-bit shift register shared by the encode and decode loops. Bits are
//! appended above the ones already held and consumed from the bottom, so the
//! first bit of the stream is always bit 0.

/// Bits held after a refill while input remains.
const REFILL_BITS: u32 = 24;

/// Pending bits plus how many of them are valid.
///
/// # Invariants
/// - bits above `count` are zero
/// - `count` never exceeds 32
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BitAccumulator {
    bits: u32,
    count: u32,
}

impl BitAccumulator {
    /// Creates an empty accumulator.
    #[inline]
    pub(crate) const fn new() -> Self {
        Self { bits: 0, count: 0 }
    }

    /// Number of valid bits held.
    #[inline]
    pub(crate) const fn count(&self) -> u32 {
        self.count
    }

    /// Appends `len` bits of `code` above the bits already held.
    ///
    /// The caller keeps `count + len <= 32`.
    #[inline]
    pub(crate) fn push(&mut self, code: u32, len: u32) {
        self.bits |= code << self.count;
        self.count += len;
    }

    /// Removes and returns the lowest byte once at least 8 bits are held.
    #[inline]
    pub(crate) fn pop_byte(&mut self) -> Option<u8> {
        if self.count < 8 {
            return None;
        }
        let byte = self.bits.to_le_bytes()[0];
        self.bits >>= 8;
        self.count -= 8;
        Some(byte)
    }

    /// The leftover bits (fewer than 8) as the stream's final byte.
    #[inline]
    pub(crate) fn leftover(&self) -> u8 {
        self.bits.to_le_bytes()[0]
    }

    /// Pulls whole bytes from `src` until 24 bits are held or input ends.
    #[inline]
    pub(crate) fn refill<'a, I>(&mut self, src: &mut I)
    where
        I: Iterator<Item = &'a u8>,
    {
        while self.count < REFILL_BITS {
            let Some(&byte) = src.next() else {
                break;
            };
            self.bits |= u32::from(byte) << self.count;
            self.count += 8;
        }
    }

    /// The lowest `len` bits without consuming them.
    #[inline]
    pub(crate) const fn peek(&self, len: u32) -> u32 {
        self.bits & ((1 << len) - 1)
    }

    /// Drops the lowest `len` bits. The caller keeps `len <= count`.
    #[inline]
    pub(crate) fn consume(&mut self, len: u32) {
        self.bits >>= len;
        self.count -= len;
    }

    /// Removes and returns the lowest bit, or `None` when empty.
    #[inline]
    pub(crate) fn take_bit(&mut self) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let bit = (self.bits & 1) as usize;
        self.consume(1);
        Some(bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pop_low_bits_first() {
        let mut acc = BitAccumulator::new();
        acc.push(0b101, 3);
        acc.push(0b11111, 5);
        // 11111 then 101 -> 1111_1101
        assert_eq!(acc.pop_byte(), Some(0b1111_1101));
        assert_eq!(acc.pop_byte(), None);
        assert_eq!(acc.count(), 0);
    }

    #[test]
    fn test_leftover_holds_partial_byte() {
        let mut acc = BitAccumulator::new();
        acc.push(0b1_0110_0101, 9);
        assert_eq!(acc.pop_byte(), Some(0b0110_0101));
        assert_eq!(acc.count(), 1);
        assert_eq!(acc.leftover(), 1);
    }

    #[test]
    fn test_refill_stops_at_24_bits() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut src = data.iter();
        let mut acc = BitAccumulator::new();
        acc.refill(&mut src);
        assert_eq!(acc.count(), 24);
        assert_eq!(acc.peek(24), 0x03_02_01);
        assert_eq!(src.len(), 2);
    }

    #[test]
    fn test_refill_after_partial_consume() {
        let data = [0xFF, 0x00, 0xAA, 0x55];
        let mut src = data.iter();
        let mut acc = BitAccumulator::new();
        acc.refill(&mut src);
        acc.consume(4);
        acc.refill(&mut src);
        assert_eq!(acc.count(), 28);
        assert_eq!(acc.peek(4), 0xF);
        assert_eq!(src.len(), 0);
    }

    #[test]
    fn test_take_bit_until_empty() {
        let mut acc = BitAccumulator::new();
        acc.push(0b10, 2);
        assert_eq!(acc.take_bit(), Some(0));
        assert_eq!(acc.take_bit(), Some(1));
        assert_eq!(acc.take_bit(), None);
    }
}
