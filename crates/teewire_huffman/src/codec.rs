//! # Compress / Decompress
//!
//! Buffer-to-buffer coding against an immutable [`Huffman`] instance.
//! Neither direction allocates; both stop at the caller's buffer bounds.

use crate::bits::BitAccumulator;
use crate::error::HuffmanError;
use crate::table::FREQUENCY_TABLE;
use crate::tree::Tree;
use crate::{EOF_SYMBOL, LUT_BITS, MAX_CODE_BITS, MAX_SYMBOLS};

/// A symbol's code: `len` bits, the first stream bit in bit 0 of `bits`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Code {
    /// Code bits.
    pub bits: u32,
    /// Code length in bits.
    pub len: u16,
}

/// The static Huffman codec.
///
/// Construction builds the tree and the decode table once; afterwards the
/// value is read-only and may be shared across threads behind an `Arc`.
pub struct Huffman {
    tree: Tree,
    longest_byte_code: u16,
}

impl Huffman {
    /// Builds the codec from the trained [`FREQUENCY_TABLE`].
    ///
    /// This is the tree every peer uses on the wire.
    #[must_use]
    pub fn new() -> Self {
        Self::from_tree(Tree::build(&FREQUENCY_TABLE))
    }

    /// Builds the codec from a custom frequency table.
    ///
    /// The end-of-stream slot is ignored; its weight is always 1.
    ///
    /// # Errors
    ///
    /// Returns [`HuffmanError::CodeTooLong`] if the table yields a code longer
    /// than [`MAX_CODE_BITS`].
    pub fn with_frequencies(frequencies: &[u32; MAX_SYMBOLS]) -> Result<Self, HuffmanError> {
        let tree = Tree::build(frequencies);
        let longest = tree.longest_code(0..MAX_SYMBOLS);
        if longest > MAX_CODE_BITS {
            return Err(HuffmanError::CodeTooLong {
                length: longest,
                max: MAX_CODE_BITS,
            });
        }
        Ok(Self::from_tree(tree))
    }

    fn from_tree(tree: Tree) -> Self {
        let longest_byte_code = tree.longest_code(0..EOF_SYMBOL);
        tracing::debug!(
            "Huffman tree built: root={}, longest byte code={} bits, eof code={} bits",
            tree.root,
            longest_byte_code,
            tree.nodes[EOF_SYMBOL].num_bits
        );
        Self {
            tree,
            longest_byte_code,
        }
    }

    /// The code assigned to `symbol` (a byte value, or [`EOF_SYMBOL`]).
    #[must_use]
    pub fn code(&self, symbol: usize) -> Option<Code> {
        if symbol >= MAX_SYMBOLS {
            return None;
        }
        let node = &self.tree.nodes[symbol];
        Some(Code {
            bits: node.bits,
            len: node.num_bits,
        })
    }

    /// Upper bound on the compressed size of `input_len` bytes.
    ///
    /// Assumes every byte gets the longest byte code. Sizing an output buffer
    /// with this value guarantees [`Huffman::compress`] cannot run out of room.
    #[must_use]
    pub fn max_compressed_len(&self, input_len: usize) -> usize {
        let eof = usize::from(self.tree.nodes[EOF_SYMBOL].num_bits);
        input_len
            .saturating_mul(usize::from(self.longest_byte_code))
            .saturating_add(eof)
            / 8
            + 1
    }

    /// Compresses `input` into `output`, returning the compressed length.
    ///
    /// The stream is the concatenated codes of every input byte, then the
    /// end-of-stream code, then one byte with the leftover bits.
    ///
    /// # Errors
    ///
    /// Returns [`HuffmanError::OutputFull`] if `output` is too small.
    pub fn compress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, HuffmanError> {
        let mut acc = BitAccumulator::new();
        let mut written = 0;

        let symbols = input
            .iter()
            .map(|&byte| usize::from(byte))
            .chain(std::iter::once(EOF_SYMBOL));

        for symbol in symbols {
            let node = &self.tree.nodes[symbol];
            acc.push(node.bits, u32::from(node.num_bits));
            while let Some(byte) = acc.pop_byte() {
                emit(output, &mut written, byte)?;
            }
        }

        emit(output, &mut written, acc.leftover())?;
        Ok(written)
    }

    /// Decompresses `input` into `output`, returning the decompressed length.
    ///
    /// Decoding stops at the end-of-stream code; any bytes after it are
    /// ignored.
    ///
    /// # Errors
    ///
    /// - [`HuffmanError::UnexpectedEnd`] if the input ends inside a code
    /// - [`HuffmanError::OutputFull`] if `output` is too small
    pub fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, HuffmanError> {
        let mut src = input.iter();
        let mut acc = BitAccumulator::new();
        let mut written = 0;

        loop {
            acc.refill(&mut src);

            let id = if acc.count() >= LUT_BITS {
                let id = self.tree.lut[acc.peek(LUT_BITS) as usize];
                let node = self.tree.node(id);
                if node.is_leaf() {
                    acc.consume(u32::from(node.num_bits));
                    id
                } else {
                    acc.consume(LUT_BITS);
                    self.walk(id, &mut acc, &mut src)?
                }
            } else {
                self.walk(self.tree.root, &mut acc, &mut src)?
            };

            // The end-of-stream leaf is the only symbol outside the byte range.
            let Ok(byte) = u8::try_from(self.tree.node(id).symbol) else {
                return Ok(written);
            };
            emit(output, &mut written, byte)?;
        }
    }

    /// Follows single bits from `id` until a leaf is reached.
    fn walk<'a, I>(&self, mut id: u16, acc: &mut BitAccumulator, src: &mut I) -> Result<u16, HuffmanError>
    where
        I: Iterator<Item = &'a u8>,
    {
        loop {
            if acc.count() == 0 {
                acc.refill(src);
            }
            let bit = acc.take_bit().ok_or(HuffmanError::UnexpectedEnd)?;
            id = self.tree.node(id).leaves[bit];
            if self.tree.node(id).is_leaf() {
                return Ok(id);
            }
        }
    }

    /// Compresses into a freshly sized `Vec`.
    #[must_use]
    pub fn compress_to_vec(&self, input: &[u8]) -> Vec<u8> {
        let mut output = vec![0u8; self.max_compressed_len(input.len())];
        // The buffer is sized by the worst case, so this cannot run out.
        let len = self.compress(input, &mut output).unwrap_or(0);
        output.truncate(len);
        output
    }

    /// Decompresses into a `Vec` of at most `max_len` bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Huffman::decompress`].
    pub fn decompress_to_vec(&self, input: &[u8], max_len: usize) -> Result<Vec<u8>, HuffmanError> {
        let mut output = vec![0u8; max_len];
        let len = self.decompress(input, &mut output)?;
        output.truncate(len);
        Ok(output)
    }
}

impl Default for Huffman {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Huffman {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Huffman")
            .field("root", &self.tree.root)
            .field("longest_byte_code", &self.longest_byte_code)
            .finish_non_exhaustive()
    }
}

#[inline]
fn emit(output: &mut [u8], written: &mut usize, byte: u8) -> Result<(), HuffmanError> {
    let slot = output
        .get_mut(*written)
        .ok_or(HuffmanError::OutputFull { written: *written })?;
    *slot = byte;
    *written += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(huffman: &Huffman, data: &[u8]) -> Vec<u8> {
        let compressed = huffman.compress_to_vec(data);
        huffman.decompress_to_vec(&compressed, data.len()).unwrap()
    }

    #[test]
    fn test_empty_input_is_eof_plus_padding() {
        let huffman = Huffman::new();
        let mut out = [0u8; 8];
        let len = huffman.compress(&[], &mut out).unwrap();
        assert_eq!(&out[..len], &[0x8A, 0x1B]);

        let mut restored = [0u8; 8];
        assert_eq!(huffman.decompress(&out[..len], &mut restored), Ok(0));
    }

    #[test]
    fn test_zero_bytes_golden() {
        let huffman = Huffman::new();
        assert_eq!(huffman.compress_to_vec(&[0; 8]), vec![0xFF, 0x8A, 0x1B]);
    }

    #[test]
    fn test_hello_golden() {
        let huffman = Huffman::new();
        assert_eq!(
            huffman.compress_to_vec(b"hello"),
            vec![0xAE, 0x95, 0x13, 0x5C, 0x09, 0x57, 0xC2, 0x16, 0x29, 0x6E, 0x00]
        );
        assert_eq!(roundtrip(&huffman, b"hello"), b"hello");
    }

    #[test]
    fn test_every_byte_value_roundtrips() {
        let huffman = Huffman::new();
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(roundtrip(&huffman, &data), data);
    }

    #[test]
    fn test_compress_output_full() {
        let huffman = Huffman::new();
        let mut out = [0u8; 1];
        assert_eq!(
            huffman.compress(&[], &mut out),
            Err(HuffmanError::OutputFull { written: 1 })
        );

        let mut out = [0u8; 2];
        assert_eq!(huffman.compress(&[], &mut out), Ok(2));
    }

    #[test]
    fn test_decompress_output_full() {
        let huffman = Huffman::new();
        let compressed = huffman.compress_to_vec(b"hello");
        let mut out = [0u8; 4];
        assert_eq!(
            huffman.decompress(&compressed, &mut out),
            Err(HuffmanError::OutputFull { written: 4 })
        );
    }

    #[test]
    fn test_decompress_rejects_empty_and_garbage() {
        let huffman = Huffman::new();
        let mut out = [0u8; 64];
        assert_eq!(huffman.decompress(&[], &mut out), Err(HuffmanError::UnexpectedEnd));
        assert_eq!(huffman.decompress(&[0; 5], &mut out), Err(HuffmanError::UnexpectedEnd));
        assert_eq!(huffman.decompress(&[0xFF; 5], &mut out), Err(HuffmanError::UnexpectedEnd));
    }

    #[test]
    fn test_trailing_bytes_after_eof_are_ignored() {
        let huffman = Huffman::new();
        let mut compressed = huffman.compress_to_vec(b"abc");
        compressed.extend_from_slice(&[0x12, 0x34, 0x56]);
        assert_eq!(huffman.decompress_to_vec(&compressed, 16).unwrap(), b"abc");
    }

    #[test]
    fn test_max_compressed_len_bounds_worst_symbol() {
        let huffman = Huffman::new();
        // 119 carries the longest byte code.
        assert_eq!(huffman.code(119).map(|code| code.len), Some(15));
        let data = [119u8; 16];
        let compressed = huffman.compress_to_vec(&data);
        assert_eq!(compressed.len(), 32);
        assert!(compressed.len() <= huffman.max_compressed_len(data.len()));
        assert_eq!(huffman.max_compressed_len(0), 2);
    }

    #[test]
    fn test_code_lookup() {
        let huffman = Huffman::new();
        assert_eq!(huffman.code(0), Some(Code { bits: 1, len: 1 }));
        assert_eq!(huffman.code(EOF_SYMBOL).map(|code| code.len), Some(15));
        assert_eq!(huffman.code(MAX_SYMBOLS), None);
    }

    #[test]
    fn test_custom_table_roundtrip() {
        let huffman = Huffman::with_frequencies(&[1; MAX_SYMBOLS]).unwrap();
        let data = b"uniform weights still roundtrip";
        assert_eq!(roundtrip(&huffman, data), data);
    }

    #[test]
    fn test_degenerate_table_rejected() {
        let result = Huffman::with_frequencies(&[0; MAX_SYMBOLS]);
        assert_eq!(
            result.err(),
            Some(HuffmanError::CodeTooLong {
                length: 256,
                max: MAX_CODE_BITS
            })
        );
    }
}
