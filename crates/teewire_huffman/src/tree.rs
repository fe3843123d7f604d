//! # Tree Construction
//!
//! Builds the code tree and decode table from a frequency table.
//!
//! Construction is deterministic: the working set is stable-sorted by
//! descending frequency before every merge, so ties keep the order the
//! previous round left them in. Both peers must make exactly the same
//! choices, which is why no tie-breaking rule is invented here.

use crate::{EOF_SYMBOL, LUT_BITS, LUT_SIZE, MAX_NODES, MAX_SYMBOLS};

/// Child id marking "no child" on a leaf.
pub(crate) const NO_CHILD: u16 = 0xFFFF;

/// `num_bits` of a leaf the code walk has not reached yet.
const UNSET: u16 = u16::MAX;

/// One node of the code tree.
///
/// Internal nodes have `num_bits == 0`; leaves have their code length.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    /// Code bits, first stream bit in bit 0.
    pub bits: u32,
    /// Code length for leaves, 0 for internal nodes.
    pub num_bits: u16,
    /// Child ids, `[0]` taken on a 0 bit and `[1]` on a 1 bit.
    pub leaves: [u16; 2],
    /// Symbol carried by a leaf.
    pub symbol: u16,
}

impl Node {
    const EMPTY: Self = Self {
        bits: 0,
        num_bits: 0,
        leaves: [NO_CHILD, NO_CHILD],
        symbol: 0,
    };

    #[inline]
    pub(crate) const fn is_leaf(&self) -> bool {
        self.num_bits != 0
    }
}

/// A node waiting to be merged.
#[derive(Clone, Copy, Debug, Default)]
struct Pending {
    id: u16,
    frequency: u64,
}

/// The finished tree plus its decode table.
pub(crate) struct Tree {
    pub nodes: [Node; MAX_NODES],
    pub root: u16,
    pub lut: [u16; LUT_SIZE],
}

impl Tree {
    /// Builds the tree for `frequencies`. The end-of-stream weight is forced to 1.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn build(frequencies: &[u32; MAX_SYMBOLS]) -> Self {
        let mut nodes = [Node::EMPTY; MAX_NODES];
        let mut pending = [Pending::default(); MAX_SYMBOLS];

        for (symbol, (node, slot)) in nodes.iter_mut().zip(pending.iter_mut()).enumerate() {
            node.num_bits = UNSET;
            node.symbol = symbol as u16;
            slot.id = symbol as u16;
            slot.frequency = if symbol == EOF_SYMBOL {
                1
            } else {
                u64::from(frequencies[symbol])
            };
        }

        let mut left = MAX_SYMBOLS;
        let mut next = MAX_SYMBOLS;
        while left > 1 {
            pending[..left].sort_by(|a, b| b.frequency.cmp(&a.frequency));

            let smallest = pending[left - 1];
            let second = pending[left - 2];
            nodes[next].leaves = [smallest.id, second.id];
            pending[left - 2] = Pending {
                id: next as u16,
                frequency: smallest.frequency + second.frequency,
            };

            next += 1;
            left -= 1;
        }

        let root = (next - 1) as u16;
        assign_codes(&mut nodes, root, 0, 0);

        let lut = build_lut(&nodes, root);
        Self { nodes, root, lut }
    }

    /// Node by id.
    #[inline]
    pub(crate) fn node(&self, id: u16) -> &Node {
        &self.nodes[usize::from(id)]
    }

    /// Longest code among the leaves in `symbols`.
    pub(crate) fn longest_code(&self, symbols: std::ops::Range<usize>) -> u16 {
        self.nodes[symbols]
            .iter()
            .map(|node| node.num_bits)
            .max()
            .unwrap_or(0)
    }
}

/// Depth-first walk, `leaves[1]` first, recording each leaf's code.
///
/// Bits past position 31 cannot be represented; such trees are rejected by
/// the caller through the recorded lengths, so they are dropped here.
fn assign_codes(nodes: &mut [Node; MAX_NODES], id: u16, bits: u32, depth: u16) {
    let node = nodes[usize::from(id)];
    if node.leaves[1] != NO_CHILD {
        let one = 1u32.checked_shl(u32::from(depth)).unwrap_or(0);
        assign_codes(nodes, node.leaves[1], bits | one, depth + 1);
    }
    if node.leaves[0] != NO_CHILD {
        assign_codes(nodes, node.leaves[0], bits, depth + 1);
    }

    if node.is_leaf() {
        let leaf = &mut nodes[usize::from(id)];
        leaf.bits = bits;
        leaf.num_bits = depth;
    }
}

/// For every 10-bit pattern: the first leaf reached, or the node after 10 bits.
fn build_lut(nodes: &[Node; MAX_NODES], root: u16) -> [u16; LUT_SIZE] {
    let mut lut = [root; LUT_SIZE];
    for (pattern, slot) in lut.iter_mut().enumerate() {
        let mut bits = pattern;
        let mut id = root;
        for _ in 0..LUT_BITS {
            id = nodes[usize::from(id)].leaves[bits & 1];
            bits >>= 1;
            if nodes[usize::from(id)].is_leaf() {
                break;
            }
        }
        *slot = id;
    }
    lut
}
