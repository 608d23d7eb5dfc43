//! Size estimates for index streams.
//!
//! These only count bits; no bitstream is written.

use crate::huffman::{build_huffman, frequency_table, HuffmanCode, MAX_CODE_LENGTH};
use ahash::AHashSet as HashSet;

/// Bits of the LEB128 encoding of `value`: 8 per 7-bit group, at least one
/// byte.
pub fn leb128_bits(value: u64) -> u32 {
    let significant = (u64::BITS - value.leading_zeros()).max(1);
    8 * significant.div_ceil(7)
}

/// Bits of `value` written as its significant-bit count in `size_hint_bits`
/// bits, followed by its significant bits.
pub fn prefix_bits(value: u32, size_hint_bits: u32) -> u32 {
    size_hint_bits + (u32::BITS - value.leading_zeros())
}

/// Bits needed to store a significant-bit count for a dictionary of
/// `dictionary_size` entries.
pub fn prefix_size_hint(dictionary_size: u32) -> u32 {
    let index_bits = dictionary_size.max(1).ilog2() + 1;
    index_bits.ilog2() + 1
}

/// Bits of a fixed-width index into a dictionary of `dictionary_size` entries.
pub fn fixed_bits(dictionary_size: u32) -> u32 {
    dictionary_size.max(1).ilog2() + 1
}

/// Total code length of `values` under `codes`.
///
/// Returns `None` if a value has no code.
pub fn huffman_bits(values: &[u32], codes: &[HuffmanCode]) -> Option<u64> {
    values.iter().try_fold(0u64, |total, &value| {
        let code = codes.get(value as usize)?;
        Some(total + u64::from(code.length))
    })
}

/// How an index stream is assumed to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// One LEB128 varint per index
    Leb128,

    /// Size-prefixed significant bits, the hint sized for the dictionary so far
    Prefix,

    /// Fixed-width indices, sized for the dictionary so far
    Fixed,

    /// 32-bit limited canonical Huffman codes plus one length per code
    Huffman,
}

/// Statistics about one compressed index stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionStats {
    /// Size of the uncompressed input, in bytes
    pub input_bytes: usize,
    /// Number of indices emitted
    pub indices: usize,
    /// Number of distinct indices
    pub distinct_indices: usize,
    /// Largest index emitted
    pub max_index: Option<u32>,
    /// Estimated LEB128 size, in bytes
    pub leb128_bytes: u64,
    /// Estimated size-prefixed size, in bytes
    pub prefix_bytes: u64,
    /// Estimated fixed-width size, in bytes
    pub fixed_bytes: u64,
    /// Estimated Huffman size including code lengths, in bytes
    pub huffman_bytes: Option<u64>,
}

impl CompressionStats {
    /// Estimates the size of `indices` under every [`Encoding`].
    ///
    /// The prefix and fixed estimates assume the dictionary grows by one
    /// entry per index, up to `max_dictionary_size`.
    pub fn from_indices(input_bytes: usize, indices: &[u32], max_dictionary_size: u32) -> Self {
        let mut leb128 = 0u64;
        let mut prefix = 0u64;
        let mut fixed = 0u64;
        let mut dictionary_size = 0u32;

        for &index in indices {
            dictionary_size = dictionary_size.saturating_add(1).min(max_dictionary_size);
            leb128 += u64::from(leb128_bits(u64::from(index)));
            prefix += u64::from(prefix_bits(index, prefix_size_hint(dictionary_size)));
            fixed += u64::from(fixed_bits(dictionary_size));
        }

        let distinct: HashSet<u32> = indices.iter().copied().collect();

        Self {
            input_bytes,
            indices: indices.len(),
            distinct_indices: distinct.len(),
            max_index: indices.iter().copied().max(),
            leb128_bytes: leb128 / 8,
            prefix_bytes: prefix / 8,
            fixed_bytes: fixed / 8,
            huffman_bytes: huffman_estimate(indices),
        }
    }

    pub fn estimated_bytes(&self, encoding: Encoding) -> Option<u64> {
        match encoding {
            Encoding::Leb128 => Some(self.leb128_bytes),
            Encoding::Prefix => Some(self.prefix_bytes),
            Encoding::Fixed => Some(self.fixed_bytes),
            Encoding::Huffman => self.huffman_bytes,
        }
    }

    /// Returns the space saved by `encoding`: 0 for no gain, 1 for an empty
    /// output, negative when the output is larger than the input.
    pub fn compression_ratio(&self, encoding: Encoding) -> Option<f64> {
        if self.input_bytes == 0 {
            return None;
        }
        let bytes = self.estimated_bytes(encoding)?;
        Some(1.0 - bytes as f64 / self.input_bytes as f64)
    }
}

fn huffman_estimate(indices: &[u32]) -> Option<u64> {
    let codes = build_huffman(&frequency_table(indices), MAX_CODE_LENGTH).ok()?;
    let encoded = huffman_bits(indices, &codes)?;
    let table: u64 = codes.iter().map(|code| u64::from(code.length)).sum();
    Some(encoded / 8 + table / 8)
}
