//! # LZWG - LZW with a Bounded, Recycling Dictionary
//!
//! A two-stage lossless compressor. The first stage is an LZW variant whose
//! dictionary never grows past a fixed size: when full, the least recently
//! used learned sequence is evicted and its index handed to the next one.
//! The second stage builds length-limited canonical Huffman codes for the
//! resulting indices.
//!
//! The compressor and decompressor drive identical dictionaries through the
//! same inserts, recency updates and evictions, so nothing but the indices
//! needs to be transmitted.
//!
//! ## Example
//!
//! ```
//! use lzwg::{compress, decompress, Alphabet, LzwgConfig};
//!
//! let input: Vec<char> = "abababababcabcabc".chars().collect();
//! let alphabet = Alphabet::new("abc".chars());
//! let config = LzwgConfig::new(8);
//!
//! let indices = compress(&input, &alphabet, &config).unwrap();
//! assert!(indices.iter().all(|&index| index < 8));
//!
//! let restored = decompress(&indices, &alphabet, &config).unwrap();
//! assert_eq!(restored, input);
//! ```
//!
//! Entropy coding the indices:
//!
//! ```
//! use lzwg::{build_huffman, frequency_table, FastDecodeTable};
//!
//! let indices = [0, 1, 3, 5, 0, 0, 3];
//! let codes = build_huffman(&frequency_table(&indices), 16).unwrap();
//! let table = FastDecodeTable::new(&codes).unwrap();
//!
//! let window = (codes[3].code << (16 - codes[3].length)) as u16;
//! assert_eq!(table.decode(window).unwrap().symbol, 3);
//! ```
//!
//! ## Performance
//!
//! - O(longest match) expected time per input symbol
//! - Memory bounded by the dictionary size plus the input and output buffers
//! - Dictionary entries are views into the data, never copies

mod alphabet;
mod compressor;
mod config;
mod decode_table;
mod decompressor;
mod dictionary;
mod error;
mod huffman;
mod index_gen;
mod observer;
mod sequence;
mod stats;


pub use alphabet::Alphabet;
pub use compressor::Compressor;
pub use config::LzwgConfig;
pub use decode_table::{DecodeEntry, FastDecodeTable, WINDOW_BITS};
pub use decompressor::Decompressor;
pub use error::{HuffmanError, LzwgError};
pub use huffman::{
    build_huffman, build_limited_huffman, canonical_codes, code_lengths, frequency_table,
    HuffmanCode, LimitedHuffman, MAX_CODE_LENGTH,
};
pub use observer::{DictionaryObserver, LogObserver};
pub use stats::{
    fixed_bits, huffman_bits, leb128_bits, prefix_bits, prefix_size_hint, CompressionStats,
    Encoding,
};

use std::hash::Hash;

/// Compresses `input` into dictionary indices.
///
/// Shorthand for [`Compressor::compress`] without an observer.
pub fn compress<T: Hash + Eq>(
    input: &[T],
    alphabet: &Alphabet<T>,
    config: &LzwgConfig,
) -> Result<Vec<u32>, LzwgError> {
    Compressor::new(*config).compress(input, alphabet)
}

/// Restores the symbols behind `indices`.
///
/// `alphabet` and `config` must match the ones used to compress.
pub fn decompress<T: Hash + Eq + Clone>(
    indices: &[u32],
    alphabet: &Alphabet<T>,
    config: &LzwgConfig,
) -> Result<Vec<T>, LzwgError> {
    Decompressor::new(*config).decompress(indices, alphabet)
}
