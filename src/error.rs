use thiserror::Error;

/// Errors raised while compressing or decompressing with the LZWG dictionary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LzwgError {
    /// The base alphabet leaves no room for a single learned sequence.
    #[error("base alphabet has {alphabet_len} symbols, the dictionary only holds {max_dictionary_size}")]
    AlphabetTooLarge {
        alphabet_len: usize,
        max_dictionary_size: u32,
    },

    /// An eviction was required but only base alphabet entries remain.
    #[error("cannot evict: all {len} dictionary entries belong to the base alphabet")]
    DegenerateEviction { len: usize },

    /// An input symbol is not part of the base alphabet.
    #[error("symbol at position {position} is not part of the base alphabet")]
    UnknownSymbol { position: usize },

    /// An index that neither the dictionary nor the KwKwK rule can resolve.
    #[error("corrupt stream: index {index} at position {position} cannot be resolved")]
    CorruptStream { position: usize, index: u32 },
}

/// Errors raised while building Huffman codes or their decode tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HuffmanError {
    /// Code lengths must fit between 1 and 32 bits.
    #[error("maximum code length {0} is outside 1..=32")]
    InvalidMaxLength(u8),

    /// `2^max_len` codes cannot cover every symbol.
    #[error("{symbols} symbols cannot be coded with at most {max_len} bits")]
    TooManySymbols { symbols: usize, max_len: u8 },

    /// A code length above 32 bits.
    #[error("code length {length} for symbol {symbol} exceeds 32 bits")]
    CodeLengthTooLong { symbol: usize, length: u8 },

    /// Code lengths that violate Kraft's inequality.
    #[error("code lengths are oversubscribed")]
    Oversubscribed,

    /// The long-tail variant needs at least one code slot.
    #[error("max_symbols must be at least 1")]
    ZeroMaxSymbols,

    /// The fast decode table only handles codes of up to 16 bits.
    #[error("code for symbol {symbol} is {length} bits long, the decode table holds at most 16")]
    CodeTooLong { symbol: usize, length: u8 },

    /// A code with bits set above its length.
    #[error("code {code:#b} for symbol {symbol} does not fit in {length} bits")]
    InvalidCode { symbol: usize, length: u8, code: u32 },
}
