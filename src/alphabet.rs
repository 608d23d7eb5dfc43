use std::collections::BTreeSet;

/// The base alphabet shared by the compressor and the decompressor.
///
/// Symbols are kept sorted and deduplicated, so both sides seed their
/// dictionaries in the same order and assign the same indices `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet<T> {
    symbols: Vec<T>,
}

impl<T: Ord> Alphabet<T> {
    /// Builds an alphabet from any collection of symbols.
    ///
    /// Duplicates are dropped.
    pub fn new<I: IntoIterator<Item = T>>(symbols: I) -> Self {
        let set: BTreeSet<T> = symbols.into_iter().collect();
        Self {
            symbols: set.into_iter().collect(),
        }
    }

    /// Index of a symbol in the seeded dictionary, if it belongs to the alphabet.
    pub fn index_of(&self, symbol: &T) -> Option<usize> {
        self.symbols.binary_search(symbol).ok()
    }
}

impl<T: Ord + Clone> Alphabet<T> {
    /// The distinct symbols of an input.
    pub fn of(input: &[T]) -> Self {
        Self::new(input.iter().cloned())
    }
}

impl<T> Alphabet<T> {
    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in seeding order.
    pub fn symbols(&self) -> &[T] {
        &self.symbols
    }
}

impl Alphabet<char> {
    /// All 128 ASCII characters.
    pub fn ascii() -> Self {
        Self::new((0u8..128).map(char::from))
    }
}

impl Alphabet<u8> {
    /// All 256 byte values.
    pub fn bytes() -> Self {
        Self::new(0..=u8::MAX)
    }
}

impl<T: Ord> FromIterator<T> for Alphabet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}
