use crate::alphabet::Alphabet;
use crate::config::LzwgConfig;
use crate::dictionary::SequenceDictionary;
use crate::error::LzwgError;
use crate::observer::DictionaryObserver;
use crate::sequence::Sequence;
use slotmap::DefaultKey;
use std::hash::Hash;

/// LZWG compressor.
///
/// Turns a symbol array into dictionary indices with a greedy longest match
/// against a bounded, LRU-evicting dictionary. Each call to
/// [`compress`](Compressor::compress) starts from a freshly seeded dictionary.
pub struct Compressor<O = ()> {
    config: LzwgConfig,
    observer: O,
}

impl Compressor {
    /// Creates a compressor without an observer.
    pub fn new(config: LzwgConfig) -> Self {
        Self {
            config,
            observer: (),
        }
    }
}

impl<O> Compressor<O> {
    /// Replaces the observer notified of dictionary events.
    pub fn with_observer<P>(self, observer: P) -> Compressor<P> {
        Compressor {
            config: self.config,
            observer,
        }
    }

    pub fn config(&self) -> &LzwgConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Compresses `input` into dictionary indices.
    ///
    /// Every symbol of `input` must belong to `alphabet`; every emitted index
    /// is below the configured maximum dictionary size.
    pub fn compress<T>(&mut self, input: &[T], alphabet: &Alphabet<T>) -> Result<Vec<u32>, LzwgError>
    where
        T: Hash + Eq,
        O: DictionaryObserver<T>,
    {
        let mut dictionary =
            SequenceDictionary::new(alphabet.symbols(), &self.config, &mut self.observer)?;

        log::debug!(
            "compressing {} symbols, alphabet {}, dictionary {}",
            input.len(),
            alphabet.len(),
            self.config.max_dictionary_size()
        );

        let mut output = Vec::new();

        // Entries of every prefix of the current match, shortest first
        let mut chain: Vec<DefaultKey> = Vec::new();
        let mut start = 0;
        let mut end = 0;

        while end < input.len() {
            let window = Sequence::span(start, end + 1 - start);

            if let Some(key) = dictionary.find(input, window) {
                chain.push(key);
                end += 1;
                continue;
            }

            let Some(&matched) = chain.last() else {
                return Err(LzwgError::UnknownSymbol { position: end });
            };
            output.push(dictionary.index_of(matched));

            // Mirror the decoder's walk over the prefixes of what it decodes
            for key in chain.drain(..) {
                dictionary.touch(input, key);
            }

            dictionary.insert(input, window)?;
            start = end;
        }

        if let Some(&matched) = chain.last() {
            output.push(dictionary.index_of(matched));
        }

        log::debug!(
            "compressed {} symbols into {} indices ({} entries, {} resets)",
            input.len(),
            output.len(),
            dictionary.len(),
            dictionary.resets()
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Alphabet<char> {
        Alphabet::new("abc".chars())
    }

    fn compress_str(text: &str, config: LzwgConfig) -> Vec<u32> {
        let input: Vec<char> = text.chars().collect();
        Compressor::new(config).compress(&input, &abc()).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(compress_str("", LzwgConfig::new(5)).is_empty());
    }

    #[test]
    fn test_single_symbol() {
        assert_eq!(compress_str("b", LzwgConfig::new(5)), vec![1]);
    }

    #[test]
    fn test_classic_lzw_without_eviction() {
        // ab=3, ba=4, aba=5
        assert_eq!(
            compress_str("abababa", LzwgConfig::unbounded()),
            vec![0, 1, 3, 5]
        );
    }

    #[test]
    fn test_repeated_symbol_with_small_dictionary() {
        // aa=3, aaa=4, then both indices are recycled
        assert_eq!(
            compress_str("aaaaaaaa", LzwgConfig::new(5)),
            vec![0, 3, 4, 0, 0]
        );
    }

    #[test]
    fn test_unknown_symbol() {
        let input: Vec<char> = "abd".chars().collect();
        let result = Compressor::new(LzwgConfig::new(8)).compress(&input, &abc());
        assert_eq!(result, Err(LzwgError::UnknownSymbol { position: 2 }));
    }

    #[test]
    fn test_alphabet_too_large() {
        let input: Vec<char> = "abc".chars().collect();
        let result = Compressor::new(LzwgConfig::new(3)).compress(&input, &abc());
        assert!(matches!(result, Err(LzwgError::AlphabetTooLarge { .. })));
    }

    #[test]
    fn test_indices_stay_below_max_size() {
        let text = "abaaacabaaccababbbbbbbcababababcbcbcbbbbbbabababccccccbbbbaaabbbbbccccccacbacbabcabc";
        for max_size in 4..12 {
            let indices = compress_str(text, LzwgConfig::new(max_size));
            assert!(indices.iter().all(|&index| index < max_size));
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "abcabcabcbbbacacbabcbabc";
        let first = compress_str(text, LzwgConfig::new(7));
        let second = compress_str(text, LzwgConfig::new(7));
        assert_eq!(first, second);
    }
}
