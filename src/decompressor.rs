use crate::alphabet::Alphabet;
use crate::config::LzwgConfig;
use crate::dictionary::SequenceDictionary;
use crate::error::LzwgError;
use crate::observer::DictionaryObserver;
use crate::sequence::{repeat_with_first, Sequence};
use std::hash::Hash;
use std::ops::Range;

/// LZWG decompressor.
///
/// Rebuilds the original symbols from dictionary indices by replaying the
/// compressor's dictionary updates. Learned entries are views into the
/// output being reconstructed.
pub struct Decompressor<O = ()> {
    config: LzwgConfig,
    observer: O,
}

impl Decompressor {
    /// Creates a decompressor without an observer.
    pub fn new(config: LzwgConfig) -> Self {
        Self {
            config,
            observer: (),
        }
    }
}

impl<O> Decompressor<O> {
    /// Replaces the observer notified of dictionary events.
    pub fn with_observer<P>(self, observer: P) -> Decompressor<P> {
        Decompressor {
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

    /// Decompresses `indices` produced with the same alphabet and configuration.
    pub fn decompress<T>(&mut self, indices: &[u32], alphabet: &Alphabet<T>) -> Result<Vec<T>, LzwgError>
    where
        T: Hash + Eq + Clone,
        O: DictionaryObserver<T>,
    {
        let symbols = alphabet.symbols();
        let mut dictionary = SequenceDictionary::new(symbols, &self.config, &mut self.observer)?;
        let max_size = self.config.max_dictionary_size();

        let mut output: Vec<T> = Vec::new();
        let mut previous: Option<Range<usize>> = None;

        for (position, &index) in indices.iter().enumerate() {
            let corrupt = LzwgError::CorruptStream { position, index };
            if index >= max_size {
                return Err(corrupt);
            }

            let (current, walk) = match (dictionary.get(index), previous.clone()) {
                (Some(key), None) => (dictionary.sequence_of(key).copy_into(symbols, &mut output), true),

                (Some(key), Some(previous)) => {
                    let stored = dictionary.sequence_of(key);
                    let learned = Sequence::span(previous.start, previous.len() + 1);

                    if dictionary.make_room(&output)? == Some(index) {
                        // The compressor recycled this index for the entry it
                        // added right before emitting it
                        let current = repeat_with_first(previous, &mut output);
                        dictionary.insert(&output, learned)?;
                        (current, false)
                    } else {
                        let current = stored.copy_into(symbols, &mut output);
                        dictionary.insert(&output, learned)?;
                        (current, true)
                    }
                }

                (None, Some(previous)) => {
                    // KwKwK: the index of the entry the compressor just added
                    if index != dictionary.next_index() || dictionary.is_full() {
                        return Err(corrupt);
                    }

                    let learned = Sequence::span(previous.start, previous.len() + 1);
                    let current = repeat_with_first(previous, &mut output);
                    dictionary.insert(&output, learned)?;
                    (current, true)
                }

                (None, None) => return Err(corrupt),
            };

            if walk {
                // Shortest prefix first, like the compressor's match chain
                for len in 1..=current.len() {
                    if let Some(key) = dictionary.find(&output, Sequence::span(current.start, len)) {
                        dictionary.touch(&output, key);
                    }
                }
            }

            previous = Some(current);
        }

        log::debug!(
            "decompressed {} indices into {} symbols ({} entries, {} resets)",
            indices.len(),
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
    use crate::compressor::Compressor;

    fn abc() -> Alphabet<char> {
        Alphabet::new("abc".chars())
    }

    fn decompress_str(indices: &[u32], config: LzwgConfig) -> Result<String, LzwgError> {
        Decompressor::new(config)
            .decompress(indices, &abc())
            .map(|symbols| symbols.into_iter().collect())
    }

    fn roundtrip(text: &str, config: LzwgConfig) -> String {
        let input: Vec<char> = text.chars().collect();
        let indices = Compressor::new(config).compress(&input, &abc()).unwrap();
        decompress_str(&indices, config).unwrap()
    }

    #[test]
    fn test_empty() {
        assert_eq!(decompress_str(&[], LzwgConfig::new(5)).unwrap(), "");
    }

    #[test]
    fn test_classic_kwkwk() {
        // Index 5 ("aba") is emitted before the decoder could learn it
        assert_eq!(
            decompress_str(&[0, 1, 3, 5], LzwgConfig::unbounded()).unwrap(),
            "abababa"
        );
    }

    #[test]
    fn test_small_dictionary() {
        // Index 3 is recycled for "aaaa", then index 4 for "aa"
        assert_eq!(
            decompress_str(&[0, 3, 4, 0, 0], LzwgConfig::new(5)).unwrap(),
            "aaaaaaaa"
        );
    }

    #[test]
    fn test_index_recycled_before_use() {
        // Index 2 holds "ab" until the compressor evicts it for "bb" and
        // emits it right away
        let alphabet = Alphabet::new("ab".chars());
        let restored: String = Decompressor::new(LzwgConfig::new(3))
            .decompress(&[0, 1, 2], &alphabet)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(restored, "abbb");

        let input: Vec<char> = restored.chars().collect();
        let indices = Compressor::new(LzwgConfig::new(3))
            .compress(&input, &alphabet)
            .unwrap();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_first_index_unknown() {
        assert_eq!(
            decompress_str(&[3], LzwgConfig::new(8)),
            Err(LzwgError::CorruptStream {
                position: 0,
                index: 3
            })
        );
    }

    #[test]
    fn test_unreachable_index() {
        // Only index 3 can be inferred after the first step
        assert_eq!(
            decompress_str(&[0, 4], LzwgConfig::new(8)),
            Err(LzwgError::CorruptStream {
                position: 1,
                index: 4
            })
        );
    }

    #[test]
    fn test_index_beyond_dictionary() {
        assert_eq!(
            decompress_str(&[0, 1, 9], LzwgConfig::new(5)),
            Err(LzwgError::CorruptStream {
                position: 2,
                index: 9
            })
        );
    }

    #[test]
    fn test_roundtrips() {
        for text in ["babaca", "ccabbbabccab", "aaaaaaaa", "abcabcabcabc", "c"] {
            for max_size in [4, 5, 6, 10, u32::MAX] {
                assert_eq!(roundtrip(text, LzwgConfig::new(max_size)), text);
            }
        }
    }

    #[test]
    fn test_roundtrip_with_reset() {
        let text = "abcabcabcabcaaaabbbbcccc";
        for reset_size in [4, 5, 6, 9] {
            let config = LzwgConfig::unbounded().with_reset_size(reset_size);
            assert_eq!(roundtrip(text, config), text);
        }
    }
}
