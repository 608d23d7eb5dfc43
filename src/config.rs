use crate::error::LzwgError;

/// Dictionary sizing for an LZWG run.
///
/// The compressor and the decompressor must use the same configuration,
/// otherwise their dictionaries drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwgConfig {
    max_dictionary_size: u32,
    dictionary_reset_size: Option<u32>,
}

impl LzwgConfig {
    /// A dictionary holding at most `max_dictionary_size` entries, never reset.
    pub fn new(max_dictionary_size: u32) -> Self {
        Self {
            max_dictionary_size,
            dictionary_reset_size: None,
        }
    }

    /// A dictionary that grows until `u32::MAX` entries.
    pub fn unbounded() -> Self {
        Self::new(u32::MAX)
    }

    /// Discards and re-seeds the dictionary whenever it reaches `reset_size` entries.
    ///
    /// A reset size at or above the maximum dictionary size never triggers.
    pub fn with_reset_size(mut self, reset_size: u32) -> Self {
        self.dictionary_reset_size = Some(reset_size);
        self
    }

    pub fn max_dictionary_size(&self) -> u32 {
        self.max_dictionary_size
    }

    pub fn dictionary_reset_size(&self) -> Option<u32> {
        self.dictionary_reset_size
    }

    /// The reset size that actually applies, if any.
    pub(crate) fn effective_reset_size(&self) -> Option<u32> {
        self.dictionary_reset_size
            .filter(|&size| size < self.max_dictionary_size)
    }

    /// Checks the configuration against the size of the base alphabet.
    ///
    /// A reset size at or below the alphabet size is allowed: the dictionary
    /// then resets after every insert.
    pub fn validate(&self, alphabet_len: usize) -> Result<(), LzwgError> {
        if alphabet_len >= self.max_dictionary_size as usize {
            return Err(LzwgError::AlphabetTooLarge {
                alphabet_len,
                max_dictionary_size: self.max_dictionary_size,
            });
        }

        Ok(())
    }
}

impl Default for LzwgConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}
