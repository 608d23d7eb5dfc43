use crate::config::LzwgConfig;
use crate::error::LzwgError;
use crate::index_gen::IndexGenerator;
use crate::observer::DictionaryObserver;
use crate::sequence::{EntryNode, Sequence, SequenceHash};
use ahash::AHashMap as HashMap;
use slotmap::{DefaultKey, SlotMap};
use std::hash::Hash;

/// Bounded, recency-ordered mapping between sequences and indices.
///
/// The compressor and the decompressor each drive one of these through the
/// exact same series of inserts, touches and evictions, which keeps their
/// indices in agreement without transmitting anything but the indices.
///
/// Sequences are views: every method resolving one takes the run buffer
/// (`source`) the learned spans point into.
pub(crate) struct SequenceDictionary<'a, T, O> {
    /// Base alphabet, in seeding order
    alphabet: &'a [T],

    /// Entry storage, doubly linked by recency
    entries: SlotMap<DefaultKey, EntryNode>,

    /// Maps indices to their entries
    by_index: HashMap<u32, DefaultKey>,

    /// Maps sequence hashes to the entries sharing that hash
    by_content: HashMap<SequenceHash, Vec<DefaultKey>>,

    /// Most recently used entry
    head: Option<DefaultKey>,

    /// Least recently used entry
    tail: Option<DefaultKey>,

    indices: IndexGenerator,
    max_size: usize,
    reset_size: Option<usize>,

    /// Number of periodic resets so far
    resets: usize,

    observer: O,
}

impl<'a, T: Hash + Eq, O: DictionaryObserver<T>> SequenceDictionary<'a, T, O> {
    /// Creates a dictionary seeded with the base alphabet.
    pub(crate) fn new(alphabet: &'a [T], config: &LzwgConfig, observer: O) -> Result<Self, LzwgError> {
        config.validate(alphabet.len())?;

        let mut dictionary = Self {
            alphabet,
            entries: SlotMap::new(),
            by_index: HashMap::default(),
            by_content: HashMap::default(),
            head: None,
            tail: None,
            indices: IndexGenerator::new(),
            max_size: config.max_dictionary_size() as usize,
            reset_size: config.effective_reset_size().map(|size| size as usize),
            resets: 0,
            observer,
        };
        dictionary.initialize();

        Ok(dictionary)
    }

    /// Drops every entry and re-seeds the base alphabet.
    ///
    /// Base symbols get indices `0..alphabet.len()` in alphabet order, from
    /// most to least recently used.
    pub(crate) fn initialize(&mut self) {
        self.entries.clear();
        self.by_index.clear();
        self.by_content.clear();
        self.head = None;
        self.tail = None;
        self.indices = IndexGenerator::new();

        for slot in 0..self.alphabet.len() {
            let index = self.indices.get();
            let hash = SequenceHash::of(&self.alphabet[slot..slot + 1]);
            let key = self
                .entries
                .insert(EntryNode::new(Sequence::Base(slot as u32), index, hash));

            self.push_back(key);
            self.by_index.insert(index, key);
            self.by_content.entry(hash).or_default().push(key);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of entries, base alphabet included.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.entries.len() >= self.max_size
    }

    /// The index the next insert without eviction receives.
    pub(crate) fn next_index(&self) -> u32 {
        self.indices.peek()
    }

    pub(crate) fn resets(&self) -> usize {
        self.resets
    }

    /// Finds the entry holding the same symbols as `sequence`.
    pub(crate) fn find(&self, source: &[T], sequence: Sequence) -> Option<DefaultKey> {
        let symbols = sequence.resolve(self.alphabet, source);
        let candidates = self.by_content.get(&SequenceHash::of(symbols))?;

        // Verify full equality (hash collision check)
        candidates.iter().copied().find(|&key| {
            self.entries[key].sequence.resolve(self.alphabet, source) == symbols
        })
    }

    /// Finds the entry stored under `index`.
    pub(crate) fn get(&self, index: u32) -> Option<DefaultKey> {
        self.by_index.get(&index).copied()
    }

    pub(crate) fn index_of(&self, key: DefaultKey) -> u32 {
        self.entries[key].index
    }

    pub(crate) fn sequence_of(&self, key: DefaultKey) -> Sequence {
        self.entries[key].sequence
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Makes an entry the most recently used one.
    pub(crate) fn touch(&mut self, source: &[T], key: DefaultKey) {
        if self.head != Some(key) {
            self.unlink(key);
            self.push_front(key);
        }

        let node = &self.entries[key];
        let symbols = node.sequence.resolve(self.alphabet, source);
        self.observer.on_touch(node.index, symbols);
    }

    /// Adds a sequence as the most recently used entry and returns its index.
    ///
    /// Evicts first when the dictionary is full, and re-seeds the dictionary
    /// afterwards when it reached the reset size.
    pub(crate) fn insert(&mut self, source: &[T], sequence: Sequence) -> Result<u32, LzwgError> {
        self.make_room(source)?;

        let index = self.indices.get();
        let symbols = sequence.resolve(self.alphabet, source);
        let hash = SequenceHash::of(symbols);
        let key = self.entries.insert(EntryNode::new(sequence, index, hash));

        self.push_front(key);
        self.by_index.insert(index, key);
        self.by_content.entry(hash).or_default().push(key);

        let len = self.entries.len();
        self.observer.on_insert(index, symbols, len);

        if self.reset_size.is_some_and(|size| len >= size) {
            self.reset();
        }

        Ok(index)
    }

    /// Evicts the least recently used learned entry if the dictionary is full.
    ///
    /// Returns the index that was freed, if any.
    pub(crate) fn make_room(&mut self, source: &[T]) -> Result<Option<u32>, LzwgError> {
        if !self.is_full() {
            return Ok(None);
        }

        self.evict_lru(source).map(Some)
    }

    /// Removes the least recently used multi-symbol entry.
    ///
    /// Single-symbol entries are skipped: they form the base alphabet and
    /// must stay encodable. The freed index is the next one handed out.
    pub(crate) fn evict_lru(&mut self, source: &[T]) -> Result<u32, LzwgError> {
        let mut current = self.tail;
        while let Some(key) = current {
            if self.entries[key].sequence.len() > 1 {
                break;
            }
            current = self.entries[key].prev;
        }

        let Some(key) = current else {
            return Err(LzwgError::DegenerateEviction {
                len: self.entries.len(),
            });
        };

        self.unlink(key);
        let Some(node) = self.entries.remove(key) else {
            return Err(LzwgError::DegenerateEviction {
                len: self.entries.len(),
            });
        };

        self.by_index.remove(&node.index);
        if let Some(bucket) = self.by_content.get_mut(&node.hash) {
            bucket.retain(|&other| other != key);
            if bucket.is_empty() {
                self.by_content.remove(&node.hash);
            }
        }
        self.indices.rewind(node.index);

        self.observer
            .on_evict(node.index, node.sequence.resolve(self.alphabet, source));

        Ok(node.index)
    }

    /// Discards all learned entries and re-seeds the base alphabet.
    pub(crate) fn reset(&mut self) {
        self.observer.on_reset(self.entries.len());
        self.initialize();
        self.resets += 1;
    }

    // ========================================================================
    // Recency List
    // ========================================================================

    fn unlink(&mut self, key: DefaultKey) {
        let prev = self.entries[key].prev.take();
        let next = self.entries[key].next.take();

        match prev {
            Some(prev) => self.entries[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.entries[next].prev = prev,
            None => self.tail = prev,
        }
    }

    fn push_front(&mut self, key: DefaultKey) {
        self.entries[key].prev = None;
        self.entries[key].next = self.head;

        match self.head {
            Some(head) => self.entries[head].prev = Some(key),
            None => self.tail = Some(key),
        }
        self.head = Some(key);
    }

    fn push_back(&mut self, key: DefaultKey) {
        self.entries[key].next = None;
        self.entries[key].prev = self.tail;

        match self.tail {
            Some(tail) => self.entries[tail].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
    }

    /// Indices from most to least recently used.
    #[cfg(test)]
    pub(crate) fn recency(&self) -> Vec<u32> {
        let mut order = Vec::with_capacity(self.entries.len());
        let mut current = self.head;
        while let Some(key) = current {
            order.push(self.entries[key].index);
            current = self.entries[key].next;
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHABET: [char; 3] = ['a', 'b', 'c'];

    fn dictionary(max_size: u32) -> SequenceDictionary<'static, char, ()> {
        SequenceDictionary::new(&ALPHABET, &LzwgConfig::new(max_size), ())
            .expect("valid configuration")
    }

    #[test]
    fn test_seeded_in_alphabet_order() {
        let dict = dictionary(10);
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.next_index(), 3);
        assert_eq!(dict.recency(), vec![0, 1, 2]);

        let source: Vec<char> = "cab".chars().collect();
        let key = dict.find(&source, Sequence::span(0, 1)).unwrap();
        assert_eq!(dict.index_of(key), 2);
        assert!(matches!(dict.sequence_of(key), Sequence::Base(2)));
    }

    #[test]
    fn test_alphabet_too_large() {
        let result = SequenceDictionary::new(&ALPHABET, &LzwgConfig::new(3), ());
        assert!(matches!(
            result,
            Err(LzwgError::AlphabetTooLarge {
                alphabet_len: 3,
                max_dictionary_size: 3
            })
        ));
    }

    #[test]
    fn test_insert_and_find() {
        let mut dict = dictionary(10);
        let source: Vec<char> = "abab".chars().collect();

        assert!(dict.find(&source, Sequence::span(0, 2)).is_none());
        let index = dict.insert(&source, Sequence::span(0, 2)).unwrap();
        assert_eq!(index, 3);

        // Same symbols at another offset resolve to the same entry
        let key = dict.find(&source, Sequence::span(2, 2)).unwrap();
        assert_eq!(dict.index_of(key), 3);
        assert_eq!(dict.get(3), Some(key));
        assert_eq!(dict.recency(), vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_touch_moves_to_front() {
        let mut dict = dictionary(10);
        let source: Vec<char> = "abc".chars().collect();

        let c = dict.find(&source, Sequence::span(2, 1)).unwrap();
        dict.touch(&source, c);
        assert_eq!(dict.recency(), vec![2, 0, 1]);

        let a = dict.find(&source, Sequence::span(0, 1)).unwrap();
        dict.touch(&source, a);
        assert_eq!(dict.recency(), vec![0, 2, 1]);

        // Touching the head is a no-op
        dict.touch(&source, a);
        assert_eq!(dict.recency(), vec![0, 2, 1]);
    }

    #[test]
    fn test_eviction_recycles_lru_index() {
        let mut dict = dictionary(5);
        let source: Vec<char> = "abcab".chars().collect();

        assert_eq!(dict.insert(&source, Sequence::span(0, 2)).unwrap(), 3); // ab
        assert_eq!(dict.insert(&source, Sequence::span(1, 2)).unwrap(), 4); // bc
        assert!(dict.is_full());

        // "ab" is the least recently used learned entry
        assert_eq!(dict.insert(&source, Sequence::span(2, 2)).unwrap(), 3); // ca
        assert!(dict.find(&source, Sequence::span(0, 2)).is_none());
        assert_eq!(dict.len(), 5);

        // Touch "bc" so that "ca" becomes the eviction candidate
        let bc = dict.find(&source, Sequence::span(1, 2)).unwrap();
        dict.touch(&source, bc);
        assert_eq!(dict.evict_lru(&source).unwrap(), 3);
        assert_eq!(dict.next_index(), 3);
    }

    #[test]
    fn test_eviction_skips_base_symbols() {
        let mut dict = dictionary(4);
        let source: Vec<char> = "abc".chars().collect();

        dict.insert(&source, Sequence::span(0, 2)).unwrap();
        // Base symbols are now all older than "ab"
        for _ in 0..3 {
            assert_eq!(dict.evict_lru(&source).unwrap(), 3);
            dict.insert(&source, Sequence::span(0, 2)).unwrap();
        }
        for slot in 0..3 {
            assert!(dict.find(&source, Sequence::span(slot, 1)).is_some());
        }
    }

    #[test]
    fn test_degenerate_eviction() {
        let mut dict = dictionary(4);
        let source: Vec<char> = Vec::new();
        assert_eq!(
            dict.evict_lru(&source).unwrap_err(),
            LzwgError::DegenerateEviction { len: 3 }
        );
    }

    #[test]
    fn test_reset_at_reset_size() {
        let config = LzwgConfig::unbounded().with_reset_size(5);
        let mut dict = SequenceDictionary::new(&ALPHABET, &config, ()).unwrap();
        let source: Vec<char> = "abcab".chars().collect();

        dict.insert(&source, Sequence::span(0, 2)).unwrap();
        assert_eq!(dict.len(), 4);
        dict.insert(&source, Sequence::span(1, 2)).unwrap();

        assert_eq!(dict.len(), 3);
        assert_eq!(dict.resets(), 1);
        assert_eq!(dict.next_index(), 3);
        assert!(dict.find(&source, Sequence::span(0, 2)).is_none());
    }

    #[test]
    fn test_reset_size_below_alphabet_resets_every_insert() {
        let config = LzwgConfig::unbounded().with_reset_size(2);
        let mut dict = SequenceDictionary::new(&ALPHABET, &config, ()).unwrap();
        let source: Vec<char> = "abca".chars().collect();

        // Seeding alone does not reset
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.resets(), 0);

        for start in 0..3 {
            assert_eq!(dict.insert(&source, Sequence::span(start, 2)).unwrap(), 3);
            assert_eq!(dict.len(), 3);
            assert_eq!(dict.resets(), start + 1);
        }
    }

    #[test]
    fn test_empty_alphabet() {
        let mut dict: SequenceDictionary<'static, char, ()> =
            SequenceDictionary::new(&[], &LzwgConfig::new(1), ()).unwrap();
        assert_eq!(dict.len(), 0);
        assert_eq!(dict.next_index(), 0);
        assert!(dict.get(0).is_none());
        assert_eq!(
            dict.evict_lru(&[]).unwrap_err(),
            LzwgError::DegenerateEviction { len: 0 }
        );
    }

    #[test]
    fn test_inverse_index_follows_eviction() {
        let mut dict = dictionary(4);
        let source: Vec<char> = "aabb".chars().collect();

        dict.insert(&source, Sequence::span(0, 2)).unwrap(); // aa
        dict.insert(&source, Sequence::span(2, 2)).unwrap(); // bb evicts aa

        assert!(dict.find(&source, Sequence::span(0, 2)).is_none());
        let bb = dict.find(&source, Sequence::span(2, 2)).unwrap();
        assert_eq!(dict.index_of(bb), 3);
        assert_eq!(dict.get(3), Some(bb));
        assert_eq!(dict.by_content.values().map(Vec::len).sum::<usize>(), 4);
    }
}
