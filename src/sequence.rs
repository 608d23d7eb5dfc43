use slotmap::DefaultKey;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

/// A zero-copy view of a dictionary sequence.
///
/// Base alphabet entries point into the alphabet, learned entries into the
/// buffer of the current run (the input when compressing, the output when
/// decompressing). Equality is always decided on the resolved symbols.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Sequence {
    /// A single symbol of the base alphabet.
    Base(u32),

    /// `len` symbols of the run buffer, starting at `start`.
    Span { start: usize, len: usize },
}

impl Sequence {
    pub(crate) fn span(start: usize, len: usize) -> Self {
        Sequence::Span { start, len }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Sequence::Base(_) => 1,
            Sequence::Span { len, .. } => *len,
        }
    }

    /// Resolves the view to the symbols it stands for.
    pub(crate) fn resolve<'a, T>(&self, alphabet: &'a [T], source: &'a [T]) -> &'a [T] {
        match *self {
            Sequence::Base(slot) => {
                let slot = slot as usize;
                &alphabet[slot..slot + 1]
            }
            Sequence::Span { start, len } => &source[start..start + len],
        }
    }

    /// Appends the symbols of this view to `output` and returns where they landed.
    pub(crate) fn copy_into<T: Clone>(&self, alphabet: &[T], output: &mut Vec<T>) -> Range<usize> {
        let start = output.len();
        match *self {
            Sequence::Base(slot) => output.push(alphabet[slot as usize].clone()),
            Sequence::Span { start: from, len } => output.extend_from_within(from..from + len),
        }
        start..output.len()
    }
}

/// Appends `output[range]` followed by its first symbol: the KwKwK sequence.
pub(crate) fn repeat_with_first<T: Clone>(range: Range<usize>, output: &mut Vec<T>) -> Range<usize> {
    let start = output.len();
    let first = output[range.start].clone();
    output.extend_from_within(range);
    output.push(first);
    start..output.len()
}

/// Structural hash of a sequence, consistent with element-wise equality.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub(crate) struct SequenceHash(u64);

impl SequenceHash {
    pub(crate) fn of<T: Hash>(symbols: &[T]) -> Self {
        let mut hasher = DefaultHasher::new();
        symbols.hash(&mut hasher);
        SequenceHash(hasher.finish())
    }
}

/// A dictionary entry, linked into the recency list.
///
/// `prev` points towards the most recently used entry, `next` towards the
/// least recently used one.
#[derive(Debug)]
pub(crate) struct EntryNode {
    pub sequence: Sequence,
    pub index: u32,
    pub hash: SequenceHash,
    pub prev: Option<DefaultKey>,
    pub next: Option<DefaultKey>,
}

impl EntryNode {
    pub(crate) fn new(sequence: Sequence, index: u32, hash: SequenceHash) -> Self {
        Self {
            sequence,
            index,
            hash,
            prev: None,
            next: None,
        }
    }
}
