/// Index generator with recycling.
///
/// Evicted indices are not pooled: the counter rewinds to the evicted index,
/// so two dictionaries evicting in the same order hand out the same indices.
#[derive(Debug)]
pub(crate) struct IndexGenerator {
    next: u32,
}

impl IndexGenerator {
    /// Creates a new generator starting from index 0.
    pub(crate) fn new() -> Self {
        Self { next: 0 }
    }

    /// Gets the next index.
    pub(crate) fn get(&mut self) -> u32 {
        let index = self.next;
        self.next += 1;
        index
    }

    /// The index the next call to `get` returns.
    pub(crate) fn peek(&self) -> u32 {
        self.next
    }

    /// Makes `index` the next one handed out.
    pub(crate) fn rewind(&mut self, index: u32) {
        self.next = index;
    }
}
