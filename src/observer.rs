use std::fmt::Debug;

/// Hooks into the dictionary events of a compression or decompression run.
///
/// Every method has an empty default, so an observer only implements what
/// it needs. `()` is the silent observer.
pub trait DictionaryObserver<T> {
    /// A sequence was added; `len` is the entry count afterwards.
    fn on_insert(&mut self, _index: u32, _sequence: &[T], _len: usize) {}

    /// The least recently used learned sequence was dropped.
    fn on_evict(&mut self, _index: u32, _sequence: &[T]) {}

    /// A sequence became the most recently used entry.
    fn on_touch(&mut self, _index: u32, _sequence: &[T]) {}

    /// The dictionary held `len` entries and is being re-seeded.
    fn on_reset(&mut self, _len: usize) {}
}

impl<T> DictionaryObserver<T> for () {}

impl<T, O: DictionaryObserver<T> + ?Sized> DictionaryObserver<T> for &mut O {
    fn on_insert(&mut self, index: u32, sequence: &[T], len: usize) {
        (**self).on_insert(index, sequence, len);
    }

    fn on_evict(&mut self, index: u32, sequence: &[T]) {
        (**self).on_evict(index, sequence);
    }

    fn on_touch(&mut self, index: u32, sequence: &[T]) {
        (**self).on_touch(index, sequence);
    }

    fn on_reset(&mut self, len: usize) {
        (**self).on_reset(len);
    }
}

/// Forwards every dictionary event to `log::trace!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl<T: Debug> DictionaryObserver<T> for LogObserver {
    fn on_insert(&mut self, index: u32, sequence: &[T], len: usize) {
        log::trace!("added {:?} => {} ({} entries)", sequence, index, len);
    }

    fn on_evict(&mut self, index: u32, sequence: &[T]) {
        log::trace!("removed {:?} => {}", sequence, index);
    }

    fn on_touch(&mut self, index: u32, sequence: &[T]) {
        log::trace!("moved {:?} => {}", sequence, index);
    }

    fn on_reset(&mut self, len: usize) {
        log::trace!("reset after {} entries", len);
    }
}
