//! Fixed-capacity FIFO ring buffer.

/// A bounded FIFO over `depth + 1` slots.
///
/// The extra slot keeps "full" (`len() == depth`) distinguishable from
/// "empty" (`read == write`): the write index never catches the read index
/// by wraparound, so exactly one slot is always unused.
///
/// The ring is not synchronized; the prefetcher guards it with a single
/// mutex.
#[derive(Debug)]
pub struct Ring<T> {
    slots: Vec<Option<T>>,
    read: usize,
    write: usize,
}

impl<T> Ring<T> {
    /// Create a ring that can hold up to `depth` items.
    pub fn new(depth: usize) -> Self {
        let mut slots = Vec::with_capacity(depth + 1);
        slots.resize_with(depth + 1, || None);
        Self {
            slots,
            read: 0,
            write: 0,
        }
    }

    /// Maximum number of items the ring can hold.
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Number of items currently buffered.
    pub fn len(&self) -> usize {
        (self.write + self.slots.len() - self.read) % self.slots.len()
    }

    /// True when no items are buffered.
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    /// True when the ring holds `capacity()` items.
    pub fn is_full(&self) -> bool {
        (self.write + 1) % self.slots.len() == self.read
    }

    /// Insert an item at the write index.
    ///
    /// Returns the item back when the ring is full, so the caller decides
    /// the overflow policy. The prefetcher drops the rejected item: items
    /// already buffered win over the newest fetch.
    pub fn try_push(&mut self, item: T) -> Result<(), T> {
        let next = (self.write + 1) % self.slots.len();
        if next == self.read {
            return Err(item);
        }
        // Overwrites (and thereby drops) any stale item; the slot is
        // vacant in steady state.
        self.slots[self.write] = Some(item);
        self.write = next;
        Ok(())
    }

    /// Take ownership of the oldest item, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.read == self.write {
            return None;
        }
        let item = self.slots[self.read].take();
        debug_assert!(item.is_some(), "occupied slot must own an item");
        self.read = (self.read + 1) % self.slots.len();
        item
    }
}
