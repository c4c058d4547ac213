//! A bounded trailing-history buffer with oldest-first eviction.
//!
//! [`HistoryBuffer`] keeps the most recent `capacity` items pushed into it.
//! When a push would exceed the bound, the oldest item is discarded first,
//! so the buffer always holds a contiguous trailing window of what was
//! recorded. It backs the slow-operation ring, where diagnostics only ever
//! care about the tail of recent history.
//!
//! All operations are O(1) except [`latest`](HistoryBuffer::latest) and
//! [`to_vec`](HistoryBuffer::to_vec), which are O(n) in the number of
//! returned items. There is no interior mutability and no `unsafe`; the
//! buffer is `Send`/`Sync` whenever `T` is.

use std::collections::VecDeque;

/// A fixed-capacity buffer retaining the most recently pushed items.
///
/// # Examples
///
/// ```rust
/// use skillet_common::collections::HistoryBuffer;
///
/// let mut history = HistoryBuffer::new(2);
/// history.push("first");
/// history.push("second");
/// history.push("third"); // evicts "first"
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.latest(1), vec![&"third"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryBuffer<T> {
    /// Creates a buffer retaining at most `capacity` items.
    ///
    /// A capacity of zero is clamped to `1` so the buffer always has at
    /// least one slot.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { items: VecDeque::with_capacity(capacity), capacity }
    }

    /// Records an item, evicting the oldest one when the bound is reached.
    pub fn push(&mut self, item: T) {
        if self.items.len() >= self.capacity {
            let _ = self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// Number of items currently retained. Never exceeds the capacity.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The retention bound this buffer was created with.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discards all retained items, keeping the capacity.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates over retained items from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Returns up to `n` of the most recent items, newest first.
    #[must_use]
    pub fn latest(&self, n: usize) -> Vec<&T> {
        self.items.iter().rev().take(n).collect()
    }
}

impl<T: Clone> HistoryBuffer<T> {
    /// Clones the retained items into a `Vec`, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a HistoryBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
