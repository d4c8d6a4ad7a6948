//! Fixed-capacity rolling window.

use std::collections::VecDeque;
use std::ops::Index;

use quant_core::error::IndicatorError;

/// Fixed-capacity FIFO buffer with reverse indexing.
///
/// Index 0 is the most recent item and `count() - 1` the oldest. Once the
/// window is full every push evicts the oldest item. Items are never
/// reordered or de-duplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow<T> {
    /// Oldest at front, newest at back
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create an empty window holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Window capacity must be greater than 0");
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item, returning the evicted oldest item if the window was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// Overwrite the most recent item in place.
    ///
    /// Pushes instead when the window is empty. Returns the replaced item.
    pub fn replace_latest(&mut self, item: T) -> Option<T> {
        match self.items.back_mut() {
            Some(slot) => Some(std::mem::replace(slot, item)),
            None => {
                self.items.push_back(item);
                None
            }
        }
    }

    /// Number of items currently held.
    #[inline]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Check if the window is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if the window holds `capacity` items.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    /// Maximum number of items held.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Item `i` positions back from the most recent.
    pub fn get(&self, i: usize) -> Result<&T, IndicatorError> {
        let count = self.items.len();
        if i >= count {
            return Err(IndicatorError::IndexOutOfRange { index: i, count });
        }
        Ok(&self.items[count - 1 - i])
    }

    /// Most recent item.
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest item still held.
    pub fn oldest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Iterate from most recent to oldest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter().rev()
    }

    /// Iterate from oldest to most recent.
    pub fn iter_chronological(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Remove all items, keeping the capacity.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Index<usize> for RollingWindow<T> {
    type Output = T;

    /// Panics when `i >= count()`; use [`RollingWindow::get`] to handle that case.
    fn index(&self, i: usize) -> &T {
        match self.get(i) {
            Ok(item) => item,
            Err(err) => panic!("{}", err),
        }
    }
}
