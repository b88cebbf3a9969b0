//! A bounded first-in-first-out sample window for rolling statistics.
//!
//! A [`SlidingWindow`] keeps at most `capacity` of the most recent samples.
//! Pushing into a full window evicts the oldest sample and hands it back to
//! the caller, so the window never grows past its capacity. Iteration always
//! walks from the oldest to the newest sample.
//!
//! # Complexity
//! - `push`, `len`, `is_empty`, `is_full`, `oldest` and `newest` are **O(1)**.
//! - `mean` is **O(n)** in the number of stored samples.
//!
//! # Panic Safety
//! - Public methods avoid panicking; there are no `unwrap`/`expect` calls in
//!   the implementation.

use std::collections::VecDeque;
use std::time::Duration;

/// Fixed-capacity FIFO of the most recent samples.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use trackvault_common::collections::SlidingWindow;
///
/// let mut window = SlidingWindow::new(2);
/// window.push(Duration::from_millis(10));
/// window.push(Duration::from_millis(30));
/// let evicted = window.push(Duration::from_millis(50));
///
/// assert_eq!(evicted, Some(Duration::from_millis(10)));
/// assert_eq!(window.mean(), Duration::from_millis(40));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlidingWindow<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingWindow<T> {
    /// Creates an empty window. A capacity of zero is clamped to `1`.
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { samples: VecDeque::with_capacity(capacity), capacity }
    }

    /// Appends a sample, returning the evicted oldest sample when full.
    #[inline]
    pub fn push(&mut self, sample: T) -> Option<T> {
        let evicted = if self.is_full() { self.samples.pop_front() } else { None };
        self.samples.push_back(sample);
        evicted
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    #[must_use]
    pub fn oldest(&self) -> Option<&T> {
        self.samples.front()
    }

    #[inline]
    #[must_use]
    pub fn newest(&self) -> Option<&T> {
        self.samples.back()
    }

    /// Drops every sample, keeping the capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Iterates from the oldest to the newest sample.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }
}

impl<T: Clone> SlidingWindow<T> {
    /// Copies the samples out, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }
}

impl SlidingWindow<Duration> {
    /// Arithmetic mean of the stored durations, `Duration::ZERO` when empty.
    #[must_use]
    pub fn mean(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().sum();
        // capacity is small; the sample count always fits in u32
        let count = u32::try_from(self.samples.len()).unwrap_or(u32::MAX);
        total / count
    }
}

impl<T> Default for SlidingWindow<T> {
    #[inline]
    fn default() -> Self {
        Self::new(1)
    }
}

impl<'a, T> IntoIterator for &'a SlidingWindow<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
