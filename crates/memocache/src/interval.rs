//! Interval keys for range-query caches

use crate::error::{Error, Result};

/// Key relation used by [`LruCache::invalidate_overlapping`](crate::LruCache::invalidate_overlapping)
pub trait ContainsPoint<P: ?Sized> {
    /// True if `point` falls inside this key
    fn contains_point(&self, point: &P) -> bool;
}

/// Closed interval `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval<T> {
    low: T,
    high: T,
}

impl Interval<usize> {
    /// Build an index interval, rejecting `low > high`
    pub fn new(low: usize, high: usize) -> Result<Self> {
        if low > high {
            return Err(Error::InvalidInterval { low, high });
        }
        Ok(Self { low, high })
    }
}

impl<T> Interval<T> {
    /// Build an interval without checking the bounds
    ///
    /// An interval with `low > high` contains no point.
    pub const fn new_unchecked(low: T, high: T) -> Self {
        Self { low, high }
    }

    /// Lower bound
    pub fn low(&self) -> &T {
        &self.low
    }

    /// Upper bound
    pub fn high(&self) -> &T {
        &self.high
    }
}

impl<T: PartialOrd> ContainsPoint<T> for Interval<T> {
    fn contains_point(&self, point: &T) -> bool {
        self.low <= *point && *point <= self.high
    }
}

impl<T: PartialOrd> ContainsPoint<T> for (T, T) {
    fn contains_point(&self, point: &T) -> bool {
        self.0 <= *point && *point <= self.1
    }
}

impl<T> From<Interval<T>> for (T, T) {
    fn from(interval: Interval<T>) -> Self {
        (interval.low, interval.high)
    }
}
