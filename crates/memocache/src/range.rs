//! Range-sum queries over a mutable array, memoized per interval
//!
//! Each answered `[low, high]` sum is cached under its interval. Writing an
//! element invalidates exactly the cached sums whose interval covers it.

use tracing::debug;

use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::lru::LruCache;

/// Array with an LRU cache of interval sums
pub struct RangeSumCache {
    values: Vec<i64>,
    cache: LruCache<Interval<usize>, i64>,
}

impl RangeSumCache {
    /// Wrap `values` with a sum cache holding at most `capacity` intervals
    pub fn new(values: Vec<i64>, capacity: usize) -> Result<Self> {
        Ok(Self {
            values,
            cache: LruCache::new(capacity)?,
        })
    }

    /// Sum of `values[low..=high]`, served from the cache when possible
    pub fn range_sum(&mut self, low: usize, high: usize) -> Result<i64> {
        let interval = self.check_bounds(low, high)?;
        if let Some(&sum) = self.cache.get(&interval) {
            return Ok(sum);
        }

        let sum = self.sum_slice(low, high)?;
        self.cache.put(interval, sum);
        Ok(sum)
    }

    /// Sum of `values[low..=high]` computed directly, ignoring the cache
    pub fn range_sum_uncached(&self, low: usize, high: usize) -> Result<i64> {
        self.check_bounds(low, high)?;
        self.sum_slice(low, high)
    }

    /// Overwrite one element and drop every cached sum that covers it
    ///
    /// Returns the number of invalidated sums.
    pub fn update(&mut self, index: usize, value: i64) -> Result<usize> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        *slot = value;

        let removed = self.cache.invalidate_overlapping(&index);
        debug!(index, removed, "element updated");
        Ok(removed)
    }

    /// Current array contents
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Underlying interval cache
    pub fn cache(&self) -> &LruCache<Interval<usize>, i64> {
        &self.cache
    }

    fn sum_slice(&self, low: usize, high: usize) -> Result<i64> {
        self.values[low..=high]
            .iter()
            .try_fold(0i64, |acc, &v| acc.checked_add(v))
            .ok_or(Error::Overflow { low, high })
    }

    fn check_bounds(&self, low: usize, high: usize) -> Result<Interval<usize>> {
        let interval = Interval::new(low, high)?;
        if high >= self.values.len() {
            return Err(Error::IndexOutOfBounds {
                index: high,
                len: self.values.len(),
            });
        }
        Ok(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RangeSumCache {
        RangeSumCache::new(vec![1, 2, 3, 4, 5, 6, 7, 8], 16).unwrap()
    }

    #[test]
    fn test_range_sum_hits_cache() {
        let mut rs = sample();

        assert_eq!(rs.range_sum(0, 3).unwrap(), 10);
        assert_eq!(rs.range_sum(0, 3).unwrap(), 10);

        assert_eq!(rs.cache().stats().misses(), 1);
        assert_eq!(rs.cache().stats().hits(), 1);
    }

    #[test]
    fn test_update_invalidates_covering_sums() {
        let mut rs = sample();
        rs.range_sum(0, 3).unwrap();
        rs.range_sum(2, 5).unwrap();
        rs.range_sum(6, 7).unwrap();

        let removed = rs.update(3, 100).unwrap();

        assert_eq!(removed, 2);
        assert_eq!(rs.cache().len(), 1);
        assert_eq!(rs.range_sum(0, 3).unwrap(), 106);
        assert_eq!(rs.range_sum(2, 5).unwrap(), 114);
        assert_eq!(rs.range_sum(6, 7).unwrap(), 15);
    }

    #[test]
    fn test_bad_ranges() {
        let mut rs = sample();

        assert_eq!(
            rs.range_sum(5, 2),
            Err(Error::InvalidInterval { low: 5, high: 2 })
        );
        assert_eq!(
            rs.range_sum(0, 8),
            Err(Error::IndexOutOfBounds { index: 8, len: 8 })
        );
        assert_eq!(
            rs.update(8, 1),
            Err(Error::IndexOutOfBounds { index: 8, len: 8 })
        );
        assert!(rs.cache().is_empty());
    }

    #[test]
    fn test_overflowing_sum_is_an_error() {
        let mut rs = RangeSumCache::new(vec![i64::MAX, 1, -1], 4).unwrap();

        assert_eq!(rs.range_sum(0, 1), Err(Error::Overflow { low: 0, high: 1 }));
        assert_eq!(
            rs.range_sum_uncached(0, 1),
            Err(Error::Overflow { low: 0, high: 1 })
        );
        assert!(rs.cache().is_empty());

        // Intermediate overflow counts even if the total would fit
        assert_eq!(rs.range_sum(0, 2), Err(Error::Overflow { low: 0, high: 2 }));
        assert_eq!(rs.range_sum(1, 2).unwrap(), 0);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            RangeSumCache::new(vec![1, 2], 0),
            Err(Error::ZeroCapacity)
        ));
    }

    #[test]
    fn test_matches_uncached_baseline() {
        let mut rs = sample();
        rs.range_sum(1, 6).unwrap();
        rs.update(4, -20).unwrap();

        assert_eq!(
            rs.range_sum(1, 6).unwrap(),
            rs.range_sum_uncached(1, 6).unwrap()
        );
        assert_eq!(rs.values()[4], -20);
    }
}
