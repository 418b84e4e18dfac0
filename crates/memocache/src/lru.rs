//! LRU (Least Recently Used) cache implementation
//!
//! A hash index maps each key to its node in a [`RecencyList`], so lookups,
//! promotions and evictions are all O(1). Interval-keyed caches can also drop
//! every entry covering a point with [`LruCache::invalidate_overlapping`],
//! which scans the whole index and is therefore O(n).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::interval::ContainsPoint;
use crate::list::{NodeId, RecencyList};
use crate::stats::CacheStats;

/// LRU cache with fixed capacity
pub struct LruCache<K, V, S = RandomState> {
    map: HashMap<K, NodeId, S>,
    list: RecencyList<K, V>,
    capacity: usize,
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// Fails with [`Error::ZeroCapacity`] when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_hasher(capacity, RandomState::new())
    }

    /// Create a cache sized by `config`
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity)
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Create a new LRU cache using `hasher` for the index
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(capacity, hasher),
            list: RecencyList::with_capacity(capacity),
            capacity,
            stats: CacheStats::new(),
        })
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&id) = self.map.get(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.list.move_to_front(id);
        self.list.get(id).map(|(_, value)| value)
    }

    /// Get a value without touching its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.map.get(key)?;
        self.list.get(id).map(|(_, value)| value)
    }

    /// Check if a key is cached, without touching its recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Insert a key-value pair into the cache
    ///
    /// An existing key has its value overwritten and is promoted to the
    /// front. A new key evicts the least recently used entry first when the
    /// cache is full; the evicted entry is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&id) = self.map.get(&key) {
            // Update existing
            if let Some(slot) = self.list.get_mut(id) {
                *slot = value;
            }
            self.list.move_to_front(id);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let id = self.list.push_front(key.clone(), value);
        self.map.insert(key, id);
        self.stats.record_insert();
        evicted
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.map.remove(key)?;
        self.list.remove(id).map(|(_, value)| value)
    }

    /// Keep only the entries for which `keep` returns true
    ///
    /// Returns the number of entries removed. Scans the whole index.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let doomed: Vec<NodeId> = self
            .map
            .values()
            .filter_map(|&id| {
                let (key, value) = self.list.get(id)?;
                (!keep(key, value)).then_some(id)
            })
            .collect();

        for &id in &doomed {
            if let Some((key, _)) = self.list.remove(id) {
                self.map.remove(&key);
            }
        }
        doomed.len()
    }

    /// Drop every entry whose key interval contains `point`
    ///
    /// Entries not covering `point` keep their values and relative recency.
    /// Returns the number of entries removed.
    pub fn invalidate_overlapping<P>(&mut self, point: &P) -> usize
    where
        K: ContainsPoint<P>,
        P: ?Sized,
    {
        let removed = self.retain(|key, _| !key.contains_point(point));
        self.stats.record_invalidations(removed as u64);
        debug!(removed, remaining = self.map.len(), "invalidated overlapping entries");
        removed
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate entries from most to least recently used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.list.iter()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Clear the cache and its statistics
    pub fn clear(&mut self) {
        let dropped = self.map.len();
        self.map.clear();
        self.list.clear();
        self.stats.reset();
        debug!(dropped, "cleared cache");
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.remove_last()?;
        self.map.remove(&key);
        self.stats.record_eviction();
        debug!(capacity = self.capacity, "evicted least recently used entry");
        Some((key, value))
    }

    /// Check that the index and the recency list describe the same entries
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        self.list.check_invariants()?;
        if self.map.len() != self.list.len() {
            return Err(format!(
                "index has {} keys, list has {} nodes",
                self.map.len(),
                self.list.len()
            ));
        }
        if self.list.len() > self.capacity {
            return Err(format!(
                "{} entries exceed capacity {}",
                self.list.len(),
                self.capacity
            ));
        }
        for (key, _) in self.list.iter() {
            let id = self.map.get(key).ok_or("list key missing from index")?;
            match self.list.get(*id) {
                Some((node_key, _)) if node_key == key => {}
                _ => return Err("index points at the wrong node".to_string()),
            }
        }
        Ok(())
    }
}
