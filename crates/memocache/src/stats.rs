//! Cache statistics tracking
//!
//! Counters sit in `Cell`s so read paths that only hold `&self` can still
//! count. Like the caches themselves, they are not meant to be shared across
//! threads.

use std::cell::Cell;

/// Counters for LRU cache activity
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    hits: Cell<u64>,
    misses: Cell<u64>,
    evictions: Cell<u64>,
    inserts: Cell<u64>,
    invalidations: Cell<u64>,
}

fn bump(counter: &Cell<u64>, by: u64) {
    counter.set(counter.get().saturating_add(by));
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit
    pub fn record_hit(&self) {
        bump(&self.hits, 1);
    }

    /// Record a cache miss
    pub fn record_miss(&self) {
        bump(&self.misses, 1);
    }

    /// Record a capacity eviction
    pub fn record_eviction(&self) {
        bump(&self.evictions, 1);
    }

    /// Record an insert of a new key
    pub fn record_insert(&self) {
        bump(&self.inserts, 1);
    }

    /// Record entries dropped by an invalidation pass
    pub fn record_invalidations(&self, count: u64) {
        bump(&self.invalidations, count);
    }

    /// Get total hits
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    /// Get total misses
    pub fn misses(&self) -> u64 {
        self.misses.get()
    }

    /// Get total evictions
    pub fn evictions(&self) -> u64 {
        self.evictions.get()
    }

    /// Get total inserts
    pub fn inserts(&self) -> u64 {
        self.inserts.get()
    }

    /// Get total invalidated entries
    pub fn invalidations(&self) -> u64 {
        self.invalidations.get()
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Reset all statistics
    pub fn reset(&self) {
        self.hits.set(0);
        self.misses.set(0);
        self.evictions.set(0);
        self.inserts.set(0);
        self.invalidations.set(0);
    }
}
