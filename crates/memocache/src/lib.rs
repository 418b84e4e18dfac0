//! # memocache
//!
//! Cache structures for memoizing expensive recomputation.
//!
//! ## Architecture
//! - **RecencyList**: arena-backed doubly-linked list, O(1) splice and move-to-front
//! - **LruCache**: AHash index over the recency list, O(1) get/put/evict, plus
//!   point invalidation for interval-keyed entries
//! - **SplayTree**: self-adjusting BST, amortized O(log n) lookups that favor
//!   recently accessed keys
//! - **memo**: Fibonacci over any [`MemoStore`], values as `BigUint`
//! - **RangeSumCache**: interval-keyed sum cache invalidated by point updates
//!
//! All structures are single-threaded; mutation takes `&mut self`.
//!
//! ```
//! use memocache::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put(1, "a");
//! cache.put(2, "b");
//! assert_eq!(cache.get(&1), Some(&"a"));
//! cache.put(3, "c"); // evicts 2
//! assert_eq!(cache.get(&2), None);
//! # Ok::<(), memocache::Error>(())
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod interval;
mod list;
mod lru;
mod memo;
mod range;
mod splay;
mod stats;

#[cfg(test)]
mod property_tests;

pub use config::{CacheConfig, CAPACITY_ENV, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use interval::{ContainsPoint, Interval};
pub use list::{Iter as ListIter, NodeId, RecencyList};
pub use lru::LruCache;
pub use memo::{fibonacci, MemoStore, MemoTable};
pub use range::RangeSumCache;
pub use splay::{Iter as SplayIter, SplayTree};
pub use stats::CacheStats;
