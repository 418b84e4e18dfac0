//! Memoized Fibonacci over interchangeable stores
//!
//! The same recurrence runs against a plain hash table, a [`SplayTree`] or an
//! [`LruCache`], which is what makes their access costs comparable.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use num_bigint::BigUint;

use crate::lru::LruCache;
use crate::splay::SplayTree;

/// Store consulted by a memoized recursion
pub trait MemoStore<K, V> {
    /// Fetch a previously stored result
    fn lookup(&mut self, key: &K) -> Option<V>;

    /// Record a computed result
    fn store(&mut self, key: K, value: V);
}

/// Unbounded memo table
pub type MemoTable<K, V> = HashMap<K, V, RandomState>;

impl<K, V, S> MemoStore<K, V> for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Clone,
    S: BuildHasher,
{
    fn lookup(&mut self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn store(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

impl<K: Ord, V: Clone> MemoStore<K, V> for SplayTree<K, V> {
    fn lookup(&mut self, key: &K) -> Option<V> {
        self.find(key).cloned()
    }

    fn store(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

impl<K, V, S> MemoStore<K, V> for LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn lookup(&mut self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn store(&mut self, key: K, value: V) {
        self.put(key, value);
    }
}

/// Compute the `n`th Fibonacci number, memoizing in `memo`
///
/// `fib(0) = 0` and `fib(1) = 1` are answered without touching the store.
///
/// On a cold store the recursion goes `n - 1` frames deep before the first
/// result is stored. Cold calls with `n` up to 2_000 fit comfortably in a
/// 2 MiB thread stack (the default for spawned threads and tests), even in
/// debug builds. Larger `n` needs a warmed store, e.g. evaluating increasing
/// `n` in steps of at most 2_000, or a thread with a bigger stack.
pub fn fibonacci<M>(n: u64, memo: &mut M) -> BigUint
where
    M: MemoStore<u64, BigUint> + ?Sized,
{
    if n < 2 {
        return BigUint::from(n);
    }
    if let Some(cached) = memo.lookup(&n) {
        return cached;
    }

    let result = fibonacci(n - 1, memo) + fibonacci(n - 2, memo);
    memo.store(n, result.clone());
    result
}
