//! # Cache Traits
//!
//! Generic seams over the cache so callers can depend on the operations they
//! need rather than on [`BoundedLruCache`](crate::lru::BoundedLruCache)
//! directly.
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains(&, &K) → bool                 │
//!   │  len / is_empty / capacity / clear      │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │           MutableCache<K, V>            │
//!   │                                         │
//!   │  remove(&K) → Option<V>                 │
//!   │  remove_batch(&[K])                     │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          LruCacheTrait<K, V>            │
//!   │                                         │
//!   │  pop_lru() → (K, V)                     │
//!   │  peek_lru() → (&K, &V)                  │
//!   │  touch(&K) → bool                       │
//!   │  recency_rank(&K) → usize               │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! Only capacity-driven eviction inside `insert` notifies removal handlers;
//! `remove`, `remove_batch`, `pop_lru` and `clear` never do.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::lru::BoundedLruCache;
//! use lrukit::traits::{CoreCache, LruCacheTrait, MutableCache};
//!
//! fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
//!     for (key, value) in data {
//!         cache.insert(*key, value.clone());
//!     }
//! }
//!
//! fn invalidate<C: MutableCache<u64, String>>(cache: &mut C, keys: &[u64]) {
//!     cache.remove_batch(keys);
//! }
//!
//! fn coldest<C: LruCacheTrait<u64, String>>(cache: &C) -> Option<u64> {
//!     cache.peek_lru().map(|(k, _)| *k)
//! }
//!
//! let mut cache = BoundedLruCache::new(8);
//! warm_cache(&mut cache, &[(1, "one".into()), (2, "two".into()), (3, "three".into())]);
//! invalidate(&mut cache, &[2]);
//! assert_eq!(coldest(&cache), Some(1));
//! ```

/// Operations every cache supports.
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// If the cache is full and `key` is new, an entry is evicted first
    /// according to the cache's policy.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a value by key, updating access state.
    ///
    /// Use [`contains`](Self::contains) to check existence without affecting
    /// eviction order.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&mut self);
}

/// Caches that allow removal of arbitrary keys.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes each key in turn, returning the values in input order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Recency-ordered caches.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without removing it.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks a key as most recently used; `false` if absent.
    fn touch(&mut self, key: &K) -> bool;

    /// Position in recency order, 0 being most recently used.
    fn recency_rank(&self, key: &K) -> Option<usize>;
}
