//! # Bounded LRU Cache
//!
//! A fixed-capacity key-value cache that evicts the least recently used entry
//! when a new key would overflow it, and reports each eviction to the
//! registered [removal handlers](crate::handler).
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                       BoundedLruCache<K, V>                          │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  HashTable<SlotId>  (index, Fx-hashed)                       │   │
//!   │   │                                                              │   │
//!   │   │   hash("a") ─────────────────┐                               │   │
//!   │   │   hash("b") ───────────┐     │                               │   │
//!   │   │   hash("c") ─────┐     │     │                               │   │
//!   │   └──────────────────┼─────┼─────┼───────────────────────────────┘   │
//!   │                      ▼     ▼     ▼                                   │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  IntrusiveList<Entry<K, V>>  (recency sequence)              │   │
//!   │   │                                                              │   │
//!   │   │  head ──► [c] ◄──► [b] ◄──► [a] ◄── tail                     │   │
//!   │   │   (MRU)                      (LRU, next eviction)            │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  RemovalHandlers<K, V>  [h1, h2, ...]  (registration order)  │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keys live only in the list entries, next to their cached hash. Lookups
//! probe the table by hash and confirm by comparing the key in the slot, so
//! `K` needs `Eq + Hash` and is never cloned.
//!
//! ## Operations
//!
//! | Method                  | Complexity | Recency      | Handlers          |
//! |-------------------------|------------|--------------|-------------------|
//! | `get(&k)`               | O(1)       | promotes     | -                 |
//! | `put(k, v)` (existing)  | O(1)       | promotes     | -                 |
//! | `put(k, v)` (new, full) | O(1)       | new head     | fired for tail    |
//! | `remove(&k)`            | O(1)       | -            | never             |
//! | `pop_lru()`             | O(1)       | -            | never             |
//! | `peek(&k)`, `contains`  | O(1)       | unchanged    | -                 |
//! | `touch(&k)`             | O(1)       | promotes     | -                 |
//! | `recency_rank(&k)`      | O(n)       | unchanged    | -                 |
//! | `keys`, `values`        | O(n)       | unchanged    | -                 |
//! | `clear()`               | O(n)       | -            | never             |
//!
//! ## Example
//!
//! ```
//! use lrukit::lru::BoundedLruCache;
//!
//! let mut cache = BoundedLruCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! assert_eq!(cache.get(&"a"), Some(&1));
//!
//! // "b" is now least recently used
//! cache.put("c", 3);
//! assert!(!cache.contains(&"b"));
//! assert_eq!(cache.keys_by_recency().collect::<Vec<_>>(), vec![&"c", &"a"]);
//! ```
//!
//! ## Thread Safety
//!
//! `BoundedLruCache` has no internal locking; every mutation takes `&mut self`.
//! Share it across threads behind one lock, e.g. `SharedLruCache` with the
//! `concurrency` feature.

use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::mem;

use hashbrown::HashTable;
use rustc_hash::FxBuildHasher;
use tracing::{debug, trace};

use crate::builder::LruCacheBuilder;
use crate::ds::{IntrusiveList, SlotId};
use crate::error::{ConfigError, InvariantError};
use crate::handler::{RemovalHandler, RemovalHandlers};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// A cache slot: the key and its current value.
///
/// Entries compare and hash by key only; the value takes no part in identity.
pub struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<K: PartialEq, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Entry<K, V> {}

impl<K: Hash, V> Hash for Entry<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

/// Fixed-capacity LRU cache with eviction observers.
///
/// Each key is stored once, inside its entry in the recency list. The index
/// holds only `SlotId`s and resolves lookups by comparing against the key in
/// the slot, so keys need `Eq + Hash` and nothing else. Both structures always
/// describe the same set of entries, and never more than `capacity` of them.
pub struct BoundedLruCache<K, V> {
    index: HashTable<SlotId>,
    hasher: FxBuildHasher,
    list: IntrusiveList<Entry<K, V>>,
    handlers: RemovalHandlers<K, V>,
    capacity: usize,
}

impl<K, V> BoundedLruCache<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates an empty cache, rejecting a zero capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::lru::BoundedLruCache;
    ///
    /// assert!(BoundedLruCache::<u32, u32>::try_new(8).is_ok());
    /// assert!(BoundedLruCache::<u32, u32>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("cache capacity must be greater than zero"));
        }
        debug!(capacity, "creating bounded lru cache");
        Ok(Self {
            index: HashTable::with_capacity(capacity),
            hasher: FxBuildHasher,
            list: IntrusiveList::with_capacity(capacity),
            handlers: RemovalHandlers::new(),
            capacity,
        })
    }

    /// Returns a builder that can register removal handlers up front.
    pub fn builder(capacity: usize) -> LruCacheBuilder<K, V> {
        LruCacheBuilder::new(capacity)
    }

    pub(crate) fn with_handlers(
        capacity: usize,
        handlers: RemovalHandlers<K, V>,
    ) -> Result<Self, ConfigError> {
        let mut cache = Self::try_new(capacity)?;
        cache.handlers = handlers;
        Ok(cache)
    }

    /// Returns `true` if `key` is cached. Does not affect recency.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Number of live entries; never exceeds [`capacity`](Self::capacity).
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the value for `key` and marks the entry most recently used.
    ///
    /// An absent key yields `None` and leaves the cache untouched. A cached
    /// value that merely looks empty (`None`, `""`, ...) is still `Some`.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = self.find(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(Entry::value)
    }

    /// Like [`get`](Self::get), with mutable access to the value.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        self.list.move_to_front(id);
        self.list.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Returns the value for `key` without changing recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = self.find(key)?;
        self.list.get(id).map(Entry::value)
    }

    /// Inserts or updates `key`, making it the most recently used entry.
    ///
    /// Updating an existing key replaces its value in place and returns the
    /// previous one; the size is unchanged and nothing is evicted. The key
    /// already stored is kept and the one passed in is dropped.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry and calls every removal handler with it, in registration order.
    /// At most one entry is evicted per call.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::lru::BoundedLruCache;
    ///
    /// let mut cache = BoundedLruCache::new(4);
    /// assert_eq!(cache.put(1, "first"), None);
    /// assert_eq!(cache.put(1, "second"), Some("first"));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hasher.hash_one(&key);

        if let Some(id) = self.find_hashed(hash, &key) {
            let previous = self
                .list
                .get_mut(id)
                .map(|entry| mem::replace(&mut entry.value, value));
            self.list.move_to_front(id);
            return previous;
        }

        let id = self.list.push_front(Entry { key, value, hash });
        let list = &self.list;
        self.index
            .insert_unique(hash, id, |&slot| list.get(slot).map_or(0, |e| e.hash));

        if self.list.len() > self.capacity {
            self.evict_lru();
        }
        None
    }

    /// Deletes `key` and returns its value. Removal handlers are not called.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let hash = self.hasher.hash_one(key);
        let list = &self.list;
        let (id, _) = self
            .index
            .find_entry(hash, |&slot| list.get(slot).is_some_and(|e| e.key == *key))
            .ok()?
            .remove();
        self.list.remove(id).map(|entry| entry.value)
    }

    /// Registers a handler for capacity-driven evictions.
    ///
    /// Handlers run synchronously after any handler registered before them.
    /// There is no way to deregister a handler.
    pub fn add_removal_handler<H>(&mut self, handler: H)
    where
        H: RemovalHandler<K, V> + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Marks `key` most recently used without reading it.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.find(key) {
            Some(id) => self.list.move_to_front(id),
            None => false,
        }
    }

    /// Returns the next eviction candidate.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Removes the least recently used entry. Removal handlers are not called.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        self.unlink_lru().map(|entry| (entry.key, entry.value))
    }

    /// Position of `key` in recency order, 0 being most recently used.
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        let target = self.find(key)?;
        self.list.iter_ids().position(|id| id == target)
    }

    /// Drops every entry without calling removal handlers.
    pub fn clear(&mut self) {
        let dropped = self.len();
        self.index.clear();
        self.list.clear();
        debug!(dropped, "cleared bounded lru cache");
    }

    /// `(key, entry)` pairs in unspecified order. Does not affect recency.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &Entry<K, V>)> {
        self.index
            .iter()
            .filter_map(|&id| self.list.get(id))
            .map(|entry| (&entry.key, entry))
    }

    /// `(key, value)` pairs with mutable values, in unspecified order.
    /// Does not affect recency.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.list
            .values_mut()
            .map(|entry| (&entry.key, &mut entry.value))
    }

    /// Keys in unspecified order. Does not affect recency.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries().map(|(key, _)| key)
    }

    /// Values in unspecified order. Does not affect recency.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries().map(|(_, entry)| &entry.value)
    }

    /// Keys from most to least recently used.
    ///
    /// Introspection helper for verifying ordering; callers should not build
    /// behavior on it.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(Entry::key)
    }

    /// Verifies that the index and the recency list describe the same
    /// entries and that the capacity bound holds. O(n).
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_links()?;

        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index holds {} slots but list holds {}",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        for &id in self.index.iter() {
            let entry = self.list.get(id).ok_or_else(|| {
                InvariantError::new(format!("index points at free slot {:?}", id))
            })?;
            if entry.hash != self.hasher.hash_one(&entry.key) {
                return Err(InvariantError::new(format!(
                    "slot {:?} carries a stale hash",
                    id
                )));
            }
            if self.find_hashed(entry.hash, &entry.key) != Some(id) {
                return Err(InvariantError::new(format!(
                    "key in slot {:?} resolves to a different slot",
                    id
                )));
            }
        }
        Ok(())
    }

    /// Validates internal invariants. Available in debug/test builds.
    ///
    /// Panics if any invariant is violated. Not called by the cache itself.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(e) = self.check_invariants() {
            panic!("lru invariant violated: {}", e);
        }
    }

    #[inline]
    fn find(&self, key: &K) -> Option<SlotId> {
        self.find_hashed(self.hasher.hash_one(key), key)
    }

    fn find_hashed(&self, hash: u64, key: &K) -> Option<SlotId> {
        self.index
            .find(hash, |&id| self.list.get(id).is_some_and(|e| e.key == *key))
            .copied()
    }

    /// Unlinks the tail from both the list and the index.
    fn unlink_lru(&mut self) -> Option<Entry<K, V>> {
        let (id, entry) = self.list.pop_back()?;
        if let Ok(slot) = self.index.find_entry(entry.hash, |&other| other == id) {
            slot.remove();
        }
        Some(entry)
    }

    fn evict_lru(&mut self) {
        let Some(entry) = self.unlink_lru() else {
            return;
        };

        trace!(
            capacity = self.capacity,
            handlers = self.handlers.len(),
            "evicting least recently used entry"
        );
        self.handlers.notify(&entry.key, &entry.value);
    }
}

impl<K, V> fmt::Debug for BoundedLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedLruCache")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for BoundedLruCache<K, V>
where
    K: Eq + Hash,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> CoreCache<K, V> for BoundedLruCache<K, V>
where
    K: Eq + Hash,
{
    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.put(key, value)
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        BoundedLruCache::get(self, key)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        BoundedLruCache::contains(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        BoundedLruCache::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        BoundedLruCache::clear(self)
    }
}

impl<K, V> MutableCache<K, V> for BoundedLruCache<K, V>
where
    K: Eq + Hash,
{
    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        BoundedLruCache::remove(self, key)
    }
}

impl<K, V> LruCacheTrait<K, V> for BoundedLruCache<K, V>
where
    K: Eq + Hash,
{
    #[inline]
    fn pop_lru(&mut self) -> Option<(K, V)> {
        BoundedLruCache::pop_lru(self)
    }

    #[inline]
    fn peek_lru(&self) -> Option<(&K, &V)> {
        BoundedLruCache::peek_lru(self)
    }

    #[inline]
    fn touch(&mut self, key: &K) -> bool {
        BoundedLruCache::touch(self, key)
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        BoundedLruCache::recency_rank(self, key)
    }
}
