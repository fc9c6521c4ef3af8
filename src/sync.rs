//! Shared cache handle for multi-threaded callers.
//!
//! [`BoundedLruCache`] has no internal locking. `SharedLruCache` puts the whole
//! structure behind one `parking_lot::Mutex`, so every operation (including
//! `get`, which reorders) runs under a single exclusive lock and the index and
//! recency list are never observed mid-update.
//!
//! ```text
//!   Thread 1           Thread 2           Thread 3
//!      │ get(k1)          │ put(k2, v)       │ remove(k3)
//!      ▼                  ▼                  ▼
//!   ┌──────────────────────────────────────────────────┐
//!   │      Arc<Mutex<BoundedLruCache<K, V>>>           │
//!   └──────────────────────────────────────────────────┘
//! ```
//!
//! Removal handlers run while the lock is held. A handler must not call back
//! into the same `SharedLruCache`; doing so deadlocks.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ConfigError;
use crate::handler::RemovalHandler;
use crate::lru::BoundedLruCache;

/// Cloneable, thread-safe handle to a [`BoundedLruCache`].
///
/// Reads return owned clones of the value since a guard cannot outlive the
/// call.
pub struct SharedLruCache<K, V> {
    inner: Arc<Mutex<BoundedLruCache<K, V>>>,
}

impl<K, V> Clone for SharedLruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> From<BoundedLruCache<K, V>> for SharedLruCache<K, V> {
    fn from(cache: BoundedLruCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Eq + Hash,
{
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        BoundedLruCache::new(capacity).into()
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        BoundedLruCache::try_new(capacity).map(Self::from)
    }

    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().put(key, value)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn touch(&self, key: &K) -> bool {
        self.inner.lock().touch(key)
    }

    pub fn pop_lru(&self) -> Option<(K, V)> {
        self.inner.lock().pop_lru()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn add_removal_handler<H>(&self, handler: H)
    where
        H: RemovalHandler<K, V> + 'static,
    {
        self.inner.lock().add_removal_handler(handler);
    }

    /// Runs `f` with exclusive access to the underlying cache.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut BoundedLruCache<K, V>) -> R) -> R {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Keys from most to least recently used, as of one point in time.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.inner.lock().keys_by_recency().cloned().collect()
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Returns a clone of the value and marks the entry most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Returns a clone of the value without changing recency.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }
}

impl<K, V> fmt::Debug for SharedLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(cache) => f.debug_tuple("SharedLruCache").field(&*cache).finish(),
            None => f.write_str("SharedLruCache(<locked>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn shared_cache_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedLruCache<String, Vec<u8>>>();
    }

    #[test]
    fn clones_share_state() {
        let a = SharedLruCache::new(2);
        let b = a.clone();
        a.put(1, "one".to_string());
        assert_eq!(b.get(&1), Some("one".to_string()));
        b.put(2, "two".to_string());
        b.put(3, "three".to_string());
        assert!(!a.contains(&1));
        assert_eq!(a.keys_by_recency(), vec![3, 2]);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(SharedLruCache::<u8, u8>::try_new(0).is_err());
    }

    #[test]
    fn concurrent_puts_respect_capacity() {
        let cache = SharedLruCache::new(16);
        let evicted = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&evicted);
        cache.add_removal_handler(move |_: &u64, _: &u64| *sink.lock() += 1);

        let workers: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..250u64 {
                        cache.put(t * 1_000 + i, i);
                        let _ = cache.get(&(t * 1_000 + i / 2));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(cache.len(), 16);
        assert_eq!(*evicted.lock(), 1_000 - 16);
        cache.with_cache(|c| c.check_invariants()).unwrap();
    }

    #[test]
    fn debug_reports_locked_state() {
        let cache: SharedLruCache<u8, u8> = SharedLruCache::new(1);
        assert!(format!("{:?}", cache).contains("capacity: 1"));
        cache.with_cache(|_| {
            assert_eq!(format!("{:?}", cache), "SharedLruCache(<locked>)");
        });
    }
}
