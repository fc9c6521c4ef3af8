//! Builder for [`BoundedLruCache`].
//!
//! Collects the capacity and any removal handlers, then validates the
//! configuration once at build time.
//!
//! ## Example
//!
//! ```rust
//! use lrukit::builder::LruCacheBuilder;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let evictions = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&evictions);
//!
//! let mut cache = LruCacheBuilder::new(2)
//!     .removal_handler(move |_: &u64, _: &String| {
//!         counter.fetch_add(1, Ordering::Relaxed);
//!     })
//!     .try_build()
//!     .expect("capacity is non-zero");
//!
//! cache.put(1, "one".to_string());
//! cache.put(2, "two".to_string());
//! cache.put(3, "three".to_string());
//! assert_eq!(evictions.load(Ordering::Relaxed), 1);
//! ```

use std::fmt;
use std::hash::Hash;

use crate::error::ConfigError;
use crate::handler::{RemovalHandler, RemovalHandlers};
use crate::lru::BoundedLruCache;

/// Configures a [`BoundedLruCache`] before construction.
pub struct LruCacheBuilder<K, V> {
    capacity: usize,
    handlers: RemovalHandlers<K, V>,
}

impl<K, V> LruCacheBuilder<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            handlers: RemovalHandlers::new(),
        }
    }

    /// Replaces the configured capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Registers a removal handler. Repeated calls keep registration order.
    pub fn removal_handler<H>(mut self, handler: H) -> Self
    where
        H: RemovalHandler<K, V> + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }
}

impl<K, V> LruCacheBuilder<K, V>
where
    K: Eq + Hash,
{
    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the configured capacity is zero. For a non-panicking
    /// alternative, use [`try_build`](Self::try_build).
    pub fn build(self) -> BoundedLruCache<K, V> {
        match self.try_build() {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Builds the cache, returning an error on invalid configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configured capacity is zero.
    pub fn try_build(self) -> Result<BoundedLruCache<K, V>, ConfigError> {
        BoundedLruCache::with_handlers(self.capacity, self.handlers)
    }
}

impl<K, V> fmt::Debug for LruCacheBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheBuilder")
            .field("capacity", &self.capacity)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
