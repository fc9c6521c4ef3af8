//! lrukit: a bounded LRU cache with eviction observers.
//!
//! The cache couples an Fx-hashed `HashTable` index with an arena-backed intrusive
//! recency list, giving O(1) lookup, update and promotion. Capacity-driven
//! evictions are reported to registered removal handlers; caller-driven
//! removals are not.
//!
//! ```
//! use lrukit::prelude::*;
//!
//! let mut cache = BoundedLruCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");
//! cache.put("c", 3);
//! assert!(!cache.contains(&"b"));
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod handler;
pub mod lru;

#[cfg(feature = "concurrency")]
pub mod sync;

pub mod prelude;
pub mod traits;
