pub use crate::builder::LruCacheBuilder;
pub use crate::error::{ConfigError, InvariantError};
pub use crate::handler::RemovalHandler;
pub use crate::lru::{BoundedLruCache, Entry};
#[cfg(feature = "concurrency")]
pub use crate::sync::SharedLruCache;
pub use crate::traits::{CoreCache, LruCacheTrait, MutableCache};
