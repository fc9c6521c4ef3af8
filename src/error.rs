//! Error types for lrukit.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: returned by fallible constructors when the cache
//!   configuration is invalid (zero capacity).
//! - [`InvariantError`]: returned by `check_invariants` when the index and
//!   the recency list disagree.
//!
//! A missing key is not an error: lookups return `Option::None`.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::error::ConfigError;
//! use lrukit::lru::BoundedLruCache;
//!
//! let cache: Result<BoundedLruCache<String, i32>, ConfigError> = BoundedLruCache::try_new(16);
//! assert!(cache.is_ok());
//!
//! let bad = BoundedLruCache::<String, i32>::try_new(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`BoundedLruCache::try_new`](crate::lru::BoundedLruCache::try_new)
/// and [`LruCacheBuilder::try_build`](crate::builder::LruCacheBuilder::try_build).
///
/// # Example
///
/// ```
/// use lrukit::lru::BoundedLruCache;
///
/// let err = BoundedLruCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when the index and the recency list are out of sync.
///
/// Carries a human-readable description of the failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("cache capacity must be greater than zero");
        assert_eq!(err.to_string(), "cache capacity must be greater than zero");
        assert_eq!(err.message(), "cache capacity must be greater than zero");
    }

    #[test]
    fn invariant_debug_includes_message() {
        let err = InvariantError::new("index holds 3 keys but list holds 2");
        assert!(format!("{:?}", err).contains("list holds 2"));
    }

    #[test]
    fn errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<ConfigError>();
        assert_error::<InvariantError>();
    }

    #[test]
    fn errors_box_into_dyn_error() {
        let boxed: Box<dyn std::error::Error> = Box::new(ConfigError::new("bad"));
        assert_eq!(boxed.to_string(), "bad");
    }
}
