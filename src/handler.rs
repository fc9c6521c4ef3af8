//! Removal handlers: observers of capacity-driven eviction.
//!
//! Handlers are kept in registration order and called synchronously, one after
//! another, with the key and value of the entry that was pushed out of the
//! cache. They are never called for caller-driven removal (`remove`,
//! `pop_lru`, `clear`).
//!
//! ## Failure policy
//!
//! Handlers are infallible; a failing handler panics. There is no isolation:
//! the panic unwinds out of the triggering `put`, and handlers registered after
//! the failing one are skipped for that eviction. The evicted entry is already
//! unlinked from the cache when the first handler runs, so the cache stays
//! consistent across the unwind.
//!
//! ```
//! use lrukit::lru::BoundedLruCache;
//! use std::sync::{Arc, Mutex};
//!
//! let released = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&released);
//!
//! let mut cache = BoundedLruCache::new(1);
//! cache.add_removal_handler(move |key: &String, _value: &u32| {
//!     sink.lock().unwrap().push(key.clone());
//! });
//!
//! cache.put("a".to_string(), 1);
//! cache.put("b".to_string(), 2);
//! assert_eq!(*released.lock().unwrap(), vec!["a".to_string()]);
//! ```

use std::fmt;

/// Callback invoked with the key and value of an evicted entry.
///
/// Implemented for every `FnMut(&K, &V) + Send` closure.
pub trait RemovalHandler<K, V>: Send {
    fn on_removal(&mut self, key: &K, value: &V);
}

impl<K, V, F> RemovalHandler<K, V> for F
where
    F: FnMut(&K, &V) + Send,
{
    #[inline]
    fn on_removal(&mut self, key: &K, value: &V) {
        self(key, value)
    }
}

/// Ordered registry of removal handlers.
pub struct RemovalHandlers<K, V> {
    handlers: Vec<Box<dyn RemovalHandler<K, V>>>,
}

impl<K, V> RemovalHandlers<K, V> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler; it runs after every handler registered before it.
    pub fn push(&mut self, handler: Box<dyn RemovalHandler<K, V>>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Calls every handler in registration order.
    pub fn notify(&mut self, key: &K, value: &V) {
        for handler in &mut self.handlers {
            handler.on_removal(key, value);
        }
    }
}

impl<K, V> Default for RemovalHandlers<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for RemovalHandlers<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemovalHandlers")
            .field("len", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorder(log: &Log, tag: &'static str) -> Box<dyn RemovalHandler<u32, &'static str>> {
        let log = Arc::clone(log);
        Box::new(move |k: &u32, v: &&'static str| {
            log.lock().unwrap().push(format!("{tag}:{k}={v}"));
        })
    }

    #[test]
    fn notify_runs_in_registration_order() {
        let log = Log::default();
        let mut handlers = RemovalHandlers::new();
        handlers.push(recorder(&log, "first"));
        handlers.push(recorder(&log, "second"));
        handlers.push(recorder(&log, "third"));
        assert_eq!(handlers.len(), 3);

        handlers.notify(&7, &"seven");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:7=seven", "second:7=seven", "third:7=seven"]
        );
    }

    #[test]
    fn empty_registry_notify_is_noop() {
        let mut handlers: RemovalHandlers<u32, u32> = RemovalHandlers::default();
        assert!(handlers.is_empty());
        handlers.notify(&1, &1);
    }

    #[test]
    fn stateful_struct_handler() {
        struct Counter(usize);

        impl RemovalHandler<u32, u32> for Counter {
            fn on_removal(&mut self, _key: &u32, _value: &u32) {
                self.0 += 1;
            }
        }

        let mut counter = Counter(0);
        counter.on_removal(&1, &1);
        counter.on_removal(&2, &2);
        assert_eq!(counter.0, 2);
    }

    #[test]
    fn panicking_handler_skips_later_handlers() {
        let log = Log::default();
        let mut handlers = RemovalHandlers::new();
        handlers.push(recorder(&log, "before"));
        handlers.push(Box::new(|_: &u32, _: &&'static str| panic!("release failed")));
        handlers.push(recorder(&log, "after"));

        let result = panic::catch_unwind(AssertUnwindSafe(|| handlers.notify(&1, &"one")));
        assert!(result.is_err());
        assert_eq!(*log.lock().unwrap(), vec!["before:1=one"]);
    }

    #[test]
    fn debug_reports_len_only() {
        let mut handlers: RemovalHandlers<u8, u8> = RemovalHandlers::new();
        handlers.push(Box::new(|_: &u8, _: &u8| {}));
        assert_eq!(format!("{:?}", handlers), "RemovalHandlers { len: 1 }");
    }
}
