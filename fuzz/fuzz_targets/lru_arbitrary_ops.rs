#![no_main]

use std::sync::{Arc, Mutex};

use libfuzzer_sys::fuzz_target;
use lrukit::lru::BoundedLruCache;

// Fuzz arbitrary operation sequences on BoundedLruCache
//
// First byte picks the capacity; the rest are (op, key) pairs covering put,
// get, peek, remove, touch, pop_lru and clear. Handler calls are checked
// against the tail observed just before each overflowing put.
fuzz_target!(|data: &[u8]| {
    let Some((&cap, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap % 16) + 1;

    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&evicted);
    let mut cache: BoundedLruCache<u8, u16> = BoundedLruCache::new(capacity);
    cache.add_removal_handler(move |k: &u8, v: &u16| sink.lock().unwrap().push((*k, *v)));

    for (step, pair) in ops.chunks_exact(2).enumerate() {
        let op = pair[0] % 7;
        let key = pair[1] % 32;
        let value = step as u16;

        match op {
            0 => {
                // put
                let was_present = cache.contains(&key);
                let full = cache.len() == capacity;
                let expected_victim = cache.peek_lru().map(|(k, v)| (*k, *v));
                let before = evicted.lock().unwrap().len();

                cache.put(key, value);

                assert_eq!(cache.keys_by_recency().next(), Some(&key));
                assert_eq!(cache.peek(&key), Some(&value));
                if !was_present && full {
                    assert_eq!(evicted.lock().unwrap().len(), before + 1);
                    assert_eq!(evicted.lock().unwrap().last().copied(), expected_victim);
                } else {
                    assert_eq!(evicted.lock().unwrap().len(), before);
                }
            }
            1 => {
                // get
                if cache.get(&key).is_some() {
                    assert_eq!(cache.recency_rank(&key), Some(0));
                }
            }
            2 => {
                // peek leaves order alone
                let order: Vec<u8> = cache.keys_by_recency().copied().collect();
                let _ = cache.peek(&key);
                assert!(cache.keys_by_recency().copied().eq(order));
            }
            3 => {
                // remove
                let before = evicted.lock().unwrap().len();
                let was_present = cache.contains(&key);
                assert_eq!(cache.remove(&key).is_some(), was_present);
                assert!(!cache.contains(&key));
                assert_eq!(evicted.lock().unwrap().len(), before);
            }
            4 => {
                // touch
                if cache.touch(&key) {
                    assert_eq!(cache.recency_rank(&key), Some(0));
                }
            }
            5 => {
                // pop_lru
                let before = evicted.lock().unwrap().len();
                let expected = cache.peek_lru().map(|(k, v)| (*k, *v));
                assert_eq!(cache.pop_lru(), expected);
                assert_eq!(evicted.lock().unwrap().len(), before);
            }
            6 => {
                // clear
                if pair[1] % 8 == 0 {
                    cache.clear();
                    assert!(cache.is_empty());
                }
            }
            _ => unreachable!(),
        }

        assert!(cache.len() <= capacity);
        assert!(cache.check_invariants().is_ok());
    }
});
