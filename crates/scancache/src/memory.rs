//! In-memory cache with optional LRU capacity

use crate::{Cache, CachedValue, LoadError, Loader};
use moka::policy::EvictionPolicy;
use moka::sync::Cache as MokaCache;
use std::sync::Arc;

/// Thread-safe in-memory [`Cache`] backed by `moka`.
///
/// With a capacity of `0` the cache is unbounded (the default for a scan).
/// With a positive capacity the least recently used entry is evicted once
/// the cache is over capacity. `moka` applies evictions in batches, so the
/// eviction order is only deterministic at [`MemoryCache::run_pending_tasks`]
/// boundaries. `len` and `contains` run pending tasks first.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    capacity: usize,
    inner: MokaCache<String, CachedValue>,
}

impl MemoryCache {
    /// Create a cache holding at most `capacity` entries (`0` = unbounded).
    pub fn new(capacity: usize) -> Self {
        let inner = if capacity == 0 {
            MokaCache::builder().build()
        } else {
            MokaCache::builder()
                .max_capacity(u64::try_from(capacity).unwrap_or(u64::MAX))
                .eviction_policy(EvictionPolicy::lru())
                .build()
        };
        Self { capacity, inner }
    }

    /// Create a cache with no capacity limit.
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Configured capacity, `0` meaning unbounded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a key is present, without counting as a use.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.run_pending_tasks();
        self.inner.contains_key(key)
    }

    /// Apply buffered reads, writes and evictions.
    pub fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks();
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<CachedValue> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: CachedValue) -> bool {
        let replaced = self.inner.contains_key(key);
        self.inner.insert(key.to_string(), value);
        replaced
    }

    fn get_or_try_insert(&self, key: &str, load: Loader<'_>) -> Result<CachedValue, LoadError> {
        self.inner
            .try_get_with(key.to_string(), load)
            .map_err(Arc::unwrap_or_clone)
    }

    fn len(&self) -> usize {
        self.inner.run_pending_tasks();
        usize::try_from(self.inner.entry_count()).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheExt;
    use std::thread;

    #[test]
    fn test_get_miss_returns_none() {
        let cache = MemoryCache::unbounded();
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_put_reports_replacement() {
        let cache = MemoryCache::unbounded();
        assert!(!cache.put_value("k", 1_u8));
        assert!(cache.put_value("k", 2_u8));
        assert_eq!(*cache.get_as::<u8>("k").unwrap(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unbounded_keeps_everything() {
        let cache = MemoryCache::unbounded();
        for i in 0..500 {
            cache.put_value(&format!("key_{i}"), i);
        }
        assert_eq!(cache.len(), 500);
        assert!(cache.contains("key_0"));
    }

    #[test]
    fn test_bounded_evicts_least_recently_used() {
        let cache = MemoryCache::new(2);
        cache.put_value("a", 1);
        cache.put_value("b", 2);
        cache.run_pending_tasks();

        // Using "a" makes "b" the eviction candidate
        assert!(cache.get("a").is_some());
        cache.run_pending_tasks();
        cache.put_value("c", 3);

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_bounded_replace_does_not_evict() {
        let cache = MemoryCache::new(2);
        cache.put_value("a", 1);
        cache.put_value("b", 2);
        cache.run_pending_tasks();
        assert!(cache.put_value("a", 10));

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("b"));
        assert_eq!(*cache.get_as::<i32>("a").unwrap(), 10);
    }

    #[test]
    fn test_eviction_order_is_deterministic() {
        let run = || {
            let cache = MemoryCache::new(3);
            for key in ["a", "b", "c"] {
                cache.put_value(key, 0);
                cache.run_pending_tasks();
            }
            cache.get("b");
            cache.get("a");
            cache.run_pending_tasks();
            cache.put_value("d", 0);
            cache.run_pending_tasks();
            cache.put_value("e", 0);
            cache.run_pending_tasks();
            ["a", "b", "c", "d", "e"].map(|k| cache.contains(k))
        };

        assert_eq!(run(), [true, false, false, true, true]);
        assert_eq!(run(), run());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(MemoryCache::unbounded());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..50 {
                        cache.put_value(&format!("{t}_{i}"), i);
                        assert!(cache.get(&format!("{t}_{i}")).is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 400);
    }
}
