//! Single-flight memoization over a [`Cache`]

use crate::{Cache, CachedValue, LoadError};
use std::any::Any;
use std::sync::Arc;

/// Runs a fetch at most once per key, sharing the result through a cache.
///
/// Concurrent callers that miss on the same key wait for the first one
/// instead of issuing a duplicate request, and share its error if it fails.
/// A failed fetch stores nothing, so the next caller fetches again.
#[derive(Debug)]
pub struct Memoizer {
    cache: Arc<dyn Cache>,
}

impl Memoizer {
    /// Create a memoizer backed by a shared cache.
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    pub fn get_or_try_insert_with<T, E, F>(&self, key: &str, fetch: F) -> Result<Arc<T>, E>
    where
        T: Any + Send + Sync,
        E: Any + Send + Sync + Clone,
        F: FnOnce() -> Result<T, E>,
    {
        let mut fetch = Some(fetch);
        let loaded = self.cache.get_or_try_insert(
            key,
            Box::new(|| {
                log::debug!("cache miss {key}");
                let fetch = fetch.take().ok_or_else(|| -> LoadError { Arc::new(()) })?;
                fetch()
                    .map(|value| -> CachedValue { Arc::new(value) })
                    .map_err(|e| -> LoadError { Arc::new(e) })
            }),
        );

        match loaded {
            Ok(value) => match value.downcast::<T>() {
                Ok(typed) => return Ok(typed),
                Err(_) => log::warn!("cache entry {key} does not hold a {}", std::any::type_name::<T>()),
            },
            Err(error) => match error.downcast::<E>() {
                Ok(error) => return Err(Arc::unwrap_or_clone(error)),
                Err(_) => log::warn!("loading {key} failed with a foreign error type"),
            },
        }

        // The entry belongs to another type; fetch without caching
        match fetch.take() {
            Some(fetch) => fetch().map(Arc::new),
            None => unreachable!("loader for {key} ran but produced a foreign type"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCache;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::thread;
    use std::time::Duration;

    fn memoizer() -> Memoizer {
        Memoizer::new(Arc::new(MemoryCache::unbounded()))
    }

    #[test]
    fn test_second_call_is_a_hit() {
        let memo = memoizer();
        let calls = AtomicU32::new(0);
        let fetch = || -> Result<Vec<String>, String> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["3of73v5ob4".into(), "1jitcobwol".into()])
        };

        let first = memo.get_or_try_insert_with("apis", fetch).unwrap();
        let second = memo.get_or_try_insert_with("apis", fetch).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_distinct_keys_fetch_separately() {
        let memo = memoizer();
        let calls = AtomicU32::new(0);
        for key in ["authorizers_api_a", "authorizers_api_b", "authorizers_api_a"] {
            memo.get_or_try_insert_with(key, || -> Result<String, ()> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(key.to_string())
            })
            .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_error_is_not_cached() {
        let memo = memoizer();
        let err = memo.get_or_try_insert_with("k", || -> Result<u32, &str> { Err("boom") });
        assert_eq!(err.unwrap_err(), "boom");
        assert!(memo.cache().is_empty());

        let ok = memo.get_or_try_insert_with("k", || -> Result<u32, &str> { Ok(7) });
        assert_eq!(*ok.unwrap(), 7);
    }

    #[test]
    fn test_foreign_entry_type_is_fetched_uncached() {
        let memo = memoizer();
        memo.cache().put("k", Arc::new(1_u8));

        let value = memo.get_or_try_insert_with("k", || -> Result<String, ()> { Ok("x".into()) });
        assert_eq!(value.unwrap().as_str(), "x");
        assert!(memo.cache().get("k").unwrap().downcast::<u8>().is_ok());
    }

    #[test]
    fn test_failed_fetches_never_overlap() {
        let memo = Arc::new(memoizer());
        let running = Arc::new(AtomicU32::new(0));
        let overlapped = Arc::new(AtomicU32::new(0));
        let barrier = Arc::new(Barrier::new(6));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let memo = Arc::clone(&memo);
                let running = Arc::clone(&running);
                let overlapped = Arc::clone(&overlapped);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    memo.get_or_try_insert_with("shared", || -> Result<u32, String> {
                        if running.fetch_add(1, Ordering::SeqCst) > 0 {
                            overlapped.fetch_add(1, Ordering::SeqCst);
                        }
                        thread::sleep(Duration::from_millis(20));
                        running.fetch_sub(1, Ordering::SeqCst);
                        Err("throttled".into())
                    })
                    .unwrap_err()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "throttled");
        }
        assert_eq!(overlapped.load(Ordering::SeqCst), 0);
        assert!(memo.cache().is_empty());
    }

    #[test]
    fn test_concurrent_misses_fetch_once() {
        let memo = Arc::new(memoizer());
        let calls = Arc::new(AtomicU32::new(0));
        let barrier = Arc::new(Barrier::new(6));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let memo = Arc::clone(&memo);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    memo.get_or_try_insert_with("shared", || -> Result<u32, ()> {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(20));
                        Ok(1)
                    })
                    .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(*handle.join().unwrap(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
