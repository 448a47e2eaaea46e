//! # Scancache
//!
//! Process-lifetime memoization for cloud listing calls.
//!
//! A scan issues many overlapping listing requests (every API Gateway
//! sub-resource enumerator needs the list of REST APIs, for example).
//! Repositories put the materialized result of each logical operation in a
//! [`Cache`] under a deterministic key and reuse it for the rest of the run.
//!
//! ## Core Concepts
//!
//! - **Cache**: `get`/`put` over type-erased, shared values. Never copies.
//! - **MemoryCache**: the in-process implementation on `moka`, unbounded or
//!   LRU-bounded
//! - **Memoizer**: single-flight wrapper so concurrent misses on the same key
//!   trigger one fetch
//!
//! ## Example
//!
//! ```
//! use scancache::{CacheExt, MemoryCache};
//!
//! let cache = MemoryCache::unbounded();
//! assert!(!cache.put_value("apigatewayListAllRestApis", vec!["3of73v5ob4".to_string()]));
//!
//! let apis = cache.get_as::<Vec<String>>("apigatewayListAllRestApis").unwrap();
//! assert_eq!(apis.len(), 1);
//! ```
//!
//! Entries are never invalidated: the cache models "this process observed X
//! once". Callers must treat returned values as read-only.

pub mod memo;
pub mod memory;

use std::any::Any;
use std::sync::Arc;

pub use memo::Memoizer;
pub use memory::MemoryCache;

/// A type-erased cached value.
///
/// Values are shared, not cloned: every hit hands out the same allocation.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

/// A type-erased loader failure, shared with every caller waiting on it.
pub type LoadError = Arc<dyn Any + Send + Sync>;

/// Computes a missing entry for [`Cache::get_or_try_insert`].
pub type Loader<'a> = Box<dyn FnOnce() -> Result<CachedValue, LoadError> + 'a>;

/// Key/value memoization store.
///
/// Implementations must be safe for concurrent `get`/`put` from parallel
/// enumerators.
pub trait Cache: Send + Sync {
    /// Look up a key. `None` on a miss.
    fn get(&self, key: &str) -> Option<CachedValue>;

    /// Store a value, returning `true` if an existing entry was replaced.
    fn put(&self, key: &str, value: CachedValue) -> bool;

    /// Return the entry for `key`, running `load` on a miss.
    ///
    /// Concurrent misses on one key run a single load and share its outcome.
    /// A failed load stores nothing.
    fn get_or_try_insert(&self, key: &str, load: Loader<'_>) -> Result<CachedValue, LoadError>;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Typed helpers on top of [`Cache`].
pub trait CacheExt: Cache {
    /// Look up a key and downcast it.
    ///
    /// A value stored under the key with a different type is reported and
    /// treated as a miss.
    fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let value = self.get(key)?;
        match value.downcast::<T>() {
            Ok(typed) => Some(typed),
            Err(_) => {
                log::warn!(
                    "cache entry {key} does not hold a {}; ignoring it",
                    std::any::type_name::<T>()
                );
                None
            }
        }
    }

    /// Wrap a value in an `Arc` and store it.
    fn put_value<T: Any + Send + Sync>(&self, key: &str, value: T) -> bool {
        self.put(key, Arc::new(value))
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}

impl std::fmt::Debug for dyn Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").field("len", &self.len()).finish()
    }
}
