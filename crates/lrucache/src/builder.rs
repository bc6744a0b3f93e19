//! Closure-based cache configuration

use std::hash::Hash;

use crate::cache::LruCache;
use crate::error::Result;
use crate::hooks::FnHooks;

/// Builder for an [`LruCache`] whose callbacks are closures
///
/// ```
/// use lrucache::LruCache;
///
/// let cache = LruCache::builder(1024)
///     .cost(|_key: &u64, value: &Vec<u8>| value.len() as i64)
///     .on_miss(|key: &u64| Some(vec![0u8; *key as usize]))
///     .build()
///     .unwrap();
///
/// assert_eq!(cache.get(&16).unwrap().map(|v| v.len()), Some(16));
/// assert_eq!(cache.size(), 16);
/// ```
pub struct CacheBuilder<K, V> {
    max_size: i64,
    hooks: FnHooks<K, V>,
}

impl<K, V> CacheBuilder<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Start a builder for a cache holding at most `max_size` cost units
    pub fn new(max_size: i64) -> Self {
        Self {
            max_size,
            hooks: FnHooks::default(),
        }
    }

    /// Cost of an entry; must be non-negative and stable while cached
    pub fn cost<F>(mut self, f: F) -> Self
    where
        F: Fn(&K, &V) -> i64 + Send + Sync + 'static,
    {
        self.hooks.cost = Some(Box::new(f));
        self
    }

    /// Value factory invoked on a miss, outside the cache lock
    pub fn on_miss<F>(mut self, f: F) -> Self
    where
        F: Fn(&K) -> Option<V> + Send + Sync + 'static,
    {
        self.hooks.on_miss = Some(Box::new(f));
        self
    }

    /// Listener for every entry leaving the cache, outside the cache lock
    pub fn on_removed<F>(mut self, f: F) -> Self
    where
        F: Fn(bool, &K, &V, Option<&V>) + Send + Sync + 'static,
    {
        self.hooks.on_removed = Some(Box::new(f));
        self
    }

    /// Build the cache
    ///
    /// # Returns
    /// * `Result<LruCache>` - `InvalidArgument` if `max_size <= 0`
    pub fn build(self) -> Result<LruCache<K, V, FnHooks<K, V>>> {
        LruCache::with_hooks(self.max_size, self.hooks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_builder_rejects_bad_capacity() {
        let result = CacheBuilder::<u32, u32>::new(0).build();
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_builder_defaults() {
        let cache = CacheBuilder::<u32, u32>::new(2).build().unwrap();

        cache.put(1, 10).unwrap();
        assert_eq!(cache.size(), 1);
        assert_eq!(cache.get(&2).unwrap(), None);
        assert_eq!(cache.create_count(), 0);
    }
}
