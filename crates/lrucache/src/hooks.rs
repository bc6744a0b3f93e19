//! Extension points supplied by the embedder
//!
//! A cache is parameterised over one [`CacheHooks`] strategy object. Every
//! method has a default, so an implementation only overrides what it needs:
//!
//! ```
//! use lrucache::{CacheHooks, LruCache};
//!
//! struct ByLength;
//!
//! impl CacheHooks<String, String> for ByLength {
//!     fn cost(&self, _key: &String, value: &String) -> i64 {
//!         value.len() as i64
//!     }
//! }
//!
//! let cache = LruCache::with_hooks(64, ByLength).unwrap();
//! cache.put("k".to_string(), "four".to_string()).unwrap();
//! assert_eq!(cache.size(), 4);
//! ```

/// Strategy object for cost, miss and removal callbacks
///
/// `on_miss` and `on_removed` are always called without the cache lock held,
/// so they may block or call back into the cache. `cost` is evaluated inside
/// the lock and must be cheap, must not touch the cache, and must return the
/// same value for an entry for as long as it is cached.
pub trait CacheHooks<K, V>: Send + Sync {
    /// Cost of an entry in caller-defined units. Defaults to 1.
    fn cost(&self, _key: &K, _value: &V) -> i64 {
        1
    }

    /// Compute a value for a key that missed. Defaults to no value.
    fn on_miss(&self, _key: &K) -> Option<V> {
        None
    }

    /// Called once for every entry that leaves the cache.
    ///
    /// `evicted` is true only for capacity evictions. `new_value` is set when
    /// the entry was replaced by `put` or lost a create-on-miss race.
    fn on_removed(&self, _evicted: bool, _key: &K, _old_value: &V, _new_value: Option<&V>) {}
}

/// Unit cost, no miss handler, no removal listener
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl<K, V> CacheHooks<K, V> for DefaultHooks {}

type CostFn<K, V> = Box<dyn Fn(&K, &V) -> i64 + Send + Sync>;
type MissFn<K, V> = Box<dyn Fn(&K) -> Option<V> + Send + Sync>;
type RemovedFn<K, V> = Box<dyn Fn(bool, &K, &V, Option<&V>) + Send + Sync>;

/// Hooks backed by closures
///
/// Built through [`CacheBuilder`](crate::CacheBuilder). Unset closures fall
/// back to the [`DefaultHooks`] behaviour.
pub struct FnHooks<K, V> {
    pub(crate) cost: Option<CostFn<K, V>>,
    pub(crate) on_miss: Option<MissFn<K, V>>,
    pub(crate) on_removed: Option<RemovedFn<K, V>>,
}

impl<K, V> Default for FnHooks<K, V> {
    fn default() -> Self {
        Self {
            cost: None,
            on_miss: None,
            on_removed: None,
        }
    }
}

impl<K, V> CacheHooks<K, V> for FnHooks<K, V> {
    fn cost(&self, key: &K, value: &V) -> i64 {
        match &self.cost {
            Some(f) => f(key, value),
            None => 1,
        }
    }

    fn on_miss(&self, key: &K) -> Option<V> {
        self.on_miss.as_ref().and_then(|f| f(key))
    }

    fn on_removed(&self, evicted: bool, key: &K, old_value: &V, new_value: Option<&V>) {
        if let Some(f) = &self.on_removed {
            f(evicted, key, old_value, new_value);
        }
    }
}
