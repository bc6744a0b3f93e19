//! LruCache: thread-safe cost-bounded LRU cache
//!
//! One `parking_lot::Mutex` guards the recency store, the size total, the
//! capacity and the counters. The lock is only held for in-memory
//! bookkeeping and is always released before calling `on_miss` or
//! `on_removed`.

use std::hash::Hash;

use parking_lot::Mutex;
use tracing::{debug, error, trace};

use crate::accountant::SizeAccountant;
use crate::builder::CacheBuilder;
use crate::error::{Error, Result};
use crate::hooks::{CacheHooks, DefaultHooks, FnHooks};
use crate::recency::RecencyStore;
use crate::stats::CacheStats;

/// State guarded by the cache lock
struct Inner<K, V> {
    store: RecencyStore<K, V>,
    accountant: SizeAccountant,
    max_size: i64,
    stats: CacheStats,
}

/// Result of committing a value produced by the miss handler
enum Commit<V> {
    /// The created value is now cached
    Stored { max_size: i64 },
    /// Another writer got there first; its value stays
    Lost { prior: V },
}

/// Thread-safe LRU cache bounded by caller-defined entry costs
pub struct LruCache<K, V, H = DefaultHooks> {
    inner: Mutex<Inner<K, V>>,
    hooks: H,
}

impl<K, V> LruCache<K, V, DefaultHooks>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a cache with unit costs and no callbacks
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries
    ///
    /// # Returns
    /// * `Result<LruCache>` - `InvalidArgument` if `max_size <= 0`
    pub fn new(max_size: i64) -> Result<Self> {
        Self::with_hooks(max_size, DefaultHooks)
    }
}

impl<K, V> LruCache<K, V, FnHooks<K, V>>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Start configuring a cache with closure callbacks
    pub fn builder(max_size: i64) -> CacheBuilder<K, V> {
        CacheBuilder::new(max_size)
    }
}

impl<K, V, H> LruCache<K, V, H>
where
    K: Hash + Eq + Clone,
    V: Clone,
    H: CacheHooks<K, V>,
{
    /// Create a cache driven by a custom strategy object
    ///
    /// # Arguments
    /// * `max_size` - Maximum total cost of the cached entries
    /// * `hooks` - Cost function, miss handler and removal listener
    pub fn with_hooks(max_size: i64, hooks: H) -> Result<Self> {
        if max_size <= 0 {
            return Err(Error::invalid("max_size <= 0"));
        }

        Ok(Self {
            inner: Mutex::new(Inner {
                store: RecencyStore::new(),
                accountant: SizeAccountant::new(),
                max_size,
                stats: CacheStats::new(),
            }),
            hooks,
        })
    }

    /// Cache `value` for `key`, moving it to the most-recently-used end
    ///
    /// # Returns
    /// * `Result<Option<V>>` - The value previously mapped by `key`
    pub fn put(&self, key: K, value: V) -> Result<Option<V>> {
        let (previous, replacement, max_size) = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            let cost = inner.accountant.cost_of(&self.hooks, &key, &value)?;
            let old_cost = match inner.store.peek(&key) {
                Some(old) => Some(inner.accountant.cost_of(&self.hooks, &key, old)?),
                None => None,
            };

            inner.accountant.replace(old_cost.unwrap_or(0), cost)?;
            inner.stats.record_put();
            let replacement = old_cost.map(|_| value.clone());
            let previous = inner.store.insert_or_update(key.clone(), value);

            (previous, replacement, inner.max_size)
        };

        if let Some(old) = &previous {
            self.hooks.on_removed(false, &key, old, replacement.as_ref());
        }

        self.trim_to_size(max_size)?;
        Ok(previous)
    }

    /// Get the value for `key`, creating it through `on_miss` when absent
    ///
    /// The miss handler runs without the lock. If another writer stores a
    /// value for `key` meanwhile, that value is kept and returned, and the
    /// created one is handed to `on_removed`.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            if let Some(value) = inner.store.touch(key) {
                let value = value.clone();
                inner.stats.record_hit();
                trace!("cache hit");
                return Ok(Some(value));
            }
            inner.stats.record_miss();
        }
        trace!("cache miss");

        let created = match self.hooks.on_miss(key) {
            Some(value) => value,
            None => return Ok(None),
        };

        let commit = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            inner.stats.record_create();

            match inner.store.insert_or_update(key.clone(), created.clone()) {
                Some(prior) => {
                    // Put the winner back
                    inner.store.insert_or_update(key.clone(), prior.clone());
                    Commit::Lost { prior }
                }
                None => match inner.accountant.cost_of(&self.hooks, key, &created) {
                    Ok(cost) => match inner.accountant.add(cost) {
                        Ok(()) => Commit::Stored {
                            max_size: inner.max_size,
                        },
                        Err(e) => {
                            inner.store.remove_entry(key);
                            return Err(e);
                        }
                    },
                    Err(e) => {
                        inner.store.remove_entry(key);
                        return Err(e);
                    }
                },
            }
        };

        match commit {
            Commit::Lost { prior } => {
                debug!("created value lost a race and was discarded");
                self.hooks.on_removed(false, key, &created, Some(&prior));
                Ok(Some(prior))
            }
            Commit::Stored { max_size } => {
                self.trim_to_size(max_size)?;
                Ok(Some(created))
            }
        }
    }

    /// Remove the entry for `key` if it exists
    ///
    /// # Returns
    /// * `Result<Option<V>>` - The value previously mapped by `key`
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        self.remove_if(key, |_| true)
    }

    /// Remove the entry for `key` only if `predicate` accepts its value
    ///
    /// `predicate` runs under the lock.
    pub(crate) fn remove_if<F>(&self, key: &K, predicate: F) -> Result<Option<V>>
    where
        F: FnOnce(&V) -> bool,
    {
        let previous = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            let cost = match inner.store.peek(key) {
                Some(value) => {
                    if !predicate(value) {
                        return Ok(None);
                    }
                    inner.accountant.cost_of(&self.hooks, key, value)?
                }
                None => return Ok(None),
            };

            let previous = inner.store.remove_entry(key);
            if previous.is_some() {
                inner.accountant.subtract(cost);
            }
            previous
        };

        if let Some(old) = &previous {
            self.hooks.on_removed(false, key, old, None);
        }

        Ok(previous)
    }

    /// Evict least-recently-used entries until the total cost is at most `limit`
    ///
    /// The lock is released around every `on_removed` call, so the frontier
    /// is re-read on each iteration. A negative `limit` evicts everything,
    /// zero-cost entries included.
    pub fn trim_to_size(&self, limit: i64) -> Result<()> {
        loop {
            let (key, value) = {
                let mut guard = self.inner.lock();
                let inner = &mut *guard;

                let size = inner.accountant.current();
                let entries = inner.store.len();
                if size < 0 || (entries == 0 && size != 0) {
                    error!(size, entries, "size accounting is inconsistent");
                    return Err(Error::InternalInconsistency { size, entries });
                }

                if size <= limit || entries == 0 {
                    break;
                }

                let (key, cost) = match inner.store.oldest() {
                    Some((key, value)) => (
                        key.clone(),
                        inner.accountant.cost_of(&self.hooks, key, value)?,
                    ),
                    None => break,
                };
                let value = match inner.store.remove_entry(&key) {
                    Some(value) => value,
                    None => break,
                };
                inner.accountant.subtract(cost);
                inner.stats.record_eviction();

                (key, value)
            };

            trace!("evicted least recently used entry");
            self.hooks.on_removed(true, &key, &value, None);
        }

        Ok(())
    }

    /// Change the capacity, evicting as needed
    pub fn resize(&self, max_size: i64) -> Result<()> {
        if max_size <= 0 {
            return Err(Error::invalid("max_size <= 0"));
        }

        {
            let mut inner = self.inner.lock();
            debug!(from = inner.max_size, to = max_size, "resizing cache");
            inner.max_size = max_size;
        }

        self.trim_to_size(max_size)
    }

    /// Evict every entry, reporting each through `on_removed`
    pub fn evict_all(&self) -> Result<()> {
        debug!("evicting all entries");
        self.trim_to_size(-1)
    }

    /// Copy of the contents, least recently used first
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.inner.lock().store.ordered_snapshot()
    }

    /// Read a value without touching recency or counters
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().store.peek(key).cloned()
    }

    /// Check whether `key` is cached, without touching recency or counters
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().store.contains(key)
    }

    /// Total cost of the cached entries
    pub fn size(&self) -> i64 {
        self.inner.lock().accountant.current()
    }

    /// Maximum total cost
    pub fn capacity(&self) -> i64 {
        self.inner.lock().max_size
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        inner.stats.with_max_size(inner.max_size)
    }

    /// Number of `get` calls answered from the cache
    pub fn hit_count(&self) -> u64 {
        self.inner.lock().stats.hits()
    }

    /// Number of `get` calls that missed
    pub fn miss_count(&self) -> u64 {
        self.inner.lock().stats.misses()
    }

    /// Number of `put` calls
    pub fn put_count(&self) -> u64 {
        self.inner.lock().stats.puts()
    }

    /// Number of values produced by the miss handler
    pub fn create_count(&self) -> u64 {
        self.inner.lock().stats.creates()
    }

    /// Number of capacity evictions
    pub fn eviction_count(&self) -> u64 {
        self.inner.lock().stats.evictions()
    }
}
