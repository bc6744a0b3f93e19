//! Hash-partitioned LRU with per-entry expiry
//!
//! Keys are spread over independent [`LruCache`] shards, each with its own
//! lock. Total capacity is split so the shard capacities add up to exactly
//! `capacity`: every shard gets `capacity / shards` units and the first
//! `capacity % shards` shards one more. A capacity smaller than the shard
//! count reduces the shard count to `capacity`.
//!
//! Expired entries are dropped when a `get` finds them, or in bulk by
//! [`ShardedCache::purge_expired`]. There is no background sweeper.

use std::hash::Hash;
use std::time::{Duration, Instant};

use ahash::RandomState;
use tracing::debug;

use crate::cache::LruCache;
use crate::error::{Error, Result};
use crate::stats::CacheStats;

/// Default number of shards
pub const DEFAULT_SHARDS: usize = 16;

/// Default time-to-live (10 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Configuration for a [`ShardedCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardedConfig {
    /// Total capacity in entries
    pub capacity: i64,
    /// Number of shards
    pub shards: usize,
    /// Lifetime given to entries stored with `put`
    pub default_ttl: Duration,
}

impl Default for ShardedConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            shards: DEFAULT_SHARDS,
            default_ttl: DEFAULT_TTL,
        }
    }
}

#[derive(Clone)]
struct Expiring<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Expiring<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Sharded LRU cache whose entries expire after a time-to-live
pub struct ShardedCache<K, V> {
    shards: Vec<LruCache<K, Expiring<V>>>,
    hasher: RandomState,
    default_ttl: Duration,
    capacity: i64,
}

impl<K, V> ShardedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a sharded cache
    ///
    /// # Returns
    /// * `Result<ShardedCache>` - `InvalidArgument` for a non-positive
    ///   capacity, zero shards or a zero TTL
    pub fn new(config: ShardedConfig) -> Result<Self> {
        if config.capacity <= 0 {
            return Err(Error::invalid("capacity <= 0"));
        }
        if config.shards == 0 {
            return Err(Error::invalid("shards == 0"));
        }
        if config.default_ttl.is_zero() {
            return Err(Error::invalid("default_ttl == 0"));
        }

        let count = i64::try_from(config.shards)
            .unwrap_or(i64::MAX)
            .min(config.capacity);
        let base = config.capacity / count;
        let remainder = config.capacity % count;
        let shards = (0..count)
            .map(|i| LruCache::new(base + i64::from(i < remainder)))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            capacity = config.capacity,
            requested_shards = config.shards,
            shards = count,
            base,
            "created sharded cache"
        );

        Ok(Self {
            shards,
            hasher: RandomState::new(),
            default_ttl: config.default_ttl,
            capacity: config.capacity,
        })
    }

    fn shard_for(&self, key: &K) -> &LruCache<K, Expiring<V>> {
        let idx = self.hasher.hash_one(key) % self.shards.len() as u64;
        &self.shards[idx as usize]
    }

    /// Store `value` with the default TTL
    ///
    /// # Returns
    /// * `Result<Option<V>>` - The previous value, if it had not yet expired
    pub fn put(&self, key: K, value: V) -> Result<Option<V>> {
        self.put_with_ttl(key, value, self.default_ttl)
    }

    /// Store `value`, expiring `ttl` from now
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<Option<V>> {
        if ttl.is_zero() {
            return Err(Error::invalid("ttl == 0"));
        }

        let now = Instant::now();
        let entry = Expiring {
            value,
            expires_at: now + ttl,
        };
        let previous = self.shard_for(&key).put(key, entry)?;
        Ok(live(previous, now))
    }

    /// Get a live value, dropping it first if it has expired
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        let shard = self.shard_for(key);
        let now = Instant::now();

        if shard.remove_if(key, |entry| entry.is_expired(now))?.is_some() {
            debug!("dropped expired entry on read");
        }

        Ok(live(shard.get(key)?, now))
    }

    /// Remove `key`, returning its value if it had not yet expired
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        let previous = self.shard_for(key).remove(key)?;
        Ok(live(previous, Instant::now()))
    }

    /// Remove every expired entry
    ///
    /// # Returns
    /// * `Result<usize>` - Number of entries removed
    pub fn purge_expired(&self) -> Result<usize> {
        let now = Instant::now();
        let mut purged = 0;

        for shard in &self.shards {
            let expired: Vec<K> = shard
                .snapshot()
                .into_iter()
                .filter(|(_, entry)| entry.is_expired(now))
                .map(|(key, _)| key)
                .collect();

            for key in &expired {
                if shard.remove_if(key, |entry| entry.is_expired(now))?.is_some() {
                    purged += 1;
                }
            }
        }

        debug!(purged, "purged expired entries");
        Ok(purged)
    }

    /// Evict every entry from every shard
    pub fn evict_all(&self) -> Result<()> {
        for shard in &self.shards {
            shard.evict_all()?;
        }
        Ok(())
    }

    /// Number of entries, expired ones included until they are purged
    pub fn len(&self) -> usize {
        self.shards.iter().map(LruCache::len).sum()
    }

    /// Check if every shard is empty
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(LruCache::is_empty)
    }

    /// Total cost over all shards
    pub fn size(&self) -> i64 {
        self.shards.iter().map(LruCache::size).sum()
    }

    /// Requested total capacity
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Largest capacity of any shard
    pub fn shard_capacity(&self) -> i64 {
        self.shards.first().map(LruCache::capacity).unwrap_or(0)
    }

    /// Capacity of every shard, in shard order; sums to `capacity()`
    pub fn shard_capacities(&self) -> Vec<i64> {
        self.shards.iter().map(LruCache::capacity).collect()
    }

    /// Number of shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Counters summed over all shards
    pub fn stats(&self) -> CacheStats {
        self.shards.iter().map(LruCache::stats).sum()
    }
}

fn live<V>(entry: Option<Expiring<V>>, now: Instant) -> Option<V> {
    entry
        .filter(|entry| !entry.is_expired(now))
        .map(|entry| entry.value)
}
