//! # lrucache
//!
//! Thread-safe, in-process LRU cache bounded by caller-defined cost units.
//!
//! ## Architecture
//! - **Recency store**: AHash map into a slab-backed doubly-linked list (O(1)
//!   promote and O(1) peek-oldest)
//! - **Size accountant**: running total of entry costs, rejecting negative costs
//! - **Controller**: one `parking_lot::Mutex` around store, size and counters;
//!   eviction loop and create-on-miss race handling
//! - **Sharded variant**: hash-partitioned shards with per-entry expiry
//!
//! Callbacks (`on_miss`, `on_removed`) always run with the lock released.
//!
//! ```
//! use lrucache::LruCache;
//!
//! let cache = LruCache::new(2).unwrap();
//! cache.put("k1", 1).unwrap();
//! cache.put("k2", 2).unwrap();
//! cache.get(&"k1").unwrap();
//! cache.put("k3", 3).unwrap();
//!
//! let keys: Vec<_> = cache.snapshot().into_iter().map(|(k, _)| k).collect();
//! assert_eq!(keys, vec!["k1", "k3"]);
//! assert_eq!(cache.eviction_count(), 1);
//! ```

#![warn(missing_docs)]

mod accountant;
mod builder;
mod cache;
mod error;
mod hooks;
mod recency;
mod sharded;
mod stats;

pub use builder::CacheBuilder;
pub use cache::LruCache;
pub use error::{Error, Result};
pub use hooks::{CacheHooks, DefaultHooks, FnHooks};
pub use sharded::{ShardedCache, ShardedConfig, DEFAULT_SHARDS, DEFAULT_TTL};
pub use stats::CacheStats;
