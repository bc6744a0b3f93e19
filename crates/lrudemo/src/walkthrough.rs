//! Scripted walkthrough of LRU behaviour

use anyhow::Result;
use clap::ValueEnum;
use lrucache::{FnHooks, LruCache, ShardedCache, ShardedConfig};
use tracing::info;

use crate::report::{self, Format};

/// Entries inserted before the first lookup
const WARMUP_ENTRIES: usize = 4;

/// How entries are weighed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CostMode {
    /// Every entry costs one unit
    Unit,
    /// An entry costs the length of its value
    Length,
}

type DemoCache = LruCache<String, String, FnHooks<String, String>>;

fn build_cache(capacity: i64, cost: CostMode) -> Result<DemoCache> {
    let builder = LruCache::builder(capacity).on_removed(
        |evicted, key: &String, old: &String, new: Option<&String>| {
            info!(evicted, key = %key, old = %old, new = ?new, "entry removed");
        },
    );

    let builder = match cost {
        CostMode::Unit => builder,
        CostMode::Length => builder.cost(|_key: &String, value: &String| value.len() as i64),
    };

    Ok(builder.build()?)
}

/// Insert `k-0..k-3`, read `k-1`, then insert up to `entries` keys
///
/// Returns one rendered report per step.
pub fn run(capacity: i64, entries: usize, cost: CostMode, format: Format) -> Result<Vec<String>> {
    let cache = build_cache(capacity, cost)?;
    let mut reports = Vec::new();

    let warmup = WARMUP_ENTRIES.min(entries);
    for i in 0..warmup {
        cache.put(format!("k-{}", i), format!("v-{}", i))?;
    }
    reports.push(report::render(
        &format!("after {} puts", warmup),
        &cache,
        format,
    )?);

    cache.get(&"k-1".to_string())?;
    reports.push(report::render("after get(k-1)", &cache, format)?);

    for i in warmup..entries {
        cache.put(format!("k-{}", i), format!("v-{}", i))?;
    }
    reports.push(report::render(
        &format!("after {} puts", entries),
        &cache,
        format,
    )?);

    Ok(reports)
}

/// Fill a sharded cache and summarise how the capacity was split
pub fn run_sharded(capacity: i64, shards: usize, entries: usize) -> Result<String> {
    let cache = ShardedCache::new(ShardedConfig {
        capacity,
        shards,
        ..ShardedConfig::default()
    })?;

    for i in 0..entries {
        cache.put(format!("k-{}", i), format!("v-{}", i))?;
    }

    Ok(format!(
        "sharded: shards={} perShard={} len={} {}",
        cache.shard_count(),
        cache.shard_capacity(),
        cache.len(),
        cache.stats()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_walkthrough() {
        let reports = run(4, 6, CostMode::Unit, Format::Text).unwrap();

        assert_eq!(reports.len(), 3);
        assert!(reports[0].ends_with("Data=[k-0=v-0, k-1=v-1, k-2=v-2, k-3=v-3]"));
        assert!(reports[1].ends_with("Data=[k-0=v-0, k-2=v-2, k-3=v-3, k-1=v-1]"));
        // k-0 and k-2 are the two least recently used
        assert!(reports[2].ends_with("Data=[k-3=v-3, k-1=v-1, k-4=v-4, k-5=v-5]"));
    }

    #[test]
    fn test_length_walkthrough() {
        // Each value is three bytes, so ten units hold three entries
        let reports = run(10, 6, CostMode::Length, Format::Text).unwrap();

        assert!(reports[2].ends_with("Data=[k-1=v-1, k-4=v-4, k-5=v-5]"));
    }

    #[test]
    fn test_sharded_summary() {
        let summary = run_sharded(8, 4, 2).unwrap();

        assert!(summary.starts_with("sharded: shards=4 perShard=2 len=2"));
    }
}
