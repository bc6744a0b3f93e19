//! Cache statistics tracking

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Counters kept by a cache, plus the capacity they were read against
///
/// The live counters sit behind the cache lock; [`LruCache::stats`]
/// hands out a copy.
///
/// [`LruCache::stats`]: crate::LruCache::stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    max_size: i64,
    puts: u64,
    creates: u64,
    evictions: u64,
    hits: u64,
    misses: u64,
}

impl CacheStats {
    /// Create new stats tracker
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_put(&mut self) {
        self.puts += 1;
    }

    pub(crate) fn record_create(&mut self) {
        self.creates += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn with_max_size(mut self, max_size: i64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Capacity at the time the snapshot was taken
    pub fn max_size(&self) -> i64 {
        self.max_size
    }

    /// Number of `put` calls
    pub fn puts(&self) -> u64 {
        self.puts
    }

    /// Number of values returned by the miss handler
    pub fn creates(&self) -> u64 {
        self.creates
    }

    /// Number of capacity evictions
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Number of `get` calls answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of `get` calls that fell through to the miss handler
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Hit rate as a truncated integer percentage
    pub fn hit_percent(&self) -> u64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0
        } else {
            100 * self.hits / total
        }
    }
}

impl Add for CacheStats {
    type Output = CacheStats;

    fn add(self, other: CacheStats) -> CacheStats {
        CacheStats {
            max_size: self.max_size + other.max_size,
            puts: self.puts + other.puts,
            creates: self.creates + other.creates,
            evictions: self.evictions + other.evictions,
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
        }
    }
}

impl Sum for CacheStats {
    fn sum<I: Iterator<Item = CacheStats>>(iter: I) -> Self {
        iter.fold(CacheStats::new(), Add::add)
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LruCache[maxSize={},hits={},misses={},hitRate={}%]",
            self.max_size,
            self.hits,
            self.misses,
            self.hit_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_basic() {
        let mut stats = CacheStats::new();

        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        assert_eq!(stats.hits(), 2);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.hit_ratio(), 2.0 / 3.0);
        assert_eq!(stats.hit_percent(), 66);
    }

    #[test]
    fn test_stats_empty() {
        let stats = CacheStats::new();

        assert_eq!(stats.hit_ratio(), 0.0);
        assert_eq!(stats.hit_percent(), 0);
    }

    #[test]
    fn test_stats_display() {
        let mut stats = CacheStats::new().with_max_size(4);
        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        stats.record_miss();

        assert_eq!(
            stats.to_string(),
            "LruCache[maxSize=4,hits=1,misses=3,hitRate=25%]"
        );
    }

    #[test]
    fn test_stats_sum() {
        let mut a = CacheStats::new().with_max_size(2);
        a.record_put();
        a.record_eviction();
        let mut b = CacheStats::new().with_max_size(3);
        b.record_put();
        b.record_create();

        let total: CacheStats = [a, b].into_iter().sum();

        assert_eq!(total.max_size(), 5);
        assert_eq!(total.puts(), 2);
        assert_eq!(total.creates(), 1);
        assert_eq!(total.evictions(), 1);
    }
}
