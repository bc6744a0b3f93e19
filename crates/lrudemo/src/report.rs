//! Diagnostic rendering of cache contents

use anyhow::Result;
use lrucache::{CacheHooks, LruCache};
use serde::Serialize;

/// Output style for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct Entry<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct Report<'a> {
    label: &'a str,
    max_size: i64,
    size: i64,
    hits: u64,
    misses: u64,
    hit_rate: u64,
    evictions: u64,
    /// Least recently used first
    data: Vec<Entry<'a>>,
}

/// Render the summary line plus the LRU→MRU contents
pub fn render<H>(label: &str, cache: &LruCache<String, String, H>, format: Format) -> Result<String>
where
    H: CacheHooks<String, String>,
{
    let stats = cache.stats();
    let snapshot = cache.snapshot();

    match format {
        Format::Text => {
            let data = snapshot
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            Ok(format!("{}: {}; Data=[{}]", label, stats, data))
        }
        Format::Json => {
            let report = Report {
                label,
                max_size: stats.max_size(),
                size: cache.size(),
                hits: stats.hits(),
                misses: stats.misses(),
                hit_rate: stats.hit_percent(),
                evictions: stats.evictions(),
                data: snapshot
                    .iter()
                    .map(|(k, v)| Entry { key: k, value: v })
                    .collect(),
            };
            Ok(serde_json::to_string(&report)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LruCache<String, String> {
        let cache = LruCache::new(4).unwrap();
        cache.put("k-0".to_string(), "v-0".to_string()).unwrap();
        cache.put("k-1".to_string(), "v-1".to_string()).unwrap();
        cache.get(&"k-0".to_string()).unwrap();
        cache
    }

    #[test]
    fn test_render_text() {
        let text = render("step", &sample(), Format::Text).unwrap();

        assert_eq!(
            text,
            "step: LruCache[maxSize=4,hits=1,misses=0,hitRate=100%]; Data=[k-1=v-1, k-0=v-0]"
        );
    }

    #[test]
    fn test_render_json() {
        let json = render("step", &sample(), Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["max_size"], 4);
        assert_eq!(parsed["size"], 2);
        assert_eq!(parsed["hit_rate"], 100);
        assert_eq!(parsed["data"][0]["key"], "k-1");
        assert_eq!(parsed["data"][1]["key"], "k-0");
    }
}
