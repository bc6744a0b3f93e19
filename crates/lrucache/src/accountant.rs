//! Running total of entry costs

use tracing::error;

use crate::error::{Error, Result};
use crate::hooks::CacheHooks;

/// Tracks `Σ cost(key, value)` over the cached entries
#[derive(Debug, Default)]
pub(crate) struct SizeAccountant {
    size: i64,
}

impl SizeAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the hooks for the cost of an entry, rejecting negative answers
    pub fn cost_of<K, V, H>(&self, hooks: &H, key: &K, value: &V) -> Result<i64>
    where
        H: CacheHooks<K, V> + ?Sized,
    {
        let cost = hooks.cost(key, value);
        if cost < 0 {
            error!(cost, "cost function returned a negative cost");
            return Err(Error::NegativeCost(cost));
        }
        Ok(cost)
    }

    /// Add `delta` to the total, leaving it untouched on overflow
    pub fn add(&mut self, delta: i64) -> Result<()> {
        self.replace(0, delta)
    }

    /// Swap an entry of cost `removed` for one of cost `added`
    ///
    /// The total is left untouched when the result does not fit in an `i64`.
    pub fn replace(&mut self, removed: i64, added: i64) -> Result<()> {
        let size = self
            .size
            .checked_sub(removed)
            .and_then(|size| size.checked_add(added));
        match size {
            Some(size) => {
                self.size = size;
                Ok(())
            }
            None => {
                error!(size = self.size, cost = added, "size total would overflow");
                Err(Error::SizeOverflow {
                    size: self.size,
                    cost: added,
                })
            }
        }
    }

    pub fn subtract(&mut self, delta: i64) {
        self.size = self.size.saturating_sub(delta);
    }

    /// Current total
    pub fn current(&self) -> i64 {
        self.size
    }
}
