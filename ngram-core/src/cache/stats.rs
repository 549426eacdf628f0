//! Hit rate accounting for the score cache

/// Snapshot of a cache's lookup counters
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct CacheStats {
    /// Lookups performed
    pub queries: u64,
    /// Lookups that returned a score
    pub hits: u64,
}

impl CacheStats {
    /// Build a snapshot from raw counts.
    pub(super) fn new(queries: u64, hits: u64) -> Self {
        Self { queries, hits }
    }

    /// Lookups that found nothing usable.
    pub fn misses(&self) -> u64 {
        self.queries - self.hits
    }

    /// Fraction of lookups that hit, or 0.0 before any lookups.
    pub fn hit_rate(&self) -> f64 {
        if self.queries == 0 {
            0.0
        } else {
            self.hits as f64 / self.queries as f64
        }
    }
}
