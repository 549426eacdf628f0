//! The [`DirectMappedCache`] table itself

use super::line::CacheLine;
use super::{CacheBuilder, CacheStats, OutputContext};
use crate::Error;
use std::cell::Cell;
use tracing::{debug, info};

/// Fixed-capacity, direct-mapped cache of `f32` scores
///
/// Lines are addressed by a caller-supplied hash in `0..capacity()`. There
/// is no eviction policy: [`Self::put_cached`] overwrites the addressed
/// line unconditionally, and [`Self::get_cached`] only reports a hit when
/// the addressed line holds exactly the queried key.
///
/// Query and hit counters are kept per instance in [`Cell`]s, so lookups
/// take `&self`. The cache is `Send` but not `Sync`.
pub struct DirectMappedCache {
    /// All cache lines, back to back
    lines: Box<[CacheLine]>,
    /// Number of lookups since construction or the last reset
    queries: Cell<u64>,
    /// Number of those lookups that hit
    hits: Cell<u64>,
}

impl DirectMappedCache {
    /// Make a cache with `2^cache_bits - 1` empty lines.
    ///
    /// Fails with [`Error::CacheBits`] unless `cache_bits` is between 1 and
    /// [`super::MAX_CACHE_BITS`]. See [`CacheBuilder`] for other options.
    pub fn new(cache_bits: u32) -> Result<Self, Error> {
        CacheBuilder::new().cache_bits(cache_bits).build()
    }

    /// Start building a cache with custom settings.
    pub fn builder() -> CacheBuilder {
        CacheBuilder::new()
    }

    /// Allocate the table for an already validated bit count.
    pub(super) fn allocate(cache_bits: u32) -> Self {
        let capacity = (1_usize << cache_bits) - 1;
        let lines = vec![CacheLine::EMPTY; capacity].into_boxed_slice();
        debug!(
            cache_bits,
            capacity,
            bytes = std::mem::size_of_val(&*lines),
            "cache.new"
        );
        Self {
            lines,
            queries: Cell::new(0),
            hits: Cell::new(0),
        }
    }

    /// Number of addressable lines.
    pub fn capacity(&self) -> usize {
        self.lines.len()
    }

    /// Look up the score cached for `word` in a context.
    ///
    /// Reads only the line at `hash`. Returns `None` if that line is empty
    /// or holds a different `(context_offset, context_order, word)` key.
    ///
    /// When `output_context` is given, lines stored without an output
    /// context also miss, and on a hit the stored output context is
    /// written into it. A miss leaves it untouched.
    ///
    /// Panics if `hash` is not below [`Self::capacity()`].
    #[inline]
    pub fn get_cached(
        &self,
        context_offset: i64,
        context_order: i32,
        word: i32,
        hash: usize,
        output_context: Option<&mut OutputContext>,
    ) -> Option<f32> {
        self.queries.set(self.queries.get() + 1);
        let line = &self.lines[hash];
        if !line.is_occupied()
            || (output_context.is_some() && !line.has_output_context())
            || !line.matches(context_offset, context_order, word)
        {
            return None;
        }
        if let Some(output) = output_context {
            *output = line.output_context();
        }
        self.hits.set(self.hits.get() + 1);
        Some(line.score())
    }

    /// Like [`Self::get_cached`], but reports a miss as NaN.
    #[inline]
    pub fn get_cached_or_nan(
        &self,
        context_offset: i64,
        context_order: i32,
        word: i32,
        hash: usize,
        output_context: Option<&mut OutputContext>,
    ) -> f32 {
        self.get_cached(context_offset, context_order, word, hash, output_context)
            .unwrap_or(f32::NAN)
    }

    /// Store a score in the line at `hash`, replacing whatever was there.
    ///
    /// Without an `output_context`, the line records none, and later
    /// lookups that ask for one will miss. Storing a NaN score leaves the
    /// line empty.
    ///
    /// Panics if `hash` is not below [`Self::capacity()`].
    #[inline]
    pub fn put_cached(
        &mut self,
        context_offset: i64,
        context_order: i32,
        word: i32,
        score: f32,
        hash: usize,
        output_context: Option<&OutputContext>,
    ) {
        self.lines[hash] = CacheLine::new(context_offset, context_order, word, score, output_context);
    }

    /// Query and hit counts so far.
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.queries.get(), self.hits.get())
    }

    /// Zero the query and hit counters. Cached lines are kept.
    pub fn reset_stats(&self) {
        self.queries.set(0);
        self.hits.set(0);
    }

    /// Emit the current hit rate as a `tracing` event.
    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            capacity = self.capacity(),
            queries = stats.queries,
            hits = stats.hits,
            hit_rate = stats.hit_rate(),
            "cache.stats"
        );
    }
}

impl std::fmt::Debug for DirectMappedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectMappedCache")
            .field("capacity", &self.capacity())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn capacity_from_bits() {
        assert_eq!(DirectMappedCache::new(1).unwrap().capacity(), 1);
        assert_eq!(DirectMappedCache::new(4).unwrap().capacity(), 15);
        assert_eq!(DirectMappedCache::new(0).unwrap_err(), Error::CacheBits(0));
        assert_eq!(
            DirectMappedCache::builder().cache_bits(40).build().unwrap_err(),
            Error::CacheBits(40)
        );
    }

    #[test]
    fn empty_cache_misses() {
        let cache = DirectMappedCache::new(3).unwrap();
        for hash in 0..cache.capacity() {
            assert_eq!(cache.get_cached(-1, -1, -1, hash, None), None);
        }
        assert!(cache.get_cached_or_nan(0, 0, 0, 0, None).is_nan());
    }

    #[test]
    fn hit_and_mismatch() {
        let mut cache = DirectMappedCache::new(4).unwrap();
        cache.put_cached(100, 2, 5, -1.23, 1, None);
        assert_eq!(cache.get_cached(100, 2, 5, 1, None), Some(-1.23));
        assert_eq!(cache.get_cached_or_nan(100, 2, 5, 1, None), -1.23);
        assert_eq!(cache.get_cached(100, 2, 6, 1, None), None);
        assert_eq!(cache.get_cached(100, 3, 5, 1, None), None);
        assert_eq!(cache.get_cached(101, 2, 5, 1, None), None);
        // Same key, different line
        assert_eq!(cache.get_cached(100, 2, 5, 2, None), None);
    }

    #[test]
    fn output_context_roundtrip() {
        let mut cache = DirectMappedCache::new(4).unwrap();
        let stored = OutputContext::new(3, 77);
        cache.put_cached(10, 1, 4, -0.5, 6, Some(&stored));

        let mut out = OutputContext::default();
        assert_eq!(cache.get_cached(10, 1, 4, 6, Some(&mut out)), Some(-0.5));
        assert_eq!(out, stored);
        // Callers that don't ask for the context still hit
        assert_eq!(cache.get_cached(10, 1, 4, 6, None), Some(-0.5));
    }

    #[test]
    fn output_context_required() {
        let mut cache = DirectMappedCache::new(4).unwrap();
        cache.put_cached(10, 1, 4, -0.5, 6, None);

        let mut out = OutputContext::new(9, 9);
        assert_eq!(cache.get_cached(10, 1, 4, 6, Some(&mut out)), None);
        assert_eq!(out, OutputContext::new(9, 9));
        assert_eq!(cache.get_cached(10, 1, 4, 6, None), Some(-0.5));
    }

    #[test]
    fn stats_count_queries_and_hits() {
        let mut cache = DirectMappedCache::new(2).unwrap();
        cache.put_cached(1, 1, 1, 0.25, 0, None);
        let _ = cache.get_cached(1, 1, 1, 0, None);
        let _ = cache.get_cached(1, 1, 2, 0, None);
        let _ = cache.get_cached(1, 1, 1, 2, None);
        let _ = cache.get_cached(1, 1, 1, 0, None);
        let stats = cache.stats();
        assert_eq!(stats.queries, 4);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.hit_rate(), 0.5);

        cache.reset_stats();
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(cache.get_cached(1, 1, 1, 0, None), Some(0.25));
    }

    #[test]
    #[should_panic]
    fn hash_out_of_range() {
        let cache = DirectMappedCache::new(2).unwrap();
        let _ = cache.get_cached(0, 0, 0, cache.capacity(), None);
    }
}
