//! Direct-mapped cache of language model scores
//!
//! Scoring a word in context is expensive, and the same `(context, word)`
//! queries come up again and again while decoding. [`DirectMappedCache`]
//! keeps recent results in a fixed table of lines. The caller picks the
//! line by hashing its own key; the cache does no hashing, chaining or
//! probing of its own. A collision simply overwrites whatever was there.
//!
//! Each line stores the full lookup key next to the score, and a lookup
//! only succeeds when the stored key matches exactly. A collision can cost
//! a miss but can never return the score of a different key.
//!
//! Lines live back to back in a single boxed slice of fixed-size records,
//! so a lookup touches one small contiguous record and nothing else.

mod direct_mapped;
mod line;
mod stats;

pub use direct_mapped::DirectMappedCache;
pub use stats::CacheStats;

use crate::Error;

/// Number of hash bits used when none are configured
pub const DEFAULT_CACHE_BITS: u32 = 20;

/// Largest supported number of hash bits
pub const MAX_CACHE_BITS: u32 = 31;

/// Location of the context that follows a scored word
///
/// The enclosing model uses this to continue scoring from where a cached
/// lookup left off. An `offset` below zero means no context was recorded.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub struct OutputContext {
    /// N-gram order of the context
    pub order: i32,
    /// Offset of the context within the model's tables
    pub offset: i64,
}

impl OutputContext {
    /// Describe a context by its order and offset.
    pub fn new(order: i32, offset: i64) -> Self {
        Self { order, offset }
    }

    /// Placeholder meaning "no context recorded".
    pub const NONE: Self = Self {
        order: -1,
        offset: -1,
    };
}

impl Default for OutputContext {
    fn default() -> Self {
        Self::NONE
    }
}

/// Builder for creating [`DirectMappedCache`] instances with custom settings
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CacheBuilder {
    /// The cache holds `2^cache_bits - 1` lines
    cache_bits: u32,
}

impl CacheBuilder {
    /// Create a new [`CacheBuilder`] using [`DEFAULT_CACHE_BITS`].
    pub fn new() -> Self {
        Self {
            cache_bits: DEFAULT_CACHE_BITS,
        }
    }

    /// Select the number of hash bits. The cache gets `2^bits - 1` lines.
    pub fn cache_bits(&mut self, bits: u32) -> &mut Self {
        self.cache_bits = bits;
        self
    }

    /// Allocate a [`DirectMappedCache`] with every line empty.
    ///
    /// Fails with [`Error::CacheBits`] unless the bit count is between 1
    /// and [`MAX_CACHE_BITS`].
    pub fn build(&self) -> Result<DirectMappedCache, Error> {
        if (1..=MAX_CACHE_BITS).contains(&self.cache_bits) {
            Ok(DirectMappedCache::allocate(self.cache_bits))
        } else {
            Err(Error::CacheBits(self.cache_bits))
        }
    }
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}
