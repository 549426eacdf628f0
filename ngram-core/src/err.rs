//! Error types for the `ngram-core` crate

/// Errors reported by the long array and score cache
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A checked read or write addressed a slot past the logical end.
    ///
    /// Only `get`, `set` and `increment_count` check their index against
    /// the current size. Growing writes never produce this error.
    #[error("index {index} out of range for long array of size {size}")]
    IndexOutOfRange {
        /// The requested logical index
        index: u64,
        /// Logical size of the array at the time of the request
        size: u64,
    },

    /// A cache was configured with an unusable number of hash bits.
    ///
    /// The bit count must be between 1 and [`crate::MAX_CACHE_BITS`].
    #[error("cache bit count {0} is outside the supported range")]
    CacheBits(u32),
}
