//! A growable array of `i64` values addressed by 64-bit indices
//!
//! Language model tables regularly hold more values than a single
//! allocation should be asked to carry, so [`SegmentedLongArray`] spreads
//! its contents over a list of fixed-length segments. Logical index `i`
//! lives at offset `i % segment_len` within segment `i / segment_len`. Every
//! segment except the last is exactly `segment_len` values long. The last
//! is only as long as the current capacity needs.
//!
//! Growth follows the usual dynamic array rule of 1.5x plus one, so
//! repeated appends cost amortized O(1). Reallocation keeps any segment
//! whose length doesn't change and resizes the rest in place.
//!
//! Besides plain indexed access, the array can act as backing storage for
//! an open-addressing hash table. See [`SegmentedLongArray::linear_search`].

mod search;
mod segmented;

pub use segmented::SegmentedLongArray;

/// Default and maximum segment length, in values
///
/// This matches the largest array a 32-bit signed length can describe.
pub const MAX_SEGMENT_LEN: usize = i32::MAX as usize;

/// Builder for [`SegmentedLongArray`] instances with custom settings
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LongArrayBuilder {
    /// Number of zeroed slots to allocate up front
    initial_capacity: u64,
    /// Length of each full segment
    segment_len: usize,
}

impl LongArrayBuilder {
    /// Create a new [`LongArrayBuilder`] with default settings.
    ///
    /// Immediately calling [`Self::build()`] gives an empty array with no
    /// preallocated capacity and [`MAX_SEGMENT_LEN`] segments.
    pub fn new() -> Self {
        Self {
            initial_capacity: 0,
            segment_len: MAX_SEGMENT_LEN,
        }
    }

    /// Set the number of slots allocated before the first write.
    pub fn initial_capacity(&mut self, capacity: u64) -> &mut Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the length of each segment.
    ///
    /// Values above [`MAX_SEGMENT_LEN`] are lowered to it, and zero is
    /// raised to one. Smaller segments are mostly useful for exercising
    /// segment boundaries without huge allocations.
    pub fn segment_len(&mut self, len: usize) -> &mut Self {
        self.segment_len = len.clamp(1, MAX_SEGMENT_LEN);
        self
    }

    /// Build an empty [`SegmentedLongArray`] with the selected options.
    pub fn build(&self) -> SegmentedLongArray {
        SegmentedLongArray::with_options(self.initial_capacity, self.segment_len)
    }
}

impl Default for LongArrayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
