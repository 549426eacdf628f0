//! Storage, growth and indexed access for [`SegmentedLongArray`]

use super::search::{self, Slot};
use super::{LongArrayBuilder, MAX_SEGMENT_LEN};
use crate::Error;
use std::fmt;
use tracing::debug;

/// Growable array of `i64` values split across fixed-length segments
///
/// The logical size and the allocated capacity are tracked separately.
/// Checked accessors ([`Self::get`], [`Self::set`]) only accept indices
/// below the logical size, while the growing writers extend both as needed.
///
/// Instances are not synchronized. Hold one per thread, or wrap it in a
/// lock owned by the caller.
#[derive(Clone)]
pub struct SegmentedLongArray {
    /// Number of logically valid values, always at most the capacity
    size: u64,
    /// Length of every segment except possibly the last
    segment_len: usize,
    /// Backing storage, with total length equal to the capacity
    segments: Vec<Vec<i64>>,
}

impl SegmentedLongArray {
    /// Make a new empty array with room for `initial_capacity` values,
    /// using default segment sizes.
    ///
    /// See [`LongArrayBuilder`] for other options.
    pub fn new(initial_capacity: u64) -> Self {
        LongArrayBuilder::new()
            .initial_capacity(initial_capacity)
            .build()
    }

    /// Start building an array with custom settings.
    pub fn builder() -> LongArrayBuilder {
        LongArrayBuilder::new()
    }

    /// Construct an array from already validated options.
    pub(super) fn with_options(initial_capacity: u64, segment_len: usize) -> Self {
        debug_assert!((1..=MAX_SEGMENT_LEN).contains(&segment_len));
        let mut array = Self {
            size: 0,
            segment_len,
            segments: Vec::new(),
        };
        array.realloc(initial_capacity);
        array
    }

    /// Number of logically valid values.
    pub fn len(&self) -> u64 {
        self.size
    }

    /// Returns true if no values have been written.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of values the array can hold without reallocating.
    pub fn capacity(&self) -> u64 {
        match self.segments.last() {
            None => 0,
            Some(last) => self.full_segment_values(self.segments.len() - 1) + last.len() as u64,
        }
    }

    /// Length of each full segment.
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Number of allocated segments.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Read the value at `index`.
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is not below [`Self::len()`].
    pub fn get(&self, index: u64) -> Result<i64, Error> {
        self.check_index(index)?;
        Ok(self.read(index))
    }

    /// Overwrite the value at `index`.
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is not below [`Self::len()`].
    pub fn set(&mut self, index: u64, value: i64) -> Result<(), Error> {
        self.check_index(index)?;
        self.write(index, value);
        Ok(())
    }

    /// Write `value` at `index`, growing the capacity and the logical size
    /// as needed.
    ///
    /// Slots between the old size and `index` read as zero unless they
    /// were written earlier and later trimmed away.
    pub fn set_and_grow_if_needed(&mut self, index: u64, value: i64) {
        self.ensure_capacity(index + 1);
        self.size = self.size.max(index + 1);
        self.write(index, value);
    }

    /// Make sure at least `min_capacity` values fit without reallocating.
    ///
    /// When growth is needed, the new capacity is the larger of
    /// `min_capacity` and one and a half times the old capacity plus one.
    pub fn ensure_capacity(&mut self, min_capacity: u64) {
        let old_capacity = self.capacity();
        if min_capacity > old_capacity {
            let grown = old_capacity.saturating_mul(3) / 2 + 1;
            self.realloc(grown.max(min_capacity));
        }
    }

    /// Append a value at the end, growing as needed.
    pub fn add(&mut self, value: i64) {
        self.set_and_grow_if_needed(self.size, value);
    }

    /// Append a value at the end without checking capacity first.
    ///
    /// This is the bulk loading fast path for arrays that were sized up
    /// front. The caller must have reserved room, with [`Self::new()`] or
    /// [`Self::ensure_capacity()`]. Panics if the array is already full.
    #[inline(always)]
    pub fn add_with_fixed_capacity(&mut self, value: i64) {
        self.write(self.size, value);
        self.size += 1;
    }

    /// Release any capacity beyond the current size.
    pub fn trim(&mut self) {
        self.trim_to_size(self.size);
    }

    /// Reallocate the backing storage to hold exactly `size` values.
    ///
    /// If `size` is smaller than the current length, the array is truncated.
    pub fn trim_to_size(&mut self, size: u64) {
        self.size = self.size.min(size);
        self.realloc(size);
    }

    /// Move `length` values starting at `src` so they start at `dest`.
    ///
    /// Overlapping runs are handled in either direction. The array grows
    /// first if the destination run ends past the current size. The source
    /// run must lie within the current size.
    ///
    /// When each run sits inside a single segment this is one bulk copy.
    /// Runs that straddle a segment boundary are copied one value at a
    /// time, starting from the end of the run when `dest > src`.
    pub fn shift(&mut self, src: u64, dest: u64, length: u64) {
        if length == 0 || src == dest {
            return;
        }
        let dest_end = dest + length;
        if dest_end > self.size {
            self.ensure_capacity(dest_end);
            self.size = dest_end;
        }

        let (src_segment, src_offset) = self.locate(src);
        let (dest_segment, dest_offset) = self.locate(dest);
        let single_src = src_segment == self.locate(src + length - 1).0;
        let single_dest = dest_segment == self.locate(dest_end - 1).0;

        if single_src && single_dest {
            // Both runs fit in one segment, so length fits in a usize.
            let len = length as usize;
            if src_segment == dest_segment {
                self.segments[src_segment].copy_within(src_offset..src_offset + len, dest_offset);
            } else {
                let (from, to) = segment_pair(&mut self.segments, src_segment, dest_segment);
                to[dest_offset..dest_offset + len]
                    .copy_from_slice(&from[src_offset..src_offset + len]);
            }
        } else if dest > src {
            for i in (0..length).rev() {
                let value = self.read(src + i);
                self.write(dest + i, value);
            }
        } else {
            for i in 0..length {
                let value = self.read(src + i);
                self.write(dest + i, value);
            }
        }
    }

    /// Write `value` into every index in `0..count`, growing as needed.
    pub fn fill(&mut self, value: i64, count: u64) {
        self.ensure_capacity(count);
        self.size = self.size.max(count);
        let mut remaining = count;
        for segment in &mut self.segments {
            if remaining == 0 {
                break;
            }
            let run = remaining.min(segment.len() as u64) as usize;
            segment[..run].fill(value);
            remaining -= run as u64;
        }
    }

    /// Probe `[range_start, range_end)` for `key`, open-addressing style.
    ///
    /// Scanning begins at `start_index` and wraps around to `range_start`
    /// once, so each slot in the range is visited at most one time. For
    /// the first slot that holds either `key` or `empty_key`:
    ///
    /// - a slot holding `key` returns its index,
    /// - a slot holding `empty_key` returns its index if
    ///   `return_first_empty_index` is set, or -1 otherwise.
    ///
    /// If neither value appears anywhere in the range, returns -1. With
    /// `return_first_empty_index` set, that result means the table is full.
    ///
    /// `empty_key` must never be stored as real data in the range. A
    /// `start_index` outside the range starts the scan at `range_start`.
    /// Panics if `range_end` is past the capacity.
    pub fn linear_search(
        &self,
        key: i64,
        range_start: u64,
        range_end: u64,
        start_index: u64,
        empty_key: i64,
        return_first_empty_index: bool,
    ) -> i64 {
        assert!(
            range_end <= self.capacity(),
            "search range end {} exceeds array capacity {}",
            range_end,
            self.capacity()
        );
        let start = if (range_start..range_end).contains(&start_index) {
            start_index
        } else {
            range_start
        };
        let slot = search::probe(
            &self.segments,
            self.segment_len,
            range_start..range_end,
            start,
            key,
            empty_key,
        );
        match slot {
            Slot::Key(index) => index as i64,
            Slot::Empty(index) if return_first_empty_index => index as i64,
            Slot::Empty(_) | Slot::Full => -1,
        }
    }

    /// Add `count` to the value at `index`.
    ///
    /// This is a plain read-modify-write, wrapping on overflow. Returns
    /// [`Error::IndexOutOfRange`] if `index` is not below [`Self::len()`].
    pub fn increment_count(&mut self, index: u64, count: i64) -> Result<(), Error> {
        let old = self.get(index)?;
        self.set(index, old.wrapping_add(count))
    }

    /// Iterate over the values in `0..len()`, in order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.segments
            .iter()
            .flat_map(|segment| segment.iter().copied())
            .take(self.size as usize)
    }

    /// Fail with [`Error::IndexOutOfRange`] unless `index` is below the size.
    #[inline(always)]
    fn check_index(&self, index: u64) -> Result<(), Error> {
        if index < self.size {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                size: self.size,
            })
        }
    }

    /// Split a logical index into its segment number and offset.
    #[inline(always)]
    fn locate(&self, index: u64) -> (usize, usize) {
        let segment_len = self.segment_len as u64;
        ((index / segment_len) as usize, (index % segment_len) as usize)
    }

    /// Total number of values held by the first `count` segments.
    #[inline(always)]
    fn full_segment_values(&self, count: usize) -> u64 {
        count as u64 * self.segment_len as u64
    }

    /// Read a slot below the capacity. Panics past the capacity.
    #[inline(always)]
    fn read(&self, index: u64) -> i64 {
        let (segment, offset) = self.locate(index);
        self.segments[segment][offset]
    }

    /// Write a slot below the capacity. Panics past the capacity.
    #[inline(always)]
    fn write(&mut self, index: u64, value: i64) {
        let (segment, offset) = self.locate(index);
        self.segments[segment][offset] = value;
    }

    /// Replace the backing storage with one of exactly `capacity` values.
    ///
    /// Existing segments are carried over in order. Those that already
    /// have the right length are moved without touching their contents,
    /// the rest are extended with zeroes or truncated. Segments beyond the
    /// new capacity are dropped.
    fn realloc(&mut self, capacity: u64) {
        let old_capacity = self.capacity();
        let segment_len = self.segment_len as u64;
        let full = (capacity / segment_len) as usize;
        let tail = (capacity % segment_len) as usize;
        let num_segments = full + usize::from(tail > 0);

        let mut old_segments = std::mem::take(&mut self.segments).into_iter();
        let mut segments = Vec::with_capacity(num_segments);
        let mut reused = 0_usize;
        for i in 0..num_segments {
            let len = if i < full { self.segment_len } else { tail };
            let segment = match old_segments.next() {
                Some(old) if old.len() == len => {
                    reused += 1;
                    old
                }
                Some(old) => resize_segment(old, len),
                None => vec![0; len],
            };
            segments.push(segment);
        }
        self.segments = segments;

        debug!(
            old_capacity,
            new_capacity = capacity,
            segments = num_segments,
            reused,
            "long_array.realloc"
        );
    }
}

impl fmt::Debug for SegmentedLongArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentedLongArray")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .field("segment_len", &self.segment_len)
            .field("segments", &self.segments.len())
            .finish()
    }
}

/// Change a segment's length to exactly `len`, zero-filling new slots.
fn resize_segment(mut segment: Vec<i64>, len: usize) -> Vec<i64> {
    if len > segment.len() {
        segment.reserve_exact(len - segment.len());
        segment.resize(len, 0);
    } else {
        segment.truncate(len);
        segment.shrink_to_fit();
    }
    segment
}

/// Borrow one segment for reading and a different one for writing.
///
/// Panics if `from == to`.
fn segment_pair(segments: &mut [Vec<i64>], from: usize, to: usize) -> (&[i64], &mut [i64]) {
    assert_ne!(from, to);
    if from < to {
        let (low, high) = segments.split_at_mut(to);
        (low[from].as_slice(), high[0].as_mut_slice())
    } else {
        let (low, high) = segments.split_at_mut(from);
        (high[0].as_slice(), low[to].as_mut_slice())
    }
}
