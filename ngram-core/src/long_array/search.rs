//! Open-addressing probe over segmented storage
//!
//! A hash table stored in a [`super::SegmentedLongArray`] marks unused
//! slots with a caller-chosen empty key. Lookups and inserts both start at
//! the key's home slot and walk forward, wrapping around the table range,
//! until they find either the key or an empty slot.

use std::ops::Range;

/// Outcome of one probe sequence
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum Slot {
    /// The key is stored at this index
    Key(u64),
    /// The first empty slot reached, with the key absent before it
    Empty(u64),
    /// Every slot in the range holds some other key
    Full,
}

/// Probe `range` for `key`, starting from `start` and wrapping once.
///
/// `start` must lie within `range`, and the range must lie within the
/// total length of `segments`.
pub(super) fn probe(
    segments: &[Vec<i64>],
    segment_len: usize,
    range: Range<u64>,
    start: u64,
    key: i64,
    empty_key: i64,
) -> Slot {
    debug_assert!(range.is_empty() || range.contains(&start));
    scan(segments, segment_len, start..range.end, key, empty_key)
        .or_else(|| scan(segments, segment_len, range.start..start, key, empty_key))
        .unwrap_or(Slot::Full)
}

/// Scan one contiguous stretch of indices, a segment-sized run at a time.
fn scan(
    segments: &[Vec<i64>],
    segment_len: usize,
    indices: Range<u64>,
    key: i64,
    empty_key: i64,
) -> Option<Slot> {
    let segment_len = segment_len as u64;
    let mut index = indices.start;
    while index < indices.end {
        let segment = &segments[(index / segment_len) as usize];
        let offset = (index % segment_len) as usize;
        let run = (indices.end - index).min((segment.len() - offset) as u64) as usize;
        for (i, &stored) in segment[offset..offset + run].iter().enumerate() {
            if stored == key {
                return Some(Slot::Key(index + i as u64));
            }
            if stored == empty_key {
                return Some(Slot::Empty(index + i as u64));
            }
        }
        index += run as u64;
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;

    const EMPTY: i64 = i64::MIN;

    /// Three segments of length 4, 4 and 2.
    fn table(values: &[i64]) -> Vec<Vec<i64>> {
        values.chunks(4).map(<[i64]>::to_vec).collect()
    }

    #[test]
    fn hit_before_wrap() {
        let segments = table(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(probe(&segments, 4, 0..10, 2, 7, EMPTY), Slot::Key(6));
    }

    #[test]
    fn hit_after_wrap() {
        let segments = table(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(probe(&segments, 4, 0..10, 8, 2, EMPTY), Slot::Key(1));
    }

    #[test]
    fn empty_slot_after_wrap() {
        let segments = table(&[1, EMPTY, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(probe(&segments, 4, 0..10, 5, 42, EMPTY), Slot::Empty(1));
    }

    #[test]
    fn full_range() {
        let segments = table(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(probe(&segments, 4, 0..10, 5, 42, EMPTY), Slot::Full);
    }

    #[test]
    fn sub_range_only() {
        // 3 lives outside the probed range and must not be found
        let segments = table(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(probe(&segments, 4, 3..9, 6, 3, EMPTY), Slot::Full);
        assert_eq!(probe(&segments, 4, 3..9, 6, 4, EMPTY), Slot::Key(3));
    }

    #[test]
    fn empty_range() {
        let segments = table(&[1, 2]);
        assert_eq!(probe(&segments, 4, 1..1, 1, 2, EMPTY), Slot::Full);
    }
}
