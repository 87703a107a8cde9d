//! Static row partitioning.
//!
//! `dimension` rows are split into exactly `thread_count` contiguous ranges.
//! The first `dimension % thread_count` ranges get one extra row, so no two
//! ranges differ in length by more than one.

use core::ops::Range;

/// Half-open range of rows `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Cell offsets `[start * dimension, end * dimension)` in a row-major buffer.
    #[inline]
    pub const fn cells(&self, dimension: usize) -> Range<usize> {
        self.start * dimension..self.end * dimension
    }
}

/// Iterator over the ranges produced by [`partition`].
#[derive(Debug, Clone)]
pub struct RowRanges {
    base: usize,
    remainder: usize,
    count: usize,
    index: usize,
    next_start: usize,
}

/// Split `[0, dimension)` into `thread_count` balanced, consecutive ranges.
///
/// When `thread_count > dimension` the trailing ranges are empty.
/// `thread_count == 0` yields no ranges.
pub fn partition(dimension: usize, thread_count: usize) -> RowRanges {
    let (base, remainder) = if thread_count == 0 {
        (0, 0)
    } else {
        (dimension / thread_count, dimension % thread_count)
    };
    RowRanges {
        base,
        remainder,
        count: thread_count,
        index: 0,
        next_start: 0,
    }
}

impl Iterator for RowRanges {
    type Item = RowRange;

    fn next(&mut self) -> Option<RowRange> {
        if self.index == self.count {
            return None;
        }
        let mut len = self.base;
        if self.index < self.remainder {
            len += 1;
        }
        let range = RowRange::new(self.next_start, self.next_start + len);
        self.next_start = range.end;
        self.index += 1;
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for RowRanges {}

impl core::iter::FusedIterator for RowRanges {}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_cover(dimension: usize, threads: usize) {
        let ranges: Vec<RowRange> = partition(dimension, threads).collect();
        assert_eq!(ranges.len(), threads);

        let mut cursor = 0;
        for r in &ranges {
            assert_eq!(r.start, cursor, "gap or overlap at {r:?}");
            assert!(r.start <= r.end);
            cursor = r.end;
        }
        assert_eq!(cursor, dimension);

        let longest = ranges.iter().map(RowRange::len).max().unwrap();
        let shortest = ranges.iter().map(RowRange::len).min().unwrap();
        assert!(longest - shortest <= 1, "{dimension}/{threads}: {ranges:?}");
    }

    #[test]
    fn test_partition_covers_exactly() {
        for dimension in 1..=40 {
            for threads in 1..=dimension + 5 {
                check_cover(dimension, threads);
            }
        }
    }

    #[test]
    fn test_remainder_goes_to_leading_ranges() {
        let ranges: Vec<_> = partition(10, 4).collect();
        assert_eq!(
            ranges,
            vec![
                RowRange::new(0, 3),
                RowRange::new(3, 6),
                RowRange::new(6, 8),
                RowRange::new(8, 10),
            ]
        );
    }

    #[test]
    fn test_more_threads_than_rows() {
        let ranges: Vec<_> = partition(2, 5).collect();
        assert_eq!(ranges[0], RowRange::new(0, 1));
        assert_eq!(ranges[1], RowRange::new(1, 2));
        assert!(ranges[2..].iter().all(|r| r.is_empty() && r.start == 2));
    }

    #[test]
    fn test_exact_size() {
        let mut it = partition(7, 3);
        assert_eq!(it.len(), 3);
        it.next();
        assert_eq!(it.len(), 2);
        assert_eq!(partition(7, 0).count(), 0);
    }

    #[test]
    fn test_cells() {
        assert_eq!(RowRange::new(1, 3).cells(4), 4..12);
    }
}
