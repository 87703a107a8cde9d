//! Naive triple-loop multiplication over a block of rows.
//!
//! Matrices are row-major `dimension x dimension` slices. Products are summed
//! in an `i64` accumulator and narrowed back to `i32` by truncation, so a
//! result that does not fit wraps around instead of saturating or failing.

use crate::partition::RowRange;

/// Compute rows `[range.start, range.end)` of `C = A * B` into `out`.
///
/// `out` holds exactly the rows of `range`, i.e. `range.len() * dimension`
/// cells, with row `range.start` at offset 0. An empty range is a no-op.
pub fn multiply_range(a: &[i32], b: &[i32], dimension: usize, range: RowRange, out: &mut [i32]) {
    debug_assert_eq!(a.len(), dimension * dimension);
    debug_assert_eq!(b.len(), dimension * dimension);
    debug_assert_eq!(out.len(), range.len() * dimension);

    if range.is_empty() {
        return;
    }

    let a_rows = &a[range.cells(dimension)];
    for (a_row, c_row) in a_rows
        .chunks_exact(dimension)
        .zip(out.chunks_exact_mut(dimension))
    {
        for (col, cell) in c_row.iter_mut().enumerate() {
            let mut sum = 0i64;
            for (k, &lhs) in a_row.iter().enumerate() {
                // Wrapping in 64 bits keeps the low 32 bits exact.
                sum = sum.wrapping_add(lhs as i64 * b[k * dimension + col] as i64);
            }
            *cell = sum as i32;
        }
    }
}

/// Single-threaded `C = A * B` over all rows.
pub fn multiply(a: &[i32], b: &[i32], dimension: usize, out: &mut [i32]) {
    multiply_range(a, b, dimension, RowRange::new(0, dimension), out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(dimension: usize) -> Vec<i32> {
        let mut m = vec![0; dimension * dimension];
        for i in 0..dimension {
            m[i * dimension + i] = 1;
        }
        m
    }

    #[test]
    fn test_two_by_two() {
        let a = [1, 2, 3, 4];
        let b = [5, 6, 7, 8];
        let mut c = [0; 4];
        multiply(&a, &b, 2, &mut c);
        assert_eq!(c, [19, 22, 43, 50]);
    }

    #[test]
    fn test_identity() {
        let a = crate::sample::lcg_matrix(42, 16, 100);
        let mut c = vec![0; a.len()];
        multiply(&a, &identity(16), 16, &mut c);
        assert_eq!(a, c);
    }

    #[test]
    fn test_overflow_wraps() {
        let mut c = [7];
        multiply(&[1 << 16], &[1 << 16], 1, &mut c);
        assert_eq!(c, [0]);

        let mut c = [0];
        multiply(&[i32::MAX], &[2], 1, &mut c);
        assert_eq!(c[0], i32::MAX.wrapping_mul(2));
    }

    #[test]
    fn test_accumulation_is_widened() {
        // Each product fits in i32 but the running sum does not; the
        // narrowed result must still equal the exact sum mod 2^32.
        let dimension = 4;
        let a = vec![1 << 30; dimension * dimension];
        let b = vec![3; dimension * dimension];
        let mut c = vec![0; dimension * dimension];
        multiply(&a, &b, dimension, &mut c);

        let exact: i64 = (1i64 << 30) * 3 * dimension as i64;
        assert!(c.iter().all(|&v| v == exact as i32));
    }

    #[test]
    fn test_range_writes_only_its_rows() {
        let dimension = 5;
        let a = crate::sample::lcg_matrix(1, dimension, 50);
        let b = crate::sample::lcg_matrix(2, dimension, 50);
        let mut full = vec![0; dimension * dimension];
        multiply(&a, &b, dimension, &mut full);

        let range = RowRange::new(2, 4);
        let mut block = vec![0; range.len() * dimension];
        multiply_range(&a, &b, dimension, range, &mut block);
        assert_eq!(block, &full[range.cells(dimension)]);
    }

    #[test]
    fn test_empty_range_is_noop() {
        let a = [1, 2, 3, 4];
        let mut out: [i32; 0] = [];
        multiply_range(&a, &a, 2, RowRange::new(1, 1), &mut out);
    }
}
