//! Deterministic sample matrices and checksums.

/// Generate a `dimension x dimension` matrix from a linear congruential sequence.
///
/// Values fall in `[0, modulus)`. A `modulus` of 0 keeps the raw 32-bit state,
/// which spans the full signed range and is useful for exercising wraparound.
pub fn lcg_matrix(seed: u32, dimension: usize, modulus: u32) -> Vec<i32> {
    let mut s = seed;
    (0..dimension * dimension)
        .map(|_| {
            s = s.wrapping_mul(1103515245).wrapping_add(12345);
            if modulus == 0 {
                s as i32
            } else {
                ((s >> 16) % modulus) as i32
            }
        })
        .collect()
}

/// Wrapping sum of all cells, for cheap comparison of results.
pub fn checksum(cells: &[i32]) -> i64 {
    cells
        .iter()
        .fold(0i64, |acc, &v| acc.wrapping_add(v as i64))
}
