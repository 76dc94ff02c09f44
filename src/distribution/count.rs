//! Reference algorithms for the signed-rank count table.
//!
//! Both algorithms in this module cost `O(2^n)` and exist as oracles for the
//! shift-convolution algorithm in [`super::shift`]; the public API refuses to
//! run them past [`super::EXHAUSTIVE_LIMIT`].

/// Number of subsets of the ranks `1..=y` summing to exactly `x`.
///
/// Rank `y` is either included, contributing `y` to the sum, or excluded:
/// `count(x, y) = count(x - y, y - 1) + count(x, y - 1)`. Deliberately
/// unmemoized; counts stay exact in `f64` well past any size this is
/// permitted to run at.
pub(crate) fn recursive_count(x: i64, y: usize) -> f64 {
    let max = (y * (y + 1) / 2) as i64;
    if x < 0 || x > max {
        return 0.0;
    }
    if y == 1 {
        // Subsets of {1}: the empty set sums to 0, {1} sums to 1.
        return if x == 0 || x == 1 { 1.0 } else { 0.0 };
    }
    recursive_count(x - y as i64, y - 1) + recursive_count(x, y - 1)
}

/// Frequency table over all rank-subset sums, built by enumerating every one
/// of the `2^n` inclusion vectors.
pub(crate) fn enumerate_counts(n: usize) -> Vec<f64> {
    let max = n * (n + 1) / 2;
    let mut freq = vec![0.0; max + 1];
    for mask in 0u64..(1u64 << n) {
        let mut sum = 0usize;
        for rank in 1..=n {
            if mask & (1u64 << (rank - 1)) != 0 {
                sum += rank;
            }
        }
        freq[sum] += 1.0;
    }
    freq
}
