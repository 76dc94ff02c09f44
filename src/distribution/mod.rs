//! Exact null distribution of the signed-rank statistic.
//!
//! Under the null hypothesis of the one-sample/paired Wilcoxon signed-rank
//! test, each rank `1..=n` enters the statistic independently with
//! probability 1/2, so the statistic is the sum of a uniformly random subset
//! of `1..=n`. This module computes that distribution exactly.
//!
//! Three interchangeable algorithms are provided; they agree exactly on any
//! input all of them accept. [`ExactMethod::Shift`] is the practical default
//! with `O(n * max_sum)` cost, while [`ExactMethod::Recursive`] and
//! [`ExactMethod::Enumerate`] are `O(2^n)` reference implementations kept as
//! cross-check oracles.

use anyhow::{Result, anyhow};

pub(crate) mod count;
pub(crate) mod shift;

/// Largest `n` accepted by the exhaustive reference algorithms. Both cost
/// `O(2^n)`; past this point only [`ExactMethod::Shift`] is accepted.
pub const EXHAUSTIVE_LIMIT: usize = 25;

/// Algorithm used to build the exact distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExactMethod {
    /// Unmemoized subset-count recurrence. Reference implementation only.
    Recursive,
    /// Full enumeration of all `2^n` inclusion vectors. Brute-force cross-check.
    Enumerate,
    /// Shift-convolution over the generating function. Practical default.
    #[default]
    Shift,
}

fn max_sum(n: usize) -> usize {
    n * (n + 1) / 2
}

fn validate(n: usize, method: ExactMethod) -> Result<()> {
    if n == 0 {
        return Err(anyhow!("Sample size must be at least 1"));
    }
    if method != ExactMethod::Shift && n > EXHAUSTIVE_LIMIT {
        return Err(anyhow!(
            "{:?} is exponential in n and refuses n = {} (limit {}); use ExactMethod::Shift",
            method,
            n,
            EXHAUSTIVE_LIMIT
        ));
    }
    Ok(())
}

/// Probability that the signed-rank statistic for sample size `n` equals `t`.
///
/// Target sums outside `0..=n*(n+1)/2` have probability exactly 0 and do not
/// error; a zero sample size does.
///
/// # Arguments
/// * `t` - Target rank sum
/// * `n` - Sample size
/// * `method` - Algorithm to use; `ExactMethod::default()` is `Shift`
///
/// # Returns
/// * `Result<f64>` - Probability in [0, 1]
///
/// # Example
/// ```
/// use rank_statistics::distribution::{signed_rank_pmf, ExactMethod};
///
/// // Of the 16 subsets of {1,2,3,4}, exactly {1,4} and {2,3} sum to 5.
/// let p = signed_rank_pmf(5, 4, ExactMethod::Shift).unwrap();
/// assert!((p - 0.125).abs() < 1e-12);
/// ```
pub fn signed_rank_pmf(t: i64, n: usize, method: ExactMethod) -> Result<f64> {
    validate(n, method)?;
    if t < 0 || t as usize > max_sum(n) {
        return Ok(0.0);
    }
    let t = t as usize;
    match method {
        ExactMethod::Recursive => {
            // 2^n fits f64 exactly for every n the recurrence accepts.
            Ok(count::recursive_count(t as i64, n) / (1u64 << n) as f64)
        }
        ExactMethod::Enumerate => Ok(table_pmf(&count::enumerate_counts(n), t)),
        ExactMethod::Shift => Ok(table_pmf(&shift::shift_counts(n), t)),
    }
}

/// Probability that the signed-rank statistic for sample size `n` is `<= t`.
///
/// `t < 0` yields exactly 0 and `t >= n*(n+1)/2` exactly 1; a zero sample
/// size errors.
///
/// # Arguments
/// * `t` - Upper bound on the rank sum (inclusive)
/// * `n` - Sample size
/// * `method` - Algorithm to use; `ExactMethod::default()` is `Shift`
///
/// # Returns
/// * `Result<f64>` - Cumulative probability in [0, 1]
pub fn signed_rank_cdf(t: i64, n: usize, method: ExactMethod) -> Result<f64> {
    validate(n, method)?;
    if t < 0 {
        return Ok(0.0);
    }
    let upper = (t as usize).min(max_sum(n));
    match method {
        ExactMethod::Recursive => {
            let mut acc = 0.0;
            for i in 0..=upper {
                acc += count::recursive_count(i as i64, n);
            }
            Ok(acc / (1u64 << n) as f64)
        }
        ExactMethod::Enumerate => Ok(table_cdf(&count::enumerate_counts(n), upper)),
        ExactMethod::Shift => Ok(table_cdf(&shift::shift_counts(n), upper)),
    }
}

/// Normalize by the computed table total rather than an assumed `2^n`.
fn table_pmf(freq: &[f64], t: usize) -> f64 {
    let total: f64 = freq.iter().sum();
    freq[t] / total
}

fn table_cdf(freq: &[f64], upper: usize) -> f64 {
    let total: f64 = freq.iter().sum();
    let head: f64 = freq[..=upper].iter().sum();
    head / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_zero_sample_size() {
        assert!(signed_rank_pmf(0, 0, ExactMethod::Shift).is_err());
        assert!(signed_rank_cdf(0, 0, ExactMethod::Shift).is_err());
    }

    #[test]
    fn rejects_exhaustive_methods_past_limit() {
        assert!(signed_rank_pmf(10, EXHAUSTIVE_LIMIT + 1, ExactMethod::Recursive).is_err());
        assert!(signed_rank_pmf(10, EXHAUSTIVE_LIMIT + 1, ExactMethod::Enumerate).is_err());
        assert!(signed_rank_pmf(10, EXHAUSTIVE_LIMIT + 1, ExactMethod::Shift).is_ok());
    }

    #[test]
    fn out_of_range_targets_are_zero() {
        assert_eq!(signed_rank_pmf(-1, 5, ExactMethod::Shift).unwrap(), 0.0);
        assert_eq!(signed_rank_pmf(16, 5, ExactMethod::Shift).unwrap(), 0.0);
        assert_eq!(signed_rank_cdf(-1, 5, ExactMethod::Shift).unwrap(), 0.0);
    }

    #[test]
    fn cdf_saturates_at_one() {
        assert_eq!(signed_rank_cdf(10, 4, ExactMethod::Shift).unwrap(), 1.0);
        assert_eq!(signed_rank_cdf(9999, 4, ExactMethod::Shift).unwrap(), 1.0);
    }

    #[test]
    fn n4_concrete_values() {
        // Only the empty subset of {1,2,3,4} sums to 0; {1,4} and {2,3} sum to 5.
        let p0 = signed_rank_pmf(0, 4, ExactMethod::Shift).unwrap();
        assert_relative_eq!(p0, 1.0 / 16.0, epsilon = 1e-12);
        let p5 = signed_rank_pmf(5, 4, ExactMethod::Shift).unwrap();
        assert_relative_eq!(p5, 2.0 / 16.0, epsilon = 1e-12);
    }

    #[test]
    fn cdf_accumulates_pmf() {
        for n in [3usize, 7, 10] {
            let max = n * (n + 1) / 2;
            let mut acc = 0.0;
            for t in 0..=max as i64 {
                acc += signed_rank_pmf(t, n, ExactMethod::Shift).unwrap();
                let cdf = signed_rank_cdf(t, n, ExactMethod::Shift).unwrap();
                assert_relative_eq!(cdf, acc, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn default_method_is_shift() {
        assert_eq!(ExactMethod::default(), ExactMethod::Shift);
    }
}
