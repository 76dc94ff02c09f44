//! Nonparametric tests built on the exact signed-rank distribution.
//!
//! The paired Wilcoxon signed-rank test uses the exact null distribution from
//! [`crate::distribution`] whenever the sample is small enough and free of
//! ties and zero differences; otherwise it falls back to the normal
//! approximation with tie and continuity corrections.

use crate::distribution::{ExactMethod, signed_rank_cdf};
use crate::testing::{Alternative, FloatOps, FloatOpsTS, TestResult};
use num_traits::Float;
use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator;
use statrs::distribution::{ContinuousCDF, Normal};
use std::cmp::Ordering;

/// Largest sample size (after dropping zero differences) for which the exact
/// null distribution is used; beyond it the normal approximation takes over.
pub const EXACT_SAMPLE_LIMIT: usize = 50;

/// Run Wilcoxon signed-rank tests over many paired samples in parallel.
///
/// # Arguments
/// * `pairs` - Paired samples; each entry is one `(x, y)` pair of equal length
/// * `alternative` - Alternative hypothesis applied to every pair
///
/// # Returns
/// * `Result<Vec<TestResult<T>>>` - One result per pair, in input order
pub fn wilcoxon_signed_rank_batch<T>(
    pairs: &[(Vec<T>, Vec<T>)],
    alternative: Alternative,
) -> anyhow::Result<Vec<TestResult<T>>>
where
    T: FloatOpsTS,
{
    if pairs.is_empty() {
        return Err(anyhow::anyhow!("Paired sample list cannot be empty"));
    }

    let results: Vec<_> = pairs
        .into_par_iter()
        .map(|(x, y)| wilcoxon_signed_rank(x, y, alternative))
        .collect();

    Ok(results)
}

/// Paired Wilcoxon signed-rank test.
///
/// Computes the differences `x[i] - y[i]`, drops zero differences, ranks the
/// absolute differences with ties averaged, and sums the ranks of the
/// positive differences into the statistic `W+`. The p-value is exact when
/// the sample is small with no ties and no dropped zeros, and a
/// continuity-corrected normal approximation otherwise.
///
/// Mismatched or empty inputs yield a NaN statistic with p-value 1 rather
/// than an error.
pub fn wilcoxon_signed_rank<T>(x: &[T], y: &[T], alternative: Alternative) -> TestResult<T>
where
    T: FloatOps,
{
    if x.len() != y.len() || x.is_empty() {
        return TestResult::new(<T as Float>::nan(), T::one());
    }

    // Zero differences carry no sign information and are dropped.
    let diffs: Vec<T> = x
        .iter()
        .zip(y.iter())
        .map(|(&a, &b)| a - b)
        .filter(|d| *d != T::zero())
        .collect();
    let n_dropped = x.len() - diffs.len();
    let n = diffs.len();

    if n == 0 {
        return TestResult::new(<T as Float>::nan(), T::one());
    }

    // Sort by |d|, keeping the sign of each difference alongside
    let mut by_abs: Vec<(T, bool)> = diffs
        .iter()
        .map(|&d| (Float::abs(d), d > T::zero()))
        .collect();
    by_abs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    // Assign ranks (with ties averaged)
    let mut ranks = vec![T::zero(); n];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let val = by_abs[i].0;
        let mut j = i + 1;

        while j < n && by_abs[j].0 == val {
            j += 1;
        }

        let size = j - i;
        tie_term += (size * size * size - size) as f64;

        let rank = T::from(i + j - 1).unwrap() / T::from(2.0).unwrap() + T::one();
        for k in i..j {
            ranks[k] = rank;
        }

        i = j;
    }

    // W+ = sum of the ranks of the positive differences
    let mut w_plus = T::zero();
    for i in 0..n {
        if by_abs[i].1 {
            w_plus += ranks[i];
        }
    }
    let w = w_plus.to_f64().unwrap();

    let exact = tie_term == 0.0 && n_dropped == 0 && n <= EXACT_SAMPLE_LIMIT;
    let p_value = if exact {
        exact_p_value(w, n, alternative)
    } else {
        normal_approx_p_value(w, n, tie_term, alternative)
    };

    let n_f = n as f64;
    let mean_w = n_f * (n_f + 1.0) / 4.0;
    let var_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_term / 48.0;
    let standard_error = var_w.sqrt();
    let z = if standard_error > 0.0 {
        (w - mean_w) / standard_error
    } else {
        0.0
    };
    let effect_size = z / n_f.sqrt();

    TestResult::with_effect_size(
        w_plus,
        T::from(p_value).unwrap(),
        T::from(effect_size).unwrap(),
    )
    .with_standard_error(T::from(standard_error).unwrap())
    .with_metadata("z_score", T::from(z).unwrap())
    .with_metadata("mean_w", T::from(mean_w).unwrap())
    .with_metadata("var_w", T::from(var_w).unwrap())
    .with_metadata("n_used", T::from(n).unwrap())
    .with_metadata("n_zero_dropped", T::from(n_dropped).unwrap())
    .with_metadata("exact", if exact { T::one() } else { T::zero() })
}

/// Exact tail probabilities from the signed-rank null distribution. With no
/// ties the ranks are integers, so the statistic is too.
fn exact_p_value(w: f64, n: usize, alternative: Alternative) -> f64 {
    let w = w.round() as i64;
    // n >= 1 and the shift method is uncapped, so the cdf cannot fail here.
    let less = signed_rank_cdf(w, n, ExactMethod::Shift).unwrap();
    let greater = 1.0 - signed_rank_cdf(w - 1, n, ExactMethod::Shift).unwrap();
    match alternative {
        Alternative::TwoSided => (2.0 * less.min(greater)).min(1.0),
        Alternative::Less => less,
        Alternative::Greater => greater,
    }
}

fn normal_approx_p_value(w: f64, n: usize, tie_term: f64, alternative: Alternative) -> f64 {
    let n_f = n as f64;
    let mean_w = n_f * (n_f + 1.0) / 4.0;
    let var_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_term / 48.0;
    if var_w <= 0.0 {
        return 1.0;
    }
    let sd = var_w.sqrt();

    let correction = 0.5;
    let normal = Normal::new(0.0, 1.0).unwrap();

    match alternative {
        Alternative::TwoSided => {
            let z = ((w - mean_w).abs() - correction) / sd;
            (2.0 * (1.0 - normal.cdf(z))).min(1.0)
        }
        Alternative::Less => normal.cdf((w - mean_w + correction) / sd),
        Alternative::Greater => 1.0 - normal.cdf((w - mean_w - correction) / sd),
    }
}
