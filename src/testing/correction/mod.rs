//! Multiple testing correction.
//!
//! When many hypothesis tests run simultaneously, raw p-values must be
//! adjusted to control either the family-wise error rate (Bonferroni, Šidák,
//! Holm, Hochberg, Hommel) or the false discovery rate (Benjamini-Hochberg,
//! Benjamini-Yekutieli). Every method returns adjusted p-values in the same
//! order as the input; the stepwise methods sort internally and unsort by
//! original index before returning.

use anyhow::{Result, anyhow};
use std::cmp::Ordering;

/// Significance level consumed by [`AdjustmentMethod::HommelOriginal`];
/// every other method ignores the level entirely.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Multiple testing correction method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdjustmentMethod {
    /// No adjustment; raw p-values pass through unchanged.
    None,
    /// `p * k`, capped at 1. Controls FWER; the most conservative method.
    Bonferroni,
    /// `1 - (1 - p)^k`. Controls FWER for independent tests.
    Sidak,
    /// Step-down Bonferroni (Holm 1979). Controls FWER and is uniformly more
    /// powerful than Bonferroni.
    Holm,
    /// Step-down with the Šidák transform at each step.
    HolmSidak,
    /// Step-up (Hochberg 1988). Controls FWER for independent tests.
    Hochberg,
    /// Hommel's procedure in Wright's (1992) formulation; needs no level.
    Hommel,
    /// Hommel's original (1988) level-dependent procedure. Unlike the other
    /// stepwise methods its practical effect is a single global multiplier
    /// applied to every raw p-value.
    HommelOriginal { alpha: f64 },
    /// Benjamini-Hochberg (1995). Controls FDR for independent tests.
    BenjaminiHochberg,
    /// Benjamini-Yekutieli (2001). Controls FDR under arbitrary dependence.
    BenjaminiYekutieli,
}

impl Default for AdjustmentMethod {
    fn default() -> Self {
        AdjustmentMethod::Holm
    }
}

/// Apply a multiple testing correction to a slice of p-values.
///
/// # Arguments
/// * `p_values` - A slice of raw p-values, each in [0, 1]
/// * `method` - The correction method to apply
///
/// # Returns
/// * `Result<Vec<f64>>` - Adjusted p-values, same length and order as the input
///
/// # Example
/// ```
/// use rank_statistics::testing::correction::{adjust_p_values, AdjustmentMethod};
///
/// let p_values = vec![0.01, 0.04, 0.03, 0.20];
/// let adjusted = adjust_p_values(&p_values, AdjustmentMethod::Bonferroni).unwrap();
/// assert_eq!(adjusted, vec![0.04, 0.16, 0.12, 0.80]);
/// ```
pub fn adjust_p_values(p_values: &[f64], method: AdjustmentMethod) -> Result<Vec<f64>> {
    match method {
        AdjustmentMethod::None => {
            validate_p_values(p_values)?;
            Ok(p_values.to_vec())
        }
        AdjustmentMethod::Bonferroni => bonferroni_correction(p_values),
        AdjustmentMethod::Sidak => sidak_correction(p_values),
        AdjustmentMethod::Holm => holm_correction(p_values),
        AdjustmentMethod::HolmSidak => holm_sidak_correction(p_values),
        AdjustmentMethod::Hochberg => hochberg_correction(p_values),
        AdjustmentMethod::Hommel => hommel_correction(p_values),
        AdjustmentMethod::HommelOriginal { alpha } => {
            hommel_original_correction(p_values, alpha)
        }
        AdjustmentMethod::BenjaminiHochberg => benjamini_hochberg_correction(p_values),
        AdjustmentMethod::BenjaminiYekutieli => benjamini_yekutieli_correction(p_values),
    }
}

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    if p_values.is_empty() {
        return Err(anyhow!("Empty p-value array"));
    }
    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("Invalid p-value at index {}: {}", i, p));
        }
    }
    Ok(())
}

/// Index/value pairs sorted ascending by p-value. The sort is stable, so tied
/// p-values keep their original relative order and unsorting is reproducible.
fn sorted_ascending(p_values: &[f64]) -> Vec<(usize, f64)> {
    let mut indexed: Vec<(usize, f64)> = p_values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    indexed
}

fn sorted_descending(p_values: &[f64]) -> Vec<(usize, f64)> {
    let mut indexed: Vec<(usize, f64)> = p_values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    indexed
}

/// Apply Bonferroni correction to p-values
///
/// Multiplies each p-value by the number of tests, capping at 1. Order
/// independent, so no sorting is needed.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
pub fn bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let k = p_values.len() as f64;
    Ok(p_values.iter().map(|&p| (p * k).min(1.0)).collect())
}

/// Apply Šidák correction to p-values
///
/// `adj = 1 - (1 - p)^k`, the exact FWER adjustment when all tests are
/// independent. Order independent.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
pub fn sidak_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let k = p_values.len() as i32;
    Ok(p_values
        .iter()
        .map(|&p| (1.0 - (1.0 - p).powi(k)).min(1.0))
        .collect())
}

/// Apply Holm's step-down method for controlling family-wise error rate
///
/// Walks the p-values in ascending order, multiplying the i-th smallest by
/// `k + 1 - i` and carrying the running maximum forward so the adjusted
/// sequence is non-decreasing.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
///
/// # Example
/// ```
/// use rank_statistics::testing::correction::holm_correction;
///
/// let adjusted = holm_correction(&[0.01, 0.04, 0.03, 0.20]).unwrap();
/// assert_eq!(adjusted, vec![0.04, 0.09, 0.09, 0.20]);
/// ```
pub fn holm_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let k = p_values.len();
    let indexed = sorted_ascending(p_values);

    let mut adjusted = vec![0.0; k];
    let mut running_max: f64 = 0.0;
    for (i, &(orig_idx, p)) in indexed.iter().enumerate() {
        let step = (p * (k - i) as f64).min(1.0);
        running_max = running_max.max(step);
        adjusted[orig_idx] = running_max;
    }
    Ok(adjusted)
}

/// Apply the Holm-Šidák step-down method for controlling family-wise error rate
///
/// Same step-down walk as Holm, with the Šidák transform
/// `1 - (1 - p)^(k - i + 1)` at each step instead of the Bonferroni
/// multiplier.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
pub fn holm_sidak_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let k = p_values.len();
    let indexed = sorted_ascending(p_values);

    let mut adjusted = vec![0.0; k];
    let mut running_max: f64 = 0.0;
    for (i, &(orig_idx, p)) in indexed.iter().enumerate() {
        let step = (1.0 - (1.0 - p).powi((k - i) as i32)).min(1.0);
        running_max = running_max.max(step);
        adjusted[orig_idx] = running_max;
    }
    Ok(adjusted)
}

/// Apply Hochberg's step-up method for controlling family-wise error rate
///
/// Walks the p-values in descending order: the largest is kept as-is, and
/// each following value is multiplied by its rank from the top, carrying the
/// running minimum forward.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
pub fn hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let k = p_values.len();
    let indexed = sorted_descending(p_values);

    let mut adjusted = vec![0.0; k];
    let mut running_min: f64 = 1.0;
    for (i, &(orig_idx, p)) in indexed.iter().enumerate() {
        let step = (p * (i + 1) as f64).min(1.0);
        running_min = running_min.min(step);
        adjusted[orig_idx] = running_min;
    }
    Ok(adjusted)
}

/// Apply Hommel's procedure in Wright's (1992) formulation
///
/// Operates on the ascending-sorted p-values `p_(1) <= ... <= p_(k)`,
/// raising a working copy in place. For each `m` from `k` down to 2 the
/// indices above `k - m` receive the minimum of `m * p_(i) / (m + i - k)`
/// over that range, and the indices at or below `k - m` are raised to
/// `min(c_min, m * p_(i))`.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
pub fn hommel_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let k = p_values.len();
    let indexed = sorted_ascending(p_values);
    let sorted: Vec<f64> = indexed.iter().map(|&(_, p)| p).collect();

    let mut working = sorted.clone();
    for m in (2..=k).rev() {
        let lower_len = k - m;

        let mut c_min = f64::INFINITY;
        for (i, &p) in sorted.iter().enumerate().skip(lower_len) {
            let rank = i + 1;
            let c = m as f64 * p / (m + rank - k) as f64;
            if c < c_min {
                c_min = c;
            }
        }
        for value in working[lower_len..].iter_mut() {
            if *value < c_min {
                *value = c_min;
            }
        }
        for i in 0..lower_len {
            let c = (m as f64 * sorted[i]).min(c_min);
            if working[i] < c {
                working[i] = c;
            }
        }
    }

    let mut adjusted = vec![0.0; k];
    for (&(orig_idx, _), &value) in indexed.iter().zip(working.iter()) {
        adjusted[orig_idx] = value.min(1.0);
    }
    Ok(adjusted)
}

/// Apply Hommel's original (1988) level-dependent procedure
///
/// Finds the largest `i` such that `p_(k-i+j) > j * alpha / i` for all
/// `j = 1..=i`. When such an `i` exists every adjusted p-value is the raw
/// value times `i`, capped at 1; when none exists every adjusted p-value
/// is 1.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
/// * `alpha` - The significance level the procedure is evaluated at
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
pub fn hommel_original_correction(p_values: &[f64], alpha: f64) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(anyhow!("Alpha must be between 0 and 1, got {}", alpha));
    }
    let k = p_values.len();
    let sorted: Vec<f64> = sorted_ascending(p_values).iter().map(|&(_, p)| p).collect();

    let mut multiplier = None;
    for i in 1..=k {
        let qualifies =
            (1..=i).all(|j| sorted[k - i + j - 1] > j as f64 * alpha / i as f64);
        if qualifies {
            multiplier = Some(i);
        }
    }

    match multiplier {
        Some(i) => Ok(p_values.iter().map(|&p| (p * i as f64).min(1.0)).collect()),
        None => Ok(vec![1.0; k]),
    }
}

/// Apply Benjamini-Hochberg (BH) procedure for controlling false discovery rate
///
/// The BH procedure controls the false discovery rate (FDR), which is the
/// expected proportion of false positives among all rejected null hypotheses.
/// Computed by walking backward from the largest rank, carrying the running
/// minimum of `p_(i) * k / i`.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
///
/// # Example
/// ```
/// use rank_statistics::testing::correction::benjamini_hochberg_correction;
///
/// let adjusted = benjamini_hochberg_correction(&[0.01, 0.03, 0.05]).unwrap();
/// assert!(adjusted[0] >= 0.01);
/// ```
pub fn benjamini_hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let k = p_values.len();
    let indexed = sorted_ascending(p_values);

    let mut adjusted = vec![0.0; k];
    let mut running_min: f64 = 1.0;
    for i in (0..k).rev() {
        let (orig_idx, p) = indexed[i];
        let rank = (i + 1) as f64;
        let step = (p * k as f64 / rank).min(1.0);
        running_min = running_min.min(step);
        adjusted[orig_idx] = running_min;
    }
    Ok(adjusted)
}

/// Apply Benjamini-Yekutieli (BY) procedure for controlling false discovery rate under dependence
///
/// A more conservative variant of the BH procedure that is valid under
/// arbitrary dependence structures among the tests. The same backward walk as
/// BH, with every term inflated by the harmonic sum `C(k) = 1 + 1/2 + ... + 1/k`.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
pub fn benjamini_yekutieli_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let k = p_values.len();
    let c_k: f64 = (1..=k).map(|j| 1.0 / j as f64).sum();
    let indexed = sorted_ascending(p_values);

    let mut adjusted = vec![0.0; k];
    let mut running_min: f64 = 1.0;
    for i in (0..k).rev() {
        let (orig_idx, p) = indexed[i];
        let rank = (i + 1) as f64;
        let step = (p * c_k * k as f64 / rank).min(1.0);
        running_min = running_min.min(step);
        adjusted[orig_idx] = running_min;
    }
    Ok(adjusted)
}
