use crate::testing::correction::{self, AdjustmentMethod};
use crate::testing::{Alternative, FloatOpsTS, MultipleTestResults};

pub mod nonparametric;

/// Run Wilcoxon signed-rank tests over many paired samples and apply a
/// multiple testing correction to the resulting p-values.
///
/// # Arguments
/// * `pairs` - Paired samples; each entry is one `(x, y)` pair
/// * `alternative` - Alternative hypothesis applied to every pair
/// * `method` - Correction applied across the family of tests
///
/// # Returns
/// * `Result<MultipleTestResults<T>>` - Statistics, raw and adjusted p-values,
///   and effect sizes, all in input order
pub fn paired_analysis<T>(
    pairs: &[(Vec<T>, Vec<T>)],
    alternative: Alternative,
    method: AdjustmentMethod,
) -> anyhow::Result<MultipleTestResults<T>>
where
    T: FloatOpsTS,
{
    let results = nonparametric::wilcoxon_signed_rank_batch(pairs, alternative)?;

    let statistics: Vec<T> = results.iter().map(|r| r.statistic).collect();
    let p_values: Vec<T> = results.iter().map(|r| r.p_value).collect();

    let raw: Vec<f64> = p_values.iter().map(|p| p.to_f64().unwrap()).collect();
    let adjusted: Vec<T> = correction::adjust_p_values(&raw, method)?
        .into_iter()
        .map(|p| T::from(p).unwrap())
        .collect();

    let effect_sizes: Vec<T> = results.iter().filter_map(|r| r.effect_size).collect();

    let mut out = MultipleTestResults::new(statistics, p_values)
        .with_adjusted_p_values(adjusted)
        .with_global_metadata("test_type", "wilcoxon_signed_rank");
    if effect_sizes.len() == results.len() {
        out = out.with_effect_sizes(effect_sizes);
    }
    Ok(out)
}
