use rank_statistics::distribution::{ExactMethod, signed_rank_cdf, signed_rank_pmf};
use rank_statistics::testing::correction::{AdjustmentMethod, adjust_p_values};

#[cfg(test)]
mod distribution_properties {
    use super::*;

    const METHODS: [ExactMethod; 3] = [
        ExactMethod::Recursive,
        ExactMethod::Enumerate,
        ExactMethod::Shift,
    ];

    #[test]
    fn cross_method_agreement() {
        // All three algorithms must agree on every valid target sum.
        for n in 1..=12usize {
            let max = (n * (n + 1) / 2) as i64;
            for t in -1..=max + 1 {
                let reference = signed_rank_pmf(t, n, ExactMethod::Shift).unwrap();
                for method in METHODS {
                    let pmf = signed_rank_pmf(t, n, method).unwrap();
                    assert!(
                        (pmf - reference).abs() < 1e-9,
                        "pmf mismatch for {method:?} at t = {t}, n = {n}: {pmf} vs {reference}"
                    );
                }
            }
        }
    }

    #[test]
    fn cross_method_agreement_cdf() {
        for n in 1..=10usize {
            let max = (n * (n + 1) / 2) as i64;
            for t in -1..=max + 1 {
                let reference = signed_rank_cdf(t, n, ExactMethod::Shift).unwrap();
                for method in METHODS {
                    let cdf = signed_rank_cdf(t, n, method).unwrap();
                    assert!(
                        (cdf - reference).abs() < 1e-9,
                        "cdf mismatch for {method:?} at t = {t}, n = {n}"
                    );
                }
            }
        }
    }

    #[test]
    fn pmf_sums_to_one() {
        for n in 1..=30usize {
            let max = (n * (n + 1) / 2) as i64;
            let total: f64 = (0..=max)
                .map(|t| signed_rank_pmf(t, n, ExactMethod::Shift).unwrap())
                .sum();
            assert!((total - 1.0).abs() < 1e-9, "pmf total {total} for n = {n}");
        }
    }

    #[test]
    fn pmf_is_symmetric_about_midpoint() {
        for n in 1..=20usize {
            let max = (n * (n + 1) / 2) as i64;
            for t in 0..=max {
                let low = signed_rank_pmf(t, n, ExactMethod::Shift).unwrap();
                let high = signed_rank_pmf(max - t, n, ExactMethod::Shift).unwrap();
                assert!(
                    (low - high).abs() < 1e-9,
                    "asymmetry at t = {t}, n = {n}: {low} vs {high}"
                );
            }
        }
    }

    #[test]
    fn cdf_is_monotone_with_exact_boundaries() {
        for n in 1..=20usize {
            let max = (n * (n + 1) / 2) as i64;
            assert_eq!(signed_rank_cdf(-1, n, ExactMethod::Shift).unwrap(), 0.0);
            assert_eq!(signed_rank_cdf(max, n, ExactMethod::Shift).unwrap(), 1.0);

            let mut previous = 0.0;
            for t in 0..=max {
                let cdf = signed_rank_cdf(t, n, ExactMethod::Shift).unwrap();
                assert!(
                    cdf >= previous,
                    "cdf decreased at t = {t}, n = {n}: {cdf} < {previous}"
                );
                previous = cdf;
            }
        }
    }

    #[test]
    fn n4_worked_example() {
        assert!((signed_rank_pmf(0, 4, ExactMethod::Shift).unwrap() - 1.0 / 16.0).abs() < 1e-12);
        assert!((signed_rank_pmf(5, 4, ExactMethod::Shift).unwrap() - 2.0 / 16.0).abs() < 1e-12);
        assert_eq!(signed_rank_cdf(10, 4, ExactMethod::Shift).unwrap(), 1.0);
    }
}

#[cfg(test)]
mod correction_properties {
    use super::*;

    const ALL_ADJUSTING: [AdjustmentMethod; 9] = [
        AdjustmentMethod::Bonferroni,
        AdjustmentMethod::Sidak,
        AdjustmentMethod::Holm,
        AdjustmentMethod::HolmSidak,
        AdjustmentMethod::Hochberg,
        AdjustmentMethod::Hommel,
        AdjustmentMethod::HommelOriginal { alpha: 0.05 },
        AdjustmentMethod::BenjaminiHochberg,
        AdjustmentMethod::BenjaminiYekutieli,
    ];

    const VECTORS: [&[f64]; 4] = [
        &[0.01, 0.04, 0.03, 0.20],
        &[0.5],
        &[0.001, 0.001, 0.9, 0.9, 0.5],
        &[0.07, 0.2, 0.01, 0.98, 0.03, 0.03, 0.44, 0.0, 1.0],
    ];

    #[test]
    fn adjusted_values_inflate_and_stay_in_range() {
        for &p_values in &VECTORS {
            for method in ALL_ADJUSTING {
                let adjusted = adjust_p_values(p_values, method).unwrap();
                assert_eq!(adjusted.len(), p_values.len());
                for (&raw, &adj) in p_values.iter().zip(adjusted.iter()) {
                    assert!(
                        adj >= raw - 1e-12,
                        "{method:?} deflated {raw} to {adj}"
                    );
                    assert!((0.0..=1.0).contains(&adj), "{method:?} produced {adj}");
                }
            }
        }
    }

    #[test]
    fn bh_is_at_least_as_powerful_as_bonferroni() {
        for &p_values in &VECTORS {
            let bh = adjust_p_values(p_values, AdjustmentMethod::BenjaminiHochberg).unwrap();
            let bonferroni = adjust_p_values(p_values, AdjustmentMethod::Bonferroni).unwrap();
            for (i, (b, f)) in bh.iter().zip(bonferroni.iter()).enumerate() {
                assert!(b <= f, "BH exceeded Bonferroni at index {i}: {b} > {f}");
            }
        }
    }

    #[test]
    fn holm_is_at_least_as_powerful_as_bonferroni() {
        for &p_values in &VECTORS {
            let holm = adjust_p_values(p_values, AdjustmentMethod::Holm).unwrap();
            let bonferroni = adjust_p_values(p_values, AdjustmentMethod::Bonferroni).unwrap();
            for (h, f) in holm.iter().zip(bonferroni.iter()) {
                assert!(h <= f);
            }
        }
    }

    #[test]
    fn permutation_equivariance() {
        // A fixed permutation of the input permutes the output identically.
        let p_values = [0.07, 0.2, 0.01, 0.98, 0.03, 0.03, 0.44];
        let permutation = [3usize, 0, 6, 2, 5, 1, 4];
        let permuted: Vec<f64> = permutation.iter().map(|&i| p_values[i]).collect();

        for method in ALL_ADJUSTING {
            let adjusted = adjust_p_values(&p_values, method).unwrap();
            let adjusted_permuted = adjust_p_values(&permuted, method).unwrap();
            for (slot, &src) in permutation.iter().enumerate() {
                assert!(
                    (adjusted_permuted[slot] - adjusted[src]).abs() < 1e-12,
                    "{method:?} not equivariant at slot {slot}"
                );
            }
        }
    }

    #[test]
    fn none_is_identity() {
        for &p_values in &VECTORS {
            let adjusted = adjust_p_values(p_values, AdjustmentMethod::None).unwrap();
            assert_eq!(adjusted, p_values.to_vec());
        }
    }
}
