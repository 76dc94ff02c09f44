//! # rank-statistics
//!
//! A Rust library for exact rank-sum distributions, Wilcoxon signed-rank tests,
//! and multiple testing correction.
//!
//! This crate provides the combinatorial machinery behind exact Wilcoxon-type tests:
//! the null distribution of the signed-rank statistic, computed by three interchangeable
//! algorithms, together with the family of multiple-comparison adjustment procedures
//! (Bonferroni, Šidák, Holm, Hochberg, Hommel, Benjamini-Hochberg, Benjamini-Yekutieli).
//!
//! ## Core Features
//!
//! - **Exact Null Distributions**: pmf and cdf of the signed-rank statistic via a
//!   shift-convolution algorithm, with recursive and brute-force reference algorithms
//! - **Nonparametric Testing**: paired Wilcoxon signed-rank tests with exact small-sample
//!   p-values and a normal approximation for large or tied samples
//! - **Multiple Testing Correction**: ten adjustment methods controlling the family-wise
//!   error rate or the false discovery rate
//!
//! ## Quick Start
//!
//! Use [`testing::inference::paired_analysis`] to run signed-rank tests across many
//! paired samples with automatic multiple testing correction, or call
//! [`distribution::signed_rank_pmf`] and [`testing::correction::adjust_p_values`]
//! directly when you already have statistics in hand.
//!
//! ## Module Organization
//!
//! - **[`distribution`]**: Exact null distribution of the signed-rank statistic
//! - **[`testing`]**: Hypothesis tests, shared result types, and multiple testing correction

pub mod distribution;
pub mod testing;
