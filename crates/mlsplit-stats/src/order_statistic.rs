//! Closed forms for uniform order statistics.
//!
//! The `a`-th smallest of `b` independent `Uniform(0, 1)` draws follows
//! `Beta(a, b - a + 1)`. Multilevel splitting estimates a tail probability as a
//! product of such order statistics, one per recorded level, so the estimator
//! works with their expected logarithms.

use crate::special::{digamma, trigamma};

/// Expected natural log of the `a`-th smallest of `b` uniform draws.
///
/// Equals `ψ(a) - ψ(b + 1)`. Values are non-positive for `1 <= a <= b + 1`,
/// and `beta_mean_log(b + 1, b)` is exactly zero.
///
/// # Examples
///
/// ```
/// use mlsplit_stats::order_statistic::beta_mean_log;
///
/// // Median of 101 draws sits close to ln(1/2).
/// let value = beta_mean_log(51, 101);
/// assert!((value - 0.5_f64.ln()).abs() < 0.02);
/// assert_eq!(beta_mean_log(102, 101), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn beta_mean_log(a: usize, b: usize) -> f64 {
    if a == b + 1 {
        return 0.0;
    }
    digamma(a as f64) - digamma((b + 1) as f64)
}

/// Standard deviation of `log2(p)` for a multilevel estimate `p`.
///
/// Every completed level contributes the variance of the log of the median
/// order statistic, `ψ₁((n + 1) / 2) - ψ₁(n + 1)`; a probability of `p` needs
/// about `floor(-log2(p) + 1)` levels.
///
/// Returns `NaN` when `p` is not in `(0, 1]`.
///
/// # Examples
///
/// ```
/// use mlsplit_stats::order_statistic::multilevel_log2_error;
///
/// let coarse = multilevel_log2_error(1e-10, 11);
/// let fine = multilevel_log2_error(1e-10, 1001);
/// assert!(fine < coarse);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn multilevel_log2_error(p_value: f64, sample_size: usize) -> f64 {
    if !(p_value > 0.0 && p_value <= 1.0) {
        return f64::NAN;
    }
    let n = sample_size as f64;
    let levels = (-p_value.log2() + 1.0).floor();
    let level_variance = trigamma((n + 1.0) / 2.0) - trigamma(n + 1.0);
    (levels * level_variance).sqrt() / std::f64::consts::LN_2
}
