//! Tail-probability estimates from a level history.
//!
//! After `k` complete rounds with sample size `n`, a score that sits at
//! position `r` inside the next round's block of recorded levels has survived
//! `k` halvings plus a partial one. Each halving multiplies the probability by
//! the `ceil(n/2)`-th order statistic of `n` uniforms, the partial one by the
//! `(n - r + 1)`-th. Summing the expected logs of these factors gives
//!
//! ```text
//! ln p = k · E[ln U(half, n)] + E[ln U(n - r + 1, n)]
//! ```
//!
//! which reaches probabilities far below `1 / n` with only `O(n · log(1/p))`
//! scored subsets.

use serde::{Deserialize, Serialize};

use mlsplit_stats::order_statistic::{beta_mean_log, multilevel_log2_error};

use crate::level_history::LevelHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EstimateError {
    #[display("level history is empty; run the sampler before estimating")]
    EmptyLevelHistory,
    #[display("observed score is NaN")]
    InvalidScore,
}

/// A p-value together with its accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PValueEstimate {
    pub score: f64,
    pub p_value: f64,
    /// Standard deviation of `log2(p_value)`; `None` when the estimate is
    /// only an upper bound.
    pub log2_err: Option<f64>,
    /// The run stopped at its precision bound and `p_value < epsilon`; only
    /// `p < epsilon` is established.
    pub below_precision: bool,
}

/// Estimates `P(score >= observed)` from `levels` recorded with `sample_size`.
///
/// Scores at or above the last level use the last level's estimate; scores at
/// or below the first level give `1`.
///
/// # Examples
///
/// ```
/// use mlsplit_engine::{estimator::tail_probability, level_history::LevelHistory};
///
/// let mut levels = LevelHistory::new();
/// levels.push_round([1.0, 2.0, 3.0, 4.0]);
/// levels.push_round([4.5, 5.0, 6.0, 7.0]);
///
/// assert_eq!(tail_probability(&levels, 7, 0.0).unwrap(), 1.0);
/// let mid = tail_probability(&levels, 7, 4.5).unwrap();
/// let top = tail_probability(&levels, 7, 10.0).unwrap();
/// assert!(top < mid && mid < 1.0);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn tail_probability(
    levels: &LevelHistory,
    sample_size: usize,
    observed: f64,
) -> Result<f64, EstimateError> {
    if observed.is_nan() {
        return Err(EstimateError::InvalidScore);
    }
    let index = levels
        .search(observed)
        .ok_or(EstimateError::EmptyLevelHistory)?;

    let half = sample_size.div_ceil(2);
    let rounds = index / half;
    let remainder = sample_size - index % half;

    let log_p = rounds as f64 * beta_mean_log(half, sample_size)
        + beta_mean_log(remainder + 1, sample_size);
    Ok(log_p.exp().clamp(0.0, 1.0))
}

/// Like [`tail_probability`], with the error estimate and precision flag.
///
/// `epsilon` is the precision bound the history was produced with (`0` for
/// none).
pub fn estimate(
    levels: &LevelHistory,
    sample_size: usize,
    observed: f64,
    epsilon: f64,
) -> Result<PValueEstimate, EstimateError> {
    let p_value = tail_probability(levels, sample_size, observed)?;
    let below_precision = epsilon > 0.0 && p_value < epsilon;
    let log2_err = (!below_precision)
        .then(|| multilevel_log2_error(p_value, sample_size))
        .filter(|err| err.is_finite());
    Ok(PValueEstimate {
        score: observed,
        p_value,
        log2_err,
        below_precision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(sample_size: usize, rounds: usize) -> LevelHistory {
        let half = sample_size.div_ceil(2);
        let mut levels = LevelHistory::new();
        for round in 0..rounds {
            levels.push_round((0..half).map(|i| {
                #[expect(clippy::cast_precision_loss)]
                let level = (round * half + i) as f64;
                level
            }));
        }
        levels
    }

    #[test]
    fn test_empty_history_is_an_error() {
        assert_eq!(
            tail_probability(&LevelHistory::new(), 7, 1.0),
            Err(EstimateError::EmptyLevelHistory)
        );
        assert_eq!(
            estimate(&LevelHistory::new(), 7, 1.0, 0.0),
            Err(EstimateError::EmptyLevelHistory)
        );
    }

    #[test]
    fn test_nan_score_is_an_error() {
        assert_eq!(
            tail_probability(&history(7, 2), 7, f64::NAN),
            Err(EstimateError::InvalidScore)
        );
    }

    #[test]
    fn test_monotone_in_score() {
        let levels = history(7, 6);
        let mut previous = f64::INFINITY;
        for step in -10..300 {
            let score = f64::from(step) * 0.1;
            let p = tail_probability(&levels, 7, score).unwrap();
            assert!((0.0..=1.0).contains(&p));
            assert!(p <= previous, "p({score}) = {p} > {previous}");
            previous = p;
        }
    }

    #[test]
    fn test_below_first_level_is_one() {
        let levels = history(7, 3);
        assert!((tail_probability(&levels, 7, -5.0).unwrap() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_above_last_level_is_clamped() {
        let levels = history(7, 3);
        let last = levels.last().unwrap();
        let at_last = tail_probability(&levels, 7, last).unwrap();
        assert_eq!(tail_probability(&levels, 7, last + 1e6).unwrap(), at_last);
        assert_eq!(tail_probability(&levels, 7, f64::INFINITY).unwrap(), at_last);
    }

    #[test]
    fn test_round_boundary_is_about_one_halving() {
        // With a large sample each complete round halves the probability.
        let levels = history(1001, 5);
        let p = tail_probability(&levels, 1001, 3.0 * 501.0).unwrap();
        assert!((p.log2() + 3.0).abs() < 0.01, "p = {p}");
    }

    #[test]
    fn test_estimate_flags_precision_bound() {
        let levels = history(7, 8);
        let top = estimate(&levels, 7, f64::INFINITY, 0.01).unwrap();
        assert!(top.below_precision);
        assert_eq!(top.log2_err, None);

        let low = estimate(&levels, 7, 1.0, 0.01).unwrap();
        assert!(!low.below_precision);
        assert!(low.log2_err.is_some_and(|err| err > 0.0));
    }
}
