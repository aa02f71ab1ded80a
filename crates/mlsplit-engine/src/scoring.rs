//! Scoring models: how a subset of features becomes a scalar score.
//!
//! The splitting engine treats the profile of a subset as opaque. It needs
//! exactly three operations from a model:
//!
//! - [`ScoringModel::profile`] - build a profile from scratch
//! - [`ScoringModel::score`] - reduce a profile to a score (larger = rarer)
//! - [`ScoringModel::adjust_profile`] - update a profile after swapping one
//!   element, which must agree with rebuilding it from scratch
//!
//! Mutation calls `adjust_profile` once per attempted swap, so a cheap
//! incremental update is what makes long runs affordable.

use std::fmt;

use crate::matrix::FeatureMatrix;

/// A deterministic scoring model over subsets of `0..num_features()`.
pub trait ScoringModel {
    /// Derived representation of a subset.
    type Profile: Clone + fmt::Debug;

    /// Number of features subsets are drawn from.
    fn num_features(&self) -> usize;

    /// Computes the profile of `subset` from scratch.
    fn profile(&self, subset: &[usize]) -> Self::Profile;

    /// Reduces a profile to its score.
    fn score(&self, profile: &Self::Profile) -> f64;

    /// Writes into `new_profile` the profile obtained from `profile` by
    /// replacing feature `index_out` with `index_in`.
    ///
    /// `new_profile` holds an arbitrary previous profile on entry and must be
    /// fully overwritten.
    fn adjust_profile(
        &self,
        profile: &Self::Profile,
        new_profile: &mut Self::Profile,
        index_in: usize,
        index_out: usize,
    );
}

/// Squared norm of the summed expression profile.
///
/// The profile of a subset is the column-wise sum of its rows; the score is the
/// sum of squares of that vector. Subsets whose features move together across
/// conditions score high.
///
/// # Examples
///
/// ```
/// use mlsplit_engine::{matrix::FeatureMatrix, scoring::{ScoringModel, SquaredNormScore}};
///
/// let matrix = FeatureMatrix::from_rows(vec![
///     vec![1.0, -1.0],
///     vec![1.0, -1.0],
///     vec![-1.0, 1.0],
/// ]).unwrap();
/// let model = SquaredNormScore::new(matrix);
///
/// let together = model.profile(&[0, 1]);
/// assert_eq!(together, vec![2.0, -2.0]);
/// assert_eq!(model.score(&together), 8.0);
///
/// let cancelling = model.profile(&[0, 2]);
/// assert_eq!(model.score(&cancelling), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SquaredNormScore {
    matrix: FeatureMatrix,
}

impl SquaredNormScore {
    #[must_use]
    pub fn new(matrix: FeatureMatrix) -> Self {
        Self { matrix }
    }

    #[must_use]
    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }
}

impl ScoringModel for SquaredNormScore {
    type Profile = Vec<f64>;

    fn num_features(&self) -> usize {
        self.matrix.num_features()
    }

    fn profile(&self, subset: &[usize]) -> Vec<f64> {
        let mut profile = vec![0.0; self.matrix.num_conditions()];
        for &feature in subset {
            for (acc, value) in profile.iter_mut().zip(self.matrix.row(feature)) {
                *acc += value;
            }
        }
        profile
    }

    fn score(&self, profile: &Vec<f64>) -> f64 {
        profile.iter().map(|v| v * v).sum()
    }

    fn adjust_profile(
        &self,
        profile: &Vec<f64>,
        new_profile: &mut Vec<f64>,
        index_in: usize,
        index_out: usize,
    ) {
        let row_in = self.matrix.row(index_in);
        let row_out = self.matrix.row(index_out);
        new_profile.clear();
        new_profile.extend(
            profile
                .iter()
                .zip(row_in)
                .zip(row_out)
                .map(|((value, add), remove)| value - remove + add),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> SquaredNormScore {
        let rows = (0..10)
            .map(|i| {
                let x = f64::from(i);
                vec![x, x * 0.5 - 2.0, 3.0 - x]
            })
            .collect();
        SquaredNormScore::new(FeatureMatrix::from_rows(rows).unwrap())
    }

    #[test]
    fn test_adjust_matches_recompute() {
        let model = model();
        let profile = model.profile(&[1, 4, 7]);
        let mut adjusted = vec![99.0; 1];
        model.adjust_profile(&profile, &mut adjusted, 9, 4);

        let expected = model.profile(&[1, 9, 7]);
        assert_eq!(adjusted.len(), expected.len());
        for (a, e) in adjusted.iter().zip(&expected) {
            assert!((a - e).abs() < 1e-12);
        }
        assert!((model.score(&adjusted) - model.score(&expected)).abs() < 1e-9);
    }

    #[test]
    fn test_profile_is_order_independent() {
        let model = model();
        assert_eq!(model.profile(&[2, 5, 8]), model.profile(&[8, 2, 5]));
    }

    #[test]
    fn test_score_is_non_negative() {
        let model = model();
        for subset in [[0, 1], [3, 9], [5, 6]] {
            assert!(model.score(&model.profile(&subset)) >= 0.0);
        }
    }
}
