use serde::{Deserialize, Serialize};

/// Descriptive summary of a sample of scores.
///
/// Used to report how a population of candidate subsets is distributed at a
/// given level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Number of scores in the sample.
    pub count: usize,
    /// The smallest score.
    pub min: f64,
    /// The largest score.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Upper median (element at `count / 2` after sorting).
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl ScoreSummary {
    /// Summarizes unsorted scores.
    ///
    /// Returns `None` for an empty sample. `NaN` values sort after every
    /// other value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mlsplit_stats::summary::ScoreSummary;
    /// let summary = ScoreSummary::new([4.0, 1.0, 3.0, 2.0]).unwrap();
    /// assert_eq!(summary.count, 4);
    /// assert_eq!(summary.min, 1.0);
    /// assert_eq!(summary.max, 4.0);
    /// assert_eq!(summary.mean, 2.5);
    /// assert_eq!(summary.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut scores = scores.into_iter().collect::<Vec<_>>();
        scores.sort_by(f64::total_cmp);
        Self::from_sorted(&scores)
    }

    /// Like [`Self::new`], but skips sorting.
    ///
    /// # Panics
    ///
    /// Panics if `sorted` is not in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        assert!(
            sorted.is_sorted_by(|a, b| a.total_cmp(b).is_le()),
            "scores must be sorted in ascending order"
        );

        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let count = sorted.len();
        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median: sorted[count / 2],
            std_dev: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert!(ScoreSummary::new(std::iter::empty()).is_none());
    }

    #[test]
    fn test_constant_sample_has_zero_spread() {
        let summary = ScoreSummary::new([2.5; 9]).unwrap();
        assert_eq!(summary.count, 9);
        assert!(summary.std_dev.abs() < 1e-15);
        assert!((summary.mean - 2.5).abs() < 1e-15);
    }

    #[test]
    fn test_std_dev() {
        let summary = ScoreSummary::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((summary.mean - 5.0).abs() < 1e-12);
        assert!((summary.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "sorted")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = ScoreSummary::from_sorted(&[3.0, 1.0]);
    }
}
