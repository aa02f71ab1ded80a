use serde::{Deserialize, Serialize};

/// Append-only record of the thresholds crossed by a splitting run.
///
/// Every duplication round appends the lower half of the population's scores
/// in ascending order. Since the population kept after a round never scores
/// below the last value appended, the whole history is non-decreasing and can
/// be binary searched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelHistory {
    levels: Vec<f64>,
}

impl LevelHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one round of levels.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the round is not sorted or starts below the
    /// last recorded level. Order is [`f64::total_cmp`], the order
    /// [`Population::duplicate`](crate::population::Population::duplicate)
    /// ranks by.
    pub fn push_round<I>(&mut self, sorted_levels: I)
    where
        I: IntoIterator<Item = f64>,
    {
        let start = self.levels.len();
        self.levels.extend(sorted_levels);
        debug_assert!(
            self.levels[start.saturating_sub(1)..].is_sorted_by(|a, b| a.total_cmp(b).is_le()),
            "levels must be appended in ascending order"
        );
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }

    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.levels.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.levels
    }

    /// Number of complete rounds recorded when each round holds `half_size` levels.
    #[must_use]
    pub fn completed_rounds(&self, half_size: usize) -> usize {
        self.levels.len() / half_size
    }

    /// Index of the first level `>= score`, clamped to the last index.
    ///
    /// Returns `None` for an empty history.
    ///
    /// ```
    /// use mlsplit_engine::level_history::LevelHistory;
    ///
    /// let mut history = LevelHistory::new();
    /// history.push_round([1.0, 2.0, 2.0]);
    /// history.push_round([3.0, 5.0, 8.0]);
    ///
    /// assert_eq!(history.search(0.5), Some(0));
    /// assert_eq!(history.search(2.0), Some(1));
    /// assert_eq!(history.search(4.0), Some(4));
    /// assert_eq!(history.search(100.0), Some(5));
    /// ```
    #[must_use]
    pub fn search(&self, score: f64) -> Option<usize> {
        let last = self.last()?;
        if score >= last {
            return Some(self.levels.len() - 1);
        }
        Some(self.levels.partition_point(|&level| level < score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let history = LevelHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.last(), None);
        assert_eq!(history.search(1.0), None);
    }

    #[test]
    fn test_completed_rounds() {
        let mut history = LevelHistory::new();
        history.push_round([0.0, 1.0, 2.0, 3.0]);
        history.push_round([3.0, 4.0, 5.0, 6.0]);
        assert_eq!(history.completed_rounds(4), 2);
        assert_eq!(history.last(), Some(6.0));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut history = LevelHistory::new();
        history.push_round([0.5, 1.5]);
        assert_eq!(serde_json::to_string(&history).unwrap(), "[0.5,1.5]");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "ascending")]
    fn test_unsorted_round_is_rejected() {
        let mut history = LevelHistory::new();
        history.push_round([2.0, 1.0]);
    }
}
