//! Dense feature matrix.
//!
//! Rows are features (genes), columns are conditions (samples). The matrix is
//! validated once at construction and is immutable afterwards; the splitting
//! engine never reads it directly, only through a
//! [`ScoringModel`](crate::scoring::ScoringModel).

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum MatrixError {
    #[display("feature matrix has no rows")]
    NoFeatures,
    #[display("feature matrix has no columns")]
    NoConditions,
    #[display("row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("non-finite value at row {row}, column {column}")]
    NonFinite { row: usize, column: usize },
}

/// Immutable row-major matrix of finite `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values: Vec<f64>,
    num_features: usize,
    num_conditions: usize,
}

impl FeatureMatrix {
    /// Builds a matrix from one vector per feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use mlsplit_engine::matrix::{FeatureMatrix, MatrixError};
    ///
    /// let matrix = FeatureMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert_eq!(matrix.row(1), &[3.0, 4.0]);
    ///
    /// let err = FeatureMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
    /// assert_eq!(err, MatrixError::RaggedRow { row: 1, expected: 2, actual: 1 });
    /// ```
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let num_conditions = rows.first().ok_or(MatrixError::NoFeatures)?.len();
        let mut values = Vec::with_capacity(rows.len() * num_conditions);
        for (row, data) in rows.iter().enumerate() {
            if data.len() != num_conditions {
                return Err(MatrixError::RaggedRow {
                    row,
                    expected: num_conditions,
                    actual: data.len(),
                });
            }
            values.extend_from_slice(data);
        }
        Self::from_row_major(values, num_conditions)
    }

    /// Builds a matrix from a flat row-major buffer.
    pub fn from_row_major(values: Vec<f64>, num_conditions: usize) -> Result<Self, MatrixError> {
        if num_conditions == 0 {
            return Err(MatrixError::NoConditions);
        }
        if values.is_empty() {
            return Err(MatrixError::NoFeatures);
        }
        if values.len() % num_conditions != 0 {
            let row = values.len() / num_conditions;
            return Err(MatrixError::RaggedRow {
                row,
                expected: num_conditions,
                actual: values.len() % num_conditions,
            });
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(MatrixError::NonFinite {
                row: pos / num_conditions,
                column: pos % num_conditions,
            });
        }
        Ok(Self {
            num_features: values.len() / num_conditions,
            values,
            num_conditions,
        })
    }

    #[must_use]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    #[must_use]
    pub fn num_conditions(&self) -> usize {
        self.num_conditions
    }

    /// Returns the values of one feature across all conditions.
    ///
    /// # Panics
    ///
    /// Panics if `feature >= self.num_features()`.
    #[must_use]
    pub fn row(&self, feature: usize) -> &[f64] {
        let start = feature * self.num_conditions;
        &self.values[start..start + self.num_conditions]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.num_conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape() {
        let matrix =
            FeatureMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(matrix.num_features(), 2);
        assert_eq!(matrix.num_conditions(), 3);
        assert_eq!(matrix.rows().count(), 2);
        assert_eq!(matrix.row(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_empty_matrix() {
        assert_eq!(
            FeatureMatrix::from_rows(vec![]),
            Err(MatrixError::NoFeatures)
        );
        assert_eq!(
            FeatureMatrix::from_rows(vec![vec![], vec![]]),
            Err(MatrixError::NoConditions)
        );
    }

    #[test]
    fn test_non_finite_value() {
        let err = FeatureMatrix::from_rows(vec![vec![1.0, 2.0], vec![f64::NAN, 0.0]]).unwrap_err();
        assert_eq!(err, MatrixError::NonFinite { row: 1, column: 0 });

        let err = FeatureMatrix::from_row_major(vec![0.0, f64::INFINITY], 1).unwrap_err();
        assert_eq!(err, MatrixError::NonFinite { row: 1, column: 0 });
    }

    #[test]
    fn test_row_major_length_mismatch() {
        let err = FeatureMatrix::from_row_major(vec![1.0, 2.0, 3.0], 2).unwrap_err();
        assert_eq!(
            err,
            MatrixError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }
}
