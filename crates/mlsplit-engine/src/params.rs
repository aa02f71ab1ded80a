//! Parameters of a splitting run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("geneset size must be positive")]
    EmptyGeneset,
    #[display(
        "geneset size {geneset_size} must be less than the number of features {num_features}"
    )]
    GenesetTooLarge {
        geneset_size: usize,
        num_features: usize,
    },
    #[display("sample size must be at least 3, got {sample_size}")]
    SampleSizeTooSmall { sample_size: usize },
    #[display("sample size must be odd, got {sample_size}")]
    EvenSampleSize { sample_size: usize },
    #[display("stall factor must be positive")]
    InvalidStallFactor,
}

/// Size and budget parameters of a [`SplittingSampler`](crate::splitting::SplittingSampler).
///
/// Deserializes from JSON with defaults for everything except `geneset_size`:
///
/// ```
/// use mlsplit_engine::params::SplittingParams;
///
/// let params: SplittingParams = serde_json::from_str(r#"{ "geneset_size": 15 }"#).unwrap();
/// assert_eq!(params, SplittingParams::new(101, 15));
/// assert_eq!(params.half_size(), 51);
/// assert_eq!(params.mutation_attempts(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplittingParams {
    /// Number of subsets in the population. Must be odd and at least 3.
    #[serde(default = "SplittingParams::default_sample_size")]
    pub sample_size: usize,
    /// Number of features per subset.
    pub geneset_size: usize,
    /// A sweep gives up after `stall_factor * sample_size * geneset_size`
    /// mutation attempts.
    #[serde(default = "SplittingParams::default_stall_factor")]
    pub stall_factor: usize,
}

impl SplittingParams {
    pub const DEFAULT_SAMPLE_SIZE: usize = 101;
    pub const DEFAULT_STALL_FACTOR: usize = 1000;

    #[must_use]
    pub const fn new(sample_size: usize, geneset_size: usize) -> Self {
        Self {
            sample_size,
            geneset_size,
            stall_factor: Self::DEFAULT_STALL_FACTOR,
        }
    }

    #[must_use]
    pub const fn with_stall_factor(self, stall_factor: usize) -> Self {
        Self {
            stall_factor,
            ..self
        }
    }

    const fn default_sample_size() -> usize {
        Self::DEFAULT_SAMPLE_SIZE
    }

    const fn default_stall_factor() -> usize {
        Self::DEFAULT_STALL_FACTOR
    }

    /// Checks the parameters against the number of features available.
    pub fn validate(&self, num_features: usize) -> Result<(), ConfigError> {
        let Self {
            sample_size,
            geneset_size,
            stall_factor,
        } = *self;
        if geneset_size == 0 {
            return Err(ConfigError::EmptyGeneset);
        }
        if geneset_size >= num_features {
            return Err(ConfigError::GenesetTooLarge {
                geneset_size,
                num_features,
            });
        }
        if sample_size < 3 {
            return Err(ConfigError::SampleSizeTooSmall { sample_size });
        }
        if sample_size % 2 == 0 {
            return Err(ConfigError::EvenSampleSize { sample_size });
        }
        if stall_factor == 0 {
            return Err(ConfigError::InvalidStallFactor);
        }
        Ok(())
    }

    /// Number of levels recorded per duplication round, `ceil(sample_size / 2)`.
    #[must_use]
    pub const fn half_size(&self) -> usize {
        self.sample_size.div_ceil(2)
    }

    /// Swap attempts per mutation call, `max(1, round(geneset_size / 10))`.
    #[must_use]
    pub const fn mutation_attempts(&self) -> usize {
        let attempts = (self.geneset_size + 5) / 10;
        if attempts == 0 { 1 } else { attempts }
    }

    /// Accepted moves a sweep must accumulate before the next duplication.
    #[must_use]
    pub const fn sweep_budget(&self) -> usize {
        self.sample_size * self.geneset_size
    }

    /// Mutation attempts after which a sweep is reported as stalled.
    #[must_use]
    pub const fn sweep_attempt_limit(&self) -> usize {
        self.sweep_budget().saturating_mul(self.stall_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_odd_sample() {
        assert_eq!(SplittingParams::new(7, 5).validate(50), Ok(()));
        assert_eq!(SplittingParams::new(3, 1).validate(2), Ok(()));
    }

    #[test]
    fn test_validate_geneset_bounds() {
        assert_eq!(
            SplittingParams::new(7, 0).validate(50),
            Err(ConfigError::EmptyGeneset)
        );
        assert_eq!(
            SplittingParams::new(7, 50).validate(50),
            Err(ConfigError::GenesetTooLarge {
                geneset_size: 50,
                num_features: 50
            })
        );
    }

    #[test]
    fn test_validate_sample_size() {
        assert_eq!(
            SplittingParams::new(1, 5).validate(50),
            Err(ConfigError::SampleSizeTooSmall { sample_size: 1 })
        );
        assert_eq!(
            SplittingParams::new(8, 5).validate(50),
            Err(ConfigError::EvenSampleSize { sample_size: 8 })
        );
    }

    #[test]
    fn test_validate_stall_factor() {
        assert_eq!(
            SplittingParams::new(7, 5)
                .with_stall_factor(0)
                .validate(50),
            Err(ConfigError::InvalidStallFactor)
        );
    }

    #[test]
    fn test_mutation_attempts_rounds_to_nearest() {
        let attempts = |k| SplittingParams::new(7, k).mutation_attempts();
        assert_eq!(attempts(1), 1);
        assert_eq!(attempts(4), 1);
        assert_eq!(attempts(5), 1);
        assert_eq!(attempts(14), 1);
        assert_eq!(attempts(15), 2);
        assert_eq!(attempts(100), 10);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::EvenSampleSize { sample_size: 10 }.to_string(),
            "sample size must be odd, got 10"
        );
    }
}
