//! The splitting driver.
//!
//! [`SplittingSampler`] owns the scoring model, the population and the level
//! history. [`SplittingSampler::extend`] runs
//!
//! ```text
//! INIT ─→ DUPLICATE ─→ (last level < target?) ─no─→ TargetReached
//!                           │ yes
//!                           ↓
//!                         SWEEP ──(attempt limit hit)──→ Stalled
//!                           ↓
//!                       DUPLICATE ─→ (rounds > -log2(ε/2)?) ─yes─→ PrecisionBound
//!                           │ no
//!                           └──→ back to the target check
//! ```
//!
//! A sweep makes full passes over the population, one mutation call per
//! member, until the accepted moves add up to `sample_size * geneset_size`.

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use mlsplit_stats::summary::ScoreSummary;

use crate::{
    estimator::{self, EstimateError, PValueEstimate},
    level_history::LevelHistory,
    mutation,
    params::{ConfigError, SplittingParams},
    population::Population,
    scoring::ScoringModel,
};

/// A run stops once the last level is within this distance of the target.
pub const TARGET_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ExtendError {
    #[display("epsilon must be in [0, 1), got {epsilon}")]
    InvalidEpsilon { epsilon: f64 },
    #[display("target score is NaN")]
    InvalidTarget,
    #[display("an infinite target score needs a positive epsilon to terminate")]
    Unbounded,
    #[display("scoring model returned NaN for a member of the population")]
    NanScore,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The last recorded level reached the target score.
    TargetReached,
    /// Enough rounds were completed to resolve probabilities down to epsilon.
    PrecisionBound,
    /// A sweep exhausted its attempt limit without accumulating its move
    /// budget; the levels recorded so far remain valid.
    Stalled,
}

/// Outcome of [`SplittingSampler::extend`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtendReport {
    /// Completed duplication rounds, including the initial one.
    pub rounds: usize,
    /// Number of levels recorded.
    pub levels: usize,
    /// Highest recorded level.
    pub last_level: f64,
    pub termination: Termination,
    /// Scores of the population when the run ended.
    pub final_scores: Option<ScoreSummary>,
}

#[derive(Debug, Clone, Copy)]
struct SweepStats {
    passes: usize,
    attempts: usize,
    moves: usize,
}

/// Multilevel splitting estimator of geneset score tail probabilities.
#[derive(Debug, Clone)]
pub struct SplittingSampler<M>
where
    M: ScoringModel,
{
    model: M,
    params: SplittingParams,
    population: Population<M::Profile>,
    levels: LevelHistory,
}

impl<M> SplittingSampler<M>
where
    M: ScoringModel,
{
    /// Validates `params` against the model and allocates the population.
    pub fn new(model: M, params: SplittingParams) -> Result<Self, ConfigError> {
        params.validate(model.num_features())?;
        Ok(Self {
            population: Population::with_capacity(params.sample_size),
            levels: LevelHistory::new(),
            model,
            params,
        })
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn params(&self) -> &SplittingParams {
        &self.params
    }

    #[must_use]
    pub fn population(&self) -> &Population<M::Profile> {
        &self.population
    }

    #[must_use]
    pub fn levels(&self) -> &LevelHistory {
        &self.levels
    }

    /// Raises the population until its last level reaches `target_score`.
    ///
    /// `seed` initializes the random stream; the same seed and parameters
    /// reproduce the same levels. A non-zero `epsilon` also stops the run once
    /// `rounds > -log2(epsilon / 2)`, enough to tell whether a p-value is below
    /// `epsilon`.
    ///
    /// Each call starts over: the previous population and levels are
    /// discarded.
    ///
    /// # Errors
    ///
    /// Invalid arguments are rejected before any work is done. If the model
    /// scores a member as NaN the run stops with [`ExtendError::NanScore`]
    /// and no level is recorded for that round.
    pub fn extend(
        &mut self,
        target_score: f64,
        seed: u64,
        epsilon: f64,
    ) -> Result<ExtendReport, ExtendError> {
        if target_score.is_nan() {
            return Err(ExtendError::InvalidTarget);
        }
        if !(0.0..1.0).contains(&epsilon) {
            return Err(ExtendError::InvalidEpsilon { epsilon });
        }
        if target_score == f64::INFINITY && epsilon == 0.0 {
            return Err(ExtendError::Unbounded);
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        self.levels.clear();
        self.population = Population::random(
            &self.model,
            self.params.sample_size,
            self.params.geneset_size,
            &mut rng,
        );

        let round_limit = (epsilon != 0.0).then(|| -(0.5 * epsilon).log2());
        let mut rounds = 0;
        let mut threshold = self.duplicate(&mut rounds)?;

        let termination = loop {
            if threshold >= target_score - TARGET_TOLERANCE {
                break Termination::TargetReached;
            }

            let Some(stats) = self.sweep(threshold, &mut rng) else {
                log::warn!(
                    "sweep at level {threshold} stalled after {} attempts",
                    self.params.sweep_attempt_limit()
                );
                break Termination::Stalled;
            };
            log::trace!(
                "sweep at level {threshold}: {} passes, {} attempts, {} moves",
                stats.passes,
                stats.attempts,
                stats.moves
            );

            threshold = self.duplicate(&mut rounds)?;

            #[expect(clippy::cast_precision_loss)]
            let completed = self.levels.completed_rounds(self.params.half_size()) as f64;
            if round_limit.is_some_and(|limit| completed > limit) {
                break Termination::PrecisionBound;
            }
        };

        log::info!(
            "splitting finished after {rounds} rounds ({termination:?}), last level {threshold}"
        );
        Ok(ExtendReport {
            rounds,
            levels: self.levels.len(),
            last_level: threshold,
            termination,
            final_scores: self.population.summary(),
        })
    }

    /// Estimated probability that a random subset scores at least `observed`.
    pub fn p_value(&self, observed: f64) -> Result<f64, EstimateError> {
        estimator::tail_probability(&self.levels, self.params.sample_size, observed)
    }

    /// [`Self::p_value`] for several scores.
    pub fn p_values(&self, observed: &[f64]) -> Result<Vec<f64>, EstimateError> {
        observed.iter().map(|&s| self.p_value(s)).collect()
    }

    /// [`Self::p_value`] with its error estimate; `epsilon` should be the value
    /// passed to [`Self::extend`].
    pub fn estimate(&self, observed: f64, epsilon: f64) -> Result<PValueEstimate, EstimateError> {
        estimator::estimate(&self.levels, self.params.sample_size, observed, epsilon)
    }

    /// Records the next round of levels; NaN scores are refused before they
    /// reach the history.
    fn duplicate(&mut self, rounds: &mut usize) -> Result<f64, ExtendError> {
        if self.population.scores().any(f64::is_nan) {
            return Err(ExtendError::NanScore);
        }
        let threshold = self
            .population
            .duplicate(&mut self.levels)
            .unwrap_or(f64::NEG_INFINITY);
        *rounds += 1;
        if log::log_enabled!(log::Level::Debug) {
            let summary = self.population.summary();
            log::debug!("round {rounds}: level {threshold:.6}, population {summary:?}");
        }
        Ok(threshold)
    }

    /// Mutates the population until the move budget is met; `None` if the
    /// attempt limit runs out first.
    fn sweep<R>(&mut self, threshold: f64, rng: &mut R) -> Option<SweepStats>
    where
        R: Rng + ?Sized,
    {
        let budget = self.params.sweep_budget();
        let limit = self.params.sweep_attempt_limit();
        let attempts_per_member = self.params.mutation_attempts();
        let mut stats = SweepStats {
            passes: 0,
            attempts: 0,
            moves: 0,
        };

        while stats.moves < budget {
            if stats.attempts >= limit {
                return None;
            }
            for member in self.population.members_mut() {
                stats.moves += mutation::mutate_member(
                    &self.model,
                    member,
                    threshold,
                    attempts_per_member,
                    rng,
                );
                stats.attempts += attempts_per_member;
            }
            stats.passes += 1;
        }
        Some(stats)
    }
}
