//! Adaptive multilevel splitting for tail probabilities of geneset scores.
//!
//! Estimating `P(score(S) >= s)` for a random fixed-size subset `S` of the rows
//! of a feature matrix by plain permutation needs on the order of `1 / p`
//! draws. Multilevel splitting reaches probabilities far below
//! `1 / sample_size` by repeatedly conditioning a small population on an
//! increasing score threshold:
//!
//! 1. **Initialize** - Draw `sample_size` random subsets and score them
//! 2. **Duplicate** - Record the lower half of the scores as levels, drop that
//!    half and clone the upper half
//! 3. **Mutate** - Swap single elements of each subset, accepting only swaps
//!    that keep the score at or above the last level
//! 4. **Repeat** - Alternate 3 and 2 until the last level reaches the target
//!    score (or a precision bound is met)
//! 5. **Estimate** - Convert the recorded levels into a probability for any
//!    observed score
//!
//! # Architecture
//!
//! ```text
//! SplittingSampler (driver)
//!     ├─ Population ──── duplicate() ──→ LevelHistory
//!     ├─ mutation::mutate_member()  (threshold = last level)
//!     └─ ScoringModel (profile / score / adjust_profile)
//!
//! LevelHistory ──→ estimator::tail_probability()
//! ```
//!
//! The scoring model, the feature matrix and the subset sampler are seams:
//! [`scoring::SquaredNormScore`] over a [`matrix::FeatureMatrix`] is the
//! default model, and any type implementing [`scoring::ScoringModel`] can
//! replace it.
//!
//! # Example
//!
//! ```
//! use mlsplit_engine::{
//!     matrix::FeatureMatrix, params::SplittingParams, scoring::SquaredNormScore,
//!     splitting::SplittingSampler,
//! };
//!
//! let rows = (0..40)
//!     .map(|i| vec![f64::from(i % 7) - 3.0, f64::from(i % 5) - 2.0])
//!     .collect();
//! let matrix = FeatureMatrix::from_rows(rows).unwrap();
//! let model = SquaredNormScore::new(matrix);
//!
//! let mut sampler = SplittingSampler::new(model, SplittingParams::new(11, 4)).unwrap();
//! sampler.extend(f64::INFINITY, 42, 1e-2).unwrap();
//!
//! let p = sampler.p_value(150.0).unwrap();
//! assert!((0.0..=1.0).contains(&p));
//! ```
//!
//! # Reproducibility
//!
//! All randomness comes from a single [`rand_pcg::Pcg32`] stream seeded per
//! [`splitting::SplittingSampler::extend`] call and passed by reference to
//! every draw site. Identical inputs and seed give identical level histories.
//!
//! # Current Limitations
//!
//! - **Single-threaded**: sweeps mutate members one after another on one stream
//! - **Odd sample sizes only**: duplication keeps the population size constant
//!   only for odd `sample_size`, so even sizes are rejected
//! - **Single score**: one scalar score, larger meaning more extreme

pub mod estimator;
pub mod level_history;
pub mod matrix;
pub mod mutation;
pub mod params;
pub mod population;
pub mod sampler;
pub mod scoring;
pub mod splitting;
