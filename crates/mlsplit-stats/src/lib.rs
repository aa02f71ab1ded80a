//! Numerical helpers for the mlsplit workspace.
//!
//! This crate holds the closed-form pieces the splitting engine needs to turn a
//! sequence of recorded levels into a probability, together with a small
//! descriptive summary used for progress reporting:
//!
//! - **Special functions**: digamma and trigamma on the positive real axis
//! - **Order statistics**: expected log of a uniform order statistic and the
//!   accumulated error of a multilevel estimate
//! - **Score summaries**: min, max, mean, median and spread of a score sample
//!
//! # Modules
//!
//! - [`special`]: [`special::digamma`] and [`special::trigamma`]
//! - [`order_statistic`]: [`order_statistic::beta_mean_log`] and
//!   [`order_statistic::multilevel_log2_error`]
//! - [`summary`]: [`summary::ScoreSummary`]
//!
//! # Examples
//!
//! ## Expected log of an order statistic
//!
//! ```
//! use mlsplit_stats::order_statistic::beta_mean_log;
//!
//! // The largest of 1 uniform draw is the draw itself: E[ln U] = -1.
//! assert!((beta_mean_log(1, 1) + 1.0).abs() < 1e-12);
//! ```
//!
//! ## Summarizing scores
//!
//! ```
//! use mlsplit_stats::summary::ScoreSummary;
//!
//! let summary = ScoreSummary::new([3.0, 1.0, 2.0]).unwrap();
//! assert_eq!(summary.median, 2.0);
//! ```

pub mod order_statistic;
pub mod special;
pub mod summary;
