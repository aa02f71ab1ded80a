use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use mlsplit_engine::{
    matrix::FeatureMatrix, params::SplittingParams, scoring::SquaredNormScore,
    splitting::SplittingSampler,
};

use crate::{
    model::splitting_result::{MatrixShape, SplittingResult},
    util,
};

/// Arguments shared by every subcommand that runs the estimator.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SplittingArg {
    /// JSON file with splitting parameters; flags override its values
    #[arg(long)]
    params: Option<PathBuf>,
    /// Number of subsets in the population (odd)
    #[arg(long)]
    sample_size: Option<usize>,
    /// Number of features per subset
    #[arg(long)]
    geneset_size: Option<usize>,
    /// Attempt limit per sweep, as a multiple of the move budget
    #[arg(long)]
    stall_factor: Option<usize>,
    /// Seed of the random stream
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Stop once probabilities down to this value are resolved (0 disables)
    #[arg(long, default_value_t = 1e-50)]
    epsilon: f64,
    /// Score the population should reach
    #[arg(long, default_value_t = f64::INFINITY)]
    target: f64,
    /// Scores to estimate p-values for (default: the target, or the last level)
    #[arg(long, value_delimiter = ',')]
    scores: Vec<f64>,
    /// Include the recorded levels in the output
    #[arg(long)]
    include_levels: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl SplittingArg {
    fn resolve_params(&self) -> anyhow::Result<SplittingParams> {
        let base = match &self.params {
            Some(path) => Some(util::read_json_file::<SplittingParams, _>("params", path)?),
            None => None,
        };
        let geneset_size = self
            .geneset_size
            .or(base.map(|p| p.geneset_size))
            .context("--geneset-size is required when no --params file is given")?;
        let mut params = base.unwrap_or(SplittingParams::new(
            SplittingParams::DEFAULT_SAMPLE_SIZE,
            geneset_size,
        ));
        params.geneset_size = geneset_size;
        if let Some(sample_size) = self.sample_size {
            params.sample_size = sample_size;
        }
        if let Some(stall_factor) = self.stall_factor {
            params.stall_factor = stall_factor;
        }
        Ok(params)
    }
}

pub(crate) fn execute(matrix: FeatureMatrix, arg: &SplittingArg) -> anyhow::Result<()> {
    let params = arg.resolve_params()?;
    let shape = MatrixShape {
        num_features: matrix.num_features(),
        num_conditions: matrix.num_conditions(),
    };

    eprintln!(
        "Matrix: {} features x {} conditions",
        shape.num_features, shape.num_conditions
    );
    eprintln!(
        "Params: sample size {}, geneset size {}, stall factor {}",
        params.sample_size, params.geneset_size, params.stall_factor
    );

    let mut sampler = SplittingSampler::new(SquaredNormScore::new(matrix), params)
        .context("Invalid splitting parameters")?;
    let report = sampler
        .extend(arg.target, arg.seed, arg.epsilon)
        .context("Failed to run multilevel splitting")?;

    eprintln!("Run:");
    eprintln!("  Rounds:      {}", report.rounds);
    eprintln!("  Levels:      {}", report.levels);
    eprintln!("  Last level:  {:.6}", report.last_level);
    eprintln!("  Termination: {:?}", report.termination);
    if let Some(scores) = &report.final_scores {
        eprintln!(
            "  Population:  min {:.6} / mean {:.6} / max {:.6}",
            scores.min, scores.mean, scores.max
        );
    }

    let target_score = arg.target.is_finite().then_some(arg.target);
    let scores = if arg.scores.is_empty() {
        vec![target_score.unwrap_or(report.last_level)]
    } else {
        arg.scores.clone()
    };
    let estimates = scores
        .iter()
        .map(|&score| sampler.estimate(score, arg.epsilon))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to estimate p-values")?;

    eprintln!("Estimates:");
    for estimate in &estimates {
        let bound = if estimate.below_precision { "<" } else { "=" };
        eprintln!(
            "  score {:.6}: p {bound} {:.3e}{}",
            estimate.score,
            estimate.p_value,
            estimate
                .log2_err
                .map(|err| format!(" (log2 err {err:.3})"))
                .unwrap_or_default()
        );
    }

    let result = SplittingResult {
        computed_at: Utc::now(),
        matrix: shape,
        params,
        seed: arg.seed,
        epsilon: arg.epsilon,
        target_score,
        report,
        estimates,
        levels: arg.include_levels.then(|| sampler.levels().clone()),
    };
    util::save_json(&result, arg.output.as_deref())?;

    if let Some(path) = &arg.output {
        eprintln!();
        eprintln!("Result saved to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_params_from_flags() {
        let arg = SplittingArg {
            geneset_size: Some(15),
            sample_size: Some(51),
            ..SplittingArg::default()
        };
        let params = arg.resolve_params().unwrap();
        assert_eq!(params, SplittingParams::new(51, 15));
    }

    #[test]
    fn test_resolve_params_uses_defaults() {
        let arg = SplittingArg {
            geneset_size: Some(8),
            stall_factor: Some(10),
            ..SplittingArg::default()
        };
        let params = arg.resolve_params().unwrap();
        assert_eq!(params.sample_size, SplittingParams::DEFAULT_SAMPLE_SIZE);
        assert_eq!(params.stall_factor, 10);
    }

    #[test]
    fn test_resolve_params_requires_geneset_size() {
        let err = SplittingArg::default().resolve_params().unwrap_err();
        assert!(err.to_string().contains("--geneset-size"));
    }
}
