use anyhow::Context as _;
use mlsplit_engine::matrix::FeatureMatrix;
use rand::SeedableRng as _;
use rand_distr::{Distribution as _, StandardNormal};
use rand_pcg::Pcg32;

use super::pipeline::{self, SplittingArg};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of features (rows)
    #[arg(long, default_value_t = 1000)]
    features: usize,
    /// Number of conditions (columns)
    #[arg(long, default_value_t = 10)]
    conditions: usize,
    /// Seed of the matrix generator
    #[arg(long, default_value_t = 0)]
    matrix_seed: u64,
    #[clap(flatten)]
    splitting: SplittingArg,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        features,
        conditions,
        matrix_seed,
        splitting,
    } = arg;
    let matrix = standard_normal_matrix(*features, *conditions, *matrix_seed)
        .context("Failed to build simulated matrix")?;
    log::info!("simulated {features} features x {conditions} conditions (seed {matrix_seed})");
    pipeline::execute(matrix, splitting)
}

fn standard_normal_matrix(
    features: usize,
    conditions: usize,
    seed: u64,
) -> anyhow::Result<FeatureMatrix> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let values = (0..features * conditions)
        .map(|_| StandardNormal.sample(&mut rng))
        .collect();
    Ok(FeatureMatrix::from_row_major(values, conditions)?)
}
