use std::path::PathBuf;

use super::pipeline::{self, SplittingArg};
use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Feature matrix file (one feature per line, whitespace separated)
    #[arg(long)]
    matrix: PathBuf,
    #[clap(flatten)]
    splitting: SplittingArg,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg { matrix, splitting } = arg;
    let matrix = util::read_matrix_file(matrix)?;
    log::info!(
        "loaded {} features x {} conditions",
        matrix.num_features(),
        matrix.num_conditions()
    );
    pipeline::execute(matrix, splitting)
}
