use chrono::{DateTime, Utc};
use mlsplit_engine::{
    estimator::PValueEstimate, level_history::LevelHistory, params::SplittingParams,
    splitting::ExtendReport,
};
use serde::{Deserialize, Serialize};

/// Everything a run produced, as written to the output JSON.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SplittingResult {
    pub computed_at: DateTime<Utc>,
    pub matrix: MatrixShape,
    pub params: SplittingParams,
    pub seed: u64,
    pub epsilon: f64,
    /// `None` when the run had no finite target.
    pub target_score: Option<f64>,
    pub report: ExtendReport,
    pub estimates: Vec<PValueEstimate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<LevelHistory>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct MatrixShape {
    pub num_features: usize,
    pub num_conditions: usize,
}
