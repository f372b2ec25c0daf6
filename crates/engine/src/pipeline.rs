//! End-to-end aggregation: weights, contributions, and derived metrics in
//! one pass, packaged for a plotting or reporting consumer.

use mixavg_core::error::AveragingResult;
use mixavg_core::types::{DecompRow, ObservationRow, SpendRow, WeightedRow};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::contributions::{
    compute_contributions_with, ContributionRow, JoinDrop, DEFAULT_CI_MULTIPLIER,
};
use crate::metrics::{
    calculate_cpa, calculate_roi, contribution_shares, pseudo_r_squared, CpaRow, RoiRow, ShareRow,
};
use crate::weights::calculate_weights;

/// Everything a downstream plot or report needs from one averaging run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAverageReport {
    pub weights: Vec<WeightedRow>,
    pub contributions: Vec<ContributionRow>,
    /// Channels the contribution join dropped, per side.
    pub dropped: JoinDrop,
    pub cpa: Vec<CpaRow>,
    pub roi: Vec<RoiRow>,
    pub shares: Vec<ShareRow>,
    pub pseudo_r_squared: f64,
    pub sample_size: usize,
}

impl ModelAverageReport {
    /// Run the full pipeline with the default confidence multiplier.
    ///
    /// Errors propagate unmodified from the first failing stage; there are
    /// no retries, every stage being deterministic.
    pub fn build(
        decomp: &[DecompRow],
        spend: &[SpendRow],
        observations: &[ObservationRow],
        sample_size: usize,
    ) -> AveragingResult<Self> {
        Self::build_with(decomp, spend, observations, sample_size, DEFAULT_CI_MULTIPLIER)
    }

    /// Run the full pipeline with knobs taken from the application config.
    pub fn build_from_config(
        decomp: &[DecompRow],
        spend: &[SpendRow],
        observations: &[ObservationRow],
        sample_size: usize,
        config: &mixavg_core::AppConfig,
    ) -> AveragingResult<Self> {
        Self::build_with(
            decomp,
            spend,
            observations,
            sample_size,
            config.analysis.ci_multiplier,
        )
    }

    /// Run the full pipeline with an explicit confidence multiplier.
    pub fn build_with(
        decomp: &[DecompRow],
        spend: &[SpendRow],
        observations: &[ObservationRow],
        sample_size: usize,
        ci_multiplier: f64,
    ) -> AveragingResult<Self> {
        let weights = calculate_weights(decomp);
        let table = compute_contributions_with(&weights, spend, sample_size, ci_multiplier)?;

        let cpa = calculate_cpa(&table.rows);
        let roi = calculate_roi(&table.rows);
        let shares = contribution_shares(&table.rows);

        let actual: Vec<f64> = observations.iter().map(|o| o.dep_var).collect();
        let predicted: Vec<f64> = observations.iter().map(|o| o.dep_var_hat).collect();
        let pseudo_r_squared = pseudo_r_squared(&actual, &predicted)?;

        info!(
            channels = table.rows.len(),
            pseudo_r_squared,
            "Model-average report built"
        );

        Ok(Self {
            weights,
            contributions: table.rows,
            dropped: table.dropped,
            cpa,
            roi,
            shares,
            pseudo_r_squared,
            sample_size,
        })
    }
}
