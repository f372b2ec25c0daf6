//! Weighted contribution aggregation — joins the weighted decomposition
//! table with spend totals and collapses each channel to one row.

use std::collections::{BTreeMap, HashMap};

use mixavg_core::error::{AveragingError, AveragingResult};
use mixavg_core::types::{SpendRow, WeightedRow};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default z-value for the 95% confidence bounds.
pub const DEFAULT_CI_MULTIPLIER: f64 = 1.96;

/// Weighted per-channel contribution with spend and confidence bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRow {
    pub rn: String,
    /// Sum of `weight * xDecompAgg` over the channel's model rows.
    pub contribution: f64,
    /// Weighted standard deviation of `xDecompAgg` within the channel.
    pub wtd_stddev: f64,
    pub ci95_lo: f64,
    pub ci95_hi: f64,
    pub total_spend: f64,
    pub sample_size: usize,
}

/// Channels dropped by the inner join, per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinDrop {
    /// Channels in the decomposition table with no spend row.
    pub decomp_only: Vec<String>,
    /// Channels in the spend table with no decomposition rows.
    pub spend_only: Vec<String>,
}

impl JoinDrop {
    pub fn is_empty(&self) -> bool {
        self.decomp_only.is_empty() && self.spend_only.is_empty()
    }
}

/// Contribution rows plus metadata about channels the join dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionTable {
    pub rows: Vec<ContributionRow>,
    pub dropped: JoinDrop,
}

/// Compute per-channel contributions with the default 95% bounds.
pub fn compute_contributions(
    decomp_table: &[WeightedRow],
    total_spend_df: &[SpendRow],
    sample_size: usize,
) -> AveragingResult<ContributionTable> {
    compute_contributions_with(decomp_table, total_spend_df, sample_size, DEFAULT_CI_MULTIPLIER)
}

/// Compute per-channel contributions with an explicit z-value.
///
/// Inner join on channel id: channels present in only one input are dropped
/// from the result, logged, and surfaced in [`ContributionTable::dropped`].
/// Output rows are ordered by channel id. `sample_size` must be positive; it
/// scales the confidence bounds and is carried on every row.
pub fn compute_contributions_with(
    decomp_table: &[WeightedRow],
    total_spend_df: &[SpendRow],
    sample_size: usize,
    ci_multiplier: f64,
) -> AveragingResult<ContributionTable> {
    if sample_size == 0 {
        return Err(AveragingError::SampleSize);
    }

    let mut groups: BTreeMap<&str, Vec<&WeightedRow>> = BTreeMap::new();
    for row in decomp_table {
        groups.entry(row.rn.as_str()).or_default().push(row);
    }

    let mut spend: HashMap<&str, f64> = HashMap::new();
    for row in total_spend_df {
        if let Some(existing) = spend.get_mut(row.rn.as_str()) {
            warn!(channel = %row.rn, "Duplicate spend rows for channel; summing");
            *existing += row.total_spend;
        } else {
            spend.insert(row.rn.as_str(), row.total_spend);
        }
    }

    let mut spend_only: Vec<String> = spend
        .keys()
        .filter(|rn| !groups.contains_key(*rn))
        .map(|rn| rn.to_string())
        .collect();
    spend_only.sort();
    let mut dropped = JoinDrop {
        decomp_only: Vec::new(),
        spend_only,
    };

    let sqrt_n = (sample_size as f64).sqrt();
    let mut rows = Vec::new();

    for (rn, group) in &groups {
        let total_spend = match spend.get(rn) {
            Some(total) => *total,
            None => {
                dropped.decomp_only.push(rn.to_string());
                continue;
            }
        };

        let mass: f64 = group.iter().map(|r| r.weight).sum();
        let contribution: f64 = group.iter().map(|r| r.weight * r.x_decomp_agg).sum();

        // Zero-mass channels carry no information; their spread is zero too.
        let wtd_stddev = if mass > 0.0 {
            let mean = contribution / mass;
            let variance: f64 = group
                .iter()
                .map(|r| r.weight * (r.x_decomp_agg - mean).powi(2))
                .sum::<f64>()
                / mass;
            variance.sqrt()
        } else {
            0.0
        };

        let margin = ci_multiplier * wtd_stddev / sqrt_n;
        rows.push(ContributionRow {
            rn: rn.to_string(),
            contribution,
            wtd_stddev,
            ci95_lo: contribution - margin,
            ci95_hi: contribution + margin,
            total_spend,
            sample_size,
        });
    }

    if !dropped.is_empty() {
        info!(
            decomp_only = ?dropped.decomp_only,
            spend_only = ?dropped.spend_only,
            "Inner join dropped channels missing from one input"
        );
    }

    Ok(ContributionTable { rows, dropped })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted(rn: &str, x_decomp_agg: f64, weight: f64) -> WeightedRow {
        WeightedRow {
            rn: rn.to_string(),
            coef: 0.1,
            x_decomp_agg,
            nrmse: 0.5,
            weight,
        }
    }

    fn spend(rn: &str, total_spend: f64) -> SpendRow {
        SpendRow {
            rn: rn.to_string(),
            total_spend,
        }
    }

    // 1. Weighted aggregation ------------------------------------------------

    #[test]
    fn test_two_model_channel_aggregates_to_weighted_sum() {
        let decomp = vec![weighted("TV", 100.0, 0.5), weighted("TV", 200.0, 0.5)];
        let table = compute_contributions(&decomp, &[spend("TV", 1000.0)], 100).unwrap();

        assert_eq!(table.rows.len(), 1);
        let tv = &table.rows[0];
        assert!((tv.contribution - 150.0).abs() < 1e-9);
        assert!((tv.total_spend - 1000.0).abs() < f64::EPSILON);
        assert_eq!(tv.sample_size, 100);
    }

    #[test]
    fn test_zero_weight_channel_contributes_zero() {
        let decomp = vec![weighted("Radio", 300.0, 0.0)];
        let table = compute_contributions(&decomp, &[spend("Radio", 500.0)], 10).unwrap();
        assert!(table.rows[0].contribution.abs() < f64::EPSILON);
        assert!(table.rows[0].wtd_stddev.abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_contribution_bounded_by_total_decomp() {
        let decomp = vec![
            weighted("TV", 100.0, 0.6),
            weighted("TV", 200.0, 0.4),
            weighted("Radio", 50.0, 1.0),
        ];
        let spends = vec![spend("TV", 1000.0), spend("Radio", 500.0)];
        let table = compute_contributions(&decomp, &spends, 10).unwrap();

        let total: f64 = table.rows.iter().map(|r| r.contribution).sum();
        let decomp_total: f64 = decomp.iter().map(|r| r.x_decomp_agg).sum();
        assert!(total <= decomp_total + 1e-9);
    }

    // 2. Confidence bounds ---------------------------------------------------

    #[test]
    fn test_ci_bounds_symmetric_around_contribution() {
        let decomp = vec![weighted("TV", 100.0, 0.5), weighted("TV", 200.0, 0.5)];
        let table = compute_contributions(&decomp, &[spend("TV", 1000.0)], 25).unwrap();

        let tv = &table.rows[0];
        assert!((tv.contribution - tv.ci95_lo - (tv.ci95_hi - tv.contribution)).abs() < 1e-9);
        // stddev of {100, 200} with equal weights is 50; margin = 1.96 * 50 / 5.
        assert!((tv.wtd_stddev - 50.0).abs() < 1e-9);
        assert!((tv.ci95_hi - tv.contribution - 19.6).abs() < 1e-9);
    }

    #[test]
    fn test_single_model_channel_has_zero_spread() {
        let decomp = vec![weighted("TV", 100.0, 1.0)];
        let table = compute_contributions(&decomp, &[spend("TV", 1000.0)], 10).unwrap();
        let tv = &table.rows[0];
        assert!(tv.wtd_stddev.abs() < f64::EPSILON);
        assert!((tv.ci95_lo - tv.contribution).abs() < 1e-9);
    }

    // 3. Join semantics ------------------------------------------------------

    #[test]
    fn test_inner_join_drops_and_reports_both_sides() {
        let decomp = vec![weighted("TV", 100.0, 1.0), weighted("Print", 10.0, 1.0)];
        let spends = vec![spend("TV", 1000.0), spend("OOH", 200.0)];
        let table = compute_contributions(&decomp, &spends, 10).unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].rn, "TV");
        assert_eq!(table.dropped.decomp_only, vec!["Print".to_string()]);
        assert_eq!(table.dropped.spend_only, vec!["OOH".to_string()]);
    }

    #[test]
    fn test_rows_ordered_by_channel_id() {
        let decomp = vec![
            weighted("Radio", 50.0, 1.0),
            weighted("TV", 100.0, 1.0),
            weighted("Print", 10.0, 1.0),
        ];
        let spends = vec![
            spend("TV", 1.0),
            spend("Print", 1.0),
            spend("Radio", 1.0),
        ];
        let table = compute_contributions(&decomp, &spends, 10).unwrap();
        let order: Vec<&str> = table.rows.iter().map(|r| r.rn.as_str()).collect();
        assert_eq!(order, vec!["Print", "Radio", "TV"]);
    }

    #[test]
    fn test_duplicate_spend_rows_are_summed() {
        let decomp = vec![weighted("TV", 100.0, 1.0)];
        let spends = vec![spend("TV", 600.0), spend("TV", 400.0)];
        let table = compute_contributions(&decomp, &spends, 10).unwrap();
        assert!((table.rows[0].total_spend - 1000.0).abs() < f64::EPSILON);
    }

    // 4. Validation ----------------------------------------------------------

    #[test]
    fn test_zero_sample_size_is_rejected() {
        let decomp = vec![weighted("TV", 100.0, 1.0)];
        let err = compute_contributions(&decomp, &[spend("TV", 1.0)], 0).unwrap_err();
        assert!(matches!(err, AveragingError::SampleSize));
    }
}
