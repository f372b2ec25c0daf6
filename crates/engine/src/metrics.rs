//! Derived business metrics — CPA, ROI, contribution shares, and pseudo
//! R-squared.
//!
//! Divide-by-zero never faults here. Each ratio has an explicit sentinel
//! policy so downstream reporting can render "undefined" instead of
//! crashing:
//! - CPA with a zero contribution is `+inf`, whatever the spend.
//! - ROI (and shares) with a zero denominator collapse to a sentinel
//!   matching the numerator's sign: `+inf`, `0`, or `-inf`.
//! Negative contributions are legitimate (negative-effect channels) and flow
//! through arithmetic unchanged.

use mixavg_core::error::{AveragingError, AveragingResult};
use serde::{Deserialize, Serialize};

use crate::contributions::ContributionRow;

/// Cost per acquisition for one channel, with bounds derived from the
/// contribution's confidence interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpaRow {
    pub rn: String,
    pub cpa: f64,
    pub cpa_ci95_lo: f64,
    pub cpa_ci95_hi: f64,
}

/// Return on investment for one channel, with bounds derived from the
/// contribution's confidence interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiRow {
    pub rn: String,
    pub roi: f64,
    pub roi_ci95_lo: f64,
    pub roi_ci95_hi: f64,
}

/// Percentage share of the total contribution held by one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRow {
    pub rn: String,
    pub contribution_share: f64,
    pub ci95_lo_share: f64,
    pub ci95_hi_share: f64,
}

/// `spend / contribution`, `+inf` when the contribution is exactly zero.
fn spend_per_unit(spend: f64, contribution: f64) -> f64 {
    if contribution == 0.0 {
        f64::INFINITY
    } else {
        spend / contribution
    }
}

/// `value / total`, collapsing a zero total to a sign-matched sentinel.
fn signed_ratio(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        if value > 0.0 {
            f64::INFINITY
        } else if value < 0.0 {
            f64::NEG_INFINITY
        } else {
            0.0
        }
    } else {
        value / total
    }
}

/// CPA per channel: spend divided by attributed contribution.
pub fn calculate_cpa(contributions_table: &[ContributionRow]) -> Vec<CpaRow> {
    contributions_table
        .iter()
        .map(|row| CpaRow {
            rn: row.rn.clone(),
            cpa: spend_per_unit(row.total_spend, row.contribution),
            cpa_ci95_lo: spend_per_unit(row.total_spend, row.ci95_lo),
            cpa_ci95_hi: spend_per_unit(row.total_spend, row.ci95_hi),
        })
        .collect()
}

/// ROI per channel: attributed contribution divided by spend.
pub fn calculate_roi(contributions_table: &[ContributionRow]) -> Vec<RoiRow> {
    contributions_table
        .iter()
        .map(|row| RoiRow {
            rn: row.rn.clone(),
            roi: signed_ratio(row.contribution, row.total_spend),
            roi_ci95_lo: signed_ratio(row.ci95_lo, row.total_spend),
            roi_ci95_hi: signed_ratio(row.ci95_hi, row.total_spend),
        })
        .collect()
}

/// Each channel's percentage of the summed contribution, and of the summed
/// confidence bounds.
pub fn contribution_shares(contributions_table: &[ContributionRow]) -> Vec<ShareRow> {
    let total: f64 = contributions_table.iter().map(|r| r.contribution).sum();
    let total_lo: f64 = contributions_table.iter().map(|r| r.ci95_lo).sum();
    let total_hi: f64 = contributions_table.iter().map(|r| r.ci95_hi).sum();

    contributions_table
        .iter()
        .map(|row| ShareRow {
            rn: row.rn.clone(),
            contribution_share: signed_ratio(row.contribution, total) * 100.0,
            ci95_lo_share: signed_ratio(row.ci95_lo, total_lo) * 100.0,
            ci95_hi_share: signed_ratio(row.ci95_hi, total_hi) * 100.0,
        })
        .collect()
}

/// Pseudo R-squared over paired actual/fitted series:
/// `1 - SSR / TSS` with `SSR = sum((a - p)^2)` and `TSS = sum((a - mean(a))^2)`.
///
/// Fails fast on length mismatch or fewer than two observations. A constant
/// actual series (zero TSS) yields `1.0` for an exact fit and `-inf`
/// otherwise.
pub fn pseudo_r_squared(actual: &[f64], predicted: &[f64]) -> AveragingResult<f64> {
    if actual.len() != predicted.len() {
        return Err(AveragingError::SeriesLength {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    if actual.len() <= 1 {
        return Err(AveragingError::ShortSeries { len: actual.len() });
    }

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ssr: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let tss: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if tss == 0.0 {
        return Ok(if ssr == 0.0 { 1.0 } else { f64::NEG_INFINITY });
    }
    Ok(1.0 - ssr / tss)
}

/// Adjusted pseudo R-squared:
/// `1 - (1 - r2) * (n - 1) / (n - hyperparameters - betas)`.
///
/// Fails fast on a zero sample size or non-positive degrees of freedom.
pub fn adjusted_pseudo_r_squared(
    pseudo_r_sqd: f64,
    sample_size: usize,
    num_hyperparameters: usize,
    num_betas: usize,
) -> AveragingResult<f64> {
    if sample_size == 0 {
        return Err(AveragingError::SampleSize);
    }
    let params = num_hyperparameters + num_betas;
    if sample_size <= params {
        return Err(AveragingError::DegreesOfFreedom {
            sample_size,
            params,
        });
    }

    let dof = (sample_size - params) as f64;
    Ok(1.0 - ((1.0 - pseudo_r_sqd) * (sample_size - 1) as f64) / dof)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(rn: &str, contribution: f64, total_spend: f64) -> ContributionRow {
        ContributionRow {
            rn: rn.to_string(),
            contribution,
            wtd_stddev: 0.0,
            ci95_lo: contribution,
            ci95_hi: contribution,
            total_spend,
            sample_size: 100,
        }
    }

    // 1. CPA sentinel policy -------------------------------------------------

    #[test]
    fn test_cpa_plain_division() {
        let rows = vec![contribution("TV", 150.0, 1200.0)];
        let cpa = calculate_cpa(&rows);
        assert!((cpa[0].cpa - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_cpa_zero_contribution_is_positive_infinity() {
        let rows = vec![contribution("Radio", 0.0, 500.0)];
        let cpa = calculate_cpa(&rows);
        assert_eq!(cpa[0].cpa, f64::INFINITY);
        assert_eq!(cpa[0].cpa_ci95_lo, f64::INFINITY);
    }

    #[test]
    fn test_cpa_negative_contribution_computes_as_is() {
        let rows = vec![contribution("Promo", -50.0, 100.0)];
        let cpa = calculate_cpa(&rows);
        assert!((cpa[0].cpa - (-2.0)).abs() < 1e-9);
    }

    // 2. ROI sentinel policy -------------------------------------------------

    #[test]
    fn test_roi_plain_division() {
        let rows = vec![contribution("TV", 150.0, 1200.0)];
        let roi = calculate_roi(&rows);
        assert!((roi[0].roi - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_roi_zero_spend_follows_contribution_sign() {
        let positive = calculate_roi(&[contribution("A", 10.0, 0.0)]);
        assert_eq!(positive[0].roi, f64::INFINITY);

        let zero = calculate_roi(&[contribution("B", 0.0, 0.0)]);
        assert!(zero[0].roi.abs() < f64::EPSILON);

        let negative = calculate_roi(&[contribution("C", -10.0, 0.0)]);
        assert_eq!(negative[0].roi, f64::NEG_INFINITY);
    }

    // 3. Shares --------------------------------------------------------------

    #[test]
    fn test_shares_sum_to_one_hundred() {
        let rows = vec![
            contribution("TV", 150.0, 0.0),
            contribution("Radio", 50.0, 0.0),
        ];
        let shares = contribution_shares(&rows);
        assert!((shares[0].contribution_share - 75.0).abs() < 1e-9);
        assert!((shares[1].contribution_share - 25.0).abs() < 1e-9);
        let total: f64 = shares.iter().map(|s| s.contribution_share).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_shares_zero_total_uses_sign_sentinels() {
        let rows = vec![
            contribution("A", 100.0, 0.0),
            contribution("B", -100.0, 0.0),
        ];
        let shares = contribution_shares(&rows);
        assert_eq!(shares[0].contribution_share, f64::INFINITY);
        assert_eq!(shares[1].contribution_share, f64::NEG_INFINITY);
    }

    // 4. Pseudo R-squared ----------------------------------------------------

    #[test]
    fn test_exact_fit_is_one() {
        let series = [1.0, 2.0, 3.0];
        let r2 = pseudo_r_squared(&series, &series).unwrap();
        assert!((r2 - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mean_prediction_scores_zero() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 2.0];
        let r2 = pseudo_r_squared(&actual, &predicted).unwrap();
        assert!(r2.abs() < 1e-9);
    }

    #[test]
    fn test_length_mismatch_fails_fast() {
        let err = pseudo_r_squared(&[1.0, 2.0], &[1.0]).unwrap_err();
        match err {
            AveragingError::SeriesLength { actual, predicted } => {
                assert_eq!(actual, 2);
                assert_eq!(predicted, 1);
            }
            other => panic!("expected SeriesLength error, got {other}"),
        }
    }

    #[test]
    fn test_short_series_fails_fast() {
        assert!(matches!(
            pseudo_r_squared(&[1.0], &[1.0]),
            Err(AveragingError::ShortSeries { len: 1 })
        ));
        assert!(matches!(
            pseudo_r_squared(&[], &[]),
            Err(AveragingError::ShortSeries { len: 0 })
        ));
    }

    #[test]
    fn test_constant_actual_series() {
        // Exact fit on a flat series is still a perfect fit.
        let r2 = pseudo_r_squared(&[5.0, 5.0, 5.0], &[5.0, 5.0, 5.0]).unwrap();
        assert!((r2 - 1.0).abs() < f64::EPSILON);

        // Any residual against a flat series is unboundedly bad.
        let r2 = pseudo_r_squared(&[5.0, 5.0, 5.0], &[5.0, 6.0, 5.0]).unwrap();
        assert_eq!(r2, f64::NEG_INFINITY);
    }

    // 5. Adjusted pseudo R-squared -------------------------------------------

    #[test]
    fn test_adjusted_shrinks_toward_zero() {
        let r2 = 0.9;
        let adjusted = adjusted_pseudo_r_squared(r2, 100, 5, 10).unwrap();
        // 1 - (0.1 * 99) / 85
        assert!((adjusted - (1.0 - 9.9 / 85.0)).abs() < 1e-9);
        assert!(adjusted < r2);
    }

    #[test]
    fn test_adjusted_rejects_non_positive_degrees_of_freedom() {
        assert!(matches!(
            adjusted_pseudo_r_squared(0.9, 10, 5, 5),
            Err(AveragingError::DegreesOfFreedom { .. })
        ));
        assert!(matches!(
            adjusted_pseudo_r_squared(0.9, 0, 0, 0),
            Err(AveragingError::SampleSize)
        ));
    }
}
