//! Cross-model weighting. Each candidate model's row for a channel is
//! weighted by inverse NRMSE, normalized within that channel.

use std::collections::HashMap;

use mixavg_core::types::{DecompRow, WeightedRow};
use tracing::debug;

/// Attach a normalized inverse-NRMSE weight to every decomposition row.
///
/// Rows are grouped by channel id; within a group each row's weight is its
/// inverse NRMSE divided by the group's total. A row with `nrmse <= 0`
/// contributes no mass, and a group whose total mass is zero gets all-zero
/// weights rather than a divide-by-zero. Input order is preserved and the
/// output has exactly one row per input row.
pub fn calculate_weights(pareto_aggregated: &[DecompRow]) -> Vec<WeightedRow> {
    let raw: Vec<f64> = pareto_aggregated
        .iter()
        .map(|row| if row.nrmse > 0.0 { 1.0 / row.nrmse } else { 0.0 })
        .collect();

    let mut mass: HashMap<&str, f64> = HashMap::new();
    for (row, inverse) in pareto_aggregated.iter().zip(&raw) {
        *mass.entry(row.rn.as_str()).or_insert(0.0) += inverse;
    }

    for (channel, total) in &mass {
        if *total == 0.0 {
            debug!(channel = %channel, "Channel has zero inverse-NRMSE mass; weights collapse to 0");
        }
    }

    pareto_aggregated
        .iter()
        .zip(&raw)
        .map(|(row, &inverse)| {
            let total = mass[row.rn.as_str()];
            let weight = if total > 0.0 { inverse / total } else { 0.0 };
            WeightedRow {
                rn: row.rn.clone(),
                coef: row.coef,
                x_decomp_agg: row.x_decomp_agg,
                nrmse: row.nrmse,
                weight,
            }
        })
        .collect()
}

/// Check the weighting invariant on a weighted table: every channel's
/// weights sum to 0 or 1 within `tolerance`.
///
/// [`calculate_weights`] guarantees this by construction; the check is for
/// weighted tables arriving from external sources (e.g. loaded from disk).
pub fn verify_weight_sums(rows: &[WeightedRow], tolerance: f64) -> bool {
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for row in rows {
        *sums.entry(row.rn.as_str()).or_insert(0.0) += row.weight;
    }
    sums.values()
        .all(|&sum| sum.abs() <= tolerance || (sum - 1.0).abs() <= tolerance)
}
