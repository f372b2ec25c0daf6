//! Advisory data-quality scans. Findings are logged at warn level and
//! returned to the caller; nothing here is fatal.

use tracing::warn;

/// Count of non-finite values found in one named series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonFiniteReport {
    pub series: String,
    pub nan_count: usize,
    pub infinite_count: usize,
}

/// Scan named series for NaN and infinite values. Returns one report per
/// offending series; clean series produce no entry.
pub fn check_non_finite(series: &[(&str, &[f64])]) -> Vec<NonFiniteReport> {
    let mut reports = Vec::new();
    for (name, values) in series {
        let nan_count = values.iter().filter(|v| v.is_nan()).count();
        let infinite_count = values.iter().filter(|v| v.is_infinite()).count();
        if nan_count > 0 || infinite_count > 0 {
            warn!(
                series = %name,
                nan = nan_count,
                infinite = infinite_count,
                "Series contains non-finite values; these must be removed or fixed"
            );
            reports.push(NonFiniteReport {
                series: name.to_string(),
                nan_count,
                infinite_count,
            });
        }
    }
    reports
}

/// Scan named series for constant columns. Returns the names of series whose
/// values are all identical (no variance).
pub fn check_no_variance(series: &[(&str, &[f64])]) -> Vec<String> {
    let mut constant = Vec::new();
    for (name, values) in series {
        if let Some(first) = values.first() {
            if values.iter().all(|v| v == first) {
                constant.push(name.to_string());
            }
        }
    }
    if !constant.is_empty() {
        warn!(
            count = constant.len(),
            series = %constant.join(", "),
            "Series with no variance; consider removing them"
        );
    }
    constant
}
