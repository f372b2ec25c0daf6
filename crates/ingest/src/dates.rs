//! Date-window filtering and calendar diagnostics over dated rows.

use chrono::{Duration, NaiveDate};
use mixavg_core::error::{AveragingError, AveragingResult};
use mixavg_core::types::Dated;
use tracing::warn;

/// Observed spacing of a dated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFrequency {
    Weekly,
    Daily,
    Irregular,
}

/// Parse a window endpoint with the given chrono format string
/// (typically `%Y-%m-%d` from the ingest configuration).
pub fn parse_date(value: &str, format: &str) -> AveragingResult<NaiveDate> {
    NaiveDate::parse_from_str(value, format).map_err(|e| {
        AveragingError::Date(format!("'{value}' does not match format '{format}': {e}"))
    })
}

/// Keep rows whose date lies in `[window_start, window_end]`, inclusive at
/// both endpoints. Row order is preserved.
pub fn filter_by_date<T: Dated + Clone>(
    rows: &[T],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<T> {
    rows.iter()
        .filter(|r| r.date() >= window_start && r.date() <= window_end)
        .cloned()
        .collect()
}

/// Clamp a requested window to the data's actual date range, warning when an
/// endpoint falls outside it. An empty date list returns the window unchanged.
pub fn clamp_window(
    window_start: NaiveDate,
    window_end: NaiveDate,
    dates: &[NaiveDate],
) -> (NaiveDate, NaiveDate) {
    let (min, max) = match (dates.iter().min(), dates.iter().max()) {
        (Some(min), Some(max)) => (*min, *max),
        _ => return (window_start, window_end),
    };

    let start = if window_start < min {
        warn!(requested = %window_start, clamped = %min, "Window start not in the data's date range");
        min
    } else {
        window_start
    };
    let end = if window_end > max {
        warn!(requested = %window_end, clamped = %max, "Window end not in the data's date range");
        max
    } else {
        window_end
    };

    (start, end)
}

/// Classify the data's spacing from consecutive date deltas. Fewer than two
/// rows cannot be classified and report `Irregular`.
pub fn data_frequency<T: Dated>(rows: &[T]) -> DataFrequency {
    let dates = sorted_dates(rows);
    if dates.len() < 2 {
        return DataFrequency::Irregular;
    }

    let deltas: Vec<i64> = dates.windows(2).map(|w| (w[1] - w[0]).num_days()).collect();
    if deltas.iter().all(|&d| d == 7) {
        DataFrequency::Weekly
    } else if deltas.iter().all(|&d| d == 1) {
        DataFrequency::Daily
    } else {
        DataFrequency::Irregular
    }
}

/// Calendar days missing between consecutive observed dates.
pub fn missing_dates<T: Dated>(rows: &[T]) -> Vec<NaiveDate> {
    let dates = sorted_dates(rows);
    let mut missing = Vec::new();
    for pair in dates.windows(2) {
        let mut day = pair[0] + Duration::days(1);
        while day < pair[1] {
            missing.push(day);
            day += Duration::days(1);
        }
    }
    missing
}

fn sorted_dates<T: Dated>(rows: &[T]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = rows.iter().map(|r| r.date()).collect();
    dates.sort();
    dates.dedup();
    dates
}
