//! Table loading. Local CSV/JSON files and blocking HTTP fetches, all
//! deserialized into typed row records with the header contract enforced
//! up front.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use mixavg_core::error::{AveragingError, AveragingResult};
use mixavg_core::types::TableRecord;
use serde::de::DeserializeOwned;
use tracing::info;

/// Read a CSV file into typed rows.
///
/// The header row is validated against `T::REQUIRED_COLUMNS` before any row
/// is deserialized, so a missing column fails fast naming the table and the
/// column rather than producing an empty or partial result.
pub fn read_csv<T: TableRecord>(path: &Path) -> AveragingResult<Vec<T>> {
    let file = File::open(path)?;
    let rows = csv_from_reader::<_, T>(file)?;
    info!(path = %path.display(), table = T::TABLE, rows = rows.len(), "Loaded CSV table");
    Ok(rows)
}

/// Fetch a CSV table over HTTP. Same contract as [`read_csv`].
pub fn fetch_csv<T: TableRecord>(url: &str) -> AveragingResult<Vec<T>> {
    let body = http_get(url)?;
    let rows = csv_from_reader::<_, T>(body.as_bytes())?;
    info!(url = %url, table = T::TABLE, rows = rows.len(), "Fetched CSV table");
    Ok(rows)
}

/// Load a JSON file into a typed value.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> AveragingResult<T> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

/// Fetch a JSON document over HTTP into a typed value.
pub fn fetch_json<T: DeserializeOwned>(url: &str) -> AveragingResult<T> {
    let body = http_get(url)?;
    Ok(serde_json::from_str(&body)?)
}

fn http_get(url: &str) -> AveragingResult<String> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| AveragingError::Http(e.to_string()))?;
    response
        .text()
        .map_err(|e| AveragingError::Http(e.to_string()))
}

fn csv_from_reader<R: Read, T: TableRecord>(reader: R) -> AveragingResult<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(reader);

    // Header names are case-sensitive and part of the contract.
    let headers = rdr
        .headers()
        .map_err(|e| AveragingError::Csv(e.to_string()))?
        .clone();
    for column in T::REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(AveragingError::Schema {
                table: T::TABLE,
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize::<T>().enumerate() {
        let row = result.map_err(|e| AveragingError::Parse {
            table: T::TABLE,
            record: idx + 1,
            message: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}
