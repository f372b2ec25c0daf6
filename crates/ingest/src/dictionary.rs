//! Channel-rename dictionary. Maps raw variable names coming out of the
//! modeling tool onto reporting-friendly channel names.

use std::collections::HashMap;
use std::path::Path;

use mixavg_core::error::AveragingResult;
use mixavg_core::types::{DecompRow, TableRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loader;

/// Baseline variable names that are never renamed.
const RESERVED: &[&str] = &["intercept", "holiday", "trend", "season"];

/// One `variable -> mapping` pair from the dictionary source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryRow {
    pub variable: String,
    pub mapping: String,
}

impl TableRecord for DictionaryRow {
    const TABLE: &'static str = "dictionary";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["variable", "mapping"];
}

/// Case-insensitive channel-rename table.
#[derive(Debug, Clone, Default)]
pub struct ChannelDictionary {
    mapping: HashMap<String, String>,
}

impl ChannelDictionary {
    pub fn new(rows: Vec<DictionaryRow>) -> Self {
        let mapping = rows
            .into_iter()
            .map(|r| (r.variable.to_lowercase(), r.mapping))
            .collect();
        Self { mapping }
    }

    /// Load the dictionary from a local CSV file.
    pub fn from_csv(path: &Path) -> AveragingResult<Self> {
        Ok(Self::new(loader::read_csv(path)?))
    }

    /// Load the dictionary from a CSV document over HTTP.
    pub fn from_url(url: &str) -> AveragingResult<Self> {
        Ok(Self::new(loader::fetch_csv(url)?))
    }

    /// Rename one channel id. `(Intercept)` normalizes to `intercept` first;
    /// reserved baseline names pass through untouched; unmapped names are
    /// returned as-is.
    pub fn rename(&self, rn: &str) -> String {
        let rn = if rn == "(Intercept)" { "intercept" } else { rn };
        let lower = rn.to_lowercase();
        if RESERVED.contains(&lower.as_str()) {
            return rn.to_string();
        }
        match self.mapping.get(&lower) {
            Some(mapped) => mapped.clone(),
            None => rn.to_string(),
        }
    }

    /// Apply the dictionary to a decomposition table, returning fresh rows.
    pub fn apply(&self, rows: &[DecompRow]) -> Vec<DecompRow> {
        let renamed: Vec<DecompRow> = rows
            .iter()
            .map(|r| DecompRow {
                rn: self.rename(&r.rn),
                ..r.clone()
            })
            .collect();
        debug!(rows = renamed.len(), "Applied channel dictionary");
        renamed
    }
}
