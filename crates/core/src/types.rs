use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A row type that can be loaded from a named tabular source.
///
/// `REQUIRED_COLUMNS` carries the column contract verbatim: header names are
/// case-sensitive and must match exactly, so a source missing (or misspelling)
/// a column is rejected before any row is deserialized.
pub trait TableRecord: DeserializeOwned {
    /// Table name used in error messages and logs.
    const TABLE: &'static str;
    /// Column headers that must be present in the source, exactly as spelled.
    const REQUIRED_COLUMNS: &'static [&'static str];
}

/// A row carrying a date, usable with the date-window filter.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// One decomposed effect for a channel under a single candidate model.
/// The channel id `rn` repeats across models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompRow {
    pub rn: String,
    pub coef: f64,
    #[serde(rename = "xDecompAgg")]
    pub x_decomp_agg: f64,
    pub nrmse: f64,
}

impl TableRecord for DecompRow {
    const TABLE: &'static str = "decomp";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["rn", "coef", "xDecompAgg", "nrmse"];
}

/// A `DecompRow` with its normalized cross-model weight attached.
///
/// For every channel the weights over its rows sum to 1.0 (within tolerance),
/// or are all zero when the channel has no inverse-NRMSE mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRow {
    pub rn: String,
    pub coef: f64,
    #[serde(rename = "xDecompAgg")]
    pub x_decomp_agg: f64,
    /// Carried through for provenance; not part of the contribution contract.
    #[serde(default)]
    pub nrmse: f64,
    #[serde(rename = "weights")]
    pub weight: f64,
}

impl TableRecord for WeightedRow {
    const TABLE: &'static str = "weighted_decomp";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["rn", "coef", "xDecompAgg", "weights"];
}

/// Total spend for one channel over the analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendRow {
    pub rn: String,
    #[serde(rename = "Total Spend")]
    pub total_spend: f64,
}

impl TableRecord for SpendRow {
    const TABLE: &'static str = "total_spend";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["rn", "Total Spend"];
}

/// One dated observation of the dependent variable: actual vs. fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub ds: NaiveDate,
    #[serde(rename = "depVar")]
    pub dep_var: f64,
    #[serde(rename = "depVarHat")]
    pub dep_var_hat: f64,
}

impl TableRecord for ObservationRow {
    const TABLE: &'static str = "observations";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["ds", "depVar", "depVarHat"];
}

impl Dated for ObservationRow {
    fn date(&self) -> NaiveDate {
        self.ds
    }
}
