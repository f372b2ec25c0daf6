use thiserror::Error;

pub type AveragingResult<T> = Result<T, AveragingError>;

#[derive(Error, Debug)]
pub enum AveragingError {
    #[error("Schema error: table '{table}' is missing required column '{column}'")]
    Schema {
        table: &'static str,
        column: String,
    },

    #[error("Parse error: table '{table}', record {record}: {message}")]
    Parse {
        table: &'static str,
        record: usize,
        message: String,
    },

    #[error("Series length mismatch: {actual} actual vs {predicted} predicted values")]
    SeriesLength { actual: usize, predicted: usize },

    #[error("Pseudo R-squared needs at least 2 observations, got {len}")]
    ShortSeries { len: usize },

    #[error("Sample size must be positive")]
    SampleSize,

    #[error("Degrees of freedom must be positive: sample size {sample_size}, {params} model parameters")]
    DegreesOfFreedom { sample_size: usize, params: usize },

    #[error("Date error: {0}")]
    Date(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
