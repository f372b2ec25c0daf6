use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `MIXAVG__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Knobs for the averaging engines.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// z-value applied to the weighted standard error for confidence bounds.
    #[serde(default = "default_ci_multiplier")]
    pub ci_multiplier: f64,
    /// Tolerance for per-channel weight-sum checks.
    #[serde(default = "default_weight_tolerance")]
    pub weight_tolerance: f64,
}

/// Knobs for table loading and preprocessing.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// URL of the channel-rename dictionary CSV; empty disables renaming.
    #[serde(default = "default_dictionary_url")]
    pub dictionary_url: String,
}

// Default functions
fn default_ci_multiplier() -> f64 {
    1.96
}
fn default_weight_tolerance() -> f64 {
    1e-9
}
fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}
fn default_dictionary_url() -> String {
    String::new()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ci_multiplier: default_ci_multiplier(),
            weight_tolerance: default_weight_tolerance(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            dictionary_url: default_dictionary_url(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("MIXAVG")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load configuration, falling back to defaults on failure with a warning.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }
}
