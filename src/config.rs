use crate::error::{AppError, Result};
use crate::highlight::HighlightConfig;
use crate::relationships::RelationshipConfig;
use crate::search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Environment variable naming an optional override file
pub const CONFIG_PATH_ENV: &str = "RECORD_SEARCH_CONFIG";

/// Prefix for per-key environment overrides, e.g. `RECORD_SEARCH__SEARCH__DELAY_MS`
pub const ENV_PREFIX: &str = "RECORD_SEARCH";

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Search service configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Highlight cache configuration
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Relationship discovery configuration
    #[serde(default)]
    pub relationships: RelationshipConfig,

    /// Corpus location
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the embedded defaults, `RECORD_SEARCH_CONFIG` and environment
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from(path.as_deref())
    }

    /// Load configuration with an explicit override file
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ));

        // Override with config file if given
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Config = builder
            // Override with environment variables (prefix: RECORD_SEARCH__)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate_all()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate_all(&self) -> Result<()> {
        self.search.validate_all()?;
        self.highlight.validate()?;
        self.relationships.validate()?;
        self.observability.validate()?;
        if self
            .corpus
            .path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(AppError::Configuration(
                "corpus.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// JSON corpus file; the bundled sample corpus is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    #[validate(length(min = 1))]
    pub log_filter: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json_logs: false,
        }
    }
}

fn default_log_filter() -> String {
    "record_search=info".to_string()
}
