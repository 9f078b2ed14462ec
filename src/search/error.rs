//! Error types for search operations

use crate::error::AppError;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while loading or configuring search.
///
/// Matching, scoring and highlighting are infallible; only corpus loading and
/// configuration report errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Corpus source could not produce records
    #[error("Corpus load failed from {source_name}: {message}")]
    CorpusLoadFailed {
        source_name: String,
        message: String,
    },

    /// Corpus payload was not a JSON array of records
    #[error("Invalid corpus format: {0}")]
    InvalidCorpus(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<validator::ValidationErrors> for SearchError {
    fn from(err: validator::ValidationErrors) -> Self {
        SearchError::InvalidConfiguration(err.to_string())
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidConfiguration(msg) => AppError::Configuration(msg),
            SearchError::IoError(err) => AppError::Io(err),
            SearchError::SerializationError(err) => AppError::Serialization(err.to_string()),
            other => AppError::Corpus(other.to_string()),
        }
    }
}
