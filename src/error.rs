use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Corpus errors
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Corpus(_) => "CORPUS_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Process exit code for the command-line front end
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Validation(_) | AppError::Configuration(_) => 2,
            AppError::NotFound(_) | AppError::Io(_) => 3,
            AppError::Serialization(_) | AppError::Corpus(_) => 4,
            AppError::Internal(_) => 1,
        }
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
