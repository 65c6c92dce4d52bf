//! Error types for reserved-keyword checking.

use thiserror::Error;

/// Result type alias for checker operations
pub type KeywordResult<T> = Result<T, KeywordError>;

#[derive(Debug, Error)]
pub enum KeywordError {
    /// Unusable keyword, override, or manifest configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
