//! Error types for seedbank

use thiserror::Error;

/// Result type alias for seedbank operations
pub type Result<T> = std::result::Result<T, SeedbankError>;

/// Main error type for seedbank
#[derive(Error, Debug)]
pub enum SeedbankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
