//! Error types for the engagement core

/// Main error type for engagement core operations
#[derive(Debug, thiserror::Error)]
pub enum EngageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Reward ledger error: {0}")]
    Ledger(String),

    #[error("Content query error: {0}")]
    ContentQuery(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Implement From conversions for common error types

impl From<reqwest::Error> for EngageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<image::ImageError> for EngageError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for engagement core operations
pub type Result<T> = std::result::Result<T, EngageError>;
