//! Error types for the core crate.

use thiserror::Error;

/// Errors raised when decoding or validating drawing data.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid path data: {0}")]
    InvalidPath(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Invalid stroke width: {0}")]
    InvalidWidth(f64),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
