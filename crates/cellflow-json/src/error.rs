//! JSON persistence error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for JSON operations
pub type JsonResult<T> = std::result::Result<T, JsonError>;

/// Errors that can occur while reading or writing sheet files
#[derive(Debug, Error)]
pub enum JsonError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON or record
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension with no matching format
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
