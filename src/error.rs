//! Error types for block-usage

use thiserror::Error;

/// Result type alias for block-usage operations
pub type Result<T> = std::result::Result<T, UsageError>;

/// Error types for block-usage operations
#[derive(Error, Debug)]
pub enum UsageError {
    /// Registry or import file could not be opened or read
    #[error("Cannot open file '{path}': {reason}")]
    FileNotFound { path: String, reason: String },

    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite query or schema failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Malformed JSON in a registry, import file or output
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Block registry file is present but unusable
    #[error("Registry error: {0}")]
    RegistryError(String),
}
