//! Error types for spec database operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading specs or configuration.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// All configured sources failed.
    #[error("no spec sources available")]
    NoSourcesAvailable,

    /// A spec file could not be read as a command spec.
    #[error("invalid spec {}: {message}", path.display())]
    InvalidSpec { path: PathBuf, message: String },
}

/// Convenience alias for results with [`DatabaseError`].
pub type Result<T> = std::result::Result<T, DatabaseError>;
