use std::path::PathBuf;

use thiserror::Error;

/// drlatest error types
#[derive(Error, Debug)]
pub enum SyncError {
    /// Missing or invalid startup configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Image location could not be parsed as a URL
    #[error("Invalid image location '{location}': {message}")]
    InvalidLocation { location: String, message: String },

    /// Container registry error
    #[error("Registry error: {registry} - {message}")]
    RegistryError { registry: String, message: String },

    /// Registry returned no tags for a repository
    #[error("No tags found for repository {repository}")]
    NoTags { repository: String },

    /// Input values file could not be read or decoded
    #[error("Input error: {}: {message}", .path.display())]
    InputError { path: PathBuf, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_yaml::Error> for SyncError {
    fn from(err: serde_yaml::Error) -> Self {
        SyncError::SerializationError(err.to_string())
    }
}

/// Result type alias for drlatest operations
pub type Result<T> = std::result::Result<T, SyncError>;
