use std::path::PathBuf;

use thiserror::Error;

/// Domain-level errors for the resource manager.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The config directory could not be created. Nothing else can run.
    #[error("Failed to create config directory {path:?}: {reason}")]
    Provisioning { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(String),

    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    #[error("Destination already exists: {0:?}")]
    DestinationExists(PathBuf),

    #[error("A GeoIP database update is already in progress")]
    ReplaceInProgress,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DomainError {
    /// Whether the error must halt startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::Provisioning { .. })
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
