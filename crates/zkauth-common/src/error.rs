//! Error types for ZkAuth
//!
//! Provides a unified error type hierarchy for the workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using ZkAuth's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ZkAuth
#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    // IO Errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures while deciding the ZooKeeper SASL posture.
///
/// None of these are recoverable: the caller is expected to abort startup.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("File {} cannot be read", .0.display())]
    Unreadable(PathBuf),

    #[error("Failed to parse login configuration {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: LoginConfigError,
    },

    #[error("Exception while determining if the ZooKeeper connection is secure")]
    InconsistentSasl,
}

impl ConfigurationError {
    /// Path of the login configuration involved in the failure, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Unreadable(path) | Self::Parse { path, .. } => Some(path),
            Self::InconsistentSasl => None,
        }
    }
}

/// Login configuration (JAAS) document errors
#[derive(Error, Debug)]
pub enum LoginConfigError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Can not specify multiple entries for {0}")]
    DuplicateContext(String),

    #[error("Unable to expand property: {0}")]
    UnresolvedProperty(String),

    #[error("Read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
