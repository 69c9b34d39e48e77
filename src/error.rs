//! Error types for the differential update engine.

use std::path::PathBuf;
use thiserror::Error;

/// Scan-related errors
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Scan root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to hash {path}: {source}")]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Errors raised while producing or applying a patch set
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to write {path}: {source}")]
    PatchWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("Ambiguous match: {0}")]
    MatchAmbiguity(String),
}

/// Errors surfaced by configuration, logging, backup and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to render output: {0}")]
    Output(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Output(err.to_string())
    }
}

impl EngineError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::PatchWrite {
            path: path.into(),
            source,
        }
    }
}

impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }
}
