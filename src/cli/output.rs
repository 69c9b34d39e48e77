//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, EngineError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Engine(EngineError::MissingDirectory(path)) => {
            format!("error: directory does not exist: {}", path.display())
        }
        ApiError::InvalidArgument(msg) => format!("error: {}", msg),
        other => format!("error: {}", other),
    }
}
