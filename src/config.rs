//! Configuration System
//!
//! Layered configuration: merge-policy defaults, the global file, the workspace
//! file, then `UPDELTA_*` environment variables. Everything an engine needs
//! (blacklist, scanner and apply options) plus logging comes from here.

use crate::blacklist::Blacklist;
use crate::engine::DirtyOptions;
use crate::error::ApiError;
use crate::logging::{self, LoggingConfig};
use crate::snapshot::ScannerConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdeltaConfig {
    #[serde(default)]
    pub blacklist: BlacklistConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub dirty: DirtyOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Blacklist rules as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistConfig {
    /// Start from the built-in archive and patch extensions
    #[serde(default = "default_true")]
    pub use_defaults: bool,

    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub skip_directories: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            use_defaults: true,
            files: Vec::new(),
            extensions: Vec::new(),
            skip_directories: Vec::new(),
        }
    }
}

impl BlacklistConfig {
    pub fn to_blacklist(&self) -> Blacklist {
        let base = if self.use_defaults {
            Blacklist::default()
        } else {
            Blacklist::empty()
        };
        base.with_files(&self.files)
            .with_extensions(&self.extensions)
            .with_skip_directories(&self.skip_directories)
    }

    fn validate(&self) -> Result<(), String> {
        let has_separator = |s: &String| s.contains('/') || s.contains('\\');
        if let Some(bad) = self.files.iter().find(|s| has_separator(s)) {
            return Err(format!("File rule '{}' must be a bare file name", bad));
        }
        if let Some(bad) = self.extensions.iter().find(|s| has_separator(s)) {
            return Err(format!("Extension rule '{}' contains a path separator", bad));
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|s| s.trim().trim_start_matches('.').is_empty())
        {
            return Err(format!("Extension rule '{}' is empty", bad));
        }
        if let Some(bad) = self.skip_directories.iter().find(|s| has_separator(s)) {
            return Err(format!(
                "Skip-directory rule '{}' must be a single name fragment",
                bad
            ));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Blacklist(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Blacklist(msg) => write!(f, "Blacklist: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl UpdeltaConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.blacklist.validate() {
            errors.push(ValidationError::Blacklist(e));
        }
        if let Err(e) = logging::validate(&self.logging) {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// [`validate`](Self::validate), folded into a single [`ApiError`].
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render configuration: {}", e)))
    }
}
