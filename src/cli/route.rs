//! CLI route: single route table and run context.

use crate::backup;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_backup_report, format_clean_report, format_comparison, format_dirty_report,
    format_except, format_scan, OutputFormat,
};
use crate::config::{ConfigLoader, UpdeltaConfig};
use crate::engine::{DifferentialEngine, DirtyOptions};
use crate::error::ApiError;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Runtime context for CLI execution: workspace, effective configuration and
/// the engine built from it.
pub struct RunContext {
    workspace_root: PathBuf,
    config: UpdeltaConfig,
    engine: DifferentialEngine,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::from_config(workspace_root, config)
    }

    /// Create run context from an already loaded configuration.
    pub fn from_config(workspace_root: PathBuf, config: UpdeltaConfig) -> Result<Self, ApiError> {
        config.ensure_valid()?;
        let engine = DifferentialEngine::from_config(&config);
        Ok(Self {
            workspace_root,
            config,
            engine,
        })
    }

    pub fn workspace_root(&self) -> &PathBuf {
        &self.workspace_root
    }

    pub fn config(&self) -> &UpdeltaConfig {
        &self.config
    }

    pub fn engine(&self) -> &DifferentialEngine {
        &self.engine
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let start = Instant::now();
        let output = self.dispatch(command)?;
        info!(
            command = command_name(command),
            duration_ms = start.elapsed().as_millis(),
            "Command finished"
        );
        Ok(output)
    }

    fn dispatch(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Scan { root, format } => {
                let format = OutputFormat::parse(format)?;
                let entries = self.engine.scanner().scan(root)?;
                format_scan(&root.display().to_string(), &entries, format)
            }
            Commands::Compare { old, new, format } => {
                let format = OutputFormat::parse(format)?;
                let result = self.engine.compare(old, new)?;
                format_comparison(&result, format)
            }
            Commands::Except { old, new, format } => {
                let format = OutputFormat::parse(format)?;
                let entries = self.engine.except(old, new)?;
                format_except(&entries, format)
            }
            Commands::Clean {
                old,
                new,
                patch,
                format,
            } => {
                let format = OutputFormat::parse(format)?;
                let report = self.engine.clean(old, new, patch)?;
                format_clean_report(&report, format)
            }
            Commands::Dirty {
                install,
                patch,
                remove_patch_dir,
                format,
            } => {
                let format = OutputFormat::parse(format)?;
                let report = if *remove_patch_dir {
                    self.engine
                        .clone()
                        .with_dirty_options(DirtyOptions {
                            remove_patch_dir: true,
                        })
                        .dirty(install, patch)?
                } else {
                    self.engine.dirty(install, patch)?
                };
                format_dirty_report(&report, format)
            }
            Commands::Backup {
                source,
                destination,
                format,
            } => {
                let format = OutputFormat::parse(format)?;
                let destination = match destination {
                    Some(dest) => dest.clone(),
                    None => backup::default_backup_dir(source)?,
                };
                let report = backup::backup_directory(source, &destination, self.engine.blacklist())?;
                format_backup_report("Backup", &report, format)
            }
            Commands::Restore {
                backup: backup_dir,
                target,
                format,
            } => {
                let format = OutputFormat::parse(format)?;
                let report = backup::restore_directory(backup_dir, target)?;
                format_backup_report("Restore", &report, format)
            }
            Commands::Config { format } => match format.as_str() {
                "toml" => self.config.to_toml(),
                "json" => Ok(serde_json::to_string_pretty(&self.config)?),
                other => Err(ApiError::InvalidArgument(format!(
                    "Unknown format '{}' (expected 'toml' or 'json')",
                    other
                ))),
            },
        }
    }
}

/// Command name used in logs.
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Scan { .. } => "scan",
        Commands::Compare { .. } => "compare",
        Commands::Except { .. } => "except",
        Commands::Clean { .. } => "clean",
        Commands::Dirty { .. } => "dirty",
        Commands::Backup { .. } => "backup",
        Commands::Restore { .. } => "restore",
        Commands::Config { .. } => "config",
    }
}
