//! Config loading facade: the only entry point callers use to obtain an
//! [`UpdeltaConfig`].

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::UpdeltaConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `workspace_root`.
    ///
    /// Precedence (highest wins): environment, workspace file, global file,
    /// defaults. Missing files are skipped; a present but malformed file is an
    /// error.
    pub fn load(workspace_root: &Path) -> Result<UpdeltaConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: UpdeltaConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from an explicit file, bypassing the global and
    /// workspace files. Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<UpdeltaConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);

        let config: UpdeltaConfig = builder.build()?.try_deserialize()?;
        debug!(config_path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Location of the global configuration file, whether or not it exists.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
