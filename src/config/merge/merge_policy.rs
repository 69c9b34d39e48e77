//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources replace earlier values key by key; lists are replaced whole,
//! never concatenated.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("blacklist.use_defaults", true)?
        .set_default("blacklist.files", Vec::<String>::new())?
        .set_default("blacklist.extensions", Vec::<String>::new())?
        .set_default("blacklist.skip_directories", Vec::<String>::new())?
        .set_default("scanner.follow_symlinks", false)?
        .set_default("scanner.parallel_hashing", true)?
        .set_default("dirty.remove_patch_dir", false)
}
