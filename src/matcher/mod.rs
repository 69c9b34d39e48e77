//! Correspondence rules between files of two trees
//!
//! Clean (patch generation) asks a [`CleanMatcher`] which old file a new file
//! replaces. Dirty (patch application) asks a [`DirtyMatcher`] which patch
//! artifact applies to an installed file. Both answer with `Ok(None)` when there
//! is no counterpart: that is a normal outcome, not an error.

mod clean;
mod dirty;

pub use clean::{CleanMatcher, DefaultCleanMatcher};
pub use dirty::{DefaultDirtyMatcher, DirtyMatcher};

use std::path::{Path, PathBuf};

/// Suffix marking a full-content replacement artifact.
pub const PATCH_SUFFIX: &str = ".patch";

/// Artifact file name for a replacement of `name`.
pub fn patch_name(name: &str) -> String {
    format!("{}{}", name, PATCH_SUFFIX)
}

/// Artifact path for a replacement of the file at `native`.
///
/// The suffix is appended to the raw file name, so names that are not valid
/// UTF-8 survive unchanged.
pub fn patch_path(native: &Path) -> PathBuf {
    let mut artifact = native.as_os_str().to_os_string();
    artifact.push(PATCH_SUFFIX);
    PathBuf::from(artifact)
}

/// Name of the file an artifact replaces, or `None` for plain additions.
pub fn strip_patch_suffix(name: &str) -> Option<&str> {
    name.strip_suffix(PATCH_SUFFIX).filter(|stem| !stem.is_empty())
}
