//! RelativePath derivation and normalization
//!
//! A RelativePath is the identity used to pair files across two snapshots. It is
//! always `/`-separated, carries no leading `./` or `/`, and is Unicode NFC so
//! the same name written on different platforms compares equal.

use crate::error::ScanError;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a scan root, failing with [`ScanError::RootNotFound`] when it
/// does not exist or is not a directory.
pub fn canonicalize_root(root: &Path) -> Result<PathBuf, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }
    // dunce avoids `\\?\` prefixes on Windows
    dunce::canonicalize(root).map_err(|e| ScanError::io(root, e))
}

/// Path of `full` relative to `root`, exactly as it is named on disk.
///
/// Output paths are built from this, never from the RelativePath key, so file
/// names keep their original bytes and normalization form.
pub fn native_relative(root: &Path, full: &Path) -> Result<PathBuf, ScanError> {
    let rel = full.strip_prefix(root).map_err(|_| {
        ScanError::InvalidPath(format!(
            "{} is not under {}",
            full.display(),
            root.display()
        ))
    })?;
    Ok(rel.to_path_buf())
}

/// Derive the RelativePath key of a native relative path.
pub fn relative_key(native: &Path) -> Result<String, ScanError> {
    let parts: Vec<String> = native
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().nfc().collect::<String>()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        return Err(ScanError::InvalidPath(format!(
            "{} has no relative component",
            native.display()
        )));
    }
    Ok(parts.join("/"))
}

/// Normalize a RelativePath string written by hand or on another platform.
pub fn normalize_relative(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let parts: Vec<String> = unified
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .map(|part| part.nfc().collect::<String>())
        .collect();
    parts.join("/")
}

/// Directory portion of a RelativePath; `""` for files at the root.
pub fn parent_of(relative: &str) -> &str {
    match relative.rfind('/') {
        Some(idx) => &relative[..idx],
        None => "",
    }
}
