//! Exclusion rules consulted on every scanned entry.
//!
//! A [`Blacklist`] is built once by the caller and then shared read-only by the
//! scanner and the engine. Three kinds of rules exist:
//!
//! - exact file names (`Newtonsoft.Json.dll`), compared against the final path
//!   component;
//! - file extensions (`.zip`), compared case-insensitively with a leading dot;
//! - skip-directory substrings (`backup`), matched against every directory
//!   component of a root-relative path.
//!
//! There is no global instance: independent operations may carry independent
//! blacklists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Component, Path};

/// Extensions excluded by [`Blacklist::default`]. Packaged archives and patch
/// artifacts are never treated as installable content.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".patch", ".7z", ".zip", ".rar", ".tar"];

/// Immutable set of exclusion rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blacklist {
    files: BTreeSet<String>,
    extensions: BTreeSet<String>,
    skip_directories: BTreeSet<String>,
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::empty().with_extensions(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl Blacklist {
    /// A blacklist with no rules at all.
    pub fn empty() -> Self {
        Self {
            files: BTreeSet::new(),
            extensions: BTreeSet::new(),
            skip_directories: BTreeSet::new(),
        }
    }

    pub fn with_file(mut self, name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim();
        if !name.is_empty() {
            self.files.insert(name.to_string());
        }
        self
    }

    pub fn with_files<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().fold(self, |list, name| list.with_file(name))
    }

    /// Add an extension. `zip`, `.zip` and `.ZIP` are the same rule.
    pub fn with_extension(mut self, extension: impl AsRef<str>) -> Self {
        if let Some(ext) = normalize_extension(extension.as_ref()) {
            self.extensions.insert(ext);
        }
        self
    }

    pub fn with_extensions<I, S>(self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extensions
            .into_iter()
            .fold(self, |list, ext| list.with_extension(ext))
    }

    pub fn with_skip_directory(mut self, fragment: impl AsRef<str>) -> Self {
        let fragment = fragment.as_ref().trim();
        if !fragment.is_empty() {
            self.skip_directories.insert(fragment.to_string());
        }
        self
    }

    pub fn with_skip_directories<I, S>(self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        fragments
            .into_iter()
            .fold(self, |list, fragment| list.with_skip_directory(fragment))
    }

    pub fn without_file(mut self, name: impl AsRef<str>) -> Self {
        self.files.remove(name.as_ref().trim());
        self
    }

    pub fn without_extension(mut self, extension: impl AsRef<str>) -> Self {
        if let Some(ext) = normalize_extension(extension.as_ref()) {
            self.extensions.remove(&ext);
        }
        self
    }

    pub fn without_skip_directory(mut self, fragment: impl AsRef<str>) -> Self {
        self.skip_directories.remove(fragment.as_ref().trim());
        self
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn skip_directories(&self) -> impl Iterator<Item = &str> {
        self.skip_directories.iter().map(String::as_str)
    }

    /// Whether the file at `path` is excluded by name or by extension.
    pub fn is_blacklisted(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        if self.files.contains(name.as_ref()) {
            return true;
        }
        match path.extension() {
            Some(ext) => {
                let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
                self.extensions.contains(&ext)
            }
            None => false,
        }
    }

    /// Whether any directory component of a root-relative `path` contains a
    /// skip-directory fragment.
    pub fn is_skip_directory(&self, path: impl AsRef<Path>) -> bool {
        if self.skip_directories.is_empty() {
            return false;
        }
        path.as_ref().components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                self.skip_directories
                    .iter()
                    .any(|fragment| name.contains(fragment.as_str()))
            }
            _ => false,
        })
    }
}

fn normalize_extension(extension: &str) -> Option<String> {
    let trimmed = extension.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}
