//! Recursive directory scanner

use crate::blacklist::Blacklist;
use crate::error::ScanError;
use crate::snapshot::entry::{FileEntry, FileRef};
use crate::snapshot::{hasher, path, DirectorySnapshot};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};
use walkdir::WalkDir;

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Whether to follow symbolic links (default: false)
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Hash files on the rayon pool (default: true)
    #[serde(default = "default_true")]
    pub parallel_hashing: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            parallel_hashing: true,
        }
    }
}

/// Which blacklist rules a listing honors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    /// Names, extensions and skip-directories
    Full,
    /// Skip-directories only. Patch directories are listed this way because
    /// their `.patch` artifacts would otherwise be excluded by extension.
    SkipDirectoriesOnly,
}

/// Walks a root, hashing and relativizing every non-blacklisted file.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    blacklist: Arc<Blacklist>,
    config: ScannerConfig,
}

impl DirectoryScanner {
    pub fn new(blacklist: Arc<Blacklist>) -> Self {
        Self {
            blacklist,
            config: ScannerConfig::default(),
        }
    }

    pub fn with_config(blacklist: Arc<Blacklist>, config: ScannerConfig) -> Self {
        Self { blacklist, config }
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scan `root` into entries ordered by enumeration.
    ///
    /// Enumeration is depth-first with siblings sorted by file name, so two scans
    /// of an unchanged tree agree. Ids restart at 1 on every call. The first
    /// unreadable entry aborts the whole scan.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn scan(&self, root: &Path) -> Result<Vec<FileEntry>, ScanError> {
        let start = Instant::now();
        let files = self.list(root, ListFilter::Full)?;
        debug!(file_count = files.len(), "Enumerated files");

        let hash_one = |(index, file): (usize, FileRef)| -> Result<FileEntry, ScanError> {
            let content_hash = hasher::hash_file(&file.full_name)?;
            trace!(path = %file.relative_path, hash = %content_hash, "Hashed file");
            let parent = file
                .full_name
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            Ok(FileEntry {
                id: index as u64 + 1,
                name: file.name,
                full_name: file.full_name,
                relative_path: file.relative_path,
                native_path: file.native_path,
                content_hash,
                path: parent,
            })
        };

        let entries = if self.config.parallel_hashing {
            files
                .into_par_iter()
                .enumerate()
                .map(hash_one)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            files
                .into_iter()
                .enumerate()
                .map(hash_one)
                .collect::<Result<Vec<_>, _>>()?
        };

        info!(
            file_count = entries.len(),
            duration_ms = start.elapsed().as_millis(),
            "Scan completed"
        );
        Ok(entries)
    }

    /// Scan `root` into a RelativePath-keyed snapshot.
    pub fn snapshot(&self, root: &Path) -> Result<DirectorySnapshot, ScanError> {
        Ok(self.scan(root)?.into_iter().collect())
    }

    /// List files under `root` without hashing them.
    ///
    /// Two on-disk names that share a RelativePath (for example the composed and
    /// decomposed spellings of one name) fail the listing with
    /// [`ScanError::InvalidPath`].
    pub fn list(&self, root: &Path, filter: ListFilter) -> Result<Vec<FileRef>, ScanError> {
        let root = path::canonicalize_root(root)?;
        let mut files = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        let walker = WalkDir::new(&root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !self.is_skipped_dir(&root, entry.path())
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let at = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone());
                ScanError::io(at, e.into())
            })?;

            if !entry.file_type().is_file() {
                if !entry.file_type().is_dir() {
                    debug!(path = %entry.path().display(), "Skipping non-regular file");
                }
                continue;
            }

            let full_name = entry.path().to_path_buf();
            if filter == ListFilter::Full && self.blacklist.is_blacklisted(&full_name) {
                trace!(path = %full_name.display(), "Skipping blacklisted file");
                continue;
            }

            let native_path = path::native_relative(&root, &full_name)?;
            let relative_path = path::relative_key(&native_path)?;
            if let Some(previous) = seen.insert(relative_path.clone(), native_path.clone()) {
                return Err(ScanError::InvalidPath(format!(
                    "{} and {} both resolve to {}",
                    previous.display(),
                    native_path.display(),
                    relative_path
                )));
            }

            files.push(FileRef {
                name: entry.file_name().to_string_lossy().into_owned(),
                relative_path,
                native_path,
                full_name,
            });
        }

        Ok(files)
    }

    fn is_skipped_dir(&self, root: &Path, dir: &Path) -> bool {
        let rel: PathBuf = dir.strip_prefix(root).unwrap_or(dir).to_path_buf();
        let skipped = self.blacklist.is_skip_directory(&rel);
        if skipped {
            debug!(dir = %rel.display(), "Skipping directory");
        }
        skipped
    }
}
