//! Clean-side matching: pairing new files with the files they replace

use crate::error::EngineError;
use crate::snapshot::{ComparisonResult, DirectoryScanner, DirectorySnapshot, FileEntry, ListFilter};
use std::collections::HashSet;
use std::path::Path;
use tracing::trace;

/// Strategy consulted while producing a patch set.
pub trait CleanMatcher: Send + Sync {
    /// Scan both roots and diff them.
    fn compare(&self, old_root: &Path, new_root: &Path) -> Result<ComparisonResult, EngineError>;

    /// Entries under `old_root` whose RelativePath is absent under `new_root`.
    fn except(&self, old_root: &Path, new_root: &Path) -> Result<Vec<FileEntry>, EngineError>;

    /// The old entry `candidate` replaces, or `None` when `candidate` is a
    /// genuinely new file.
    fn match_entry(
        &self,
        candidate: &FileEntry,
        old: &DirectorySnapshot,
    ) -> Result<Option<FileEntry>, EngineError>;
}

/// Pairs files by identical name and RelativePath.
#[derive(Debug, Clone)]
pub struct DefaultCleanMatcher {
    scanner: DirectoryScanner,
}

impl DefaultCleanMatcher {
    pub fn new(scanner: DirectoryScanner) -> Self {
        Self { scanner }
    }

    pub fn scanner(&self) -> &DirectoryScanner {
        &self.scanner
    }
}

impl CleanMatcher for DefaultCleanMatcher {
    fn compare(&self, old_root: &Path, new_root: &Path) -> Result<ComparisonResult, EngineError> {
        let old = self.scanner.snapshot(old_root)?;
        let new = self.scanner.snapshot(new_root)?;
        Ok(old.compare(&new))
    }

    fn except(&self, old_root: &Path, new_root: &Path) -> Result<Vec<FileEntry>, EngineError> {
        // The right side only contributes RelativePaths, so it is listed, not hashed.
        let right: HashSet<String> = self
            .scanner
            .list(new_root, ListFilter::Full)?
            .into_iter()
            .map(|file| file.relative_path)
            .collect();

        Ok(self
            .scanner
            .scan(old_root)?
            .into_iter()
            .filter(|entry| !right.contains(&entry.relative_path))
            .collect())
    }

    fn match_entry(
        &self,
        candidate: &FileEntry,
        old: &DirectorySnapshot,
    ) -> Result<Option<FileEntry>, EngineError> {
        let Some(previous) = old.get(&candidate.relative_path) else {
            return Ok(None);
        };
        if previous.name != candidate.name {
            return Ok(None);
        }
        if !previous.exists() || !candidate.exists() {
            trace!(path = %candidate.relative_path, "Backing file vanished, treating as new");
            return Ok(None);
        }
        Ok(Some(previous.clone()))
    }
}
