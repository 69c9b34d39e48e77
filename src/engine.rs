//! Differential engine
//!
//! Two one-shot operations share nothing but configuration:
//!
//! - **Clean** scans an old and a new release tree and writes the patch set: every
//!   new file with no counterpart is copied under its own name, every file that
//!   replaces a changed counterpart is copied as `<name>.patch`, and identical
//!   files are left out.
//! - **Dirty** applies such a patch set onto an installation: `.patch` artifacts
//!   overwrite the file they are matched with, other artifacts are added.
//!
//! Neither operation deletes installed files and neither rolls back on failure.
//! Callers serialize calls that touch the same directories.

use crate::blacklist::Blacklist;
use crate::config::UpdeltaConfig;
use crate::error::EngineError;
use crate::matcher::{
    patch_path, strip_patch_suffix, CleanMatcher, DefaultCleanMatcher, DefaultDirtyMatcher,
    DirtyMatcher,
};
use crate::snapshot::{
    ComparisonResult, DirectoryScanner, FileEntry, FileRef, ListFilter, ScannerConfig,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Options for patch application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyOptions {
    /// Remove the patch directory once every artifact has been applied
    #[serde(default)]
    pub remove_patch_dir: bool,
}

/// What a Clean call emitted, by RelativePath.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// New files copied under their own name
    pub added: Vec<String>,
    /// Changed files copied as `<name>.patch`
    pub patched: Vec<String>,
    /// Matched files with identical content (nothing emitted)
    pub unchanged: Vec<String>,
    /// Old files absent from the new tree. Recorded only; never written to the
    /// patch set.
    pub deleted: Vec<String>,
}

impl CleanReport {
    /// Whether the patch set is empty.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.patched.is_empty()
    }
}

/// What a Dirty call changed, by RelativePath under the install directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirtyReport {
    /// Installed files overwritten by a matched artifact
    pub patched: Vec<String>,
    /// Files copied in as net additions
    pub added: Vec<String>,
    /// Artifacts left unapplied (orphaned `.patch` files, blacklisted names),
    /// by RelativePath under the patch directory
    pub skipped: Vec<String>,
}

/// Produces and applies whole-file patch sets.
#[derive(Debug, Clone)]
pub struct DifferentialEngine {
    scanner: DirectoryScanner,
    dirty_options: DirtyOptions,
}

impl DifferentialEngine {
    pub fn new(blacklist: Blacklist) -> Self {
        Self::with_scanner(DirectoryScanner::new(Arc::new(blacklist)))
    }

    pub fn with_scanner(scanner: DirectoryScanner) -> Self {
        Self {
            scanner,
            dirty_options: DirtyOptions::default(),
        }
    }

    pub fn from_config(config: &UpdeltaConfig) -> Self {
        let scanner = DirectoryScanner::with_config(
            Arc::new(config.blacklist.to_blacklist()),
            config.scanner.clone(),
        );
        Self::with_scanner(scanner).with_dirty_options(config.dirty.clone())
    }

    pub fn with_scanner_config(self, config: ScannerConfig) -> Self {
        let blacklist = Arc::new(self.scanner.blacklist().clone());
        Self {
            scanner: DirectoryScanner::with_config(blacklist, config),
            ..self
        }
    }

    pub fn with_dirty_options(mut self, options: DirtyOptions) -> Self {
        self.dirty_options = options;
        self
    }

    pub fn blacklist(&self) -> &Blacklist {
        self.scanner.blacklist()
    }

    pub fn scanner(&self) -> &DirectoryScanner {
        &self.scanner
    }

    pub fn default_clean_matcher(&self) -> DefaultCleanMatcher {
        DefaultCleanMatcher::new(self.scanner.clone())
    }

    /// Diff two trees with the default matcher.
    pub fn compare(&self, old_dir: &Path, new_dir: &Path) -> Result<ComparisonResult, EngineError> {
        self.default_clean_matcher().compare(old_dir, new_dir)
    }

    /// Files under `old_dir` whose RelativePath is absent under `new_dir`.
    pub fn except(&self, old_dir: &Path, new_dir: &Path) -> Result<Vec<FileEntry>, EngineError> {
        self.default_clean_matcher().except(old_dir, new_dir)
    }

    /// Produce the patch set turning `old_dir` into `new_dir` under `patch_dir`.
    pub fn clean(
        &self,
        old_dir: &Path,
        new_dir: &Path,
        patch_dir: &Path,
    ) -> Result<CleanReport, EngineError> {
        self.clean_with(old_dir, new_dir, patch_dir, &self.default_clean_matcher())
    }

    /// [`clean`](Self::clean) with a caller-supplied matcher.
    #[instrument(
        skip_all,
        fields(old = %old_dir.display(), new = %new_dir.display(), patch = %patch_dir.display())
    )]
    pub fn clean_with(
        &self,
        old_dir: &Path,
        new_dir: &Path,
        patch_dir: &Path,
        matcher: &dyn CleanMatcher,
    ) -> Result<CleanReport, EngineError> {
        let start = Instant::now();
        info!("Starting patch generation");

        let comparison = matcher.compare(old_dir, new_dir)?;
        fs::create_dir_all(patch_dir).map_err(|e| EngineError::write(patch_dir, e))?;

        let mut report = CleanReport::default();
        for candidate in comparison.right.entries() {
            let rel = &candidate.relative_path;
            let target = patch_dir.join(&candidate.native_path);
            match matcher.match_entry(candidate, &comparison.left)? {
                None => {
                    copy_file(&candidate.full_name, &target)?;
                    debug!(path = %rel, "Emitted new file");
                    report.added.push(rel.clone());
                }
                Some(previous) if previous.same_content(candidate) => {
                    report.unchanged.push(rel.clone());
                }
                Some(_) => {
                    copy_file(&candidate.full_name, &patch_path(&target))?;
                    debug!(path = %rel, "Emitted replacement");
                    report.patched.push(rel.clone());
                }
            }
        }

        report.deleted = comparison.left_only.iter().cloned().collect();
        if !report.deleted.is_empty() {
            debug!(count = report.deleted.len(), "Old files absent from new tree (not emitted)");
        }

        info!(
            added = report.added.len(),
            patched = report.patched.len(),
            unchanged = report.unchanged.len(),
            deleted = report.deleted.len(),
            duration_ms = start.elapsed().as_millis(),
            "Patch generation completed"
        );
        Ok(report)
    }

    /// Apply the patch set in `patch_dir` onto `install_dir`.
    pub fn dirty(&self, install_dir: &Path, patch_dir: &Path) -> Result<DirtyReport, EngineError> {
        self.dirty_with(install_dir, patch_dir, &DefaultDirtyMatcher)
    }

    /// [`dirty`](Self::dirty) with a caller-supplied matcher.
    #[instrument(
        skip_all,
        fields(install = %install_dir.display(), patch = %patch_dir.display())
    )]
    pub fn dirty_with(
        &self,
        install_dir: &Path,
        patch_dir: &Path,
        matcher: &dyn DirtyMatcher,
    ) -> Result<DirtyReport, EngineError> {
        let start = Instant::now();
        for dir in [install_dir, patch_dir] {
            if !dir.is_dir() {
                return Err(EngineError::MissingDirectory(dir.to_path_buf()));
            }
        }
        info!("Starting patch application");

        let installed = self.scanner.list(install_dir, ListFilter::Full)?;
        let mut remaining = self.scanner.list(patch_dir, ListFilter::SkipDirectoriesOnly)?;
        let mut report = DirtyReport::default();

        for file in &installed {
            let Some(artifact) = matcher.match_artifact(file, &remaining)? else {
                continue;
            };
            let index = remaining
                .iter()
                .position(|candidate| candidate.relative_path == artifact.relative_path)
                .ok_or_else(|| {
                    EngineError::MatchAmbiguity(format!(
                        "{} matched {}, which is not an unapplied artifact",
                        file.relative_path, artifact.relative_path
                    ))
                })?;
            let artifact = remaining.swap_remove(index);

            replace_file(&artifact.full_name, &file.full_name)?;
            debug!(path = %file.relative_path, artifact = %artifact.relative_path, "Replaced file");
            report.patched.push(file.relative_path.clone());
        }

        // Keep additions in listing order regardless of swap_remove.
        remaining.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        for artifact in remaining {
            if self.should_skip_addition(&artifact) {
                report.skipped.push(artifact.relative_path);
                continue;
            }
            let target = install_dir.join(&artifact.native_path);
            if target.is_file() {
                replace_file(&artifact.full_name, &target)?;
            } else {
                copy_file(&artifact.full_name, &target)?;
            }
            debug!(path = %artifact.relative_path, "Added file");
            report.added.push(artifact.relative_path);
        }

        if self.dirty_options.remove_patch_dir {
            fs::remove_dir_all(patch_dir).map_err(|e| EngineError::write(patch_dir, e))?;
            debug!("Removed patch directory");
        }

        info!(
            patched = report.patched.len(),
            added = report.added.len(),
            skipped = report.skipped.len(),
            duration_ms = start.elapsed().as_millis(),
            "Patch application completed"
        );
        Ok(report)
    }

    fn should_skip_addition(&self, artifact: &FileRef) -> bool {
        if strip_patch_suffix(&artifact.name).is_some() {
            warn!(artifact = %artifact.relative_path, "No installed file for replacement artifact");
            return true;
        }
        if self.blacklist().is_blacklisted(&artifact.relative_path) {
            debug!(artifact = %artifact.relative_path, "Skipping blacklisted artifact");
            return true;
        }
        false
    }
}

/// Copy `src` to `dest`, creating parent directories and overwriting `dest`.
fn copy_file(src: &Path, dest: &Path) -> Result<(), EngineError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| EngineError::write(parent, e))?;
    }
    fs::copy(src, dest).map_err(|e| EngineError::write(dest, e))?;
    Ok(())
}

/// Overwrite `target` with the bytes of `src`.
///
/// The bytes are staged in a sibling temporary file which is then renamed over
/// `target`, so `target` is never observed half-written. Permissions of the
/// original `target` are carried over.
fn replace_file(src: &Path, target: &Path) -> Result<(), EngineError> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(target).map(|m| m.permissions()).ok();

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| EngineError::write(dir, e))?;
    let mut reader = fs::File::open(src).map_err(|e| EngineError::write(src, e))?;
    io::copy(&mut reader, staged.as_file_mut()).map_err(|e| EngineError::write(staged.path(), e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| EngineError::write(staged.path(), e))?;

    staged
        .persist(target)
        .map_err(|e| EngineError::write(target, e.error))?;

    if let Some(permissions) = permissions {
        fs::set_permissions(target, permissions).map_err(|e| EngineError::write(target, e))?;
    }
    Ok(())
}
