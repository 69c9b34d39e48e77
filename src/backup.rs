//! Backup and restore of an install directory
//!
//! The engine never rolls back a partially applied patch set; callers that want
//! a way back mirror the install directory before Dirty and restore it on
//! failure.

use crate::blacklist::Blacklist;
use crate::error::ApiError;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

/// Result of a backup or restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub files_copied: usize,
}

/// `updelta_<date>_<name>`, the directory name used for a backup of `name`.
pub fn backup_dir_name(name: &str, date: NaiveDate) -> String {
    format!("updelta_{}_{}", date.format("%Y-%m-%d"), name)
}

/// Default backup location for `source`: a dated sibling directory.
pub fn default_backup_dir(source: &Path) -> Result<PathBuf, ApiError> {
    let source = dunce::canonicalize(source).map_err(|e| io_error(source, e))?;
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string());
    let parent = source.parent().unwrap_or(&source);
    Ok(parent.join(backup_dir_name(&name, Utc::now().date_naive())))
}

/// Mirror `source` into `destination`, skipping the blacklist's skip-directories.
///
/// Every file is copied, including blacklisted names: a backup restores the
/// install exactly. `destination` is pruned from the walk when it lies inside
/// `source`.
#[instrument(skip(blacklist), fields(source = %source.display(), destination = %destination.display()))]
pub fn backup_directory(
    source: &Path,
    destination: &Path,
    blacklist: &Blacklist,
) -> Result<BackupReport, ApiError> {
    let start = Instant::now();
    let files_copied = mirror(source, destination, |rel| blacklist.is_skip_directory(rel))?;
    info!(
        files_copied,
        duration_ms = start.elapsed().as_millis(),
        "Backup completed"
    );
    Ok(BackupReport {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        files_copied,
    })
}

/// Copy a backup back over `target`, overwriting files of the same path.
///
/// Files present in `target` but not in the backup are left in place.
#[instrument(fields(backup = %backup.display(), target = %target.display()))]
pub fn restore_directory(backup: &Path, target: &Path) -> Result<BackupReport, ApiError> {
    let start = Instant::now();
    let files_copied = mirror(backup, target, |_| false)?;
    info!(
        files_copied,
        duration_ms = start.elapsed().as_millis(),
        "Restore completed"
    );
    Ok(BackupReport {
        source: backup.to_path_buf(),
        destination: target.to_path_buf(),
        files_copied,
    })
}

fn mirror<F>(source: &Path, destination: &Path, skip_dir: F) -> Result<usize, ApiError>
where
    F: Fn(&Path) -> bool,
{
    if !source.is_dir() {
        return Err(io_error(
            source,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }
    let source = dunce::canonicalize(source).map_err(|e| io_error(source, e))?;
    fs::create_dir_all(destination).map_err(|e| io_error(destination, e))?;
    let destination = dunce::canonicalize(destination).map_err(|e| io_error(destination, e))?;

    let walker = WalkDir::new(&source).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        if entry.path() == destination {
            return false;
        }
        let rel = entry.path().strip_prefix(&source).unwrap_or(entry.path());
        !skip_dir(rel)
    });

    let mut copied = 0;
    for entry in walker {
        let entry = entry.map_err(|e| {
            let at = e.path().map(Path::to_path_buf).unwrap_or_else(|| source.clone());
            io_error(&at, e.into())
        })?;
        let rel = entry
            .path()
            .strip_prefix(&source)
            .unwrap_or(entry.path());
        let out = destination.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&out).map_err(|e| io_error(&out, e))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &out).map_err(|e| io_error(&out, e))?;
            debug!(path = %rel.display(), "Copied");
            copied += 1;
        }
    }
    Ok(copied)
}

fn io_error(path: &Path, source: std::io::Error) -> ApiError {
    ApiError::Io {
        path: path.to_path_buf(),
        source,
    }
}
