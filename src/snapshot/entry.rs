//! Per-file record produced by a scan

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// One scanned file.
///
/// `id` is the scan-local enumeration index (starting at 1). It is unique within
/// one snapshot and meaningless across snapshots; `relative_path` is the
/// cross-snapshot identity. `native_path` is where the file actually lives
/// under its scan root and is what output paths are built from.
///
/// Equality is identity-by-content: two entries are equal when their content
/// hashes and names match, ignoring ASCII case. Location does not take part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: u64,
    pub name: String,
    pub full_name: PathBuf,
    pub relative_path: String,
    #[serde(default)]
    pub native_path: PathBuf,
    pub content_hash: String,
    /// Containing directory
    pub path: PathBuf,
}

impl FileEntry {
    /// Whether both entries carry the same content, regardless of name.
    pub fn same_content(&self, other: &FileEntry) -> bool {
        super::hasher::hashes_equal(&self.content_hash, &other.content_hash)
    }

    /// Whether the backing file still exists on disk.
    pub fn exists(&self) -> bool {
        self.full_name.is_file()
    }
}

/// An un-hashed file listing, used where content identity is not needed
/// (patch application matches on names only).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub relative_path: String,
    /// On-disk path relative to the listed root
    #[serde(default)]
    pub native_path: PathBuf,
    pub full_name: PathBuf,
}

impl From<&FileEntry> for FileRef {
    fn from(entry: &FileEntry) -> Self {
        FileRef {
            name: entry.name.clone(),
            relative_path: entry.relative_path.clone(),
            native_path: entry.native_path.clone(),
            full_name: entry.full_name.clone(),
        }
    }
}

impl PartialEq for FileEntry {
    fn eq(&self, other: &Self) -> bool {
        self.same_content(other) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for FileEntry {}

impl Hash for FileEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.content_hash.to_ascii_lowercase().hash(state);
        self.name.to_ascii_lowercase().hash(state);
    }
}
