//! Directory snapshots
//!
//! A snapshot is the in-memory view of one scanned tree, keyed by RelativePath.
//! Comparing two snapshots is a set operation over the union of their keys, so
//! the outcome never depends on the order in which the filesystem enumerated
//! either tree.

pub mod entry;
pub mod hasher;
pub mod path;
pub mod scanner;

pub use entry::{FileEntry, FileRef};
pub use scanner::{DirectoryScanner, ListFilter, ScannerConfig};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Scanned tree keyed by RelativePath.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    entries: BTreeMap<String, FileEntry>,
    by_id: HashMap<u64, String>,
}

impl DirectorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any entry already stored at the same
    /// RelativePath. Returns the replaced entry.
    pub fn insert(&mut self, entry: FileEntry) -> Option<FileEntry> {
        let replaced = self.entries.insert(entry.relative_path.clone(), entry.clone());
        if let Some(old) = &replaced {
            self.by_id.remove(&old.id);
        }
        self.by_id.insert(entry.id, entry.relative_path);
        replaced
    }

    pub fn get(&self, relative_path: &str) -> Option<&FileEntry> {
        self.entries.get(relative_path)
    }

    pub fn get_by_id(&self, id: u64) -> Option<&FileEntry> {
        self.by_id.get(&id).and_then(|rel| self.entries.get(rel))
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.entries.contains_key(relative_path)
    }

    /// RelativePath of the directory holding `relative_path`, or `None` when
    /// the entry is not part of this snapshot. Root-level files yield `""`.
    pub fn parent(&self, relative_path: &str) -> Option<&str> {
        self.entries
            .get_key_value(relative_path)
            .map(|(key, _)| path::parent_of(key))
    }

    /// Entries whose containing directory is exactly `dir`.
    pub fn entries_in<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a FileEntry> + 'a {
        let dir = path::normalize_relative(dir);
        self.entries
            .iter()
            .filter(move |(rel, _)| path::parent_of(rel) == dir)
            .map(|(_, entry)| entry)
    }

    pub fn remove(&mut self, relative_path: &str) -> Option<FileEntry> {
        let removed = self.entries.remove(relative_path)?;
        self.by_id.remove(&removed.id);
        Some(removed)
    }

    /// Entries ordered by RelativePath.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }

    pub fn relative_paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diff `self` (left) against `other` (right).
    pub fn compare(&self, other: &DirectorySnapshot) -> ComparisonResult {
        let mut result = ComparisonResult::default();

        for (rel, left) in &self.entries {
            match other.entries.get(rel) {
                None => {
                    result.left_only.insert(rel.clone());
                }
                Some(right) if !left.same_content(right) => {
                    result.changed.insert(rel.clone());
                }
                Some(_) => {}
            }
        }
        for rel in other.entries.keys() {
            if !self.entries.contains_key(rel) {
                result.right_only.insert(rel.clone());
            }
        }

        result.left = self.clone();
        result.right = other.clone();
        result
    }
}

impl FromIterator<FileEntry> for DirectorySnapshot {
    fn from_iter<T: IntoIterator<Item = FileEntry>>(iter: T) -> Self {
        let mut snapshot = DirectorySnapshot::new();
        for entry in iter {
            snapshot.insert(entry);
        }
        snapshot
    }
}

/// Outcome of comparing two snapshots.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonResult {
    /// RelativePaths only present on the left
    pub left_only: BTreeSet<String>,
    /// RelativePaths only present on the right
    pub right_only: BTreeSet<String>,
    /// RelativePaths on both sides whose content hashes differ
    pub changed: BTreeSet<String>,
    #[serde(skip)]
    pub left: DirectorySnapshot,
    #[serde(skip)]
    pub right: DirectorySnapshot,
}

impl ComparisonResult {
    pub fn is_identical(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty() && self.changed.is_empty()
    }

    /// Right-side entries that are new or changed, in RelativePath order.
    pub fn different_entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.right
            .entries()
            .filter(|e| self.right_only.contains(&e.relative_path) || self.changed.contains(&e.relative_path))
    }
}
