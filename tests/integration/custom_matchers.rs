//! Caller-supplied matching strategies.

use super::test_utils::{read_tree, write_tree, Release};
use std::path::Path;
use updelta::error::EngineError;
use updelta::{
    Blacklist, CleanMatcher, ComparisonResult, DefaultCleanMatcher, DifferentialEngine,
    DirectorySnapshot, FileEntry, FileRef,
};

/// Never pairs anything: every new file is treated as an addition.
struct NullCleanMatcher(DefaultCleanMatcher);

impl CleanMatcher for NullCleanMatcher {
    fn compare(&self, old_root: &Path, new_root: &Path) -> Result<ComparisonResult, EngineError> {
        self.0.compare(old_root, new_root)
    }

    fn except(&self, old_root: &Path, new_root: &Path) -> Result<Vec<FileEntry>, EngineError> {
        self.0.except(old_root, new_root)
    }

    fn match_entry(
        &self,
        _candidate: &FileEntry,
        _old: &DirectorySnapshot,
    ) -> Result<Option<FileEntry>, EngineError> {
        Ok(None)
    }
}

/// Pairs by file name anywhere in the old tree, following moved files.
struct ByNameMatcher(DefaultCleanMatcher);

impl CleanMatcher for ByNameMatcher {
    fn compare(&self, old_root: &Path, new_root: &Path) -> Result<ComparisonResult, EngineError> {
        self.0.compare(old_root, new_root)
    }

    fn except(&self, old_root: &Path, new_root: &Path) -> Result<Vec<FileEntry>, EngineError> {
        self.0.except(old_root, new_root)
    }

    fn match_entry(
        &self,
        candidate: &FileEntry,
        old: &DirectorySnapshot,
    ) -> Result<Option<FileEntry>, EngineError> {
        let mut found = old.entries().filter(|e| e.name == candidate.name);
        match (found.next(), found.next()) {
            (Some(only), None) => Ok(Some(only.clone())),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => Err(EngineError::MatchAmbiguity(format!(
                "{} appears more than once in the old tree",
                candidate.name
            ))),
        }
    }
}

fn engine() -> DifferentialEngine {
    DifferentialEngine::new(Blacklist::default())
}

#[test]
fn test_null_clean_matcher_copies_everything_verbatim() {
    let release = Release::new();
    write_tree(&release.old(), &[("a.txt", "1"), ("b.txt", "2")]);
    write_tree(&release.new_dir(), &[("a.txt", "1"), ("b.txt", "22")]);

    let engine = engine();
    let matcher = NullCleanMatcher(engine.default_clean_matcher());
    let report = engine
        .clean_with(&release.old(), &release.new_dir(), &release.patch(), &matcher)
        .unwrap();

    assert_eq!(report.added, vec!["a.txt", "b.txt"]);
    assert!(report.patched.is_empty());
    let patch = read_tree(&release.patch());
    assert_eq!(patch.get("a.txt").unwrap(), "1");
    assert_eq!(patch.get("b.txt").unwrap(), "22");
    assert!(!patch.keys().any(|k| k.ends_with(".patch")));
}

#[test]
fn test_null_dirty_matcher_adds_plain_artifacts_and_skips_patches() {
    let release = Release::new();
    write_tree(&release.install(), &[("app.exe", "v1"), ("lib.dll", "v1")]);
    write_tree(
        &release.patch(),
        &[("app.exe.patch", "v2"), ("lib.dll", "v2"), ("new.txt", "n")],
    );

    let null = |_: &FileRef, _: &[FileRef]| -> Result<Option<FileRef>, EngineError> { Ok(None) };
    let report = engine()
        .dirty_with(&release.install(), &release.patch(), &null)
        .unwrap();

    assert!(report.patched.is_empty());
    assert_eq!(report.added, vec!["lib.dll", "new.txt"]);
    assert_eq!(report.skipped, vec!["app.exe.patch"]);

    let installed = read_tree(&release.install());
    assert_eq!(installed.get("app.exe").unwrap(), "v1");
    assert_eq!(installed.get("lib.dll").unwrap(), "v2");
    assert_eq!(installed.get("new.txt").unwrap(), "n");
    assert!(!installed.contains_key("app.exe.patch"));
}

#[test]
fn test_by_name_matcher_follows_moved_file() {
    let release = Release::new();
    write_tree(&release.old(), &[("lib/core.dll", "v1")]);
    write_tree(&release.new_dir(), &[("bin/core.dll", "v2")]);

    let engine = engine();
    let matcher = ByNameMatcher(engine.default_clean_matcher());
    let report = engine
        .clean_with(&release.old(), &release.new_dir(), &release.patch(), &matcher)
        .unwrap();

    assert_eq!(report.patched, vec!["bin/core.dll"]);
    assert!(release.patch().join("bin").join("core.dll.patch").exists());
}

#[test]
fn test_matcher_error_aborts_clean() {
    let release = Release::new();
    write_tree(&release.old(), &[("a/dup.txt", "1"), ("b/dup.txt", "1")]);
    write_tree(&release.new_dir(), &[("c/dup.txt", "2")]);

    let engine = engine();
    let matcher = ByNameMatcher(engine.default_clean_matcher());
    let err = engine
        .clean_with(&release.old(), &release.new_dir(), &release.patch(), &matcher)
        .unwrap_err();

    assert!(matches!(err, EngineError::MatchAmbiguity(_)));
    assert!(read_tree(&release.patch()).is_empty());
}

#[test]
fn test_closure_dirty_matcher_across_directories() {
    let release = Release::new();
    write_tree(&release.install(), &[("bin/app.exe", "v1")]);
    write_tree(&release.patch(), &[("flat/app.exe.patch", "v2")]);

    // Ignores directories, pairing on file name alone.
    let by_name = |installed: &FileRef, artifacts: &[FileRef]| -> Result<Option<FileRef>, EngineError> {
        let wanted = format!("{}.patch", installed.name);
        Ok(artifacts.iter().find(|a| a.name == wanted).cloned())
    };
    let report = engine()
        .dirty_with(&release.install(), &release.patch(), &by_name)
        .unwrap();

    assert_eq!(report.patched, vec!["bin/app.exe"]);
    assert_eq!(
        read_tree(&release.install()).get("bin/app.exe").unwrap(),
        "v2"
    );
}
