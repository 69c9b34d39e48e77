//! Blacklist behavior across scan, Clean and Dirty.

use super::test_utils::{read_tree, write_tree, Release};
use std::sync::Arc;
use updelta::{Blacklist, DifferentialEngine, DirectoryScanner};

#[test]
fn test_blacklisted_changes_are_not_emitted() {
    let release = Release::new();
    write_tree(
        &release.old(),
        &[("settings.json", "{}"), ("app.exe", "v1"), ("logs/a.log", "x")],
    );
    write_tree(
        &release.new_dir(),
        &[
            ("settings.json", "{\"changed\":true}"),
            ("app.exe", "v2"),
            ("logs/a.log", "y"),
            ("bundle.zip", "zip"),
        ],
    );

    let blacklist = Blacklist::default()
        .with_file("settings.json")
        .with_skip_directory("logs");
    let report = DifferentialEngine::new(blacklist)
        .clean(&release.old(), &release.new_dir(), &release.patch())
        .unwrap();

    assert_eq!(report.patched, vec!["app.exe"]);
    assert!(report.added.is_empty());
    let patch = read_tree(&release.patch());
    assert_eq!(patch.keys().collect::<Vec<_>>(), vec!["app.exe.patch"]);
}

#[test]
fn test_dirty_never_writes_blacklisted_names() {
    let release = Release::new();
    write_tree(&release.install(), &[("settings.json", "user")]);
    write_tree(
        &release.patch(),
        &[
            ("settings.json.patch", "vendor"),
            ("settings.json", "vendor"),
            ("extra.7z", "archive"),
            ("plugin.dll", "p"),
        ],
    );

    let blacklist = Blacklist::default().with_file("settings.json");
    let report = DifferentialEngine::new(blacklist)
        .dirty(&release.install(), &release.patch())
        .unwrap();

    assert_eq!(report.added, vec!["plugin.dll"]);
    assert!(report.patched.is_empty());
    assert_eq!(
        report.skipped,
        vec!["extra.7z", "settings.json", "settings.json.patch"]
    );
    let installed = read_tree(&release.install());
    assert_eq!(installed.get("settings.json").unwrap(), "user");
    assert!(!installed.contains_key("extra.7z"));
}

#[test]
fn test_skip_directories_pruned_in_patch_dir() {
    let release = Release::new();
    write_tree(&release.patch(), &[("backup/old.dll", "x"), ("new.dll", "n")]);

    let blacklist = Blacklist::default().with_skip_directory("backup");
    let report = DifferentialEngine::new(blacklist)
        .dirty(&release.install(), &release.patch())
        .unwrap();

    assert_eq!(report.added, vec!["new.dll"]);
    assert!(report.skipped.is_empty());
    assert!(!release.install().join("backup").exists());
}

#[test]
fn test_independent_blacklists_do_not_interfere() {
    let release = Release::new();
    write_tree(&release.old(), &[("a.pdb", "symbols"), ("a.dll", "code")]);

    let strict = DirectoryScanner::new(Arc::new(Blacklist::default().with_extension("pdb")));
    let lenient = DirectoryScanner::new(Arc::new(Blacklist::default()));

    assert_eq!(strict.scan(&release.old()).unwrap().len(), 1);
    assert_eq!(lenient.scan(&release.old()).unwrap().len(), 2);
}

#[test]
fn test_extension_case_insensitive() {
    let release = Release::new();
    write_tree(&release.old(), &[("BUNDLE.ZIP", "z"), ("keep.txt", "k")]);

    let scanner = DirectoryScanner::new(Arc::new(Blacklist::default()));
    let entries = scanner.scan(&release.old()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].relative_path, "keep.txt");
}
