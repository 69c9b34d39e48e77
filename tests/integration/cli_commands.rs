//! End-to-end tests of the updelta binary.

use super::test_utils::{read_tree, write_tree, Release};
use std::path::Path;
use std::process::{Command, Output};

fn run(release: &Release, args: &[&str]) -> Output {
    let home = release.root.path().join("home");
    std::fs::create_dir_all(&home).unwrap();
    Command::new(env!("CARGO_BIN_EXE_updelta"))
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_STATE_HOME", home.join("state"))
        .env_remove("UPDELTA_LOG")
        .arg("--workspace")
        .arg(release.root.path())
        .arg("--quiet")
        .args(args)
        .output()
        .unwrap()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_clean_and_dirty_commands() {
    let release = Release::new();
    write_tree(&release.old(), &[("a.txt", "1"), ("b.txt", "2")]);
    write_tree(&release.new_dir(), &[("a.txt", "1"), ("b.txt", "3"), ("c.txt", "4")]);
    write_tree(&release.install(), &[("a.txt", "1"), ("b.txt", "2")]);

    let (old, new, patch, install) = (release.old(), release.new_dir(), release.patch(), release.install());
    let output = run(
        &release,
        &["clean", arg(&old), arg(&new), arg(&patch), "--format", "json"],
    );
    assert!(
        output.status.success(),
        "clean failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["patched"], serde_json::json!(["b.txt"]));
    assert_eq!(report["added"], serde_json::json!(["c.txt"]));

    let output = run(&release, &["dirty", arg(&install), arg(&patch), "--remove-patch-dir"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 patched, 1 added, 0 skipped"));

    assert_eq!(read_tree(&install), read_tree(&new));
    assert!(!patch.exists());
}

#[test]
fn test_compare_and_except_commands() {
    let release = Release::new();
    write_tree(&release.old(), &[("gone.txt", "x"), ("same.txt", "s")]);
    write_tree(&release.new_dir(), &[("same.txt", "s"), ("new.txt", "n")]);
    let (old, new) = (release.old(), release.new_dir());

    let output = run(&release, &["compare", arg(&old), arg(&new), "--format", "json"]);
    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["left_only"], serde_json::json!(["gone.txt"]));
    assert_eq!(result["right_only"], serde_json::json!(["new.txt"]));
    assert_eq!(result["changed"], serde_json::json!([]));

    let output = run(&release, &["except", arg(&old), arg(&new), "--format", "json"]);
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["relative_path"], "gone.txt");
}

#[test]
fn test_scan_text_output() {
    let release = Release::new();
    write_tree(&release.old(), &[("bin/app.exe", "abc")]);
    let old = release.old();

    let output = run(&release, &["scan", arg(&old)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bin/app.exe"));
    // First twelve hex digits of SHA-256("abc").
    assert!(stdout.contains("ba7816bf8f01"));
    assert!(stdout.contains("1 file(s)"));
}

#[test]
fn test_missing_directory_exits_nonzero() {
    let release = Release::new();
    let missing = release.root.path().join("missing");
    let patch = release.patch();

    let output = run(&release, &["dirty", arg(&missing), arg(&patch)]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("directory does not exist"));
}

#[test]
fn test_unknown_format_rejected() {
    let release = Release::new();
    let old = release.old();
    let output = run(&release, &["scan", arg(&old), "--format", "yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown format 'yaml'"));
}

#[test]
fn test_backup_and_restore_commands() {
    let release = Release::new();
    write_tree(&release.install(), &[("app.exe", "v1")]);
    let install = release.install();
    let backup = release.root.path().join("bak");

    let output = run(&release, &["backup", arg(&install), arg(&backup)]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("copied 1 file(s)"));

    std::fs::write(install.join("app.exe"), "broken").unwrap();
    let output = run(&release, &["restore", arg(&backup), arg(&install)]);
    assert!(output.status.success());
    assert_eq!(std::fs::read_to_string(install.join("app.exe")).unwrap(), "v1");
}

#[test]
fn test_config_command_reads_workspace_file() {
    let release = Release::new();
    std::fs::write(
        release.root.path().join("updelta.toml"),
        "[blacklist]\nskip_directories = [\"logs\"]\n",
    )
    .unwrap();

    let output = run(&release, &["config"]);
    assert!(output.status.success());
    let rendered = String::from_utf8_lossy(&output.stdout);
    let parsed: toml::Value = toml::from_str(&rendered).unwrap();
    assert_eq!(
        parsed["blacklist"]["skip_directories"],
        toml::Value::Array(vec![toml::Value::String("logs".to_string())])
    );
}
