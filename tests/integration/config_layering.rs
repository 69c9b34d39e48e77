//! Configuration precedence: defaults < global file < workspace file < env.

use super::test_utils::{with_isolated_env, write_tree, Release};
use std::fs;
use tempfile::TempDir;
use updelta::config::{ConfigLoader, WORKSPACE_CONFIG_FILE};
use updelta::error::ApiError;
use updelta::DifferentialEngine;

#[test]
fn test_defaults_without_any_file() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();

    let config = with_isolated_env(&test_dir, &[], || ConfigLoader::load(&workspace).unwrap());

    assert!(config.blacklist.use_defaults);
    assert!(config.blacklist.files.is_empty());
    assert!(config.scanner.parallel_hashing);
    assert!(!config.dirty.remove_patch_dir);
}

#[cfg(target_os = "linux")]
#[test]
fn test_workspace_file_overrides_global_file() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();

    let global_dir = test_dir.path().join("xdg-config").join("updelta");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("config.toml"),
        r#"
[blacklist]
files = ["global.dll"]
skip_directories = ["cache"]

[dirty]
remove_patch_dir = true
"#,
    )
    .unwrap();
    fs::write(
        workspace.join(WORKSPACE_CONFIG_FILE),
        r#"
[blacklist]
files = ["workspace.dll"]
"#,
    )
    .unwrap();

    let config = with_isolated_env(&test_dir, &[], || ConfigLoader::load(&workspace).unwrap());

    assert_eq!(config.blacklist.files, vec!["workspace.dll"]);
    assert_eq!(config.blacklist.skip_directories, vec!["cache"]);
    assert!(config.dirty.remove_patch_dir);
}

#[test]
fn test_environment_overrides_workspace_file() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(
        workspace.join(WORKSPACE_CONFIG_FILE),
        r#"
[scanner]
parallel_hashing = true
"#,
    )
    .unwrap();

    let config = with_isolated_env(
        &test_dir,
        &[
            ("UPDELTA_SCANNER__PARALLEL_HASHING", "false"),
            ("UPDELTA_BLACKLIST__EXTENSIONS", ".pdb,.log"),
        ],
        || ConfigLoader::load(&workspace).unwrap(),
    );

    assert!(!config.scanner.parallel_hashing);
    assert_eq!(config.blacklist.extensions, vec![".pdb", ".log"]);
}

#[test]
fn test_environment_specific_workspace_file() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(
        workspace.join(WORKSPACE_CONFIG_FILE),
        "[logging]\nlevel = \"info\"\n",
    )
    .unwrap();
    fs::write(
        workspace.join("updelta.ci.toml"),
        "[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let config = with_isolated_env(&test_dir, &[("UPDELTA_ENV", "ci")], || {
        ConfigLoader::load(&workspace).unwrap()
    });

    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_workspace_file_is_an_error() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(workspace.join(WORKSPACE_CONFIG_FILE), "[blacklist\nfiles = 3").unwrap();

    let result = with_isolated_env(&test_dir, &[], || ConfigLoader::load(&workspace));
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}

#[test]
fn test_engine_from_config_uses_configured_blacklist() {
    let test_dir = TempDir::new().unwrap();
    let config_file = test_dir.path().join("custom.toml");
    fs::write(
        &config_file,
        r#"
[blacklist]
use_defaults = false
extensions = ["pdb"]
"#,
    )
    .unwrap();

    let config = with_isolated_env(&test_dir, &[], || {
        ConfigLoader::load_from_file(&config_file).unwrap()
    });
    let engine = DifferentialEngine::from_config(&config);

    let release = Release::new();
    write_tree(
        &release.new_dir(),
        &[("app.pdb", "symbols"), ("bundle.zip", "zip")],
    );
    let report = engine
        .clean(&release.old(), &release.new_dir(), &release.patch())
        .unwrap();

    // Defaults are off, so the archive ships; the symbol file does not.
    assert_eq!(report.added, vec!["bundle.zip"]);
}
