//! CLI parse: clap types for updelta. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// updelta - whole-file differential updates
#[derive(Parser, Debug)]
#[command(name = "updelta")]
#[command(about = "Produce and apply whole-file patch sets between release trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace directory holding updelta.toml
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a directory and list its non-blacklisted files with their hashes
    Scan {
        root: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Compare two directories by relative path and content
    Compare {
        old: PathBuf,
        new: PathBuf,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List files of OLD whose relative path is absent from NEW
    Except {
        old: PathBuf,
        new: PathBuf,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write the patch set turning OLD into NEW under PATCH
    Clean {
        old: PathBuf,
        new: PathBuf,
        patch: PathBuf,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Apply the patch set in PATCH onto INSTALL
    Dirty {
        install: PathBuf,
        patch: PathBuf,
        /// Remove PATCH after a successful apply (overrides configuration)
        #[arg(long)]
        remove_patch_dir: bool,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Copy SOURCE into a backup directory
    Backup {
        source: PathBuf,
        /// Destination (default: dated sibling of SOURCE)
        destination: Option<PathBuf>,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Copy a backup back over TARGET
    Restore {
        backup: PathBuf,
        target: PathBuf,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the effective configuration
    Config {
        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },
}
