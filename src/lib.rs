//! updelta: whole-file differential updates
//!
//! Scans two release trees, emits the files that differ as a patch set
//! (`Clean`), and applies a patch set onto an installation (`Dirty`).
//! Changed files are shipped whole under a `.patch` suffix; there is no
//! byte-level diffing.
//!
//! ```no_run
//! use std::path::Path;
//! use updelta::{Blacklist, DifferentialEngine};
//!
//! let engine = DifferentialEngine::new(Blacklist::default());
//! let report = engine.clean(Path::new("v1"), Path::new("v2"), Path::new("patch"))?;
//! println!("{} patched, {} added", report.patched.len(), report.added.len());
//! engine.dirty(Path::new("install"), Path::new("patch"))?;
//! # Ok::<(), updelta::error::EngineError>(())
//! ```

pub mod backup;
pub mod blacklist;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod snapshot;

pub use blacklist::Blacklist;
pub use engine::{CleanReport, DifferentialEngine, DirtyOptions, DirtyReport};
pub use matcher::{CleanMatcher, DefaultCleanMatcher, DefaultDirtyMatcher, DirtyMatcher};
pub use snapshot::{ComparisonResult, DirectoryScanner, DirectorySnapshot, FileEntry, FileRef};
