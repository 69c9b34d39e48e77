//! Dirty-side matching: finding the artifact that replaces an installed file

use crate::error::EngineError;
use crate::matcher::patch_name;
use crate::snapshot::FileRef;

/// Strategy consulted while applying a patch set.
///
/// `artifacts` only holds artifacts not yet consumed by an earlier match.
pub trait DirtyMatcher: Send + Sync {
    fn match_artifact(
        &self,
        installed: &FileRef,
        artifacts: &[FileRef],
    ) -> Result<Option<FileRef>, EngineError>;
}

impl<F> DirtyMatcher for F
where
    F: Fn(&FileRef, &[FileRef]) -> Result<Option<FileRef>, EngineError> + Send + Sync,
{
    fn match_artifact(
        &self,
        installed: &FileRef,
        artifacts: &[FileRef],
    ) -> Result<Option<FileRef>, EngineError> {
        self(installed, artifacts)
    }
}

/// Matches `<name>.patch` in the installed file's own relative directory.
///
/// Names are compared through their RelativePath keys, so an artifact written
/// in another Unicode normalization form still pairs with its file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDirtyMatcher;

impl DirtyMatcher for DefaultDirtyMatcher {
    fn match_artifact(
        &self,
        installed: &FileRef,
        artifacts: &[FileRef],
    ) -> Result<Option<FileRef>, EngineError> {
        let wanted = patch_name(&installed.relative_path);
        Ok(artifacts
            .iter()
            .find(|artifact| artifact.relative_path == wanted)
            .cloned())
    }
}
