use crate::primitives::{RelocateOptions, Relocation, UniqueDirOptions, create_unique_dir, relocate_dir};
use crate::Result;
use std::path::{Path, PathBuf};

/// A private staging directory owned by one in-flight operation.
///
/// The directory is removed when the workspace is dropped, unless it was
/// committed to its final location first.
#[derive(Debug)]
pub struct Workspace {
    staging_path: PathBuf,
    committed: bool,
}

impl Workspace {
    /// Create a fresh, empty staging directory under `root`.
    pub fn create_in(root: impl AsRef<Path>, prefix: &'static str) -> Result<Self> {
        let created = create_unique_dir(root, UniqueDirOptions::new().prefix(prefix))?;
        tracing::debug!(path = %created.path.display(), "created staging workspace");

        Ok(Self {
            staging_path: created.path,
            committed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.staging_path
    }

    /// Move the staged tree to `destination`.
    ///
    /// On failure the workspace is dropped and whatever is left of the
    /// staging directory is removed.
    pub fn commit(
        mut self,
        destination: impl AsRef<Path>,
        options: RelocateOptions,
    ) -> Result<Relocation> {
        let how = relocate_dir(&self.staging_path, destination, options)?;
        self.committed = true;
        Ok(how)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.committed && self.staging_path.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.staging_path) {
                tracing::warn!(
                    path = %self.staging_path.display(),
                    error = %e,
                    "failed to clean up staging workspace"
                );
            }
        }
    }
}
