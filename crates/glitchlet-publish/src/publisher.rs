use std::path::{Path, PathBuf};

use glitchlet_fs::{RelocateOptions, Relocation, UniqueDirOptions, Workspace, create_unique_dir};

use crate::error::{Error, Result};
use crate::project::{Project, project_url};

/// Random bytes per slug; 4 bytes give an 8 character hex token.
pub const SLUG_BYTES: usize = 4;

/// Moves staged trees into the public projects root under fresh slugs.
#[derive(Clone, Debug)]
pub struct Publisher {
    projects_root: PathBuf,
    base_url: String,
    slug_bytes: usize,
    relocate: RelocateOptions,
}

impl Publisher {
    pub fn new(projects_root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            projects_root: projects_root.into(),
            base_url: base_url.into(),
            slug_bytes: SLUG_BYTES,
            relocate: RelocateOptions::new(),
        }
    }

    pub fn relocate_options(mut self, options: RelocateOptions) -> Self {
        self.relocate = options;
        self
    }

    pub fn projects_root(&self) -> &Path {
        &self.projects_root
    }

    /// Create the projects root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.projects_root).map_err(|e| Error::ProjectsRoot {
            path: self.projects_root.clone(),
            source: e,
        })
    }

    /// Reserve a slug and move the staged tree into it.
    ///
    /// The slug directory is claimed with an exclusive create before anything
    /// is moved, so concurrent publishers cannot land on the same slug. If the
    /// move fails, the reservation is removed again.
    pub fn publish(&self, staged: Workspace) -> Result<Project> {
        let reserved = create_unique_dir(
            &self.projects_root,
            UniqueDirOptions::new().random_bytes(self.slug_bytes),
        )
        .map_err(|source| Error::Slug { source })?;

        match staged.commit(&reserved.path, self.relocate) {
            Ok(how) => {
                let project = Project {
                    url: project_url(&self.base_url, &reserved.token),
                    slug: reserved.token,
                    path: reserved.path,
                };
                tracing::info!(
                    slug = %project.slug,
                    copied = how == Relocation::Copied,
                    "project published"
                );
                Ok(project)
            }
            Err(source) => {
                if let Err(e) = std::fs::remove_dir_all(&reserved.path) {
                    tracing::warn!(
                        path = %reserved.path.display(),
                        error = %e,
                        "failed to release reserved slug"
                    );
                }
                Err(Error::Relocate { source })
            }
        }
    }
}
