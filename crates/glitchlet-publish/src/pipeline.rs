use std::path::{Path, PathBuf};

use glitchlet_archive::{Error as ArchiveError, IntakePolicy, extract, open_zip, scan};
use glitchlet_fs::Workspace;

use crate::error::{Error, Result};
use crate::project::Project;
use crate::publisher::Publisher;

const STAGING_PREFIX: &str = "glitchlet_";

/// An uploaded archive already spooled to local disk.
#[derive(Clone, Debug)]
pub struct Upload {
    pub path: PathBuf,
    /// Size reported by the transport.
    pub size: u64,
}

impl Upload {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Validate, stage and publish one upload.
///
/// Nothing is written outside the temp root until the whole archive has been
/// validated, and nothing reaches the projects root until every file has been
/// extracted and its size verified.
#[derive(Clone, Debug)]
pub struct IntakePipeline {
    policy: IntakePolicy,
    temp_root: PathBuf,
    publisher: Publisher,
}

impl IntakePipeline {
    pub fn new(policy: IntakePolicy, temp_root: impl Into<PathBuf>, publisher: Publisher) -> Self {
        Self {
            policy,
            temp_root: temp_root.into(),
            publisher,
        }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    pub fn run(&self, upload: &Upload) -> Result<Project> {
        let span = tracing::info_span!(
            "publish",
            upload = %upload.path.display(),
            size = upload.size
        );
        let _enter = span.enter();

        match self.run_inner(upload) {
            Ok(project) => Ok(project),
            Err(e) => {
                match e.kind() {
                    crate::ErrorKind::ClientInput => {
                        tracing::info!(error = %e, "upload rejected")
                    }
                    crate::ErrorKind::Storage => {
                        tracing::error!(error = %e, "publish failed")
                    }
                }
                Err(e)
            }
        }
    }

    fn run_inner(&self, upload: &Upload) -> Result<Project> {
        if upload.size > self.policy.max_archive_bytes {
            return Err(ArchiveError::ArchiveTooLarge {
                size: upload.size,
                max: self.policy.max_archive_bytes,
            }
            .into());
        }

        self.publisher.ensure_root()?;

        let mut source = open_zip(&upload.path, &self.policy)?;
        let scanned = scan(&mut source, &self.policy)?;

        let workspace = Workspace::create_in(&self.temp_root, STAGING_PREFIX)
            .map_err(|source| Error::Staging { source })?;
        let report = extract(&mut source, &scanned.entries, workspace.path())?;
        tracing::debug!(
            files = report.files_written,
            bytes = report.bytes_written,
            "archive staged"
        );

        self.publisher.publish(workspace)
    }
}
