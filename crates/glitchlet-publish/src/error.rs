use std::path::PathBuf;

pub use glitchlet_archive::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Archive(#[from] glitchlet_archive::Error),

    #[error("failed to prepare projects root '{path}': {source}")]
    ProjectsRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create staging area: {source}")]
    Staging { source: glitchlet_fs::Error },

    #[error("failed to reserve a project slug: {source}")]
    Slug { source: glitchlet_fs::Error },

    #[error("failed to move project into place: {source}")]
    Relocate { source: glitchlet_fs::Error },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Archive(e) => e.kind(),
            _ => ErrorKind::Storage,
        }
    }

    /// Short message safe to show to the uploader.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Archive(e) => e.public_message(),
            Self::ProjectsRoot { .. } | Self::Staging { .. } | Self::Slug { .. } => {
                "Failed to create directory."
            }
            Self::Relocate { .. } => "Failed to move files.",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
