use std::io;
use std::path::PathBuf;

/// Who is to blame for a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed, oversized or disallowed upload.
    ClientInput,
    /// Directory creation, file write or move failure on our side.
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty file path")]
    EmptyPath,

    #[error("file path is {len} characters long, limit is {max}")]
    PathTooLong { len: usize, max: usize },

    #[error("absolute path '{path}'")]
    AbsolutePath { path: String },

    #[error("parent path in '{path}'")]
    ParentTraversal { path: String },

    #[error("hidden path '{path}'")]
    HiddenPath { path: String },

    #[error("blocked path segment '{segment}' in '{path}'")]
    BlockedSegment { path: String, segment: String },

    #[error("blocked filename '{path}'")]
    BlockedFilename { path: String },

    #[error("file type not allowed: '{path}'")]
    DisallowedFileType { path: String },

    #[error("archive holds more than {max} files")]
    TooManyFiles { max: usize },

    #[error("archive expands to more than {max} bytes")]
    ProjectTooLarge { max: u64 },

    #[error("archive is {size} bytes, limit is {max}")]
    ArchiveTooLarge { size: u64, max: u64 },

    #[error("not a readable zip archive")]
    InvalidArchive,

    #[error("failed to open archive entry '{path}'")]
    ReadFailed { path: String },

    #[error("failed to decompress '{path}': {source}")]
    ExtractionFailed { path: String, source: io::Error },

    #[error("'{path}' declared {declared} bytes but produced {actual}")]
    SizeMismatch {
        path: String,
        declared: u64,
        actual: u64,
    },

    #[error("failed to write '{path}': {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WriteFailed { .. } | Self::DirectoryCreationFailed { .. } => ErrorKind::Storage,
            _ => ErrorKind::ClientInput,
        }
    }

    /// Short message safe to show to the uploader.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::EmptyPath => "Empty file path.",
            Self::PathTooLong { .. } => "File path too long.",
            Self::AbsolutePath { .. } => "Absolute paths are not allowed.",
            Self::ParentTraversal { .. } => "Parent paths are not allowed.",
            Self::HiddenPath { .. } => "Hidden files are not allowed.",
            Self::BlockedSegment { .. } => "Blocked path segment.",
            Self::BlockedFilename { .. } => "Blocked filename.",
            Self::DisallowedFileType { .. } => "File type not allowed.",
            Self::TooManyFiles { .. } => "Too many files.",
            Self::ProjectTooLarge { .. } => "Project too large.",
            Self::ArchiveTooLarge { .. } => "Zip file too large.",
            Self::InvalidArchive => "Invalid zip file.",
            Self::ReadFailed { .. } => "Failed to read zip contents.",
            Self::ExtractionFailed { .. } | Self::SizeMismatch { .. } => "Failed to extract file.",
            Self::WriteFailed { .. } => "Failed to write extracted file.",
            Self::DirectoryCreationFailed { .. } => "Failed to create directory.",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
