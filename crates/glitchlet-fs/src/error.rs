use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to move '{from}' to '{to}': {source}")]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("no free name under '{parent}' after {attempts} attempts")]
    RetryLimitExceeded { parent: PathBuf, attempts: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
