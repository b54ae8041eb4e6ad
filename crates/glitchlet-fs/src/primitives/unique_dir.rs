use crate::{Error, Result};
use rand::RngCore;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug)]
pub struct UniqueDirOptions {
    pub prefix: &'static str,
    pub random_bytes: usize,
    pub max_attempts: u32,
}

impl Default for UniqueDirOptions {
    fn default() -> Self {
        Self {
            prefix: "",
            random_bytes: 8,
            max_attempts: 64,
        }
    }
}

impl UniqueDirOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn random_bytes(mut self, n: usize) -> Self {
        self.random_bytes = n;
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }
}

/// A directory this call created, and the random token that names it.
#[derive(Clone, Debug)]
pub struct UniqueDir {
    pub path: PathBuf,
    pub token: String,
}

/// Create a new directory under `parent` named `prefix + hex(random bytes)`.
///
/// The name is claimed with an exclusive `create_dir`, so two callers can
/// never both succeed on the same name. A collision draws a fresh token.
pub fn create_unique_dir(parent: impl AsRef<Path>, options: UniqueDirOptions) -> Result<UniqueDir> {
    let parent = parent.as_ref();

    for _ in 0..options.max_attempts {
        let token = random_hex(options.random_bytes);
        let path = parent.join(format!("{}{}", options.prefix, token));

        match std::fs::create_dir(&path) {
            Ok(()) => return Ok(UniqueDir { path, token }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::debug!(path = %path.display(), "name already taken, retrying");
            }
            Err(e) => return Err(Error::CreateDir { path, source: e }),
        }
    }

    Err(Error::RetryLimitExceeded {
        parent: parent.to_path_buf(),
        attempts: options.max_attempts,
    })
}

fn random_hex(n: usize) -> String {
    let mut bytes = vec![0u8; n];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
