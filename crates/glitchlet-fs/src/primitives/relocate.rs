use crate::{Error, Result};
use std::path::Path;

/// What to do when `rename` cannot move the directory, typically because
/// source and destination live on different filesystems.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackStrategy {
    #[default]
    Copy,
    Error,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RelocateOptions {
    pub fallback: FallbackStrategy,
}

impl RelocateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fallback(mut self, fallback: FallbackStrategy) -> Self {
        self.fallback = fallback;
        self
    }
}

/// The strategy that ended up moving the directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relocation {
    Renamed,
    Copied,
}

/// Move the directory `src` to `dest`.
///
/// `dest` may already exist as an empty directory (a reserved name). The
/// rename fast path is tried first; if it fails the tree is copied and `src`
/// removed, unless the options forbid the fallback.
pub fn relocate_dir(
    src: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: RelocateOptions,
) -> Result<Relocation> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    let err = match std::fs::rename(src, dest) {
        Ok(()) => return Ok(Relocation::Renamed),
        Err(e) => e,
    };

    match options.fallback {
        FallbackStrategy::Error => Err(Error::Relocate {
            from: src.to_path_buf(),
            to: dest.to_path_buf(),
            source: err,
        }),
        FallbackStrategy::Copy => {
            tracing::warn!(
                from = %src.display(),
                to = %dest.display(),
                error = %err,
                "rename failed, falling back to copy"
            );
            copy_then_remove(src, dest)?;
            Ok(Relocation::Copied)
        }
    }
}

/// Copy `src` into `dest` recursively, then remove `src`.
///
/// A failed copy leaves `src` untouched. Removal of `src` after a successful
/// copy is best effort.
pub fn copy_then_remove(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    let src = src.as_ref();
    copy_tree(src, dest.as_ref())?;

    if let Err(e) = std::fs::remove_dir_all(src) {
        tracing::warn!(path = %src.display(), error = %e, "failed to remove source after copy");
    }
    Ok(())
}

/// Reproduce the directory tree under `src` at `dest`, which may already
/// exist. Anything that is neither a directory nor a regular file is skipped.
/// The first unreadable or uncopyable file aborts the copy.
fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    let mut pending = vec![(src.to_path_buf(), dest.to_path_buf())];

    while let Some((from_dir, to_dir)) = pending.pop() {
        std::fs::create_dir_all(&to_dir).map_err(|e| Error::CreateDir {
            path: to_dir.clone(),
            source: e,
        })?;

        let read_err = |e| Error::Read {
            path: from_dir.clone(),
            source: e,
        };
        for entry in std::fs::read_dir(&from_dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let from = entry.path();
            let to = to_dir.join(entry.file_name());
            let file_type = entry.file_type().map_err(read_err)?;

            if file_type.is_dir() {
                pending.push((from, to));
            } else if file_type.is_file() {
                std::fs::copy(&from, &to).map_err(|e| Error::Write { path: to, source: e })?;
            } else {
                tracing::debug!(path = %from.display(), "skipping non-regular file");
            }
        }
    }
    Ok(())
}
