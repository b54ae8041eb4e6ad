use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::entry::{ArchiveEntry, ExtractReport};
use crate::error::{Error, Result};
use crate::source::ArchiveSource;

const COPY_BUFFER: usize = 64 * 1024;

/// Materialize scanned `entries` under `staging`, in order.
///
/// Each file's byte count must equal its declared size. Reads are capped one
/// byte past the declared size, so an entry that inflates beyond what it
/// declared is caught without writing the excess. A failure part-way leaves
/// earlier entries on disk; `staging` is expected to be disposable.
pub fn extract<S: ArchiveSource>(
    source: &mut S,
    entries: &[ArchiveEntry],
    staging: &Path,
) -> Result<ExtractReport> {
    let mut report = ExtractReport::default();

    for entry in entries {
        let target = staging.join(&entry.path);

        if entry.is_directory {
            ensure_dir(&target)?;
            report.directories_created += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }

        let reader = source.open(entry.source_index).map_err(|_| Error::ReadFailed {
            path: entry.path.clone(),
        })?;
        let mut out = File::create(&target).map_err(|e| Error::WriteFailed {
            path: target.clone(),
            source: e,
        })?;

        let copied = copy_bounded(reader, &mut out, entry, &target)?;
        if copied != entry.declared_size {
            return Err(Error::SizeMismatch {
                path: entry.path.clone(),
                declared: entry.declared_size,
                actual: copied,
            });
        }

        tracing::debug!(path = %entry.path, bytes = copied, "extracted");
        report.files_written += 1;
        report.bytes_written += copied;
    }

    tracing::info!(
        files = report.files_written,
        directories = report.directories_created,
        bytes = report.bytes_written,
        "extraction finished"
    );
    Ok(report)
}

fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy at most `declared_size + 1` bytes, telling read (archive) failures
/// apart from write (storage) failures.
fn copy_bounded<R: Read>(
    reader: R,
    out: &mut File,
    entry: &ArchiveEntry,
    target: &Path,
) -> Result<u64> {
    let mut reader = reader.take(entry.declared_size.saturating_add(1));
    let mut buffer = vec![0u8; COPY_BUFFER];
    let mut copied = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(Error::ExtractionFailed {
                    path: entry.path.clone(),
                    source: e,
                });
            }
        };
        out.write_all(&buffer[..n]).map_err(|e| Error::WriteFailed {
            path: target.to_path_buf(),
            source: e,
        })?;
        copied += n as u64;
    }

    out.flush().map_err(|e| Error::WriteFailed {
        path: target.to_path_buf(),
        source: e,
    })?;
    Ok(copied)
}
