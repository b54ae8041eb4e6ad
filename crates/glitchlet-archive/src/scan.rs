use crate::entry::{ArchiveEntry, ScannedArchive};
use crate::error::{Error, Result};
use crate::policy::IntakePolicy;
use crate::sanitize::sanitize_entry_path;
use crate::source::ArchiveSource;

/// Validate every member of `source` without decompressing anything.
///
/// Members are visited in stored order and the returned entries keep that
/// order. The first violation aborts the scan, so either every entry is valid
/// or no entry list is produced at all. Quotas are enforced on declared sizes
/// as the scan progresses.
pub fn scan<S: ArchiveSource>(source: &mut S, policy: &IntakePolicy) -> Result<ScannedArchive> {
    let mut scanned = ScannedArchive::default();

    for index in 0..source.len() {
        let Some(meta) = source.metadata(index) else {
            tracing::debug!(index, "skipping member with unreadable metadata");
            continue;
        };

        let normalized = sanitize_entry_path(&meta.name, policy)?;

        if meta.is_directory || normalized.ends_with('/') {
            scanned.entries.push(ArchiveEntry {
                path: normalized.trim_end_matches('/').to_owned(),
                is_directory: true,
                declared_size: 0,
                source_index: index,
            });
            continue;
        }

        let extension = extension_of(&normalized).to_ascii_lowercase();
        if !policy.is_allowed_extension(&extension) {
            return Err(Error::DisallowedFileType { path: normalized });
        }

        scanned.file_count += 1;
        scanned.total_bytes = scanned.total_bytes.saturating_add(meta.size);

        if scanned.file_count > policy.max_file_count {
            return Err(Error::TooManyFiles {
                max: policy.max_file_count,
            });
        }
        if scanned.total_bytes > policy.max_extracted_bytes {
            return Err(Error::ProjectTooLarge {
                max: policy.max_extracted_bytes,
            });
        }

        scanned.entries.push(ArchiveEntry {
            path: normalized,
            is_directory: false,
            declared_size: meta.size,
            source_index: index,
        });
    }

    tracing::info!(
        entries = scanned.entries.len(),
        files = scanned.file_count,
        bytes = scanned.total_bytes,
        "archive scan passed"
    );
    Ok(scanned)
}

/// Text after the last dot of the final component, empty if there is none.
fn extension_of(path: &str) -> &str {
    let basename = path.rsplit('/').next().unwrap_or(path);
    basename.rsplit_once('.').map_or("", |(_, ext)| ext)
}
