use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::entry::EntryMetadata;
use crate::error::{Error, Result};
use crate::policy::IntakePolicy;
use crate::source::ArchiveSource;

pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader).map_err(|_| Error::InvalidArchive)?;
        Ok(Self { archive })
    }
}

/// Open the zip at `path`, refusing it before parsing if the file is larger
/// than the policy's archive ceiling.
pub fn open_zip(path: &Path, policy: &IntakePolicy) -> Result<ZipSource<BufReader<File>>> {
    let file = File::open(path).map_err(|_| Error::InvalidArchive)?;
    let size = file.metadata().map_err(|_| Error::InvalidArchive)?.len();
    if size > policy.max_archive_bytes {
        return Err(Error::ArchiveTooLarge {
            size,
            max: policy.max_archive_bytes,
        });
    }
    ZipSource::new(BufReader::new(file))
}

impl<R: Read + Seek> ArchiveSource for ZipSource<R> {
    type Reader<'a>
        = zip::read::ZipFile<'a, R>
    where
        Self: 'a;

    fn len(&self) -> usize {
        self.archive.len()
    }

    fn metadata(&mut self, index: usize) -> Option<EntryMetadata> {
        // Raw access reads the central directory record without decompressing.
        let file = self.archive.by_index_raw(index).ok()?;
        Some(EntryMetadata {
            name: file.name().to_owned(),
            size: file.size(),
            is_directory: file.is_dir(),
        })
    }

    fn open(&mut self, index: usize) -> Result<Self::Reader<'_>> {
        self.archive.by_index(index).map_err(|e| {
            tracing::debug!(index, error = %e, "cannot open archive member");
            Error::ReadFailed {
                path: format!("#{index}"),
            }
        })
    }
}
