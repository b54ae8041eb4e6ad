//! Access to archive members by index.

mod zip;

pub use self::zip::{ZipSource, open_zip};

use std::io::Read;

use crate::entry::EntryMetadata;
use crate::error::Result;

/// An opened archive whose members can be listed and streamed by index.
pub trait ArchiveSource {
    type Reader<'a>: Read
    where
        Self: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Metadata for member `index`, or `None` if the archive cannot
    /// describe it.
    fn metadata(&mut self, index: usize) -> Option<EntryMetadata>;

    /// Stream the decompressed bytes of member `index`.
    fn open(&mut self, index: usize) -> Result<Self::Reader<'_>>;
}
