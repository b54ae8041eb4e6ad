/// Metadata reported by an archive for one member, before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryMetadata {
    pub name: String,
    pub size: u64,
    pub is_directory: bool,
}

/// One validated archive member.
///
/// `path` is normalized, relative and policy-compliant; directories carry no
/// trailing slash and a zero size. `declared_size` is untrusted until the
/// extractor has counted the bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub is_directory: bool,
    pub declared_size: u64,
    pub source_index: usize,
}

/// Output of a successful scan, in archive order.
#[derive(Clone, Debug, Default)]
pub struct ScannedArchive {
    pub entries: Vec<ArchiveEntry>,
    pub file_count: usize,
    pub total_bytes: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub files_written: usize,
    pub directories_created: usize,
    pub bytes_written: u64,
}
