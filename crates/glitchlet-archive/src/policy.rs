//! Fixed limits and allow/deny lists applied to every upload.

pub const MAX_ARCHIVE_BYTES: u64 = 25 * 1024 * 1024;
pub const MAX_EXTRACTED_BYTES: u64 = 150 * 1024 * 1024;
pub const MAX_FILE_COUNT: usize = 1200;
pub const MAX_PATH_LENGTH: usize = 200;

pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "html", "htm", "css", "js", "json", "txt", "md", "png", "jpg", "jpeg", "gif", "webp", "svg",
    "ico", "mp3", "wav", "mp4", "webm", "ogg",
];

/// Web-server control and credential files, compared case-insensitively.
pub const BLOCKED_FILENAMES: &[&str] = &[".htaccess", ".htpasswd", ".user.ini"];

pub const BLOCKED_SEGMENTS: &[&str] = &[".well-known"];

/// Immutable intake policy handed to the validator, scanner and pipeline.
///
/// `IntakePolicy::default()` is the production policy; the builder methods
/// exist so tests can exercise alternate limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntakePolicy {
    pub max_archive_bytes: u64,
    pub max_extracted_bytes: u64,
    pub max_file_count: usize,
    pub max_path_length: usize,
    pub allowed_extensions: Vec<String>,
    pub blocked_filenames: Vec<String>,
    pub blocked_segments: Vec<String>,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            max_archive_bytes: MAX_ARCHIVE_BYTES,
            max_extracted_bytes: MAX_EXTRACTED_BYTES,
            max_file_count: MAX_FILE_COUNT,
            max_path_length: MAX_PATH_LENGTH,
            allowed_extensions: to_owned(ALLOWED_EXTENSIONS),
            blocked_filenames: to_owned(BLOCKED_FILENAMES),
            blocked_segments: to_owned(BLOCKED_SEGMENTS),
        }
    }
}

impl IntakePolicy {
    pub fn max_archive_bytes(mut self, bytes: u64) -> Self {
        self.max_archive_bytes = bytes;
        self
    }

    pub fn max_extracted_bytes(mut self, bytes: u64) -> Self {
        self.max_extracted_bytes = bytes;
        self
    }

    pub fn max_file_count(mut self, count: usize) -> Self {
        self.max_file_count = count;
        self
    }

    pub fn max_path_length(mut self, len: usize) -> Self {
        self.max_path_length = len;
        self
    }

    pub fn allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|e| e.into().to_ascii_lowercase())
            .collect();
        self
    }

    pub fn blocked_filenames<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_filenames = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn blocked_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_segments = segments.into_iter().map(Into::into).collect();
        self
    }

    /// `extension` must already be lower-cased.
    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        !extension.is_empty() && self.allowed_extensions.iter().any(|e| e == extension)
    }

    pub fn is_blocked_filename(&self, basename: &str) -> bool {
        self.blocked_filenames
            .iter()
            .any(|b| b.eq_ignore_ascii_case(basename))
    }

    pub fn is_blocked_segment(&self, segment: &str) -> bool {
        self.blocked_segments.iter().any(|b| b == segment)
    }
}

fn to_owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}
