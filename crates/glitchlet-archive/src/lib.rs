//! Intake of untrusted upload archives.
//!
//! # Architecture
//!
//! - `policy.rs` - Fixed limits and allow/deny lists
//! - `sanitize.rs` - Entry path validation (zip-slip prevention)
//! - `source/` - Index-addressed access to archive members
//! - `scan.rs` - Total validation pass over metadata, with quotas
//! - `extract.rs` - Size-verified extraction into a staging directory

pub use entry::{ArchiveEntry, EntryMetadata, ExtractReport, ScannedArchive};
pub use error::{Error, ErrorKind, Result};
pub use extract::extract;
pub use policy::IntakePolicy;
pub use sanitize::{normalize_path, sanitize_entry_path};
pub use scan::scan;
pub use source::{ArchiveSource, ZipSource, open_zip};

pub mod entry;
mod error;
mod extract;
pub mod policy;
mod sanitize;
mod scan;
pub mod source;
