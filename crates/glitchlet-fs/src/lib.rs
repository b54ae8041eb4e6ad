//! Filesystem primitives for staging and publishing extracted projects.
//!
//! - `primitives/` - rename-or-copy relocation, exclusive random-named directories
//! - `workspace.rs` - staging directory that removes itself unless committed

mod error;
pub mod primitives;
mod workspace;

pub use error::{Error, Result};
pub use primitives::{
    FallbackStrategy, RelocateOptions, Relocation, UniqueDir, UniqueDirOptions, copy_then_remove,
    create_unique_dir, relocate_dir,
};
pub use workspace::Workspace;
