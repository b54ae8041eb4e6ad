pub mod relocate;
pub mod unique_dir;

pub use relocate::{FallbackStrategy, RelocateOptions, Relocation, copy_then_remove, relocate_dir};
pub use unique_dir::{UniqueDir, UniqueDirOptions, create_unique_dir};
