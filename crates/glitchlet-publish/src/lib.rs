//! Turns an uploaded archive into a published static project.
//!
//! [`IntakePipeline::run`] validates the whole archive, extracts it into a
//! private staging directory and hands the result to [`Publisher`], which
//! moves it under a freshly reserved slug.

pub use error::{Error, ErrorKind, Result};
pub use pipeline::{IntakePipeline, Upload};
pub use project::{Project, project_url};
pub use publisher::{Publisher, SLUG_BYTES};

mod error;
mod pipeline;
mod project;
mod publisher;
