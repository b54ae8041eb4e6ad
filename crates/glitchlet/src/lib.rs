//! HTTP front end for the glitchlet publisher.
//!
//! Accepts a multipart upload carrying a zip archive, runs it through
//! [`glitchlet_publish::IntakePipeline`] and answers with the public URL of
//! the new project.

pub use config::Settings;
pub use error::ApiError;
pub use routes::{AppState, Published, router};

pub mod cli;
pub mod config;
mod error;
mod routes;
pub mod telemetry;
mod upload;

use axum::Router;
use glitchlet_archive::IntakePolicy;
use glitchlet_publish::{IntakePipeline, Publisher};

/// Build the service from deployment settings with the fixed intake policy.
pub fn app(settings: &Settings) -> Router {
    let publisher = Publisher::new(
        &settings.storage.projects_root,
        settings.public.base_url.clone(),
    );
    let pipeline = IntakePipeline::new(
        IntakePolicy::default(),
        &settings.storage.temp_root,
        publisher,
    );
    router(AppState::new(pipeline), &settings.public.route)
}
