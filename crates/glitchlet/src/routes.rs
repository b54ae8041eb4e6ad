use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{Method, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use glitchlet_publish::{IntakePipeline, Upload};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::upload::spool_upload;

/// Room left above the archive ceiling for multipart framing.
const BODY_SLACK: u64 = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<IntakePipeline>,
}

impl AppState {
    pub fn new(pipeline: IntakePipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Published {
    pub ok: bool,
    pub slug: String,
    pub url: String,
}

/// Mount the intake endpoint on `route`.
pub fn router(state: AppState, route: &str) -> Router {
    let limit = state.pipeline.policy().max_archive_bytes.saturating_add(BODY_SLACK);
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            route,
            post(publish)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn publish(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Published>, ApiError> {
    let multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "request is not a multipart upload");
        ApiError::MissingUpload
    })?;

    let pipeline = Arc::clone(&state.pipeline);
    let spooled = spool_upload(
        multipart,
        pipeline.temp_root(),
        pipeline.policy().max_archive_bytes,
    )
    .await?;

    let project = tokio::task::spawn_blocking(move || {
        let upload = Upload::new(spooled.file.path(), spooled.size);
        pipeline.run(&upload)
    })
    .await
    .map_err(|source| ApiError::Task { source })??;

    Ok(Json(Published {
        ok: true,
        slug: project.slug,
        url: project.url,
    }))
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
