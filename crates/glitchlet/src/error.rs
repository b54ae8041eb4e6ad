use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use glitchlet_publish::ErrorKind;
use serde_json::json;

/// Everything the intake endpoint can answer with instead of a project.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("request carries no 'zip' file field")]
    MissingUpload,

    #[error("upload exceeds the archive size limit")]
    UploadTooLarge,

    #[error("malformed upload: {reason}")]
    UploadFailed { reason: String },

    #[error("failed to spool upload: {source}")]
    Spool { source: std::io::Error },

    #[error(transparent)]
    Publish(#[from] glitchlet_publish::Error),

    #[error("intake task did not complete: {source}")]
    Task { source: tokio::task::JoinError },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingUpload | Self::UploadTooLarge | Self::UploadFailed { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Publish(e) => match e.kind() {
                ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
                ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Spool { .. } | Self::Task { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "Method not allowed.",
            Self::MissingUpload => "Missing zip file.",
            Self::UploadTooLarge => "Zip file too large.",
            Self::UploadFailed { .. } | Self::Spool { .. } | Self::Task { .. } => "Upload failed.",
            Self::Publish(e) => e.public_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = json!({ "ok": false, "error": self.public_message() });
        (status, Json(body)).into_response()
    }
}
