use std::path::Path;

use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::error::ApiError;

/// Name of the multipart field carrying the archive.
pub const UPLOAD_FIELD: &str = "zip";

/// An upload written to a temporary file that is deleted on drop.
#[derive(Debug)]
pub struct SpooledUpload {
    pub file: NamedTempFile,
    pub size: u64,
}

/// Stream the `zip` field to a temporary file under `temp_root`.
///
/// Fails as soon as more than `max_bytes` have arrived. Other fields are
/// skipped.
pub async fn spool_upload(
    mut multipart: Multipart,
    temp_root: &Path,
    max_bytes: u64,
) -> Result<SpooledUpload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(UPLOAD_FIELD) {
            return spool_field(field, temp_root, max_bytes).await;
        }
    }
    Err(ApiError::MissingUpload)
}

async fn spool_field(
    mut field: Field<'_>,
    temp_root: &Path,
    max_bytes: u64,
) -> Result<SpooledUpload, ApiError> {
    let spool = tempfile::Builder::new()
        .prefix("upload_")
        .suffix(".zip")
        .tempfile_in(temp_root)
        .map_err(|source| ApiError::Spool { source })?;
    let handle = spool.reopen().map_err(|source| ApiError::Spool { source })?;
    let mut out = tokio::fs::File::from_std(handle);

    let mut size = 0u64;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len() as u64;
        if size > max_bytes {
            return Err(ApiError::UploadTooLarge);
        }
        out.write_all(&chunk)
            .await
            .map_err(|source| ApiError::Spool { source })?;
    }
    out.flush().await.map_err(|source| ApiError::Spool { source })?;

    tracing::debug!(size, path = %spool.path().display(), "upload spooled");
    Ok(SpooledUpload { file: spool, size })
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        // The body limit sits just above the archive ceiling.
        ApiError::UploadTooLarge
    } else {
        ApiError::UploadFailed {
            reason: err.body_text(),
        }
    }
}
