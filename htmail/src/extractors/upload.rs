//! Single-file multipart upload extractor
//!
//! Reads exactly one file part from a `multipart/form-data` body, enforcing a
//! size limit while streaming so oversized uploads are never fully buffered.

use axum::{
    extract::{multipart::Field, FromRef, FromRequest, Multipart, Request},
    http::StatusCode,
};

use crate::error::ApiError;

/// Default maximum upload size (1 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Maximum accepted upload size, taken from the router state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimit(pub usize);

impl Default for UploadLimit {
    fn default() -> Self {
        Self(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

/// A file received through multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name supplied by the client
    pub filename: String,

    /// Content type supplied by the client
    pub content_type: String,

    /// File content
    pub data: Vec<u8>,
}

/// Extracts the single file part of a multipart request
///
/// Non-file fields are ignored. Rejections:
/// - no file part, an empty file name or empty content: 400
/// - more than one file part: 400
/// - a file larger than the [`UploadLimit`]: 413
#[derive(Debug)]
pub struct TemplateUpload(pub UploadedFile);

impl<S> FromRequest<S> for TemplateUpload
where
    S: Send + Sync,
    UploadLimit: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let UploadLimit(max_size) = UploadLimit::from_ref(state);

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| multipart_error(e.status(), e.body_text()))?;

        let mut upload = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e.status(), e.body_text()))?
        {
            let Some(filename) = field.file_name().map(ToString::to_string) else {
                continue;
            };
            if upload.is_some() {
                return Err(ApiError::BadRequest(
                    "Multiple files found, expected a single file".to_string(),
                ));
            }
            if filename.is_empty() {
                return Err(ApiError::BadRequest("Uploaded file has no name".to_string()));
            }

            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = read_field_data(field, max_size).await?;

            upload = Some(UploadedFile {
                filename,
                content_type,
                data,
            });
        }

        let file = upload.ok_or_else(|| ApiError::BadRequest("No file found in upload".to_string()))?;
        if file.data.is_empty() {
            return Err(ApiError::BadRequest(format!(
                "Uploaded file '{}' is empty",
                file.filename
            )));
        }

        Ok(Self(file))
    }
}

fn multipart_error(status: StatusCode, message: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(message)
    } else {
        ApiError::BadRequest(format!("Multipart error: {message}"))
    }
}

async fn read_field_data(mut field: Field<'_>, max_size: usize) -> Result<Vec<u8>, ApiError> {
    let mut data = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e.status(), e.body_text()))?
    {
        if data.len() + chunk.len() > max_size {
            return Err(ApiError::PayloadTooLarge(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}
