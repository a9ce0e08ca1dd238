//! HTTP boundary error
//!
//! Every failure a handler can produce ends up as an [`ApiError`], which
//! renders as a status code plus a `{"detail": "..."}` JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::email::EmailError;
use crate::service::ServiceError;
use crate::template::TemplateError;

/// Error returned by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Requested resource does not exist (404)
    #[error("{0}")]
    NotFound(String),

    /// Request could not be parsed or names an unacceptable file (400)
    #[error("{0}")]
    BadRequest(String),

    /// Request parsed but its content is invalid (422)
    #[error("{0}")]
    Unprocessable(String),

    /// Uploaded content exceeds the configured limit (413)
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Mail relay or filesystem failure (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(_) => Self::NotFound(err.to_string()),
            TemplateError::InvalidName(_) | TemplateError::InvalidExtension { .. } => {
                Self::BadRequest(err.to_string())
            }
            TemplateError::Render(e) => Self::Unprocessable(format!("Template rendering failed: {e}")),
            TemplateError::Io(e) => Self::Internal(format!("Template storage error: {e}")),
        }
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        if err.is_invalid_input() {
            Self::Unprocessable(err.to_string())
        } else {
            Self::Internal(format!("Failed to send email: {err}"))
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Template(e) => e.into(),
            ServiceError::Email(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), detail = %detail, "Request failed");
        } else {
            warn!(status = status.as_u16(), detail = %detail, "Request rejected");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
