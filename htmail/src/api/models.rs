//! Request and response bodies

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::template::Context;

pub use crate::service::SendRequest as SendEmailRequest;

/// Body of `POST /generate-email-html`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateEmailRequest {
    /// Template file name
    #[validate(length(min = 1, message = "template_name must not be empty"))]
    pub template_name: String,

    /// Template variables
    #[serde(default)]
    pub context: Context,
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human readable message
    pub message: String,
}

/// Body of `GET /templates`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateListResponse {
    /// Template file names, sorted
    pub templates: Vec<String>,
}

/// Body of `POST /generate-email-html`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlResponse {
    /// Rendered HTML
    pub html_content: String,
}

/// Body of successful `POST /send-email` and `POST /upload-template`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `"success"`
    pub status: String,

    /// Human readable message
    pub message: String,

    /// Stored file name, for uploads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl StatusResponse {
    /// Create a success response
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            filename: None,
        }
    }

    /// Attach the stored file name
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}
