//! HTTP handlers

use axum::{extract::State, Json};
use tracing::info;

use super::models::{
    GenerateEmailRequest, HtmlResponse, MessageResponse, SendEmailRequest, StatusResponse,
    TemplateListResponse,
};
use crate::error::ApiError;
use crate::extractors::{TemplateUpload, ValidatedJson};
use crate::health::{check_template_dir, HealthCheckResponse};
use crate::state::AppState;

/// `GET /`
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Email Generator API is running".to_string(),
    })
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let mut response = HealthCheckResponse::new(env!("CARGO_PKG_VERSION"));
    response.add_component(
        "templates",
        check_template_dir(state.service().store().dir()).await,
    );
    Json(response)
}

/// `GET /templates`
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        templates: state.service().store().list().await,
    })
}

/// `POST /generate-email-html`
///
/// # Errors
///
/// 404 if the template does not exist, 422 if it fails to render.
pub async fn generate_email_html(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GenerateEmailRequest>,
) -> Result<Json<HtmlResponse>, ApiError> {
    let html_content = state
        .service()
        .render_html(&request.template_name, &request.context)
        .await?;

    Ok(Json(HtmlResponse { html_content }))
}

/// `POST /send-email`
///
/// # Errors
///
/// 404 if the template does not exist, 422 for invalid input or render
/// failures, 500 if the mail relay fails.
pub async fn send_email(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendEmailRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.service().send(request).await?;

    Ok(Json(StatusResponse::success("Email sent successfully")))
}

/// `POST /upload-template`
///
/// # Errors
///
/// 400 for a bad file name or extension, 413 if the file is too large, 500 if
/// it cannot be written.
pub async fn upload_template(
    State(state): State<AppState>,
    TemplateUpload(file): TemplateUpload,
) -> Result<Json<StatusResponse>, ApiError> {
    let path = state.service().store().save(&file.filename, &file.data).await?;

    info!(
        template = %file.filename,
        bytes = file.data.len(),
        content_type = %file.content_type,
        path = %path.display(),
        "Template uploaded"
    );

    Ok(Json(
        StatusResponse::success(format!(
            "Template '{}' uploaded successfully",
            file.filename
        ))
        .with_filename(file.filename),
    ))
}
