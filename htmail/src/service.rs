//! Render-and-send orchestration
//!
//! [`EmailService`] ties the template store, the renderer and an email backend
//! together. HTTP handlers call into it; it knows nothing about HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};
use validator::{Validate, ValidationError};

use crate::config::HtmailConfig;
use crate::email::{Attachment, Email, EmailError, EmailSender};
use crate::template::{is_safe_file_name, Context, TemplateError, TemplateRenderer, TemplateStore};

/// Errors returned by [`EmailService`]
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Template lookup or rendering failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Building or delivering the message failed
    #[error(transparent)]
    Email(#[from] EmailError),
}

/// A request to render a template and mail the result
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendRequest {
    /// Template file name
    #[validate(length(min = 1, message = "template_name must not be empty"))]
    pub template_name: String,

    /// Subject line
    pub subject: String,

    /// Primary recipients
    #[validate(
        length(min = 1, message = "at least one recipient is required"),
        custom(function = "validate_addresses")
    )]
    pub recipients: Vec<String>,

    /// Template variables
    #[serde(default)]
    pub context: Context,

    /// File names resolved inside the attachment directory
    #[serde(default)]
    pub attachments: Vec<String>,

    /// Carbon-copy recipients
    #[serde(default)]
    #[validate(custom(function = "validate_addresses"))]
    pub cc: Vec<String>,

    /// Blind carbon-copy recipients
    #[serde(default)]
    #[validate(custom(function = "validate_addresses"))]
    pub bcc: Vec<String>,

    /// Reply-To address
    #[serde(default)]
    #[validate(email(message = "reply_to is not a valid email address"))]
    pub reply_to: Option<String>,
}

/// Shallow syntax check applied to every address in a list
fn validate_addresses(addresses: &[String]) -> Result<(), ValidationError> {
    use validator::ValidateEmail;

    match addresses.iter().find(|address| !address.validate_email()) {
        Some(address) => {
            let mut err = ValidationError::new("email");
            err.message = Some(format!("'{address}' is not a valid email address").into());
            Err(err)
        }
        None => Ok(()),
    }
}

/// Renders templates and hands the result to an email backend
#[derive(Clone)]
pub struct EmailService {
    store: TemplateStore,
    renderer: Arc<TemplateRenderer>,
    sender: Arc<dyn EmailSender>,
    from: String,
    attachments_dir: PathBuf,
}

impl EmailService {
    /// Create a service from configuration and a delivery backend
    #[must_use]
    pub fn new(config: &HtmailConfig, sender: Arc<dyn EmailSender>) -> Self {
        Self {
            store: TemplateStore::from_settings(&config.templates),
            renderer: Arc::new(TemplateRenderer::new(&config.templates)),
            sender,
            from: config.smtp.sender().to_string(),
            attachments_dir: config.attachments.dir.clone(),
        }
    }

    /// Template store backing this service
    #[must_use]
    pub const fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Load a template and render it against `context`
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::NotFound` if the template does not exist and
    /// `TemplateError::Render` if rendering fails.
    pub async fn render_html(&self, name: &str, context: &Context) -> Result<String, TemplateError> {
        let source = self.store.read(name).await?;
        self.renderer.render(name, &source, context)
    }

    /// Render a template and send it as an HTML email
    ///
    /// The template is rendered before any delivery is attempted, so a missing
    /// template or a render failure never reaches the backend.
    ///
    /// # Errors
    ///
    /// Returns a template error for lookup or render failures, and an email
    /// error for invalid attachments, a missing sender address or delivery
    /// failures.
    pub async fn send(&self, request: SendRequest) -> Result<(), ServiceError> {
        let html = self.render_html(&request.template_name, &request.context).await?;

        if self.from.is_empty() {
            return Err(EmailError::config(
                "no sender address configured: set smtp.from or smtp.username",
            )
            .into());
        }

        let mut email = Email::new()
            .to_multiple(&request.recipients)
            .cc_multiple(&request.cc)
            .bcc_multiple(&request.bcc)
            .from(&self.from)
            .subject(&request.subject)
            .html(&html);
        if let Some(reply_to) = &request.reply_to {
            email = email.reply_to(reply_to);
        }
        for attachment in self.load_attachments(&request.attachments).await? {
            email = email.attachment(attachment);
        }

        self.sender.send(email).await?;

        info!(
            template = %request.template_name,
            recipients = request.recipients.len(),
            "Email sent"
        );
        Ok(())
    }

    async fn load_attachments(&self, names: &[String]) -> Result<Vec<Attachment>, EmailError> {
        let mut attachments = Vec::with_capacity(names.len());

        for name in names {
            if !is_safe_file_name(name) {
                return Err(EmailError::InvalidAttachment(name.clone()));
            }

            let path = self.attachments_dir.join(name);
            match fs::read(&path).await {
                Ok(data) => attachments.push(Attachment::new(name.as_str(), data)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(attachment = %name, path = %path.display(), "Attachment not found, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(attachments)
    }
}
