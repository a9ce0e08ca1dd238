//! Email composition and delivery
//!
//! This module provides:
//! - An `Email` builder for rendered messages and their attachments
//! - The `EmailSender` trait implemented by every backend
//! - An SMTP backend built on `lettre` and a console backend for development
//!
//! # Examples
//!
//! ```rust,no_run
//! use htmail::config::SmtpSettings;
//! use htmail::email::{Email, EmailSender, SmtpBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SmtpBackend::new(SmtpSettings::default());
//!
//! let email = Email::new()
//!     .to("user@example.com")
//!     .from("noreply@myapp.com")
//!     .subject("Welcome!")
//!     .html("<h1>Welcome to our app!</h1>");
//!
//! backend.send(email).await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod builder;
mod error;
mod sender;

use std::sync::Arc;

pub use backend::{console::ConsoleBackend, smtp::SmtpBackend};
pub use builder::{Attachment, Email};
pub use error::EmailError;
pub use sender::EmailSender;

#[cfg(test)]
pub use sender::MockEmailSender;

use crate::config::{EmailBackendKind, HtmailConfig};

/// Build the email backend selected by the configuration
#[must_use]
pub fn backend_from_config(config: &HtmailConfig) -> Arc<dyn EmailSender> {
    match config.email.backend {
        EmailBackendKind::Smtp => Arc::new(SmtpBackend::new(config.smtp.clone())),
        EmailBackendKind::Console => Arc::new(ConsoleBackend::verbose()),
    }
}
