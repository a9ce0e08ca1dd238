//! Email sender trait abstraction
//!
//! This module defines the core `EmailSender` trait that all email backends implement.

use async_trait::async_trait;

use super::{Email, EmailError};

/// Trait for sending emails
///
/// Implemented by all email backends (SMTP, console, test doubles).
///
/// # Examples
///
/// ```rust,no_run
/// use htmail::config::SmtpSettings;
/// use htmail::email::{Email, EmailSender, SmtpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sender = SmtpBackend::new(SmtpSettings::default());
///
/// let email = Email::new()
///     .to("user@example.com")
///     .from("noreply@myapp.com")
///     .subject("Hello!")
///     .html("<p>Hello, World!</p>");
///
/// sender.send(email).await?;
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send an email
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the email cannot be sent or is invalid
    async fn send(&self, email: Email) -> Result<(), EmailError>;
}
