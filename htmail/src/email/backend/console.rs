//! Console backend for development
//!
//! Logs emails instead of sending them. Useful for previewing the send flow
//! without an SMTP relay.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::email::{Email, EmailError, EmailSender};

/// Console email backend for development
///
/// # Examples
///
/// ```rust
/// use htmail::email::{ConsoleBackend, Email, EmailSender};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = ConsoleBackend::new();
///
/// let email = Email::new()
///     .to("user@example.com")
///     .from("noreply@myapp.com")
///     .subject("Hello!")
///     .html("<p>Hello, World!</p>");
///
/// backend.send(email).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsoleBackend {
    /// Whether to log the HTML body
    verbose: bool,
}

impl ConsoleBackend {
    /// Create a new console backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a verbose console backend that logs the full HTML body
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }
}

#[async_trait]
impl EmailSender for ConsoleBackend {
    async fn send(&self, email: Email) -> Result<(), EmailError> {
        email.validate()?;

        let from = email.from.as_ref().ok_or(EmailError::NoSender)?;
        let subject = email.subject.as_ref().ok_or(EmailError::NoSubject)?;

        info!(
            from = %from,
            to = ?email.to,
            cc = ?email.cc,
            bcc = ?email.bcc,
            subject = %subject,
            attachments = email.attachments.len(),
            "Console email sent"
        );

        if self.verbose {
            debug!(
                reply_to = ?email.reply_to,
                html = email.html.as_deref().unwrap_or_default(),
                "Email body"
            );
        }

        Ok(())
    }
}
