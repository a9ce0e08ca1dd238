//! Email builder with fluent API
//!
//! Provides a convenient builder pattern for constructing emails.

use super::EmailError;

/// A file attached to an outgoing email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name presented to the recipient
    pub filename: String,

    /// MIME content type (e.g., "application/pdf")
    pub content_type: String,

    /// Raw file content
    pub data: Vec<u8>,
}

impl Attachment {
    /// Create an attachment, guessing the content type from the file name
    ///
    /// # Examples
    ///
    /// ```rust
    /// use htmail::email::Attachment;
    ///
    /// let attachment = Attachment::new("invoice.pdf", vec![0x25, 0x50, 0x44, 0x46]);
    /// assert_eq!(attachment.content_type, "application/pdf");
    /// ```
    #[must_use]
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Self {
            filename,
            content_type,
            data,
        }
    }
}

/// An email message
///
/// Use the builder pattern to construct emails:
///
/// ```rust
/// use htmail::email::Email;
///
/// let email = Email::new()
///     .to("user@example.com")
///     .from("noreply@myapp.com")
///     .subject("Welcome!")
///     .html("<h1>Welcome to our app!</h1>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Email {
    /// Email recipients (To)
    pub to: Vec<String>,

    /// Email sender (From)
    pub from: Option<String>,

    /// Reply-To address
    pub reply_to: Option<String>,

    /// CC recipients
    pub cc: Vec<String>,

    /// BCC recipients
    pub bcc: Vec<String>,

    /// Email subject
    pub subject: Option<String>,

    /// HTML body
    pub html: Option<String>,

    /// Attached files
    pub attachments: Vec<Attachment>,
}

impl Email {
    /// Create a new empty email
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipient (To)
    #[must_use]
    pub fn to(mut self, address: &str) -> Self {
        self.to.push(address.to_string());
        self
    }

    /// Add multiple recipients (To)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use htmail::email::Email;
    ///
    /// let recipients = vec!["user1@example.com".to_string(), "user2@example.com".to_string()];
    /// let email = Email::new().to_multiple(&recipients);
    /// assert_eq!(email.to.len(), 2);
    /// ```
    #[must_use]
    pub fn to_multiple<S: AsRef<str>>(mut self, addresses: &[S]) -> Self {
        self.to
            .extend(addresses.iter().map(|address| address.as_ref().to_string()));
        self
    }

    /// Set the sender (From)
    #[must_use]
    pub fn from(mut self, address: &str) -> Self {
        self.from = Some(address.to_string());
        self
    }

    /// Set the reply-to address
    #[must_use]
    pub fn reply_to(mut self, address: &str) -> Self {
        self.reply_to = Some(address.to_string());
        self
    }

    /// Add CC recipients
    #[must_use]
    pub fn cc_multiple<S: AsRef<str>>(mut self, addresses: &[S]) -> Self {
        self.cc
            .extend(addresses.iter().map(|address| address.as_ref().to_string()));
        self
    }

    /// Add BCC recipients
    #[must_use]
    pub fn bcc_multiple<S: AsRef<str>>(mut self, addresses: &[S]) -> Self {
        self.bcc
            .extend(addresses.iter().map(|address| address.as_ref().to_string()));
        self
    }

    /// Set the email subject
    #[must_use]
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the HTML body
    #[must_use]
    pub fn html(mut self, body: &str) -> Self {
        self.html = Some(body.to_string());
        self
    }

    /// Attach a file
    #[must_use]
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Validate the email
    ///
    /// Checks that all required fields are present
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// - No recipients
    /// - No sender
    /// - No subject
    /// - No HTML content
    pub fn validate(&self) -> Result<(), EmailError> {
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        if self.from.as_deref().is_none_or(str::is_empty) {
            return Err(EmailError::NoSender);
        }

        if self.subject.is_none() {
            return Err(EmailError::NoSubject);
        }

        if self.html.is_none() {
            return Err(EmailError::NoContent);
        }

        Ok(())
    }
}
