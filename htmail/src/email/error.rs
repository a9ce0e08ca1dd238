//! Email error types

use thiserror::Error;

/// Errors that can occur when building or sending emails
#[derive(Debug, Error)]
pub enum EmailError {
    /// Email has no recipients
    #[error("email must have at least one recipient")]
    NoRecipients,

    /// Email has no sender
    #[error("email must have a from address")]
    NoSender,

    /// Email has no subject
    #[error("email must have a subject")]
    NoSubject,

    /// Email has no body content
    #[error("email must have HTML content")]
    NoContent,

    /// Invalid email address format
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Invalid attachment reference
    #[error("invalid attachment: {0}")]
    InvalidAttachment(String),

    /// SMTP transport error
    #[error("SMTP error: {0}")]
    SmtpError(String),

    /// Email configuration error
    #[error("email configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EmailError {
    /// Create an SMTP error from a string message
    #[must_use]
    pub fn smtp<T: Into<String>>(msg: T) -> Self {
        Self::SmtpError(msg.into())
    }

    /// Create a configuration error from a string message
    #[must_use]
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than the
    /// mail infrastructure
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::NoRecipients
                | Self::NoSubject
                | Self::NoContent
                | Self::InvalidAddress(_)
                | Self::InvalidAttachment(_)
        )
    }
}
