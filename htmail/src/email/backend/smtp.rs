//! SMTP backend for sending emails
//!
//! Uses the `lettre` crate to send emails via SMTP servers. A fresh
//! connection is opened for every message and closed once it is delivered.

use async_trait::async_trait;
use lettre::{
    message::{header, Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

use crate::config::SmtpSettings;
use crate::email::{Email, EmailError, EmailSender};

/// SMTP email backend
///
/// Sends emails via SMTP using the `lettre` crate.
///
/// # Examples
///
/// ```rust,no_run
/// use htmail::config::SmtpSettings;
/// use htmail::email::{Email, EmailSender, SmtpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = SmtpBackend::new(SmtpSettings {
///     host: "smtp.example.com".to_string(),
///     username: "mailer@example.com".to_string(),
///     password: "secret".to_string(),
///     ..SmtpSettings::default()
/// });
///
/// let email = Email::new()
///     .to("user@example.com")
///     .from("mailer@example.com")
///     .subject("Hello!")
///     .html("<p>Hello, World!</p>");
///
/// backend.send(email).await?;
/// # Ok(())
/// # }
/// ```
pub struct SmtpBackend {
    config: SmtpSettings,
}

impl SmtpBackend {
    /// Create a new SMTP backend with the given configuration
    #[must_use]
    pub const fn new(config: SmtpSettings) -> Self {
        Self { config }
    }

    /// Build lettre Message from Email
    fn build_message(email: &Email) -> Result<Message, EmailError> {
        email.validate()?;

        // The sender comes from configuration, so a bad one is not the caller's fault
        let from_addr = email.from.as_ref().ok_or(EmailError::NoSender)?;
        let from = from_addr.parse::<Mailbox>().map_err(|_| {
            EmailError::config(format!("configured sender '{from_addr}' is not a valid address"))
        })?;
        let mut builder = Message::builder().from(from);

        for to_addr in &email.to {
            builder = builder.to(parse_mailbox(to_addr)?);
        }

        for cc_addr in &email.cc {
            builder = builder.cc(parse_mailbox(cc_addr)?);
        }

        for bcc_addr in &email.bcc {
            builder = builder.bcc(parse_mailbox(bcc_addr)?);
        }

        if let Some(reply_to_addr) = &email.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to_addr)?);
        }

        let subject = email.subject.as_ref().ok_or(EmailError::NoSubject)?;
        builder = builder.subject(subject);

        let html = email.html.as_ref().ok_or(EmailError::NoContent)?;
        let html_part = SinglePart::builder()
            .header(header::ContentType::TEXT_HTML)
            .body(html.clone());

        let message = if email.attachments.is_empty() {
            builder.singlepart(html_part)
        } else {
            let mut mixed = MultiPart::mixed().singlepart(html_part);
            for attachment in &email.attachments {
                let content_type = header::ContentType::parse(&attachment.content_type)
                    .map_err(|_| EmailError::InvalidAttachment(attachment.filename.clone()))?;
                mixed = mixed.singlepart(
                    MimeAttachment::new(attachment.filename.clone())
                        .body(attachment.data.clone(), content_type),
                );
            }
            builder.multipart(mixed)
        };

        message.map_err(|e| EmailError::smtp(e.to_string()))
    }

    /// Create SMTP transport from config
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        if self.config.host.is_empty() {
            return Err(EmailError::config("SMTP server is not configured"));
        }

        let mut transport = if self.config.use_tls {
            let tls_parameters = TlsParameters::new(self.config.host.clone())
                .map_err(|e| EmailError::smtp(format!("TLS parameters error: {e}")))?;

            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
                .map_err(|e| EmailError::smtp(e.to_string()))?
                .tls(Tls::Required(tls_parameters))
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.host)
        };

        if !self.config.username.is_empty() {
            transport = transport.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ));
        }

        Ok(transport.port(self.config.port).build())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))
}

#[async_trait]
impl EmailSender for SmtpBackend {
    async fn send(&self, email: Email) -> Result<(), EmailError> {
        let transport = self.create_transport()?;
        let message = Self::build_message(&email)?;

        debug!(
            host = %self.config.host,
            port = self.config.port,
            use_tls = self.config.use_tls,
            "Connecting to SMTP relay"
        );

        let response = transport
            .send(message)
            .await
            .map_err(|e| EmailError::smtp(e.to_string()))?;

        info!(
            to = ?email.to,
            code = %response.code(),
            "Email accepted by SMTP relay"
        );

        Ok(())
    }
}
