//! SMTP email provider implementation using lettre.
//!
//! Works against production relays (STARTTLS + credentials) as well as local
//! development servers like MailHog/Mailpit.

use super::{EmailContent, EmailProvider, SentEmail};
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Body, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// SMTP configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server host.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// Sender email address.
    pub from_email: String,
    /// Sender name.
    pub from_name: String,
    /// SMTP username (optional for dev servers like Mailpit).
    pub username: Option<String>,
    /// SMTP password (optional for dev servers like Mailpit).
    pub password: Option<String>,
    /// Whether to use TLS (false for local dev servers).
    pub use_tls: bool,
}

impl SmtpConfig {
    /// Create a new SMTP configuration.
    pub fn new(host: String, port: u16, from_email: String, from_name: String) -> Self {
        Self {
            host,
            port,
            from_email,
            from_name,
            username: None,
            password: None,
            use_tls: false,
        }
    }

    /// Builder method to set TLS.
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Builder method to set credentials.
    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }
}

/// SMTP email provider.
pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: Arc<SmtpConfig>,
}

impl SmtpProvider {
    /// Create a new SMTP provider.
    pub fn new(config: SmtpConfig) -> NotificationResult<Self> {
        let transport = Self::build_transport(&config)?;
        Ok(Self {
            transport,
            config: Arc::new(config),
        })
    }

    /// Build the SMTP transport based on configuration.
    fn build_transport(
        config: &SmtpConfig,
    ) -> NotificationResult<AsyncSmtpTransport<Tokio1Executor>> {
        let transport = if config.use_tls {
            // STARTTLS relay for production SMTP servers
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| {
                    NotificationError::ProviderError(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(config.port);

            if let (Some(username), Some(password)) = (&config.username, &config.password) {
                builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
            }

            builder.build()
        } else {
            // Non-TLS transport for local dev servers like Mailpit
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                    .port(config.port);

            if let (Some(username), Some(password)) = (&config.username, &config.password) {
                builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
            }

            builder.build()
        };

        Ok(transport)
    }

    /// Build a lettre Message from EmailContent.
    fn build_message(&self, email: &EmailContent) -> NotificationResult<Message> {
        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| {
                NotificationError::ProviderError(format!("Invalid from address: {}", e))
            })?;

        let to: Mailbox = if email.to_name.is_empty() {
            email.to_email.parse()
        } else {
            format!("{} <{}>", email.to_name, email.to_email).parse()
        }
        .map_err(|e| NotificationError::InvalidEmail(format!("{}: {}", email.to_email, e)))?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject);

        let text_part = SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(email.text_body.clone());
        let html_part = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone());

        // Inline attachments ride in a multipart/related wrapper around the
        // HTML part so mail clients resolve their cid: references.
        let mut related = MultiPart::related().singlepart(html_part);
        let mut plain_attachments: Vec<SinglePart> = Vec::new();

        for attachment in &email.attachments {
            let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                NotificationError::ProviderError(format!(
                    "Invalid attachment content type '{}': {}",
                    attachment.content_type, e
                ))
            })?;
            let body = Body::new(attachment.data.clone());

            match &attachment.content_id {
                Some(cid) => {
                    related = related
                        .singlepart(Attachment::new_inline(cid.clone()).body(body, content_type));
                }
                None => {
                    plain_attachments.push(
                        Attachment::new(attachment.filename.clone()).body(body, content_type),
                    );
                }
            }
        }

        let mut mixed = MultiPart::mixed()
            .multipart(MultiPart::alternative().singlepart(text_part).multipart(related));
        for part in plain_attachments {
            mixed = mixed.singlepart(part);
        }

        builder.multipart(mixed).map_err(|e| {
            NotificationError::ProviderError(format!("Failed to build email message: {}", e))
        })
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        debug!(
            to = %email.to_email,
            subject = %email.subject,
            host = %self.config.host,
            port = %self.config.port,
            "Sending email via SMTP"
        );

        let message = self.build_message(email)?;

        let response = self.transport.send(message).await.map_err(|e| {
            error!(
                to = %email.to_email,
                error = %e,
                "Failed to send email via SMTP"
            );
            NotificationError::ProviderError(format!("SMTP send failed: {}", e))
        })?;

        let message_id = response.message().next().map(|s| s.to_string());

        info!(
            to = %email.to_email,
            message_id = ?message_id,
            "Email sent successfully via SMTP"
        );

        Ok(SentEmail {
            message_id,
            accepted: true,
        })
    }

    fn name(&self) -> &'static str {
        "SMTP"
    }

    /// SMTP has no batch API; the batcher falls back to paced sequential sends.
    fn batch_size(&self) -> Option<usize> {
        None
    }
}

// Implement Clone manually since AsyncSmtpTransport doesn't implement Clone
impl Clone for SmtpProvider {
    fn clone(&self) -> Self {
        let transport = Self::build_transport(&self.config)
            .expect("Failed to rebuild SMTP transport for clone");
        Self {
            transport,
            config: Arc::clone(&self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::EmailAttachment;

    fn config() -> SmtpConfig {
        SmtpConfig::new(
            "localhost".to_string(),
            1025,
            "tickets@example.com".to_string(),
            "Tickets".to_string(),
        )
    }

    #[test]
    fn test_smtp_config_new() {
        let config = config();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 1025);
        assert!(!config.use_tls);
    }

    #[test]
    fn test_smtp_config_with_tls_and_credentials() {
        let config = config()
            .with_tls(true)
            .with_credentials("user".to_string(), "pass".to_string());

        assert!(config.use_tls);
        assert_eq!(config.username, Some("user".to_string()));
        assert_eq!(config.password, Some("pass".to_string()));
    }

    #[test]
    fn test_smtp_is_sequential() {
        let provider = SmtpProvider::new(config()).unwrap();
        assert_eq!(provider.batch_size(), None);
        assert_eq!(provider.name(), "SMTP");
    }

    #[test]
    fn test_build_message_with_inline_attachment() {
        let provider = SmtpProvider::new(config()).unwrap();

        let email = EmailContent {
            to_email: "guest@example.com".to_string(),
            to_name: "Guest".to_string(),
            subject: "Your ticket".to_string(),
            html_body: "<img src=\"cid:ticket-qr\">".to_string(),
            text_body: "QR: ABC".to_string(),
            attachments: vec![EmailAttachment {
                filename: "ticket-qr.png".to_string(),
                content_type: "image/png".to_string(),
                data: vec![1, 2, 3],
                content_id: Some("ticket-qr".to_string()),
            }],
        };

        let message = provider.build_message(&email).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("multipart/related"));
        assert!(formatted.contains("ticket-qr"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let provider = SmtpProvider::new(config()).unwrap();

        let email = EmailContent {
            to_email: "not-an-address".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            provider.build_message(&email),
            Err(NotificationError::InvalidEmail(_))
        ));
    }
}
