//! Email provider implementations.
//!
//! This module contains the `EmailProvider` trait and implementations
//! for the supported sending services.

mod resend;
mod sendgrid;
mod smtp;

pub use resend::{ResendConfig, ResendProvider};
pub use sendgrid::{SendGridConfig, SendGridProvider};
pub use smtp::{SmtpConfig, SmtpProvider};

use crate::error::NotificationResult;
use async_trait::async_trait;

/// Represents a sent email with provider-specific message ID.
#[derive(Debug, Clone)]
pub struct SentEmail {
    /// Provider-specific message ID for tracking.
    pub message_id: Option<String>,
    /// Whether the email was accepted for delivery.
    pub accepted: bool,
}

/// A file attached to an outgoing email.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    /// Attachment filename shown to the recipient.
    pub filename: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// Raw attachment bytes (providers base64-encode as needed).
    pub data: Vec<u8>,
    /// Content-ID for inline display (`<img src="cid:...">`); plain
    /// attachment when absent or unsupported by the transport.
    pub content_id: Option<String>,
}

/// Email content ready for sending.
#[derive(Debug, Clone, Default)]
pub struct EmailContent {
    /// Recipient email address.
    pub to_email: String,
    /// Recipient name.
    pub to_name: String,
    /// Email subject.
    pub subject: String,
    /// HTML body content.
    pub html_body: String,
    /// Plain text body content.
    pub text_body: String,
    /// Attachments (e.g. the ticket QR image).
    pub attachments: Vec<EmailAttachment>,
}

/// Trait for email sending providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email.
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail>;

    /// Get the provider name for logging.
    fn name(&self) -> &'static str;

    /// Native batch chunk size, or None for strictly sequential transports.
    fn batch_size(&self) -> Option<usize>;
}
