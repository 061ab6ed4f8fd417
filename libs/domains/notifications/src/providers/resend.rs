//! Resend email provider implementation.
//!
//! HTTP API transport (<https://resend.com>). Resend does not support
//! content-id inline images, so the QR ships as a regular attachment and the
//! text fallback in the body carries the code.

use super::{EmailContent, EmailProvider, SentEmail};
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

const RESEND_BATCH_SIZE: usize = 100;

/// Resend API configuration.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// Resend API key.
    pub api_key: String,
    /// Sender email address.
    pub from_email: String,
    /// Sender name.
    pub from_name: String,
    /// Resend API base URL (defaults to production).
    pub api_url: String,
}

impl ResendConfig {
    /// Create a new Resend configuration.
    pub fn new(api_key: String, from_email: String, from_name: String) -> Self {
        Self {
            api_key,
            from_email,
            from_name,
            api_url: "https://api.resend.com".to_string(),
        }
    }
}

/// Resend email provider.
pub struct ResendProvider {
    config: ResendConfig,
    client: Client,
}

impl ResendProvider {
    /// Create a new Resend provider.
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResendRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<ResendAttachment>,
}

#[derive(Debug, Serialize)]
struct ResendAttachment {
    filename: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendError {
    message: String,
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        let attachments: Vec<ResendAttachment> = email
            .attachments
            .iter()
            .map(|a| ResendAttachment {
                filename: a.filename.clone(),
                content: STANDARD.encode(&a.data),
            })
            .collect();

        let request = ResendRequest {
            from: format!("{} <{}>", self.config.from_name, self.config.from_email),
            to: vec![email.to_email.clone()],
            subject: email.subject.clone(),
            html: email.html_body.clone(),
            text: email.text_body.clone(),
            attachments,
        };

        debug!(
            to = %email.to_email,
            subject = %email.subject,
            "Sending email via Resend"
        );

        let response = self
            .client
            .post(format!("{}/emails", self.config.api_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let body: Option<ResendResponse> = response.json().await.ok();
            let message_id = body.map(|b| b.id);
            info!(
                to = %email.to_email,
                message_id = ?message_id,
                "Email sent successfully via Resend"
            );
            Ok(SentEmail {
                message_id,
                accepted: true,
            })
        } else {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                to = %email.to_email,
                status = %status,
                error = %error_body,
                "Failed to send email via Resend"
            );

            let error_message =
                if let Ok(re_error) = serde_json::from_str::<ResendError>(&error_body) {
                    re_error.message
                } else {
                    error_body
                };

            Err(NotificationError::ProviderError(format!(
                "Resend error ({}): {}",
                status, error_message
            )))
        }
    }

    fn name(&self) -> &'static str {
        "Resend"
    }

    fn batch_size(&self) -> Option<usize> {
        Some(RESEND_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resend_config_new() {
        let config = ResendConfig::new(
            "re_test_key".to_string(),
            "tickets@example.com".to_string(),
            "Tickets".to_string(),
        );

        assert_eq!(config.api_key, "re_test_key");
        assert_eq!(config.api_url, "https://api.resend.com");
    }

    #[test]
    fn test_resend_is_batch_capable() {
        let provider = ResendProvider::new(ResendConfig::new(
            "re_k".to_string(),
            "t@example.com".to_string(),
            "T".to_string(),
        ));
        assert_eq!(provider.batch_size(), Some(100));
        assert_eq!(provider.name(), "Resend");
    }
}
