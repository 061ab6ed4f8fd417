//! SendGrid email provider implementation.

use super::{EmailContent, EmailProvider, SentEmail};
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// SendGrid recommends keeping bulk submissions at or below 100 messages
/// per burst to stay inside rate limits.
const SENDGRID_BATCH_SIZE: usize = 100;

/// SendGrid API configuration.
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// SendGrid API key.
    pub api_key: String,
    /// Sender email address.
    pub from_email: String,
    /// Sender name.
    pub from_name: String,
    /// SendGrid API base URL (defaults to production).
    pub api_url: String,
}

impl SendGridConfig {
    /// Create a new SendGrid configuration.
    pub fn new(api_key: String, from_email: String, from_name: String) -> Self {
        Self {
            api_key,
            from_email,
            from_name,
            api_url: "https://api.sendgrid.com/v3".to_string(),
        }
    }
}

/// SendGrid email provider.
pub struct SendGridProvider {
    config: SendGridConfig,
    client: Client,
}

impl SendGridProvider {
    /// Create a new SendGrid provider.
    pub fn new(config: SendGridConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

// SendGrid API request/response structures

#[derive(Debug, Serialize)]
struct SendGridRequest {
    personalizations: Vec<Personalization>,
    from: EmailAddress,
    subject: String,
    content: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<EmailAddress>,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct Attachment {
    content: String,
    #[serde(rename = "type")]
    content_type: String,
    filename: String,
    disposition: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendGridError {
    errors: Vec<SendGridErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // Fields are populated by deserialization from SendGrid API
struct SendGridErrorDetail {
    message: String,
    field: Option<String>,
}

#[async_trait]
impl EmailProvider for SendGridProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        let attachments: Vec<Attachment> = email
            .attachments
            .iter()
            .map(|a| Attachment {
                content: STANDARD.encode(&a.data),
                content_type: a.content_type.clone(),
                filename: a.filename.clone(),
                disposition: if a.content_id.is_some() {
                    "inline"
                } else {
                    "attachment"
                },
                content_id: a.content_id.clone(),
            })
            .collect();

        let request = SendGridRequest {
            personalizations: vec![Personalization {
                to: vec![EmailAddress {
                    email: email.to_email.clone(),
                    name: if email.to_name.is_empty() {
                        None
                    } else {
                        Some(email.to_name.clone())
                    },
                }],
            }],
            from: EmailAddress {
                email: self.config.from_email.clone(),
                name: Some(self.config.from_name.clone()),
            },
            subject: email.subject.clone(),
            content: vec![
                Content {
                    content_type: "text/plain".to_string(),
                    value: email.text_body.clone(),
                },
                Content {
                    content_type: "text/html".to_string(),
                    value: email.html_body.clone(),
                },
            ],
            attachments,
        };

        debug!(
            to = %email.to_email,
            subject = %email.subject,
            attachment_count = email.attachments.len(),
            "Sending email via SendGrid"
        );

        let response = self
            .client
            .post(format!("{}/mail/send", self.config.api_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if status.is_success() {
            info!(
                to = %email.to_email,
                message_id = ?message_id,
                "Email sent successfully via SendGrid"
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
                "Failed to send email via SendGrid"
            );

            // Try to parse the error response
            let error_message =
                if let Ok(sg_error) = serde_json::from_str::<SendGridError>(&error_body) {
                    sg_error
                        .errors
                        .into_iter()
                        .map(|e| e.message)
                        .collect::<Vec<_>>()
                        .join(", ")
                } else {
                    error_body
                };

            Err(NotificationError::ProviderError(format!(
                "SendGrid error ({}): {}",
                status, error_message
            )))
        }
    }

    fn name(&self) -> &'static str {
        "SendGrid"
    }

    fn batch_size(&self) -> Option<usize> {
        Some(SENDGRID_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sendgrid_config_new() {
        let config = SendGridConfig::new(
            "SG.test_key".to_string(),
            "tickets@example.com".to_string(),
            "Test Sender".to_string(),
        );

        assert_eq!(config.api_key, "SG.test_key");
        assert_eq!(config.from_email, "tickets@example.com");
        assert_eq!(config.api_url, "https://api.sendgrid.com/v3");
    }

    #[test]
    fn test_sendgrid_is_batch_capable() {
        let provider = SendGridProvider::new(SendGridConfig::new(
            "SG.k".to_string(),
            "t@example.com".to_string(),
            "T".to_string(),
        ));
        assert_eq!(provider.batch_size(), Some(100));
        assert_eq!(provider.name(), "SendGrid");
    }

    #[test]
    fn test_inline_attachment_serialization() {
        let attachment = Attachment {
            content: STANDARD.encode(b"png-bytes"),
            content_type: "image/png".to_string(),
            filename: "ticket-qr.png".to_string(),
            disposition: "inline",
            content_id: Some("ticket-qr".to_string()),
        };

        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["disposition"], "inline");
        assert_eq!(json["content_id"], "ticket-qr");
        assert_eq!(json["type"], "image/png");
    }
}
