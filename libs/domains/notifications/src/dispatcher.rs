//! Ticket email dispatch and bulk batching.
//!
//! [`Mailer`] renders one email per ticket (template + QR image) and sends
//! it through the transport selected at startup. A single send never
//! propagates an error to the caller: every attempt resolves to a
//! [`DispatchResult`]. Bulk sends isolate recipients from each other and
//! aggregate into a [`BulkEmailReport`].

use crate::error::{NotificationError, NotificationResult};
use crate::models::{BulkEmailReport, DispatchResult, TicketEmail};
use crate::providers::{EmailAttachment, EmailContent, EmailProvider};
use crate::qr_image::render_qr_png;
use crate::templates::TemplateEngine;
use crate::transport::{select_transport, EmailSettings, EmailTransport};
use async_trait::async_trait;
use futures::future::join_all;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Content-ID under which the QR image is inlined into the HTML body.
const QR_CONTENT_ID: &str = "ticket-qr";

/// Inter-chunk and inter-send delays, tuned to provider rate limits.
#[derive(Debug, Clone)]
pub struct PacingConfig {
    /// Delay between chunks on batch-capable transports.
    pub batch_delay: Duration,
    /// Delay between sends on sequential transports.
    pub send_delay: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            batch_delay: Duration::from_millis(200),
            send_delay: Duration::from_millis(50),
        }
    }
}

impl PacingConfig {
    /// No delays; for tests.
    pub fn immediate() -> Self {
        Self {
            batch_delay: Duration::ZERO,
            send_delay: Duration::ZERO,
        }
    }
}

/// Port through which the ticket service hands off email work.
#[async_trait]
pub trait TicketMailer: Send + Sync {
    /// Deliver one ticket email. Failures are data, not errors.
    async fn send_ticket(&self, ticket: &TicketEmail) -> DispatchResult;

    /// Deliver many ticket emails, isolating per-recipient failures.
    async fn send_batch(&self, tickets: &[TicketEmail]) -> BulkEmailReport;
}

/// Production mailer over the configured transport.
///
/// `transport` is `None` when no provider has complete configuration; every
/// dispatch then reports `NoTransportConfigured` so issuance can proceed and
/// surface the problem in its outcome.
pub struct Mailer<P: EmailProvider = EmailTransport> {
    transport: Option<P>,
    templates: TemplateEngine,
    pacing: PacingConfig,
}

impl Mailer<EmailTransport> {
    /// Build the mailer from environment-derived settings.
    pub fn from_settings(settings: &EmailSettings) -> NotificationResult<Self> {
        let transport = select_transport(settings)?;
        if transport.is_none() {
            warn!("No email transport configured; ticket emails will be reported as failed");
        }
        Self::with_transport(transport)
    }
}

impl<P: EmailProvider> Mailer<P> {
    /// Build a mailer over an explicit transport (or none).
    pub fn with_transport(transport: Option<P>) -> NotificationResult<Self> {
        Ok(Self {
            transport,
            templates: TemplateEngine::new()?,
            pacing: PacingConfig::default(),
        })
    }

    /// Override pacing delays.
    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Render and dispatch one ticket email through the transport.
    async fn dispatch(&self, ticket: &TicketEmail) -> NotificationResult<()> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(NotificationError::NoTransportConfigured)?;

        let qr_png = render_qr_png(&ticket.qr_code)?;
        let rendered = self.templates.render_ticket(ticket)?;

        let content = EmailContent {
            to_email: ticket.to_email.clone(),
            to_name: ticket.to_name.clone(),
            subject: rendered.subject,
            html_body: rendered.html,
            text_body: rendered.text,
            attachments: vec![EmailAttachment {
                filename: "ticket-qr.png".to_string(),
                content_type: "image/png".to_string(),
                data: qr_png,
                content_id: Some(QR_CONTENT_ID.to_string()),
            }],
        };

        transport.send(&content).await?;
        Ok(())
    }
}

#[async_trait]
impl<P: EmailProvider> TicketMailer for Mailer<P> {
    async fn send_ticket(&self, ticket: &TicketEmail) -> DispatchResult {
        match self.dispatch(ticket).await {
            Ok(()) => DispatchResult::sent(&ticket.to_email),
            Err(e) => {
                warn!(
                    to = %ticket.to_email,
                    ticket_id = %ticket.ticket_id,
                    error = %e,
                    "Ticket email delivery failed"
                );
                DispatchResult::failed(&ticket.to_email, e.to_string())
            }
        }
    }

    #[instrument(skip(self, tickets), fields(recipients = tickets.len()))]
    async fn send_batch(&self, tickets: &[TicketEmail]) -> BulkEmailReport {
        let mut results = Vec::with_capacity(tickets.len());

        match self.transport.as_ref().and_then(|t| t.batch_size()) {
            // Batch-capable transport: provider-sized chunks, concurrent
            // within a chunk, paced between chunks.
            Some(chunk_size) => {
                let mut chunks = tickets.chunks(chunk_size.max(1)).peekable();
                while let Some(chunk) = chunks.next() {
                    let sent = join_all(chunk.iter().map(|t| self.send_ticket(t))).await;
                    results.extend(sent);
                    if chunks.peek().is_some() {
                        tokio::time::sleep(self.pacing.batch_delay).await;
                    }
                }
            }
            // Sequential transport (or none): one at a time with a small
            // inter-send delay.
            None => {
                let pace = self.transport.is_some();
                let mut iter = tickets.iter().peekable();
                while let Some(ticket) = iter.next() {
                    results.push(self.send_ticket(ticket).await);
                    if pace && iter.peek().is_some() {
                        tokio::time::sleep(self.pacing.send_delay).await;
                    }
                }
            }
        }

        let report = BulkEmailReport::from_results(results);
        info!(
            sent = report.sent,
            failed = report.failed,
            "Bulk ticket email dispatch finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockEmailProvider, SentEmail};
    use chrono::Utc;
    use uuid::Uuid;

    fn ticket(email: &str) -> TicketEmail {
        TicketEmail {
            to_email: email.to_string(),
            to_name: "Guest".to_string(),
            ticket_id: Uuid::new_v4(),
            event_title: "Launch Party".to_string(),
            event_starts_at: Utc::now(),
            event_location: "Warehouse 9".to_string(),
            qr_code: "PAYLOAD".to_string(),
        }
    }

    fn accepted() -> NotificationResult<SentEmail> {
        Ok(SentEmail {
            message_id: None,
            accepted: true,
        })
    }

    fn mailer(provider: MockEmailProvider) -> Mailer<MockEmailProvider> {
        Mailer::with_transport(Some(provider))
            .unwrap()
            .with_pacing(PacingConfig::immediate())
    }

    #[tokio::test]
    async fn test_send_ticket_success() {
        let mut provider = MockEmailProvider::new();
        provider.expect_batch_size().returning(|| None);
        provider.expect_send().times(1).returning(|_| accepted());

        let result = mailer(provider).send_ticket(&ticket("a@example.com")).await;

        assert!(result.success);
        assert_eq!(result.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_send_ticket_attaches_inline_qr() {
        let mut provider = MockEmailProvider::new();
        provider.expect_batch_size().returning(|| None);
        provider
            .expect_send()
            .withf(|content| {
                content.attachments.len() == 1
                    && content.attachments[0].content_id.as_deref() == Some("ticket-qr")
                    && content.attachments[0].content_type == "image/png"
                    && content.html_body.contains("cid:ticket-qr")
            })
            .times(1)
            .returning(|_| accepted());

        let result = mailer(provider).send_ticket(&ticket("a@example.com")).await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_provider_failure_is_isolated() {
        let mut provider = MockEmailProvider::new();
        provider.expect_batch_size().returning(|| None);
        provider.expect_send().returning(|content| {
            if content.to_email == "broken@example.com" {
                Err(NotificationError::ProviderError("mailbox full".to_string()))
            } else {
                accepted()
            }
        });

        let tickets = vec![
            ticket("one@example.com"),
            ticket("two@example.com"),
            ticket("broken@example.com"),
            ticket("three@example.com"),
            ticket("four@example.com"),
        ];

        let report = mailer(provider).send_batch(&tickets).await;

        assert_eq!(report.sent, 4);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].email, "broken@example.com");
        assert!(report.failures[0].error.contains("mailbox full"));
    }

    #[tokio::test]
    async fn test_batch_transport_chunks_all_recipients() {
        let mut provider = MockEmailProvider::new();
        // Chunk size of 2 across 5 recipients: 3 chunks, every recipient sent
        provider.expect_batch_size().returning(|| Some(2));
        provider.expect_send().times(5).returning(|_| accepted());

        let tickets: Vec<TicketEmail> = (0..5)
            .map(|i| ticket(&format!("guest{}@example.com", i)))
            .collect();

        let report = mailer(provider).send_batch(&tickets).await;

        assert_eq!(report.sent, 5);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_no_transport_reports_every_recipient_failed() {
        let mailer: Mailer<MockEmailProvider> = Mailer::with_transport(None)
            .unwrap()
            .with_pacing(PacingConfig::immediate());

        let tickets = vec![ticket("a@example.com"), ticket("b@example.com")];
        let report = mailer.send_batch(&tickets).await;

        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 2);
        assert!(report.failures[0].error.contains("No email transport configured"));
    }

    #[tokio::test]
    async fn test_qr_render_failure_is_per_recipient() {
        let mut provider = MockEmailProvider::new();
        provider.expect_batch_size().returning(|| None);
        provider.expect_send().returning(|_| accepted());

        let mut bad = ticket("bad@example.com");
        bad.qr_code = "x".repeat(8192); // exceeds QR capacity
        let tickets = vec![ticket("good@example.com"), bad];

        let report = mailer(provider).send_batch(&tickets).await;

        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].email, "bad@example.com");
        assert!(report.failures[0].error.contains("QR rendering error"));
    }
}
