//! Data models for the notifications domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Everything needed to render and deliver one ticket email.
#[derive(Debug, Clone)]
pub struct TicketEmail {
    /// Recipient email address.
    pub to_email: String,
    /// Recipient name (for personalization).
    pub to_name: String,
    /// Ticket identifier, for log correlation.
    pub ticket_id: Uuid,
    /// Title of the event the ticket grants entry to.
    pub event_title: String,
    /// Event start time.
    pub event_starts_at: DateTime<Utc>,
    /// Event venue/location.
    pub event_location: String,
    /// The opaque QR payload encoded into the ticket image.
    pub qr_code: String,
}

/// Outcome of one delivery attempt. Never an error: failures are data.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    /// Recipient email address.
    pub email: String,
    /// Whether the transport accepted the message.
    pub success: bool,
    /// Failure description when `success` is false.
    pub error: Option<String>,
}

impl DispatchResult {
    pub fn sent(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(email: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// A single recipient failure, surfaced to API callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct EmailFailure {
    /// Recipient email address.
    pub email: String,
    /// Provider or rendering error message.
    pub error: String,
}

/// Aggregate outcome of a bulk send.
#[derive(Debug, Clone, Default)]
pub struct BulkEmailReport {
    /// Number of messages accepted by the transport.
    pub sent: usize,
    /// Number of messages that failed.
    pub failed: usize,
    /// One entry per failed recipient.
    pub failures: Vec<EmailFailure>,
}

impl BulkEmailReport {
    pub fn from_results(results: Vec<DispatchResult>) -> Self {
        let mut report = Self::default();

        for result in results {
            if result.success {
                report.sent += 1;
            } else {
                report.failed += 1;
                report.failures.push(EmailFailure {
                    email: result.email,
                    error: result
                        .error
                        .unwrap_or_else(|| "unknown delivery error".to_string()),
                });
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_aggregates_results() {
        let results = vec![
            DispatchResult::sent("a@example.com"),
            DispatchResult::failed("b@example.com", "mailbox full"),
            DispatchResult::sent("c@example.com"),
        ];

        let report = BulkEmailReport::from_results(results);

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].email, "b@example.com");
        assert_eq!(report.failures[0].error, "mailbox full");
    }

    #[test]
    fn test_report_empty() {
        let report = BulkEmailReport::from_results(Vec::new());
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 0);
        assert!(report.failures.is_empty());
    }
}
