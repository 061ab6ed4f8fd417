use chrono::{DateTime, Utc};
use domain_notifications::EmailFailure;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::directory::Registration;

/// Ticket lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
    TS,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ticket_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TicketStatus {
    /// Issued and not yet scanned
    #[sea_orm(string_value = "issued")]
    Issued,
    /// Scanned at the door exactly once
    #[sea_orm(string_value = "used")]
    Used,
    /// Revoked by the organizer
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Ticket entity - the scannable credential derived from one approved
/// registration.
///
/// `participant_name`/`participant_email` are snapshots taken at issuance
/// time and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique identifier
    #[ts(as = "String")]
    pub id: Uuid,
    /// Owning registration (1:1)
    #[ts(as = "String")]
    pub registration_id: Uuid,
    /// Event this ticket grants entry to
    #[ts(as = "String")]
    pub event_id: Uuid,
    /// Participant name snapshot
    pub participant_name: String,
    /// Participant email snapshot
    pub participant_email: String,
    /// Opaque QR payload, unique across the system
    pub qr_code: String,
    /// Lifecycle status
    pub status: TicketStatus,
    /// Issuance timestamp
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    /// Set exactly when status is `used`
    #[ts(as = "Option<String>")]
    pub used_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Synthesize a fresh ticket for an approved registration.
    pub fn issue(registration: &Registration, qr_code: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            registration_id: registration.id,
            event_id: registration.event_id,
            participant_name: registration.name.clone(),
            participant_email: registration.email.clone(),
            qr_code,
            status: TicketStatus::Issued,
            issued_at: Utc::now(),
            used_at: None,
        }
    }
}

/// Per-status ticket counts for an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct TicketStats {
    pub total: usize,
    pub issued: usize,
    pub used: usize,
    pub cancelled: usize,
}

impl TicketStats {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let mut stats = Self {
            total: tickets.len(),
            ..Self::default()
        };
        for ticket in tickets {
            match ticket.status {
                TicketStatus::Issued => stats.issued += 1,
                TicketStatus::Used => stats.used += 1,
                TicketStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }
}

/// Tickets of one event plus their status breakdown.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventTickets {
    pub tickets: Vec<Ticket>,
    pub stats: TicketStats,
}

/// Outcome of a bulk issuance call.
///
/// Partial success is the expected common case: tickets may be created while
/// some emails fail, so the caller always gets counts rather than a binary
/// result.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkIssueOutcome {
    pub message: String,
    pub tickets_created: usize,
    pub emails_sent: usize,
    pub emails_failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<EmailFailure>>,
}

/// Outcome of a single issuance call.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SingleIssueOutcome {
    pub message: String,
    pub ticket: Ticket,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

/// Check-in request body.
#[derive(Debug, Clone, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTicketRequest {
    /// Scanned QR payload
    #[validate(length(min = 1, max = 512))]
    pub qr_code_data: String,
    /// When set, the ticket must belong to this event
    pub event_id: Option<Uuid>,
}

/// Why a check-in was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    NotFound,
    WrongEvent,
    Cancelled,
    AlreadyUsed,
}

/// Participant identity shown to door staff.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub email: String,
}

/// Structured check-in result.
///
/// Invalid tickets are *successful responses*, not errors: door staff need
/// the reason and the participant identity to act.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<VerdictReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<Participant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

impl ValidationVerdict {
    fn participant_of(ticket: &Ticket) -> Option<Participant> {
        Some(Participant {
            name: ticket.participant_name.clone(),
            email: ticket.participant_email.clone(),
        })
    }

    /// Entry granted; the `used` transition is already durable.
    pub fn granted(ticket: &Ticket, checked_in_at: DateTime<Utc>) -> Self {
        Self {
            valid: true,
            message: "Ticket valid, entry granted".to_string(),
            reason: None,
            participant: Self::participant_of(ticket),
            event_id: Some(ticket.event_id),
            checked_in_at: Some(checked_in_at),
            used_at: None,
        }
    }

    /// Unknown payload. Deliberately carries no detail: a malformed token and
    /// a token that was never issued are indistinguishable to the caller.
    pub fn not_found() -> Self {
        Self {
            valid: false,
            message: "Ticket not found".to_string(),
            reason: Some(VerdictReason::NotFound),
            participant: None,
            event_id: None,
            checked_in_at: None,
            used_at: None,
        }
    }

    pub fn wrong_event(ticket: &Ticket) -> Self {
        Self {
            valid: false,
            message: "Ticket belongs to a different event".to_string(),
            reason: Some(VerdictReason::WrongEvent),
            participant: Self::participant_of(ticket),
            event_id: Some(ticket.event_id),
            checked_in_at: None,
            used_at: None,
        }
    }

    pub fn cancelled(ticket: &Ticket) -> Self {
        Self {
            valid: false,
            message: "Ticket has been cancelled".to_string(),
            reason: Some(VerdictReason::Cancelled),
            participant: Self::participant_of(ticket),
            event_id: Some(ticket.event_id),
            checked_in_at: None,
            used_at: None,
        }
    }

    /// Already scanned; includes the prior timestamp to aid door staff.
    pub fn already_used(ticket: &Ticket, used_at: Option<DateTime<Utc>>) -> Self {
        Self {
            valid: false,
            message: "Ticket has already been used".to_string(),
            reason: Some(VerdictReason::AlreadyUsed),
            participant: Self::participant_of(ticket),
            event_id: Some(ticket.event_id),
            checked_in_at: None,
            used_at,
        }
    }
}

/// Generic message response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::RegistrationStatus;

    fn registration() -> Registration {
        Registration {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            status: RegistrationStatus::Approved,
        }
    }

    #[test]
    fn test_issue_snapshots_registration() {
        let reg = registration();
        let ticket = Ticket::issue(&reg, "QR123".to_string());

        assert_eq!(ticket.registration_id, reg.id);
        assert_eq!(ticket.event_id, reg.event_id);
        assert_eq!(ticket.participant_name, "Ada Lovelace");
        assert_eq!(ticket.participant_email, "ada@example.com");
        assert_eq!(ticket.status, TicketStatus::Issued);
        assert!(ticket.used_at.is_none());
    }

    #[test]
    fn test_stats_fold() {
        let reg = registration();
        let mut used = Ticket::issue(&reg, "a".to_string());
        used.status = TicketStatus::Used;
        let mut cancelled = Ticket::issue(&reg, "b".to_string());
        cancelled.status = TicketStatus::Cancelled;
        let issued = Ticket::issue(&reg, "c".to_string());

        let stats = TicketStats::from_tickets(&[used, cancelled, issued]);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.issued, 1);
        assert_eq!(stats.used, 1);
        assert_eq!(stats.cancelled, 1);
    }

    #[test]
    fn test_verdict_reason_serializes_snake_case() {
        let json = serde_json::to_value(VerdictReason::AlreadyUsed).unwrap();
        assert_eq!(json, "already_used");
        let json = serde_json::to_value(VerdictReason::WrongEvent).unwrap();
        assert_eq!(json, "wrong_event");
    }

    #[test]
    fn test_verdict_json_shape() {
        let ticket = Ticket::issue(&registration(), "QR".to_string());
        let now = Utc::now();

        let valid = serde_json::to_value(ValidationVerdict::granted(&ticket, now)).unwrap();
        assert_eq!(valid["valid"], true);
        assert!(valid.get("reason").is_none());
        assert_eq!(valid["participant"]["name"], "Ada Lovelace");
        assert!(valid.get("checkedInAt").is_some());

        let not_found = serde_json::to_value(ValidationVerdict::not_found()).unwrap();
        assert_eq!(not_found["valid"], false);
        assert_eq!(not_found["reason"], "not_found");
        assert!(not_found.get("participant").is_none());

        let used = serde_json::to_value(ValidationVerdict::already_used(&ticket, Some(now))).unwrap();
        assert_eq!(used["reason"], "already_used");
        assert!(used.get("usedAt").is_some());
    }

    #[test]
    fn test_bulk_outcome_omits_empty_errors() {
        let outcome = BulkIssueOutcome {
            message: "ok".to_string(),
            tickets_created: 2,
            emails_sent: 2,
            emails_failed: 0,
            errors: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["ticketsCreated"], 2);
        assert!(json.get("errors").is_none());
    }
}
