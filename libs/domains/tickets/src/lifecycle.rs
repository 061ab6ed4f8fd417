//! Ticket lifecycle state machine.
//!
//! Pure decision logic. Statuses only ever move forward:
//!
//! ```text
//! issued ──► used ──► cancelled
//!    │                    ▲
//!    └────────────────────┘
//! ```
//!
//! Applying the `issued → used` transition is the repository's job (a single
//! conditional update, see [`crate::repository::TicketRepository::mark_used`]);
//! this module only decides whether a scan may proceed.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Ticket, TicketStatus};

/// Why a ticket cannot be scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRejection {
    /// The ticket was revoked by the organizer.
    Cancelled,
    /// The ticket was already scanned; carries the prior timestamp.
    AlreadyUsed { used_at: Option<DateTime<Utc>> },
    /// The ticket belongs to a different event than the one being scanned.
    WrongEvent,
}

/// Decide whether a ticket may transition to `used`.
///
/// Status rejections take precedence over an event mismatch: a cancelled
/// ticket scanned at the wrong door still reports `Cancelled`.
pub fn check_scannable(
    ticket: &Ticket,
    expected_event: Option<Uuid>,
) -> Result<(), ScanRejection> {
    match ticket.status {
        TicketStatus::Cancelled => return Err(ScanRejection::Cancelled),
        TicketStatus::Used => {
            return Err(ScanRejection::AlreadyUsed {
                used_at: ticket.used_at,
            });
        }
        TicketStatus::Issued => {}
    }

    if let Some(expected) = expected_event {
        if expected != ticket.event_id {
            return Err(ScanRejection::WrongEvent);
        }
    }

    Ok(())
}

/// The monotonic transition table.
pub fn can_transition(from: TicketStatus, to: TicketStatus) -> bool {
    use TicketStatus::*;
    matches!(
        (from, to),
        (Issued, Used) | (Issued, Cancelled) | (Used, Cancelled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Registration, RegistrationStatus};

    fn ticket(status: TicketStatus) -> Ticket {
        let registration = Registration {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "Guest".to_string(),
            email: "guest@example.com".to_string(),
            status: RegistrationStatus::Approved,
        };
        let mut ticket = Ticket::issue(&registration, "QR".to_string());
        ticket.status = status;
        if status == TicketStatus::Used {
            ticket.used_at = Some(Utc::now());
        }
        ticket
    }

    #[test]
    fn test_issued_ticket_is_scannable() {
        let t = ticket(TicketStatus::Issued);
        assert_eq!(check_scannable(&t, None), Ok(()));
        assert_eq!(check_scannable(&t, Some(t.event_id)), Ok(()));
    }

    #[test]
    fn test_wrong_event_rejected() {
        let t = ticket(TicketStatus::Issued);
        assert_eq!(
            check_scannable(&t, Some(Uuid::new_v4())),
            Err(ScanRejection::WrongEvent)
        );
    }

    #[test]
    fn test_used_ticket_rejected_with_timestamp() {
        let t = ticket(TicketStatus::Used);
        match check_scannable(&t, None) {
            Err(ScanRejection::AlreadyUsed { used_at }) => assert_eq!(used_at, t.used_at),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_cancelled_ticket_rejected() {
        let t = ticket(TicketStatus::Cancelled);
        assert_eq!(check_scannable(&t, None), Err(ScanRejection::Cancelled));
    }

    #[test]
    fn test_status_rejection_precedes_event_mismatch() {
        let t = ticket(TicketStatus::Cancelled);
        assert_eq!(
            check_scannable(&t, Some(Uuid::new_v4())),
            Err(ScanRejection::Cancelled)
        );
    }

    #[test]
    fn test_transition_table_is_monotonic() {
        use TicketStatus::*;

        assert!(can_transition(Issued, Used));
        assert!(can_transition(Issued, Cancelled));
        assert!(can_transition(Used, Cancelled));

        // never backward, never self
        assert!(!can_transition(Used, Issued));
        assert!(!can_transition(Cancelled, Issued));
        assert!(!can_transition(Cancelled, Used));
        assert!(!can_transition(Issued, Issued));
        assert!(!can_transition(Used, Used));
        assert!(!can_transition(Cancelled, Cancelled));
    }
}
