use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::TicketResult;
use crate::models::Ticket;

/// Repository trait for Ticket persistence
///
/// Defines the data access interface for tickets. Implementations can use
/// different storage backends (PostgreSQL, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Persist one ticket
    async fn insert(&self, ticket: &Ticket) -> TicketResult<()>;

    /// Persist a batch of tickets in one write
    async fn insert_many(&self, tickets: &[Ticket]) -> TicketResult<()>;

    /// Get a ticket by ID
    async fn find_by_id(&self, id: Uuid) -> TicketResult<Option<Ticket>>;

    /// Look up a ticket by its QR payload
    async fn find_by_qr(&self, qr_code: &str) -> TicketResult<Option<Ticket>>;

    /// The ticket issued for a registration, if any (1:1)
    async fn find_by_registration(&self, registration_id: Uuid) -> TicketResult<Option<Ticket>>;

    /// All tickets of an event
    async fn list_by_event(&self, event_id: Uuid) -> TicketResult<Vec<Ticket>>;

    /// All tickets issued to a participant email
    async fn list_by_email(&self, email: &str) -> TicketResult<Vec<Ticket>>;

    /// Atomically apply `issued → used`.
    ///
    /// Must be a single conditional update (`... WHERE id = ? AND status =
    /// 'issued'`) whose affected-row count decides the outcome. Returns true
    /// when this call won the transition; false means the ticket was no
    /// longer `issued`. Two concurrent scans of one ticket therefore get at
    /// most one `true` between them.
    async fn mark_used(&self, id: Uuid, used_at: DateTime<Utc>) -> TicketResult<bool>;

    /// Set status to `cancelled` (from any state) and clear `used_at`.
    /// Returns whether a row was touched.
    async fn cancel(&self, id: Uuid) -> TicketResult<bool>;
}
