//! Tickets Domain
//!
//! Ticket issuance and check-in validation for approved event registrations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Handlers   │  ← HTTP surface (axum + utoipa)
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │   Service    │  ← issuance orchestration, check-in validation
//! └──┬────┬────┬─┘
//!    │    │    │
//!    │    │    └───────────────┐
//! ┌──▼─────────┐ ┌─────────────▼──┐ ┌───────────────┐
//! │ Repository │ │ EventDirectory │ │  TicketMailer │
//! └──────┬─────┘ └───────┬────────┘ └───────────────┘
//!        │               │            (domain_notifications)
//! ┌──────▼───────────────▼──┐
//! │        PostgreSQL       │
//! └─────────────────────────┘
//! ```
//!
//! The lifecycle state machine lives in [`lifecycle`]; the `issued → used`
//! transition is applied as an atomic conditional update in the repository
//! so concurrent scans of the same QR payload validate at most once.

pub mod directory;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod postgres;
pub mod qr;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use directory::{Event, EventDirectory, Registration, RegistrationStatus};
pub use error::{TicketError, TicketResult};
pub use models::{
    BulkIssueOutcome, SingleIssueOutcome, Ticket, TicketStats, TicketStatus, ValidationVerdict,
    VerdictReason,
};
pub use postgres::{PgEventDirectory, PgTicketRepository};
pub use repository::TicketRepository;
pub use service::TicketService;
