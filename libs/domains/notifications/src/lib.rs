//! Notifications Domain
//!
//! Transactional ticket email delivery with interchangeable transports.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  TicketService   │  ← hands issued tickets to the mailer
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │      Mailer      │  ← renders template + QR image, batches, isolates
//! └────────┬─────────┘     per-recipient failures
//!          │
//! ┌────────▼─────────┐
//! │  EmailTransport  │  ← closed enum, selected once at startup by
//! └────────┬─────────┘     configuration precedence
//!          │
//!   SendGrid / Resend / SMTP
//! ```
//!
//! Delivery failures never abort the caller: every send resolves to a
//! [`DispatchResult`] and bulk sends aggregate into a [`BulkEmailReport`].

pub mod dispatcher;
pub mod error;
pub mod models;
pub mod providers;
pub mod qr_image;
pub mod templates;
pub mod transport;

// Re-export commonly used types
pub use dispatcher::{Mailer, PacingConfig, TicketMailer};
pub use error::{NotificationError, NotificationResult};
pub use models::{BulkEmailReport, DispatchResult, EmailFailure, TicketEmail};
pub use providers::{EmailAttachment, EmailContent, EmailProvider, SentEmail};
pub use providers::{ResendProvider, SendGridProvider, SmtpProvider};
pub use templates::TemplateEngine;
pub use transport::{select_transport, EmailSettings, EmailTransport, SmtpSettings};
