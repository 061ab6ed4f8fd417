use std::collections::HashSet;
use std::sync::Arc;

use axum_helpers::AuthUser;
use chrono::Utc;
use domain_notifications::{TicketEmail, TicketMailer};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::directory::{Event, EventDirectory};
use crate::error::{TicketError, TicketResult};
use crate::lifecycle::{self, ScanRejection};
use crate::models::{
    BulkIssueOutcome, EventTickets, SingleIssueOutcome, Ticket, TicketStats, ValidationVerdict,
};
use crate::qr::generate_qr_token;
use crate::repository::TicketRepository;

/// Service layer for ticket issuance, check-in validation and cancellation.
///
/// Orchestrates the repository, the read-only event/registration directory
/// and the mailer. Holds no state across requests: every operation re-reads
/// authoritative storage.
pub struct TicketService<R, D, M>
where
    R: TicketRepository,
    D: EventDirectory,
    M: TicketMailer,
{
    repository: Arc<R>,
    directory: Arc<D>,
    mailer: Arc<M>,
}

impl<R, D, M> Clone for TicketService<R, D, M>
where
    R: TicketRepository,
    D: EventDirectory,
    M: TicketMailer,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            directory: Arc::clone(&self.directory),
            mailer: Arc::clone(&self.mailer),
        }
    }
}

impl<R, D, M> TicketService<R, D, M>
where
    R: TicketRepository,
    D: EventDirectory,
    M: TicketMailer,
{
    pub fn new(repository: R, directory: D, mailer: M) -> Self {
        Self {
            repository: Arc::new(repository),
            directory: Arc::new(directory),
            mailer: Arc::new(mailer),
        }
    }

    /// Resolve an event and verify the caller owns it.
    async fn authorized_event(&self, caller: &AuthUser, event_id: Uuid) -> TicketResult<Event> {
        let event = self
            .directory
            .event_by_id(event_id)
            .await?
            .ok_or(TicketError::EventNotFound(event_id))?;

        if event.organizer_id != caller.id {
            return Err(TicketError::NotOrganizer);
        }

        Ok(event)
    }

    fn ticket_email(ticket: &Ticket, event: &Event) -> TicketEmail {
        TicketEmail {
            to_email: ticket.participant_email.clone(),
            to_name: ticket.participant_name.clone(),
            ticket_id: ticket.id,
            event_title: event.title.clone(),
            event_starts_at: event.starts_at,
            event_location: event.location.clone(),
            qr_code: ticket.qr_code.clone(),
        }
    }

    /// Issue tickets for every approved, not-yet-ticketed registration of an
    /// event.
    ///
    /// Tickets are persisted in one batch write before any email is
    /// attempted; delivery failures are aggregated into the outcome and
    /// never fail the operation.
    #[instrument(skip(self, caller), fields(organizer = %caller.id, event_id = %event_id))]
    pub async fn issue_bulk(
        &self,
        caller: &AuthUser,
        event_id: Uuid,
    ) -> TicketResult<BulkIssueOutcome> {
        let event = self.authorized_event(caller, event_id).await?;

        let approved = self.directory.approved_registrations(event_id).await?;
        if approved.is_empty() {
            return Err(TicketError::NoApprovedRegistrations(event_id));
        }

        // Dedup against tickets that already exist for this event; repeat
        // calls only issue the delta.
        let existing = self.repository.list_by_event(event_id).await?;
        let ticketed: HashSet<Uuid> = existing.iter().map(|t| t.registration_id).collect();
        let pending: Vec<_> = approved
            .into_iter()
            .filter(|r| !ticketed.contains(&r.id))
            .collect();
        if pending.is_empty() {
            return Err(TicketError::AllAlreadyTicketed(event_id));
        }

        let tickets: Vec<Ticket> = pending
            .iter()
            .map(|registration| Ticket::issue(registration, generate_qr_token()))
            .collect();

        // Durable before the first send: a crash during email dispatch must
        // not lose issued tickets.
        self.repository.insert_many(&tickets).await?;

        info!(count = tickets.len(), "Issued tickets, dispatching emails");

        let emails: Vec<TicketEmail> = tickets
            .iter()
            .map(|ticket| Self::ticket_email(ticket, &event))
            .collect();
        let report = self.mailer.send_batch(&emails).await;

        Ok(BulkIssueOutcome {
            message: format!("Issued {} tickets for {}", tickets.len(), event.title),
            tickets_created: tickets.len(),
            emails_sent: report.sent,
            emails_failed: report.failed,
            errors: if report.failures.is_empty() {
                None
            } else {
                Some(report.failures)
            },
        })
    }

    /// Issue a ticket for one approved registration.
    #[instrument(skip(self, caller), fields(organizer = %caller.id, registration_id = %registration_id))]
    pub async fn issue_one(
        &self,
        caller: &AuthUser,
        registration_id: Uuid,
    ) -> TicketResult<SingleIssueOutcome> {
        let registration = self
            .directory
            .registration_by_id(registration_id)
            .await?
            .ok_or(TicketError::RegistrationNotFound(registration_id))?;

        if registration.status != crate::directory::RegistrationStatus::Approved {
            return Err(TicketError::RegistrationNotApproved(registration_id));
        }

        let event = self.authorized_event(caller, registration.event_id).await?;

        if self
            .repository
            .find_by_registration(registration_id)
            .await?
            .is_some()
        {
            return Err(TicketError::TicketAlreadyIssued(registration_id));
        }

        let ticket = Ticket::issue(&registration, generate_qr_token());
        self.repository.insert(&ticket).await?;

        let dispatch = self
            .mailer
            .send_ticket(&Self::ticket_email(&ticket, &event))
            .await;

        Ok(SingleIssueOutcome {
            message: format!("Ticket issued to {}", ticket.participant_email),
            ticket,
            email_sent: dispatch.success,
            email_error: dispatch.error,
        })
    }

    /// Validate a scanned QR payload and, when valid, consume the ticket.
    ///
    /// The `used` transition is applied with an atomic conditional update
    /// and is durable before a positive verdict is returned; of N
    /// concurrent scans of one ticket, exactly one gets `valid`.
    #[instrument(skip(self, caller, qr_code), fields(operator = %caller.id))]
    pub async fn validate(
        &self,
        caller: &AuthUser,
        qr_code: &str,
        expected_event: Option<Uuid>,
    ) -> TicketResult<ValidationVerdict> {
        let Some(ticket) = self.repository.find_by_qr(qr_code).await? else {
            return Ok(ValidationVerdict::not_found());
        };

        let event = self
            .directory
            .event_by_id(ticket.event_id)
            .await?
            .ok_or(TicketError::EventNotFound(ticket.event_id))?;
        if event.organizer_id != caller.id {
            return Err(TicketError::NotOrganizer);
        }

        if let Err(rejection) = lifecycle::check_scannable(&ticket, expected_event) {
            return Ok(Self::rejection_verdict(&ticket, rejection));
        }

        let now = Utc::now();
        if self.repository.mark_used(ticket.id, now).await? {
            info!(ticket_id = %ticket.id, "Check-in accepted");
            return Ok(ValidationVerdict::granted(&ticket, now));
        }

        // Lost a concurrent transition; report the authoritative state.
        let current = self
            .repository
            .find_by_qr(qr_code)
            .await?
            .ok_or_else(|| TicketError::Database("ticket vanished during validation".to_string()))?;

        match lifecycle::check_scannable(&current, expected_event) {
            Err(rejection) => Ok(Self::rejection_verdict(&current, rejection)),
            Ok(()) => Ok(ValidationVerdict::already_used(&current, current.used_at)),
        }
    }

    fn rejection_verdict(ticket: &Ticket, rejection: ScanRejection) -> ValidationVerdict {
        match rejection {
            ScanRejection::Cancelled => ValidationVerdict::cancelled(ticket),
            ScanRejection::AlreadyUsed { used_at } => {
                ValidationVerdict::already_used(ticket, used_at)
            }
            ScanRejection::WrongEvent => ValidationVerdict::wrong_event(ticket),
        }
    }

    /// Cancel a ticket. Cancelling an already-cancelled ticket is a no-op.
    #[instrument(skip(self, caller), fields(organizer = %caller.id, ticket_id = %ticket_id))]
    pub async fn cancel(&self, caller: &AuthUser, ticket_id: Uuid) -> TicketResult<()> {
        let ticket = self
            .repository
            .find_by_id(ticket_id)
            .await?
            .ok_or(TicketError::TicketNotFound(ticket_id))?;

        self.authorized_event(caller, ticket.event_id).await?;

        self.repository.cancel(ticket_id).await?;
        info!(ticket_id = %ticket_id, "Ticket cancelled by organizer");
        Ok(())
    }

    /// All tickets of an event with per-status stats. Organizer only.
    pub async fn tickets_for_event(
        &self,
        caller: &AuthUser,
        event_id: Uuid,
    ) -> TicketResult<EventTickets> {
        self.authorized_event(caller, event_id).await?;

        let tickets = self.repository.list_by_event(event_id).await?;
        let stats = TicketStats::from_tickets(&tickets);
        Ok(EventTickets { tickets, stats })
    }

    /// The authenticated participant's own tickets.
    pub async fn tickets_for_email(&self, email: &str) -> TicketResult<Vec<Ticket>> {
        self.repository.list_by_email(email).await
    }
}
