//! HTTP handlers for the ticket API.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use axum_helpers::{AuthUser, UuidPath, ValidatedJson};
use domain_notifications::TicketMailer;
use std::sync::Arc;

use crate::directory::EventDirectory;
use crate::error::TicketResult;
use crate::models::{
    BulkIssueOutcome, EventTickets, MessageResponse, SingleIssueOutcome, Ticket,
    ValidateTicketRequest, ValidationVerdict,
};
use crate::repository::TicketRepository;
use crate::service::TicketService;

/// Build the ticket router over a fully wired service.
///
/// Callers nest this under `/tickets` and layer the auth middleware on top;
/// every handler expects an authenticated principal in request extensions.
pub fn router<R, D, M>(service: TicketService<R, D, M>) -> Router
where
    R: TicketRepository + 'static,
    D: EventDirectory + 'static,
    M: TicketMailer + 'static,
{
    let service = Arc::new(service);

    Router::new()
        .route("/issue-bulk/{event_id}", post(issue_bulk::<R, D, M>))
        .route("/issue/{registration_id}", post(issue_one::<R, D, M>))
        .route("/my-tickets", get(my_tickets::<R, D, M>))
        .route("/event/{event_id}", get(event_tickets::<R, D, M>))
        .route("/validate", post(validate::<R, D, M>))
        .route("/cancel/{ticket_id}", patch(cancel::<R, D, M>))
        .with_state(service)
}

/// Issue tickets for every approved, unticketed registration of an event
#[utoipa::path(
    post,
    path = "/issue-bulk/{event_id}",
    tag = "tickets",
    params(
        ("event_id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Issuance outcome with per-recipient email errors", body = BulkIssueOutcome),
        (status = 400, description = "No approved registrations"),
        (status = 403, description = "Caller does not organize this event"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "All approved registrations already ticketed")
    )
)]
pub async fn issue_bulk<R, D, M>(
    State(service): State<Arc<TicketService<R, D, M>>>,
    Extension(user): Extension<AuthUser>,
    UuidPath(event_id): UuidPath,
) -> TicketResult<Json<BulkIssueOutcome>>
where
    R: TicketRepository + 'static,
    D: EventDirectory + 'static,
    M: TicketMailer + 'static,
{
    let outcome = service.issue_bulk(&user, event_id).await?;
    Ok(Json(outcome))
}

/// Issue a ticket for one approved registration
#[utoipa::path(
    post,
    path = "/issue/{registration_id}",
    tag = "tickets",
    params(
        ("registration_id" = String, Path, description = "Registration ID")
    ),
    responses(
        (status = 201, description = "Ticket issued", body = SingleIssueOutcome),
        (status = 400, description = "Registration not approved"),
        (status = 403, description = "Caller does not organize this event"),
        (status = 404, description = "Registration not found"),
        (status = 409, description = "Ticket already issued")
    )
)]
pub async fn issue_one<R, D, M>(
    State(service): State<Arc<TicketService<R, D, M>>>,
    Extension(user): Extension<AuthUser>,
    UuidPath(registration_id): UuidPath,
) -> TicketResult<impl IntoResponse>
where
    R: TicketRepository + 'static,
    D: EventDirectory + 'static,
    M: TicketMailer + 'static,
{
    let outcome = service.issue_one(&user, registration_id).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// The authenticated participant's own tickets
#[utoipa::path(
    get,
    path = "/my-tickets",
    tag = "tickets",
    responses(
        (status = 200, description = "Tickets issued to the caller's email", body = Vec<Ticket>)
    )
)]
pub async fn my_tickets<R, D, M>(
    State(service): State<Arc<TicketService<R, D, M>>>,
    Extension(user): Extension<AuthUser>,
) -> TicketResult<Json<Vec<Ticket>>>
where
    R: TicketRepository + 'static,
    D: EventDirectory + 'static,
    M: TicketMailer + 'static,
{
    let tickets = service.tickets_for_email(&user.email).await?;
    Ok(Json(tickets))
}

/// All tickets of an event with status stats (organizer only)
#[utoipa::path(
    get,
    path = "/event/{event_id}",
    tag = "tickets",
    params(
        ("event_id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Tickets and stats", body = EventTickets),
        (status = 403, description = "Caller does not organize this event"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn event_tickets<R, D, M>(
    State(service): State<Arc<TicketService<R, D, M>>>,
    Extension(user): Extension<AuthUser>,
    UuidPath(event_id): UuidPath,
) -> TicketResult<Json<EventTickets>>
where
    R: TicketRepository + 'static,
    D: EventDirectory + 'static,
    M: TicketMailer + 'static,
{
    let result = service.tickets_for_event(&user, event_id).await?;
    Ok(Json(result))
}

/// Validate a scanned QR payload and consume the ticket when valid
#[utoipa::path(
    post,
    path = "/validate",
    tag = "tickets",
    request_body = ValidateTicketRequest,
    responses(
        (status = 200, description = "Verdict; invalid tickets are 200s with a reason", body = ValidationVerdict),
        (status = 403, description = "Caller does not organize the ticket's event")
    )
)]
pub async fn validate<R, D, M>(
    State(service): State<Arc<TicketService<R, D, M>>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<ValidateTicketRequest>,
) -> TicketResult<Json<ValidationVerdict>>
where
    R: TicketRepository + 'static,
    D: EventDirectory + 'static,
    M: TicketMailer + 'static,
{
    let verdict = service
        .validate(&user, &request.qr_code_data, request.event_id)
        .await?;
    Ok(Json(verdict))
}

/// Cancel a ticket (organizer only; idempotent)
#[utoipa::path(
    patch,
    path = "/cancel/{ticket_id}",
    tag = "tickets",
    params(
        ("ticket_id" = String, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket cancelled", body = MessageResponse),
        (status = 403, description = "Caller does not organize this event"),
        (status = 404, description = "Ticket not found")
    )
)]
pub async fn cancel<R, D, M>(
    State(service): State<Arc<TicketService<R, D, M>>>,
    Extension(user): Extension<AuthUser>,
    UuidPath(ticket_id): UuidPath,
) -> TicketResult<Json<MessageResponse>>
where
    R: TicketRepository + 'static,
    D: EventDirectory + 'static,
    M: TicketMailer + 'static,
{
    service.cancel(&user, ticket_id).await?;
    Ok(Json(MessageResponse {
        message: "Ticket cancelled".to_string(),
    }))
}
