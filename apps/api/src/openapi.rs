use utoipa::OpenApi;

/// Ticket API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        domain_tickets::handlers::issue_bulk,
        domain_tickets::handlers::issue_one,
        domain_tickets::handlers::my_tickets,
        domain_tickets::handlers::event_tickets,
        domain_tickets::handlers::validate,
        domain_tickets::handlers::cancel,
    ),
    components(schemas(
        domain_tickets::models::Ticket,
        domain_tickets::models::TicketStatus,
        domain_tickets::models::TicketStats,
        domain_tickets::models::EventTickets,
        domain_tickets::models::BulkIssueOutcome,
        domain_tickets::models::SingleIssueOutcome,
        domain_tickets::models::ValidateTicketRequest,
        domain_tickets::models::ValidationVerdict,
        domain_tickets::models::VerdictReason,
        domain_tickets::models::Participant,
        domain_tickets::models::MessageResponse,
        domain_notifications::EmailFailure,
    )),
    tags(
        (name = "tickets", description = "Ticket issuance and check-in validation")
    )
)]
pub struct ApiDoc;
