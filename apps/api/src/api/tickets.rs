use axum::Router;
use axum_helpers::auth::jwt_auth_middleware;
use domain_notifications::{EmailTransport, Mailer};
use domain_tickets::{handlers, PgEventDirectory, PgTicketRepository, TicketService};

/// Wire the ticket domain router: PostgreSQL ports + the process-wide
/// mailer, protected by the JWT principal resolver.
pub fn router(state: &crate::state::AppState, mailer: Mailer<EmailTransport>) -> Router {
    let repository = PgTicketRepository::new(state.db.clone());
    let directory = PgEventDirectory::new(state.db.clone());
    let service = TicketService::new(repository, directory, mailer);

    handlers::router(service).layer(axum::middleware::from_fn_with_state(
        state.jwt_auth.clone(),
        jwt_auth_middleware,
    ))
}
