use axum::Router;
use domain_notifications::{EmailTransport, Mailer};

pub mod health;
pub mod tickets;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState, mailer: Mailer<EmailTransport>) -> Router {
    Router::new().nest("/tickets", tickets::router(state, mailer))
}

/// Creates a router with the /ready endpoint that performs actual health
/// checks against the database.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
