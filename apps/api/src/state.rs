//! Application state management.
//!
//! The state contains configuration and shared connections; it is cloned per
//! handler (cheap Arc clones). The mailer is injected separately at router
//! construction so the domain service owns it.

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Stateless JWT verification for the auth middleware
    pub jwt_auth: axum_helpers::JwtAuth,
}
