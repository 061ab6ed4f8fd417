//! Authentication module: the principal resolver.
//!
//! Token *issuance* (login, refresh, revocation) is an external system; this
//! module only verifies bearer tokens and resolves the authenticated
//! principal for downstream authorization checks.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let config = JwtConfig::from_env()?;
//! let auth = JwtAuth::new(&config);
//!
//! let protected = Router::new()
//!     .route("/api/tickets/validate", post(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{AuthUser, JwtAuth, JwtClaims};
pub use middleware::jwt_auth_middleware;
