//! HTTP-level middleware: CORS and security headers.

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build a CORS layer for the given allowed origins.
///
/// Methods and headers match what the ticket API actually uses; credentials
/// are allowed so cookie-based tokens work from the frontend.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Parse the required `CORS_ALLOWED_ORIGIN` environment variable
/// (comma-separated origins) into header values.
pub fn allowed_origins_from_env() -> std::io::Result<Vec<HeaderValue>> {
    let origins_str = std::env::var("CORS_ALLOWED_ORIGIN").map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN environment variable is required. Example: CORS_ALLOWED_ORIGIN=http://localhost:3000,https://example.com",
        )
    })?;

    let allowed_origins: Vec<HeaderValue> = origins_str
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed_origins.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN must contain at least one origin",
        ));
    }

    Ok(allowed_origins)
}

/// Middleware adding standard security headers to every response.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origins_from_env_parses_list() {
        temp_env::with_var(
            "CORS_ALLOWED_ORIGIN",
            Some("http://localhost:3000, https://tickets.example.com"),
            || {
                let origins = allowed_origins_from_env().unwrap();
                assert_eq!(origins.len(), 2);
                assert_eq!(origins[0], "http://localhost:3000");
            },
        );
    }

    #[test]
    fn test_allowed_origins_from_env_missing() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            assert!(allowed_origins_from_env().is_err());
        });
    }

    #[test]
    fn test_allowed_origins_from_env_empty() {
        temp_env::with_var("CORS_ALLOWED_ORIGIN", Some(" , "), || {
            assert!(allowed_origins_from_env().is_err());
        });
    }
}
