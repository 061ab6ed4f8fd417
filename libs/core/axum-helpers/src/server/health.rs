use axum::{routing::get, Json, Router};
use core_config::AppInfo;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// Liveness router: `/health` and `/healthz`.
///
/// Readiness (`/ready`) belongs to the app, which knows its dependencies.
pub fn health_router(app_info: AppInfo) -> Router {
    let handler = move || async move {
        Json(HealthResponse {
            status: "ok",
            name: app_info.name,
            version: app_info.version,
        })
    };

    Router::new()
        .route("/health", get(handler))
        .route("/healthz", get(handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serializes() {
        let body = HealthResponse {
            status: "ok",
            name: "gatepass_api",
            version: "0.1.0",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["name"], "gatepass_api");
    }
}
