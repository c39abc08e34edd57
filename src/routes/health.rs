use axum::response::{IntoResponse, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthStatus {
    status: &'static str,
}

/// Liveness only. The provider is not contacted.
pub async fn healthcheck() -> impl IntoResponse {
    Json(HealthStatus {
        status: "Available",
    })
}
