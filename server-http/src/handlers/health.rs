use axum::Json;

use crate::dto::HealthResponse;

/// GET /healthz
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}
