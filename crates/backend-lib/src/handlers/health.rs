// ============================
// crates/backend-lib/src/handlers/health.rs
// ============================
use axum::Json;
use betledger_common::HealthResponse;
use chrono::Utc;

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}
