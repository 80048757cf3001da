//! Liveness probe backed by a store round-trip.

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Report whether the store answers a read transaction.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping() {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(err) => {
            tracing::error!("Health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "ok": false, "error": "Database connection failed" })),
            )
        }
    }
}
