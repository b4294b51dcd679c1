use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::gateway::RecordStore;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "healthtrack-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "checks": { "store": "ok", "backend": state.store.name() },
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, backend = state.store.name(), "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "checks": { "store": "failed", "backend": state.store.name() },
                })),
            )
        }
    }
}
