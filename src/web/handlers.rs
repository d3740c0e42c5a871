//! HTTP request handlers.

use super::AppState;
use crate::engine::aggregate_loaded;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde_json::json;
use std::time::Instant;

// ============================================================================
// API: Devices
// ============================================================================

pub async fn handle_get_devices(State(state): State<AppState>) -> impl IntoResponse {
    let deadline = state.config.deadline.map(|d| Instant::now() + d);
    let source = state.source.clone();

    let result = tokio::task::spawn_blocking(move || {
        source
            .read_records()
            .map(|loaded| aggregate_loaded(loaded, deadline))
    })
    .await;

    match result {
        Ok(Ok(report)) => {
            tracing::debug!(
                "Aggregated {} devices ({} dropped)",
                report.summary.total,
                report.dropped.len()
            );
            Json(report).into_response()
        }
        Ok(Err(e)) => {
            tracing::error!("Telemetry source {} unavailable: {}", state.source.describe(), e);
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        Err(e) => {
            tracing::error!("Aggregation task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: String) -> axum::response::Response {
    (status, Json(json!({ "error": message }))).into_response()
}

// ============================================================================
// Health
// ============================================================================

pub async fn handle_healthz(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "source": state.source.describe(),
        "checked_at": Utc::now().to_rfc3339(),
    }))
}
