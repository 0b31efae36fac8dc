//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::{domain::ConnectionId, ui::state::AppState};
use hiroba_shared::time::millis_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[derive(Debug, Serialize)]
pub struct ConnectionDto {
    pub id: ConnectionId,
    pub connected_at: Option<String>,
}

/// Debug endpoint listing the hub's live connections (for testing purposes)
pub async fn debug_connections(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConnectionDto>>, StatusCode> {
    let connections = state.hub.connections().await.map_err(|e| {
        tracing::error!("Failed to query hub: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    // Domain Model から DTO への変換
    let dtos = connections
        .into_iter()
        .map(|info| ConnectionDto {
            id: info.id,
            connected_at: millis_to_rfc3339(info.connected_at),
        })
        .collect();

    Ok(Json(dtos))
}
