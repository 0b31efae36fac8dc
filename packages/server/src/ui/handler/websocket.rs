//! WebSocket upgrade handler.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;

use crate::{
    connection::serve_connection,
    domain::{AdmissionError, check_admission},
    ui::state::AppState,
};

/// Admit the request, then promote it to a relayed connection.
///
/// Method and origin are checked before the handshake is looked at, so a
/// cross-origin request is refused even when the handshake itself is valid.
pub async fn websocket_handler(
    method: Method,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    if let Err(e) = check_admission(&method, &headers) {
        tracing::warn!("Rejected {} upgrade request: {}", method, e);
        return e.into_response();
    }

    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!("Rejected upgrade request: {}", rejection.body_text());
            return AdmissionError::Handshake(rejection.body_text()).into_response();
        }
    };

    let max_message_size = state.config.max_message_size;
    ws.max_message_size(max_message_size)
        .max_frame_size(max_message_size)
        .on_failed_upgrade(|e: axum::Error| tracing::error!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    serve_connection(sender, receiver, state.hub.clone(), state.config).await;
}
