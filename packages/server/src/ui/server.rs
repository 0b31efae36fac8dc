//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get, post},
};
use tower_http::trace::TraceLayer;

use crate::{config::RelayConfig, domain::SessionStore, hub::HubHandle};

use super::{
    handler::{debug_connections, health_check, login, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router around an existing hub
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント（メソッド判定はハンドラで行う）
        .route("/ws", any(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/debug/connections", get(debug_connections))
        .route("/session", post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Broadcast relay server
///
/// # Example
///
/// ```ignore
/// let (hub, _hub_task) = Hub::spawn();
/// let server = Server::new(hub, RelayConfig::default(), Arc::new(InMemorySessionStore::new()));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    hub: HubHandle,
    config: RelayConfig,
    sessions: Arc<dyn SessionStore>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `hub` - Handle to a running hub control loop
    /// * `config` - Tuning applied to every connection
    /// * `sessions` - Session collaborator used by the login endpoint
    pub fn new(hub: HubHandle, config: RelayConfig, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            hub,
            config,
            sessions,
        }
    }

    /// Run the relay server until a shutdown signal arrives
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            hub: self.hub,
            config: self.config,
            sessions: self.sessions,
        });
        let app = router(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
