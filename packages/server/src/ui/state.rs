//! Server state shared by every handler.

use std::sync::Arc;

use crate::{config::RelayConfig, domain::SessionStore, hub::HubHandle};

/// Shared application state
pub struct AppState {
    /// Handle to the hub control loop
    pub hub: HubHandle,
    /// Tuning applied to every new connection
    pub config: RelayConfig,
    /// SessionStore（セッション管理の抽象化）
    pub sessions: Arc<dyn SessionStore>,
}
