use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bosswatch_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (viewer clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing change events.
    pub event_bus: Arc<bosswatch_events::EventBus>,
}

impl AppState {
    /// Check a presented token against the configured dashboard password.
    pub fn dashboard_token_matches(&self, token: &str) -> bool {
        token == self.config.dashboard_password
    }
}
