use std::sync::Arc;

use paddock_db::Store;
use paddock_events::NotificationHub;
use paddock_notify::{NotificationService, Orchestrator};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence handle. `PgStore` in production, `MemoryStore` in tests.
    pub store: Arc<dyn Store>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection registry (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Feed event hub WebSocket connections subscribe to.
    pub hub: Arc<NotificationHub>,
    /// Notification write path (create, read-state changes, fan-out).
    pub service: NotificationService,
    /// Maintenance sequence, shared by the run-now endpoint and the
    /// in-process scheduler.
    pub orchestrator: Orchestrator,
}
