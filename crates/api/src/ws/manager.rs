//! WebSocket connection registry.
//!
//! Tracks every open feed connection and owns the control channel used to
//! push heartbeat pings and shutdown close frames to them. Feed events do
//! not pass through the registry; each connection forwards its own hub
//! subscription.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use chrono::Utc;
use tokio::sync::{mpsc, RwLock};

use paddock_core::types::Timestamp;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Channel sender for outbound control messages to this connection.
    pub sender: WsSender,
    /// When this connection was established.
    pub connected_at: Timestamp,
}

/// Registry of active WebSocket connections.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared between the handlers, the heartbeat task, and shutdown.
pub struct WsManager {
    /// Active connections keyed by connection ID.
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    /// Create a new empty connection registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the control channel; the connection's
    /// sender task forwards anything received on it to the socket.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            connected_at: Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID.
    pub async fn remove(&self, conn_id: &str) {
        if let Some(conn) = self.connections.write().await.remove(conn_id) {
            let connected_secs = (Utc::now() - conn.connected_at).num_seconds();
            tracing::debug!(conn_id, connected_secs, "WebSocket connection removed");
        }
    }

    /// Return the number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Ping frame to every connected client.
    ///
    /// Connections whose channel is already closed are skipped; they are
    /// cleaned up when their handler task exits.
    pub async fn ping_all(&self) {
        let connections = self.connections.read().await;
        for conn in connections.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }

    /// Send a Close frame to every connection and clear the registry.
    ///
    /// Called during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut connections = self.connections.write().await;
        let count = connections.len();
        for conn in connections.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        connections.clear();
        if count > 0 {
            tracing::info!(count, "Closed all WebSocket connections");
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
