//! Periodic heartbeat for WebSocket connections.
//!
//! Sends a Ping frame to every connection on a fixed interval so
//! intermediate proxies and load balancers keep idle feed connections
//! open.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::ws::manager::WsManager;

/// How often to ping connected clients, in seconds.
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn the heartbeat task.
///
/// Runs until the returned handle is aborted.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;

            let count = ws_manager.connection_count().await;
            if count > 0 {
                tracing::trace!(count, "Sending heartbeat pings");
                ws_manager.ping_all().await;
            }
        }
    })
}
