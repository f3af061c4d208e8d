//! WebSocket support for the live notification feed.
//!
//! - `manager`: registry of open connections and their control channels
//! - `handler`: upgrade endpoint and per-connection tasks
//! - `heartbeat`: periodic pings that keep idle connections alive

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
