//! WebSocket upgrade handler for the live notification feed.
//!
//! Each connection gets its own hub subscription scoped to the caller's
//! identity (and, optionally, one farm). The sender task interleaves
//! filtered feed events with control messages from the registry, so a
//! slow client never blocks other connections.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use paddock_core::types::DbId;
use paddock_events::FeedSubscription;

use crate::middleware::identity::CurrentUser;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query parameters accepted by the feed WebSocket.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Widen the subscription to every event tagged with this farm.
    pub farm_id: Option<DbId>,
}

/// Upgrade an HTTP request to a WebSocket feed connection.
///
/// The subscription is taken before the upgrade so no event published
/// during the handshake is missed.
pub async fn ws_handler(
    user: CurrentUser,
    Query(params): Query<WsQuery>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let subscription = state.hub.subscribe_for(user.user_id, params.farm_id);
    ws.on_upgrade(move |socket| {
        handle_socket(socket, state.ws_manager, subscription, user.user_id)
    })
}

/// Drive a single WebSocket connection until either side closes it.
async fn handle_socket(
    socket: WebSocket,
    ws_manager: Arc<WsManager>,
    subscription: FeedSubscription,
    user_id: DbId,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket connected");

    let rx = ws_manager.add(conn_id.clone()).await;
    let (sink, mut stream) = socket.split();

    // Sender task: feed events and control messages share one writer.
    let send_task = tokio::spawn(run_sender(sink, rx, subscription, conn_id.clone()));

    // Receive loop: the client only listens on this channel today, so
    // inbound traffic is limited to close frames and pongs.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket disconnected");
}

/// Forward control messages and filtered feed events to the socket sink.
async fn run_sender(
    mut sink: futures::stream::SplitSink<WebSocket, Message>,
    mut rx: tokio::sync::mpsc::UnboundedReceiver<Message>,
    mut subscription: FeedSubscription,
    conn_id: String,
) {
    loop {
        tokio::select! {
            maybe_msg = rx.recv() => {
                let Some(msg) = maybe_msg else { break };
                if sink.send(msg).await.is_err() {
                    break;
                }
            }
            maybe_event = subscription.recv() => {
                let Some(event) = maybe_event else { break };
                let payload = match serde_json::to_string(&event) {
                    Ok(payload) => payload,
                    Err(error) => {
                        tracing::error!(conn_id = %conn_id, %error, "Failed to serialize feed event");
                        continue;
                    }
                };
                if sink.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
        }
    }
    tracing::trace!(conn_id = %conn_id, "WebSocket sender task finished");
}
