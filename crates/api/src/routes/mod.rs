pub mod health;
pub mod maintenance;
pub mod notification;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                 notification feed WebSocket
///
/// /notifications                      list (?unread_only, kind, limit, offset)
/// /notifications                      clear all (DELETE)
/// /notifications/read-all             mark all read (POST)
/// /notifications/unread-count         unread count (GET)
/// /notifications/{id}/read            mark read (POST)
/// /notifications/{id}                 delete one (DELETE)
/// /notifications/preferences          get/update preferences (GET, PUT)
///
/// /maintenance/run                    run maintenance now (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        // Notifications and delivery preferences.
        .nest("/notifications", notification::router())
        // Maintenance run-now.
        .nest("/maintenance", maintenance::router())
}
