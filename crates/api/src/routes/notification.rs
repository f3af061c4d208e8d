//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require a caller identity.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /               -> list_notifications
/// DELETE /               -> clear_all
/// POST   /read-all       -> mark_all_read
/// GET    /unread-count   -> unread_count
/// POST   /{id}/read      -> mark_read
/// DELETE /{id}           -> delete_notification
///
/// GET    /preferences    -> get_preferences
/// PUT    /preferences    -> update_preferences
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Feed endpoints
        .route(
            "/",
            get(notification::list_notifications).delete(notification::clear_all),
        )
        .route("/read-all", post(notification::mark_all_read))
        .route("/unread-count", get(notification::unread_count))
        .route("/{id}/read", post(notification::mark_read))
        .route("/{id}", delete(notification::delete_notification))
        // Preferences endpoints
        .route(
            "/preferences",
            get(notification::get_preferences).put(notification::update_preferences),
        )
}
