//! Handlers for the `/notifications` resource.
//!
//! All endpoints act on behalf of the caller identified by [`CurrentUser`];
//! every query is scoped to that user's rows. Read-state changes go through
//! [`paddock_notify::NotificationService`] so connected feeds observe them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use paddock_core::error::CoreError;
use paddock_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use paddock_core::types::DbId;
use paddock_core::NotificationKind;
use paddock_db::models::notification::NotificationFilter;
use paddock_db::models::preferences::UpdateDeliveryPreferences;

use crate::error::{AppError, AppResult};
use crate::middleware::identity::CurrentUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    pub unread_only: Option<bool>,
    /// Restrict to one kind (wire form, e.g. `ACTIVITY_REMINDER`).
    pub kind: Option<NotificationKind>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
///
/// List the caller's notifications, newest first, with optional filtering.
pub async fn list_notifications(
    user: CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let filter = NotificationFilter {
        unread_only: params.unread_only.unwrap_or(false),
        kind: params.kind,
    };

    let notifications = state
        .store
        .list_notifications(user.user_id, filter, limit, offset)
        .await?;

    Ok(Json(serde_json::json!({ "data": notifications })))
}

/// GET /api/v1/notifications/unread-count
///
/// Return the number of unread notifications for the caller.
pub async fn unread_count(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = state.store.unread_count(user.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}

// ---------------------------------------------------------------------------
// Read state
// ---------------------------------------------------------------------------

/// POST /api/v1/notifications/{id}/read
///
/// Mark a single notification as read. Returns 204 No Content both on a
/// fresh flip and when the notification was already read (marking twice is
/// not an error, but only the first flip emits a feed event). Returns 404
/// when the notification does not exist for this caller.
pub async fn mark_read(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if state
        .service
        .mark_read(notification_id, user.user_id)
        .await?
        .is_some()
    {
        return Ok(StatusCode::NO_CONTENT);
    }

    // Nothing flipped: either already read (fine) or not this user's row.
    match state
        .store
        .notification(notification_id, user.user_id)
        .await?
    {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        })),
    }
}

/// POST /api/v1/notifications/read-all
///
/// Mark all of the caller's notifications as read.
/// Returns the number of notifications that were flipped.
pub async fn mark_all_read(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = state.service.mark_all_read(user.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "marked_read": count }
    })))
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// DELETE /api/v1/notifications/{id}
///
/// Delete a single notification. Returns 204 No Content on success, or 404
/// if the notification does not exist for this caller.
pub async fn delete_notification(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = state
        .service
        .delete(notification_id, user.user_id)
        .await?;

    if deleted.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/notifications
///
/// Delete every notification of the caller, read or not.
/// Returns the number of notifications removed.
pub async fn clear_all(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = state.service.clear_all(user.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "deleted": count }
    })))
}

// ---------------------------------------------------------------------------
// Delivery preferences
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/preferences
///
/// Get the caller's delivery preferences, creating the default row on first
/// access so the client always has a full set of toggles to render.
pub async fn get_preferences(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let prefs = state.store.get_or_create_preferences(user.user_id).await?;

    Ok(Json(serde_json::json!({ "data": prefs })))
}

/// PUT /api/v1/notifications/preferences
///
/// Partially update the caller's delivery preferences; absent fields keep
/// their stored values.
pub async fn update_preferences(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateDeliveryPreferences>,
) -> AppResult<Json<serde_json::Value>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let prefs = state
        .store
        .update_preferences(user.user_id, &input)
        .await?;

    Ok(Json(serde_json::json!({ "data": prefs })))
}
