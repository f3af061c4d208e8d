//! Caller identity extractor for Axum handlers.
//!
//! Authentication lives in the fronting proxy; by the time a request
//! reaches this service the caller has been verified and their id is
//! attached as the `x-user-id` header. The extractor only parses that
//! contract, it does not verify anything itself.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use paddock_core::error::CoreError;
use paddock_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, taken from the `x-user-id` header.
///
/// Use this as an extractor parameter in any handler that acts on behalf of
/// a user:
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// The caller's internal database id.
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing x-user-id header".into()))
            })?;

        let user_id: DbId = header.parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "x-user-id must be a numeric user id".into(),
            ))
        })?;

        Ok(CurrentUser { user_id })
    }
}
