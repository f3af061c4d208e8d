//! Route definitions for the `/maintenance` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::maintenance;
use crate::state::AppState;

/// Routes mounted at `/maintenance`.
///
/// ```text
/// POST /run -> run_maintenance
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/run", post(maintenance::run_maintenance))
}
