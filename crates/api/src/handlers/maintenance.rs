//! Handler for the maintenance run-now endpoint.

use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/maintenance/run
///
/// Execute the full maintenance sequence immediately and return its
/// summary. The same sequence the in-process scheduler and the worker
/// binary run; every sub-task failure is reported inside the summary, so a
/// non-200 here means the store itself was unreachable.
pub async fn run_maintenance(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let summary = state.orchestrator.run_maintenance().await?;

    Ok(Json(serde_json::json!({ "data": summary })))
}
