//! Activity entity model and DTOs.
//!
//! An activity is a one-off unit of animal work (feeding, medical check,
//! weighing). Recurring planned care lives in
//! [`crate::models::scheduled_activity`].

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use paddock_core::types::{DbId, Timestamp};
use paddock_core::WorkStatus;

/// A row from the `activities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: DbId,
    pub animal_id: DbId,
    /// Free-text label chosen by the user (e.g. `"feeding"`, `"medical"`).
    pub kind: String,
    pub title: String,
    pub notes: Option<String>,
    pub scheduled_at: Timestamp,
    pub status: WorkStatus,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new activity.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub animal_id: DbId,
    pub kind: String,
    pub title: String,
    pub notes: Option<String>,
    pub scheduled_at: Timestamp,
    pub created_by: Option<DbId>,
}
