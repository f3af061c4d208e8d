//! Scheduled activity entity model and DTOs.
//!
//! A scheduled activity is planned (possibly recurring) care tied to an
//! animal. The maintenance rollover spawns the next occurrence of a
//! recurring schedule as a fresh `Pending` row and marks the due one
//! `Completed`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use paddock_core::types::{DbId, Timestamp};
use paddock_core::{RecurrenceRule, WorkStatus};

/// A row from the `scheduled_activities` table.
///
/// Invariant: `recurrence_rule` is `Some` only when `is_recurring` is true.
/// [`NewScheduledActivity::validate_recurrence`] guards inserts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduledActivity {
    pub id: DbId,
    pub animal_id: DbId,
    pub title: String,
    pub notes: Option<String>,
    pub scheduled_at: Timestamp,
    pub status: WorkStatus,
    pub is_recurring: bool,
    pub recurrence_rule: Option<RecurrenceRule>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a scheduled activity (user action or rollover successor).
#[derive(Debug, Clone, Deserialize)]
pub struct NewScheduledActivity {
    pub animal_id: DbId,
    pub title: String,
    pub notes: Option<String>,
    pub scheduled_at: Timestamp,
    pub is_recurring: bool,
    pub recurrence_rule: Option<RecurrenceRule>,
    pub created_by: Option<DbId>,
}

impl NewScheduledActivity {
    /// Reject a recurrence rule on a non-recurring schedule (and the
    /// reverse: a recurring schedule with no rule).
    pub fn validate_recurrence(&self) -> Result<(), String> {
        match (self.is_recurring, self.recurrence_rule) {
            (true, None) => Err("Recurring schedule requires a recurrence rule".to_string()),
            (false, Some(_)) => {
                Err("Recurrence rule is only valid on a recurring schedule".to_string())
            }
            _ => Ok(()),
        }
    }

    /// The successor occurrence of `parent`, due at `next_at`.
    pub fn successor_of(parent: &ScheduledActivity, next_at: Timestamp) -> Self {
        Self {
            animal_id: parent.animal_id,
            title: parent.title.clone(),
            notes: parent.notes.clone(),
            scheduled_at: next_at,
            is_recurring: true,
            recurrence_rule: parent.recurrence_rule,
            created_by: parent.created_by,
        }
    }
}
