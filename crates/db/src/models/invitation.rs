//! Farm invitation entity model.
//!
//! Invitations are issued by the surrounding record keeper against a phone
//! number, which may not belong to a registered account yet. The engine
//! reads pending ones to notify resolvable recipients and deletes stale
//! ones during maintenance.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use paddock_core::types::{DbId, Timestamp};

/// Lifecycle status of a farm invitation. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
}

/// A row from the `farm_invitations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FarmInvitation {
    pub id: DbId,
    pub farm_id: DbId,
    /// As typed by the inviter; normalized before any comparison.
    pub phone: String,
    pub invited_by: Option<DbId>,
    pub status: InvitationStatus,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl FarmInvitation {
    /// Whether the invitation has passed its expiry instant. No expiry
    /// means it never expires by time (only by the stale-age cleanup).
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
