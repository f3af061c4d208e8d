//! Farm and membership entity models.
//!
//! Farm CRUD lives in the surrounding record keeper; the engine reads these
//! tables to answer "who gets notified about farm X" and to pick the locale
//! notification text renders in.

use serde::Serialize;
use sqlx::FromRow;
use paddock_core::types::{DbId, Timestamp};

/// A row from the `farms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Farm {
    pub id: DbId,
    pub name: String,
    pub owner_id: DbId,
    /// BCP 47-ish language tag, `"en"` or `"id"`. Unknown values fall back
    /// to English at render time.
    pub locale: String,
    pub created_at: Timestamp,
}

/// A row from the `farm_members` table.
///
/// The owner may or may not also appear here; recipient resolution
/// deduplicates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FarmMember {
    pub id: DbId,
    pub farm_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
}

/// A row from the `animals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Animal {
    pub id: DbId,
    pub farm_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
