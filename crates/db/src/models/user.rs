//! User entity model.
//!
//! Account creation and profile editing live in the surrounding record
//! keeper; this engine only reads users to resolve notification recipients.

use serde::Serialize;
use sqlx::FromRow;
use paddock_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub display_name: String,
    /// Stored normalized (digits with optional leading `+`), the same form
    /// [`paddock_core::phone::normalize`] produces.
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}
