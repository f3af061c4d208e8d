//! Notification entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use paddock_core::types::{DbId, Timestamp};
use paddock_core::{NotificationKind, Priority, RelatedEntity, RelatedEntityKind};

/// A row from the `notifications` table: one delivery target of one event.
///
/// `related_entity_type` and `related_entity_id` are both present or both
/// absent; writes go through [`NewNotification`], which carries the pair as
/// one `Option<RelatedEntity>` so the halves cannot drift apart.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub farm_id: Option<DbId>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Opaque key/value data for client-side deep-linking, shaped per kind
    /// by the composer that created the row.
    pub payload: serde_json::Value,
    pub priority: Priority,
    pub related_entity_type: Option<RelatedEntityKind>,
    pub related_entity_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Notification {
    /// The triggering entity, when the row has one.
    pub fn related(&self) -> Option<RelatedEntity> {
        match (self.related_entity_type, self.related_entity_id) {
            (Some(kind), Some(id)) => Some(RelatedEntity { kind, id }),
            _ => None,
        }
    }
}

/// DTO for inserting a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    pub user_id: DbId,
    pub farm_id: Option<DbId>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
    pub priority: Priority,
    pub related: Option<RelatedEntity>,
}

impl NewNotification {
    /// The same content addressed to a different recipient. Bulk fan-out
    /// clones one prototype per resolved recipient.
    pub fn for_recipient(&self, user_id: DbId) -> Self {
        Self {
            user_id,
            ..self.clone()
        }
    }
}

/// Read-side filter for notification listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationFilter {
    pub unread_only: bool,
    pub kind: Option<NotificationKind>,
}
