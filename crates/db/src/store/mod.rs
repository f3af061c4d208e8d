//! The injected store interface and its implementations.
//!
//! Every engine component (service, triggers, orchestrator, HTTP handlers)
//! receives an `Arc<dyn Store>` rather than a pool, so the whole stack runs
//! against [`MemoryStore`] in tests and [`PgStore`] in production.

use async_trait::async_trait;

use paddock_core::types::{DbId, Timestamp};
use paddock_core::{NotificationKind, RelatedEntity, WorkStatus};

use crate::error::StoreError;
use crate::models::activity::Activity;
use crate::models::farm::{Animal, Farm};
use crate::models::invitation::FarmInvitation;
use crate::models::notification::{NewNotification, Notification, NotificationFilter};
use crate::models::preferences::{DeliveryPreferences, UpdateDeliveryPreferences};
use crate::models::scheduled_activity::{NewScheduledActivity, ScheduledActivity};
use crate::models::user::User;

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Persistence operations the engine needs.
///
/// Farms, members, animals and activities are written by the surrounding
/// record keeper; the engine only reads them. Scheduled activities gain a
/// write surface here because the recurrence rollover spawns successor
/// occurrences itself.
#[async_trait]
pub trait Store: Send + Sync {
    // -----------------------------------------------------------------------
    // Health
    // -----------------------------------------------------------------------

    /// Cheap connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    // -----------------------------------------------------------------------
    // Users, farms, animals
    // -----------------------------------------------------------------------

    async fn user(&self, id: DbId) -> Result<Option<User>, StoreError>;

    /// Look up an active user by normalized phone number.
    ///
    /// The caller normalizes; the stored value is already normalized.
    async fn user_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError>;

    async fn farm(&self, id: DbId) -> Result<Option<Farm>, StoreError>;

    /// User ids of every member of a farm, owner not implied.
    async fn farm_member_user_ids(&self, farm_id: DbId) -> Result<Vec<DbId>, StoreError>;

    async fn animal(&self, id: DbId) -> Result<Option<Animal>, StoreError>;

    // -----------------------------------------------------------------------
    // Activities (one-off work items)
    // -----------------------------------------------------------------------

    async fn activity(&self, id: DbId) -> Result<Option<Activity>, StoreError>;

    /// Pending activities with `scheduled_at` in `[from, to]`.
    async fn pending_activities_due_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Activity>, StoreError>;

    /// Pending activities with `scheduled_at` strictly before `cutoff`.
    async fn pending_activities_due_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<Activity>, StoreError>;

    // -----------------------------------------------------------------------
    // Scheduled activities
    // -----------------------------------------------------------------------

    async fn scheduled_activity(&self, id: DbId) -> Result<Option<ScheduledActivity>, StoreError>;

    async fn insert_scheduled_activity(
        &self,
        new: &NewScheduledActivity,
    ) -> Result<ScheduledActivity, StoreError>;

    /// Set a schedule's status. Returns `false` when the row does not exist.
    async fn set_scheduled_activity_status(
        &self,
        id: DbId,
        status: WorkStatus,
    ) -> Result<bool, StoreError>;

    /// Recurring Pending schedules with `scheduled_at <= cutoff`, the
    /// rollover candidate set.
    async fn due_recurring_schedules(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<ScheduledActivity>, StoreError>;

    /// Pending schedules with `scheduled_at` in `[from, to]`.
    async fn pending_schedules_due_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<ScheduledActivity>, StoreError>;

    /// Pending schedules with `scheduled_at` strictly before `cutoff`.
    async fn pending_schedules_due_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<ScheduledActivity>, StoreError>;

    // -----------------------------------------------------------------------
    // Invitations
    // -----------------------------------------------------------------------

    /// Pending invitations that have not expired as of `now`.
    async fn pending_invitations(&self, now: Timestamp)
        -> Result<Vec<FarmInvitation>, StoreError>;

    /// Delete Pending invitations created before `cutoff`. Returns the
    /// number deleted.
    async fn delete_stale_pending_invitations(
        &self,
        cutoff: Timestamp,
    ) -> Result<u64, StoreError>;

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    async fn insert_notification(
        &self,
        new: &NewNotification,
    ) -> Result<Notification, StoreError>;

    /// Fetch one notification scoped to its recipient.
    async fn notification(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, StoreError>;

    /// Insert a batch in one statement, returning the rows in input order.
    async fn insert_notifications(
        &self,
        batch: &[NewNotification],
    ) -> Result<Vec<Notification>, StoreError>;

    async fn list_notifications(
        &self,
        user_id: DbId,
        filter: NotificationFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError>;

    async fn unread_count(&self, user_id: DbId) -> Result<i64, StoreError>;

    /// Flip one notification to read. `None` when the row does not exist,
    /// belongs to someone else, or is already read.
    async fn mark_notification_read(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, StoreError>;

    /// Flip every unread notification of a user to read, returning the
    /// updated rows.
    async fn mark_all_notifications_read(
        &self,
        user_id: DbId,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Delete one notification. `None` when not found for this user.
    async fn delete_notification(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, StoreError>;

    /// Delete every notification of a user, returning the deleted rows.
    async fn delete_all_notifications(
        &self,
        user_id: DbId,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Dedup pre-check: does any notification already reference
    /// (`kind`, `related`)? Advisory, race-tolerant.
    async fn notification_exists_for_entity(
        &self,
        kind: NotificationKind,
        related: RelatedEntity,
    ) -> Result<bool, StoreError>;

    /// Dedup pre-check for invitation notifications, keyed on the farm and
    /// the resolved recipient rather than payload contents.
    async fn invitation_notification_exists(
        &self,
        farm_id: DbId,
        user_id: DbId,
    ) -> Result<bool, StoreError>;

    /// Retention cleanup: delete read notifications created before
    /// `cutoff`. Unread rows are never touched. Returns the number deleted.
    async fn delete_read_notifications_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<u64, StoreError>;

    // -----------------------------------------------------------------------
    // Delivery preferences
    // -----------------------------------------------------------------------

    /// Fetch a user's preferences, lazily creating the default row on first
    /// access.
    async fn get_or_create_preferences(
        &self,
        user_id: DbId,
    ) -> Result<DeliveryPreferences, StoreError>;

    /// Partial update; absent fields keep their stored values. Creates the
    /// default row first when the user has none.
    async fn update_preferences(
        &self,
        user_id: DbId,
        update: &UpdateDeliveryPreferences,
    ) -> Result<DeliveryPreferences, StoreError>;
}
