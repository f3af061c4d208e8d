//! PostgreSQL implementation of [`Store`].

use async_trait::async_trait;
use sqlx::PgPool;

use paddock_core::types::{DbId, Timestamp};
use paddock_core::{NotificationKind, RelatedEntity, WorkStatus};

use crate::error::StoreError;
use crate::models::activity::Activity;
use crate::models::farm::{Animal, Farm};
use crate::models::invitation::{FarmInvitation, InvitationStatus};
use crate::models::notification::{NewNotification, Notification, NotificationFilter};
use crate::models::preferences::{DeliveryPreferences, UpdateDeliveryPreferences};
use crate::models::scheduled_activity::{NewScheduledActivity, ScheduledActivity};
use crate::models::user::User;
use crate::store::Store;

/// Column list for `users` queries.
const USER_COLUMNS: &str = "id, display_name, phone, email, is_active, created_at";

/// Column list for `farms` queries.
const FARM_COLUMNS: &str = "id, name, owner_id, locale, created_at";

/// Column list for `animals` queries.
const ANIMAL_COLUMNS: &str = "id, farm_id, name, created_at";

/// Column list for `activities` queries.
const ACTIVITY_COLUMNS: &str =
    "id, animal_id, kind, title, notes, scheduled_at, status, created_by, created_at, updated_at";

/// Column list for `scheduled_activities` queries.
const SCHEDULE_COLUMNS: &str = "id, animal_id, title, notes, scheduled_at, status, is_recurring, \
    recurrence_rule, created_by, created_at, updated_at";

/// Column list for `farm_invitations` queries.
const INVITATION_COLUMNS: &str = "id, farm_id, phone, invited_by, status, expires_at, created_at";

/// Column list for `notifications` queries.
const NOTIFICATION_COLUMNS: &str = "id, user_id, farm_id, kind, title, message, payload, \
    priority, related_entity_type, related_entity_id, is_read, read_at, created_at";

/// Column list for `delivery_preferences` queries.
const PREFERENCE_COLUMNS: &str = "id, user_id, activity_reminders, overdue_alerts, \
    farm_invitations, member_joined, new_activity, push_enabled, email_enabled, \
    reminder_lead_minutes, quiet_start, quiet_end, created_at, updated_at";

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    // -----------------------------------------------------------------------
    // Health
    // -----------------------------------------------------------------------

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Users, farms, animals
    // -----------------------------------------------------------------------

    async fn user(&self, id: DbId) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn user_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE phone = $1 AND is_active = true");
        let row = sqlx::query_as::<_, User>(&query)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn farm(&self, id: DbId) -> Result<Option<Farm>, StoreError> {
        let query = format!("SELECT {FARM_COLUMNS} FROM farms WHERE id = $1");
        let row = sqlx::query_as::<_, Farm>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn farm_member_user_ids(&self, farm_id: DbId) -> Result<Vec<DbId>, StoreError> {
        let ids = sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM farm_members WHERE farm_id = $1 ORDER BY id",
        )
        .bind(farm_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn animal(&self, id: DbId) -> Result<Option<Animal>, StoreError> {
        let query = format!("SELECT {ANIMAL_COLUMNS} FROM animals WHERE id = $1");
        let row = sqlx::query_as::<_, Animal>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    // -----------------------------------------------------------------------
    // Activities
    // -----------------------------------------------------------------------

    async fn activity(&self, id: DbId) -> Result<Option<Activity>, StoreError> {
        let query = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = $1");
        let row = sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn pending_activities_due_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Activity>, StoreError> {
        let query = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities \
             WHERE status = $1 AND scheduled_at >= $2 AND scheduled_at <= $3 \
             ORDER BY scheduled_at"
        );
        let rows = sqlx::query_as::<_, Activity>(&query)
            .bind(WorkStatus::Pending)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn pending_activities_due_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<Activity>, StoreError> {
        let query = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities \
             WHERE status = $1 AND scheduled_at < $2 \
             ORDER BY scheduled_at"
        );
        let rows = sqlx::query_as::<_, Activity>(&query)
            .bind(WorkStatus::Pending)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Scheduled activities
    // -----------------------------------------------------------------------

    async fn scheduled_activity(&self, id: DbId) -> Result<Option<ScheduledActivity>, StoreError> {
        let query = format!("SELECT {SCHEDULE_COLUMNS} FROM scheduled_activities WHERE id = $1");
        let row = sqlx::query_as::<_, ScheduledActivity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_scheduled_activity(
        &self,
        new: &NewScheduledActivity,
    ) -> Result<ScheduledActivity, StoreError> {
        let query = format!(
            "INSERT INTO scheduled_activities \
                (animal_id, title, notes, scheduled_at, status, is_recurring, \
                 recurrence_rule, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {SCHEDULE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ScheduledActivity>(&query)
            .bind(new.animal_id)
            .bind(&new.title)
            .bind(&new.notes)
            .bind(new.scheduled_at)
            .bind(WorkStatus::Pending)
            .bind(new.is_recurring)
            .bind(new.recurrence_rule)
            .bind(new.created_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_scheduled_activity_status(
        &self,
        id: DbId,
        status: WorkStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE scheduled_activities SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn due_recurring_schedules(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<ScheduledActivity>, StoreError> {
        let query = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM scheduled_activities \
             WHERE status = $1 AND is_recurring = true AND scheduled_at <= $2 \
             ORDER BY scheduled_at"
        );
        let rows = sqlx::query_as::<_, ScheduledActivity>(&query)
            .bind(WorkStatus::Pending)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn pending_schedules_due_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<ScheduledActivity>, StoreError> {
        let query = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM scheduled_activities \
             WHERE status = $1 AND scheduled_at >= $2 AND scheduled_at <= $3 \
             ORDER BY scheduled_at"
        );
        let rows = sqlx::query_as::<_, ScheduledActivity>(&query)
            .bind(WorkStatus::Pending)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn pending_schedules_due_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<ScheduledActivity>, StoreError> {
        let query = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM scheduled_activities \
             WHERE status = $1 AND scheduled_at < $2 \
             ORDER BY scheduled_at"
        );
        let rows = sqlx::query_as::<_, ScheduledActivity>(&query)
            .bind(WorkStatus::Pending)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Invitations
    // -----------------------------------------------------------------------

    async fn pending_invitations(
        &self,
        now: Timestamp,
    ) -> Result<Vec<FarmInvitation>, StoreError> {
        let query = format!(
            "SELECT {INVITATION_COLUMNS} FROM farm_invitations \
             WHERE status = $1 AND (expires_at IS NULL OR expires_at > $2) \
             ORDER BY created_at"
        );
        let rows = sqlx::query_as::<_, FarmInvitation>(&query)
            .bind(InvitationStatus::Pending)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete_stale_pending_invitations(
        &self,
        cutoff: Timestamp,
    ) -> Result<u64, StoreError> {
        let result =
            sqlx::query("DELETE FROM farm_invitations WHERE status = $1 AND created_at < $2")
                .bind(InvitationStatus::Pending)
                .bind(cutoff)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    async fn insert_notification(
        &self,
        new: &NewNotification,
    ) -> Result<Notification, StoreError> {
        let query = format!(
            "INSERT INTO notifications \
                (user_id, farm_id, kind, title, message, payload, priority, \
                 related_entity_type, related_entity_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Notification>(&query)
            .bind(new.user_id)
            .bind(new.farm_id)
            .bind(new.kind)
            .bind(&new.title)
            .bind(&new.message)
            .bind(&new.payload)
            .bind(new.priority)
            .bind(new.related.map(|r| r.kind))
            .bind(new.related.map(|r| r.id))
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn notification(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, StoreError> {
        let query =
            format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_notifications(
        &self,
        batch: &[NewNotification],
    ) -> Result<Vec<Notification>, StoreError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        // One multi-row VALUES statement; 9 binds per row.
        let placeholders: Vec<String> = (0..batch.len())
            .map(|i| {
                let base = i * 9;
                format!(
                    "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
                    base + 1,
                    base + 2,
                    base + 3,
                    base + 4,
                    base + 5,
                    base + 6,
                    base + 7,
                    base + 8,
                    base + 9,
                )
            })
            .collect();
        let query = format!(
            "INSERT INTO notifications \
                (user_id, farm_id, kind, title, message, payload, priority, \
                 related_entity_type, related_entity_id) \
             VALUES {} \
             RETURNING {NOTIFICATION_COLUMNS}",
            placeholders.join(", ")
        );

        let mut q = sqlx::query_as::<_, Notification>(&query);
        for new in batch {
            q = q
                .bind(new.user_id)
                .bind(new.farm_id)
                .bind(new.kind)
                .bind(&new.title)
                .bind(&new.message)
                .bind(&new.payload)
                .bind(new.priority)
                .bind(new.related.map(|r| r.kind))
                .bind(new.related.map(|r| r.id));
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn list_notifications(
        &self,
        user_id: DbId,
        filter: NotificationFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        let unread = if filter.unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let kind = if filter.kind.is_some() {
            "AND kind = $4"
        } else {
            ""
        };
        let query = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE user_id = $1 {unread} {kind} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        let mut q = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset);
        if let Some(kind) = filter.kind {
            q = q.bind(kind);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn unread_count(&self, user_id: DbId) -> Result<i64, StoreError> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    async fn mark_notification_read(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, StoreError> {
        let query = format!(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND is_read = false \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn mark_all_notifications_read(
        &self,
        user_id: DbId,
    ) -> Result<Vec<Notification>, StoreError> {
        let query = format!(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE user_id = $1 AND is_read = false \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let rows = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete_notification(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, StoreError> {
        let query = format!(
            "DELETE FROM notifications WHERE id = $1 AND user_id = $2 \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_all_notifications(
        &self,
        user_id: DbId,
    ) -> Result<Vec<Notification>, StoreError> {
        let query = format!(
            "DELETE FROM notifications WHERE user_id = $1 RETURNING {NOTIFICATION_COLUMNS}"
        );
        let rows = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn notification_exists_for_entity(
        &self,
        kind: NotificationKind,
        related: RelatedEntity,
    ) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS( \
                SELECT 1 FROM notifications \
                WHERE kind = $1 AND related_entity_type = $2 AND related_entity_id = $3)",
        )
        .bind(kind)
        .bind(related.kind)
        .bind(related.id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn invitation_notification_exists(
        &self,
        farm_id: DbId,
        user_id: DbId,
    ) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS( \
                SELECT 1 FROM notifications \
                WHERE kind = $1 AND farm_id = $2 AND user_id = $3)",
        )
        .bind(NotificationKind::FarmInvitation)
        .bind(farm_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn delete_read_notifications_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<u64, StoreError> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE is_read = true AND created_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Delivery preferences
    // -----------------------------------------------------------------------

    async fn get_or_create_preferences(
        &self,
        user_id: DbId,
    ) -> Result<DeliveryPreferences, StoreError> {
        // The no-op DO UPDATE makes RETURNING yield the existing row.
        let query = format!(
            "INSERT INTO delivery_preferences (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id \
             RETURNING {PREFERENCE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DeliveryPreferences>(&query)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_preferences(
        &self,
        user_id: DbId,
        update: &UpdateDeliveryPreferences,
    ) -> Result<DeliveryPreferences, StoreError> {
        let query = format!(
            "INSERT INTO delivery_preferences \
                (user_id, activity_reminders, overdue_alerts, farm_invitations, \
                 member_joined, new_activity, push_enabled, email_enabled, \
                 reminder_lead_minutes, quiet_start, quiet_end) \
             VALUES ($1, COALESCE($2, true), COALESCE($3, true), COALESCE($4, true), \
                     COALESCE($5, true), COALESCE($6, true), COALESCE($7, false), \
                     COALESCE($8, false), COALESCE($9, 1440), $10, $11) \
             ON CONFLICT (user_id) DO UPDATE SET \
                activity_reminders = COALESCE($2, delivery_preferences.activity_reminders), \
                overdue_alerts = COALESCE($3, delivery_preferences.overdue_alerts), \
                farm_invitations = COALESCE($4, delivery_preferences.farm_invitations), \
                member_joined = COALESCE($5, delivery_preferences.member_joined), \
                new_activity = COALESCE($6, delivery_preferences.new_activity), \
                push_enabled = COALESCE($7, delivery_preferences.push_enabled), \
                email_enabled = COALESCE($8, delivery_preferences.email_enabled), \
                reminder_lead_minutes = COALESCE($9, delivery_preferences.reminder_lead_minutes), \
                quiet_start = COALESCE($10, delivery_preferences.quiet_start), \
                quiet_end = COALESCE($11, delivery_preferences.quiet_end), \
                updated_at = NOW() \
             RETURNING {PREFERENCE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DeliveryPreferences>(&query)
            .bind(user_id)
            .bind(update.activity_reminders)
            .bind(update.overdue_alerts)
            .bind(update.farm_invitations)
            .bind(update.member_joined)
            .bind(update.new_activity)
            .bind(update.push_enabled)
            .bind(update.email_enabled)
            .bind(update.reminder_lead_minutes)
            .bind(update.quiet_start)
            .bind(update.quiet_end)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }
}
