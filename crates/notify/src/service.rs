//! Notification creation and farm-wide fan-out.
//!
//! [`NotificationService`] owns the write path: every notification row goes
//! through [`create`](NotificationService::create) or
//! [`create_bulk`](NotificationService::create_bulk), which persist first
//! and then publish the matching [`FeedEvent`] on the hub. The per-kind
//! composers load the triggering entity's farm and animal context, render
//! localized text, resolve recipients, and delegate to bulk creation.

use std::sync::Arc;

use paddock_core::types::DbId;
use paddock_core::{NotificationKind, OverduePolicy, Priority, RelatedEntity};
use paddock_db::models::activity::Activity;
use paddock_db::models::farm::{Animal, Farm};
use paddock_db::models::invitation::FarmInvitation;
use paddock_db::models::notification::{NewNotification, Notification};
use paddock_db::models::scheduled_activity::ScheduledActivity;
use paddock_db::models::user::User;
use paddock_db::{Store, StoreError};
use paddock_events::{FeedEvent, NotificationHub};

use crate::config::EngineConfig;
use crate::locale::{self, Locale};
use crate::prefs::PreferencesResolver;

/// Rows per bulk insert statement. Also the synchronous fan-out bound:
/// farms are small, so fan-out stays in the request path and is chunked
/// rather than queued.
pub const FANOUT_CHUNK: usize = 100;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A context row the composer needs is gone (e.g. the animal was
    /// deleted between the scan and the composition).
    #[error("{entity} {id} not found")]
    MissingEntity { entity: &'static str, id: DbId },
}

// ---------------------------------------------------------------------------
// NotificationService
// ---------------------------------------------------------------------------

/// Everything loaded once per composed notification.
struct WorkContext {
    farm: Farm,
    animal: Animal,
    locale: Locale,
}

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn Store>,
    hub: Arc<NotificationHub>,
    prefs: PreferencesResolver,
    overdue_policy: OverduePolicy,
}

impl NotificationService {
    pub fn new(store: Arc<dyn Store>, hub: Arc<NotificationHub>, config: &EngineConfig) -> Self {
        let prefs = PreferencesResolver::new(store.clone());
        Self {
            store,
            hub,
            prefs,
            overdue_policy: config.overdue_policy,
        }
    }

    // -----------------------------------------------------------------------
    // Core write path
    // -----------------------------------------------------------------------

    /// Persist one notification and publish its insert event.
    pub async fn create(&self, new: NewNotification) -> Result<Notification, ServiceError> {
        let row = self.store.insert_notification(&new).await?;
        self.hub.publish(FeedEvent::insert(row.clone()));
        Ok(row)
    }

    /// Persist the same notification for every recipient, chunked into
    /// batched inserts, and publish one insert event per row.
    ///
    /// The template's `user_id` is ignored; each row carries one recipient.
    /// Returns the number of rows created.
    pub async fn create_bulk(
        &self,
        recipients: &[DbId],
        template: &NewNotification,
    ) -> Result<usize, ServiceError> {
        let mut created = 0;
        for chunk in recipients.chunks(FANOUT_CHUNK) {
            let batch: Vec<NewNotification> = chunk
                .iter()
                .map(|&user_id| template.for_recipient(user_id))
                .collect();
            let rows = self.store.insert_notifications(&batch).await?;
            created += rows.len();
            for row in rows {
                self.hub.publish(FeedEvent::insert(row));
            }
        }
        Ok(created)
    }

    /// Mark one notification read and publish the update.
    ///
    /// `None` when the row does not exist for this user or was already
    /// read; no event goes out in either case.
    pub async fn mark_read(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, ServiceError> {
        let updated = self.store.mark_notification_read(id, user_id).await?;
        if let Some(row) = &updated {
            self.hub.publish(FeedEvent::update(row.clone()));
        }
        Ok(updated)
    }

    /// Mark every unread notification of a user read, publishing one update
    /// per flipped row. Returns the number flipped.
    pub async fn mark_all_read(&self, user_id: DbId) -> Result<usize, ServiceError> {
        let rows = self.store.mark_all_notifications_read(user_id).await?;
        let count = rows.len();
        for row in rows {
            self.hub.publish(FeedEvent::update(row));
        }
        Ok(count)
    }

    /// Delete one notification and publish the deletion. `None` when the
    /// row does not exist for this user.
    pub async fn delete(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, ServiceError> {
        let deleted = self.store.delete_notification(id, user_id).await?;
        if let Some(row) = &deleted {
            self.hub.publish(FeedEvent::delete(row.clone()));
        }
        Ok(deleted)
    }

    /// Delete every notification of a user, publishing one deletion per
    /// removed row. Returns the number removed.
    pub async fn clear_all(&self, user_id: DbId) -> Result<usize, ServiceError> {
        let rows = self.store.delete_all_notifications(user_id).await?;
        let count = rows.len();
        for row in rows {
            self.hub.publish(FeedEvent::delete(row));
        }
        Ok(count)
    }

    /// The canonical "who gets notified about farm X": the owner plus every
    /// member, owner exactly once even when also listed as a member.
    pub async fn farm_recipients(&self, farm_id: DbId) -> Result<Vec<DbId>, ServiceError> {
        let farm = self.require_farm(farm_id).await?;
        self.recipient_ids(&farm).await
    }

    async fn recipient_ids(&self, farm: &Farm) -> Result<Vec<DbId>, ServiceError> {
        let mut recipients = vec![farm.owner_id];
        for user_id in self.store.farm_member_user_ids(farm.id).await? {
            if !recipients.contains(&user_id) {
                recipients.push(user_id);
            }
        }
        Ok(recipients)
    }

    /// Drop candidates whose preferences reject `kind`.
    async fn accepting(
        &self,
        candidates: Vec<DbId>,
        kind: NotificationKind,
    ) -> Result<Vec<DbId>, ServiceError> {
        let mut keep = Vec::with_capacity(candidates.len());
        for user_id in candidates {
            if self.prefs.should_notify(user_id, kind).await? {
                keep.push(user_id);
            }
        }
        Ok(keep)
    }

    // -----------------------------------------------------------------------
    // Context loading
    // -----------------------------------------------------------------------

    async fn require_farm(&self, farm_id: DbId) -> Result<Farm, ServiceError> {
        self.store
            .farm(farm_id)
            .await?
            .ok_or(ServiceError::MissingEntity {
                entity: "farm",
                id: farm_id,
            })
    }

    async fn require_user(&self, user_id: DbId) -> Result<User, ServiceError> {
        self.store
            .user(user_id)
            .await?
            .ok_or(ServiceError::MissingEntity {
                entity: "user",
                id: user_id,
            })
    }

    async fn animal_context(&self, animal_id: DbId) -> Result<WorkContext, ServiceError> {
        let animal = self
            .store
            .animal(animal_id)
            .await?
            .ok_or(ServiceError::MissingEntity {
                entity: "animal",
                id: animal_id,
            })?;
        let farm = self.require_farm(animal.farm_id).await?;
        let locale = Locale::from_tag(&farm.locale);
        Ok(WorkContext {
            farm,
            animal,
            locale,
        })
    }

    // -----------------------------------------------------------------------
    // Composers
    // -----------------------------------------------------------------------

    /// An activity is due within the reminder window.
    pub async fn notify_activity_reminder(
        &self,
        activity: &Activity,
    ) -> Result<usize, ServiceError> {
        let ctx = self.animal_context(activity.animal_id).await?;
        let text = locale::activity_reminder(ctx.locale, &activity.title, &ctx.animal.name);
        let recipients = self
            .accepting(
                self.recipient_ids(&ctx.farm).await?,
                NotificationKind::ActivityReminder,
            )
            .await?;
        let template = NewNotification {
            user_id: 0,
            farm_id: Some(ctx.farm.id),
            kind: NotificationKind::ActivityReminder,
            title: text.title,
            message: text.message,
            payload: serde_json::json!({
                "activity_id": activity.id,
                "animal_id": ctx.animal.id,
                "due_at": activity.scheduled_at,
            }),
            priority: Priority::Normal,
            related: Some(RelatedEntity::activity(activity.id)),
        };
        self.create_bulk(&recipients, &template).await
    }

    /// An activity sat past its due instant; priority escalates with age.
    pub async fn notify_activity_overdue(
        &self,
        activity: &Activity,
        days_overdue: i64,
    ) -> Result<usize, ServiceError> {
        let ctx = self.animal_context(activity.animal_id).await?;
        let text =
            locale::activity_overdue(ctx.locale, &activity.title, &ctx.animal.name, days_overdue);
        let recipients = self
            .accepting(
                self.recipient_ids(&ctx.farm).await?,
                NotificationKind::ActivityOverdue,
            )
            .await?;
        let template = NewNotification {
            user_id: 0,
            farm_id: Some(ctx.farm.id),
            kind: NotificationKind::ActivityOverdue,
            title: text.title,
            message: text.message,
            payload: serde_json::json!({
                "activity_id": activity.id,
                "animal_id": ctx.animal.id,
                "days_overdue": days_overdue,
            }),
            priority: self.overdue_policy.priority_for(days_overdue),
            related: Some(RelatedEntity::activity(activity.id)),
        };
        self.create_bulk(&recipients, &template).await
    }

    /// A planned schedule is due within the reminder window.
    pub async fn notify_schedule_reminder(
        &self,
        schedule: &ScheduledActivity,
    ) -> Result<usize, ServiceError> {
        let ctx = self.animal_context(schedule.animal_id).await?;
        let text = locale::schedule_reminder(ctx.locale, &schedule.title, &ctx.animal.name);
        let recipients = self
            .accepting(
                self.recipient_ids(&ctx.farm).await?,
                NotificationKind::ScheduleReminder,
            )
            .await?;
        let template = NewNotification {
            user_id: 0,
            farm_id: Some(ctx.farm.id),
            kind: NotificationKind::ScheduleReminder,
            title: text.title,
            message: text.message,
            payload: serde_json::json!({
                "scheduled_activity_id": schedule.id,
                "animal_id": ctx.animal.id,
                "due_at": schedule.scheduled_at,
            }),
            priority: Priority::Normal,
            related: Some(RelatedEntity::scheduled_activity(schedule.id)),
        };
        self.create_bulk(&recipients, &template).await
    }

    /// A planned schedule sat past its due instant without being resolved.
    pub async fn notify_schedule_overdue(
        &self,
        schedule: &ScheduledActivity,
        days_overdue: i64,
    ) -> Result<usize, ServiceError> {
        let ctx = self.animal_context(schedule.animal_id).await?;
        let text =
            locale::activity_overdue(ctx.locale, &schedule.title, &ctx.animal.name, days_overdue);
        let recipients = self
            .accepting(
                self.recipient_ids(&ctx.farm).await?,
                NotificationKind::ActivityOverdue,
            )
            .await?;
        let template = NewNotification {
            user_id: 0,
            farm_id: Some(ctx.farm.id),
            kind: NotificationKind::ActivityOverdue,
            title: text.title,
            message: text.message,
            payload: serde_json::json!({
                "scheduled_activity_id": schedule.id,
                "animal_id": ctx.animal.id,
                "days_overdue": days_overdue,
            }),
            priority: self.overdue_policy.priority_for(days_overdue),
            related: Some(RelatedEntity::scheduled_activity(schedule.id)),
        };
        self.create_bulk(&recipients, &template).await
    }

    /// A pending invitation whose phone resolved to a registered user.
    ///
    /// The invitation scan resolves the recipient and performs the
    /// duplicate check before calling this.
    pub async fn notify_farm_invitation(
        &self,
        invitation: &FarmInvitation,
        recipient: &User,
    ) -> Result<usize, ServiceError> {
        let farm = self.require_farm(invitation.farm_id).await?;
        let text = locale::farm_invitation(Locale::from_tag(&farm.locale), &farm.name);
        let recipients = self
            .accepting(vec![recipient.id], NotificationKind::FarmInvitation)
            .await?;
        let template = NewNotification {
            user_id: 0,
            farm_id: Some(farm.id),
            kind: NotificationKind::FarmInvitation,
            title: text.title,
            message: text.message,
            payload: serde_json::json!({
                "invitation_id": invitation.id,
                "farm_id": farm.id,
                "phone": invitation.phone,
            }),
            priority: Priority::High,
            related: Some(RelatedEntity::invitation(invitation.id)),
        };
        self.create_bulk(&recipients, &template).await
    }

    /// Someone accepted an invitation; tell the rest of the farm.
    pub async fn notify_member_joined(
        &self,
        farm_id: DbId,
        member_id: DbId,
    ) -> Result<usize, ServiceError> {
        let farm = self.require_farm(farm_id).await?;
        let member = self.require_user(member_id).await?;
        let text = locale::member_joined(
            Locale::from_tag(&farm.locale),
            &member.display_name,
            &farm.name,
        );
        let mut recipients = self.recipient_ids(&farm).await?;
        recipients.retain(|&id| id != member_id);
        let recipients = self
            .accepting(recipients, NotificationKind::MemberJoined)
            .await?;
        let template = NewNotification {
            user_id: 0,
            farm_id: Some(farm.id),
            kind: NotificationKind::MemberJoined,
            title: text.title,
            message: text.message,
            payload: serde_json::json!({
                "farm_id": farm.id,
                "member_id": member.id,
            }),
            priority: Priority::Normal,
            related: Some(RelatedEntity::farm(farm.id)),
        };
        self.create_bulk(&recipients, &template).await
    }

    /// A user completed an activity; everyone on the farm except the actor
    /// hears about it.
    pub async fn notify_activity_completed(
        &self,
        activity: &Activity,
        actor_id: DbId,
    ) -> Result<usize, ServiceError> {
        let ctx = self.animal_context(activity.animal_id).await?;
        let actor = self.require_user(actor_id).await?;
        let text = locale::activity_completed(
            ctx.locale,
            &actor.display_name,
            &activity.title,
            &ctx.animal.name,
        );
        let mut recipients = self.recipient_ids(&ctx.farm).await?;
        recipients.retain(|&id| id != actor_id);
        let recipients = self
            .accepting(recipients, NotificationKind::ActivityCompleted)
            .await?;
        let template = NewNotification {
            user_id: 0,
            farm_id: Some(ctx.farm.id),
            kind: NotificationKind::ActivityCompleted,
            title: text.title,
            message: text.message,
            payload: serde_json::json!({
                "activity_id": activity.id,
                "animal_id": ctx.animal.id,
                "actor_id": actor_id,
            }),
            priority: Priority::Normal,
            related: Some(RelatedEntity::activity(activity.id)),
        };
        self.create_bulk(&recipients, &template).await
    }

    /// A user logged a new activity; everyone on the farm except the actor
    /// hears about it.
    pub async fn notify_activity_created(
        &self,
        activity: &Activity,
        actor_id: DbId,
    ) -> Result<usize, ServiceError> {
        let ctx = self.animal_context(activity.animal_id).await?;
        let actor = self.require_user(actor_id).await?;
        let text = locale::activity_created(
            ctx.locale,
            &actor.display_name,
            &activity.title,
            &ctx.animal.name,
        );
        let mut recipients = self.recipient_ids(&ctx.farm).await?;
        recipients.retain(|&id| id != actor_id);
        let recipients = self
            .accepting(recipients, NotificationKind::ActivityCreated)
            .await?;
        let template = NewNotification {
            user_id: 0,
            farm_id: Some(ctx.farm.id),
            kind: NotificationKind::ActivityCreated,
            title: text.title,
            message: text.message,
            payload: serde_json::json!({
                "activity_id": activity.id,
                "animal_id": ctx.animal.id,
                "actor_id": actor_id,
            }),
            priority: Priority::Normal,
            related: Some(RelatedEntity::activity(activity.id)),
        };
        self.create_bulk(&recipients, &template).await
    }

    /// Administrative broadcast. Ignores preference opt-outs.
    pub async fn announce(
        &self,
        recipients: &[DbId],
        title: &str,
        message: &str,
    ) -> Result<usize, ServiceError> {
        let template = NewNotification {
            user_id: 0,
            farm_id: None,
            kind: NotificationKind::SystemAnnouncement,
            title: title.to_string(),
            message: message.to_string(),
            payload: serde_json::json!({}),
            priority: Priority::High,
            related: None,
        };
        self.create_bulk(recipients, &template).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use paddock_db::models::activity::NewActivity;
    use paddock_db::models::notification::NotificationFilter;
    use paddock_db::models::preferences::UpdateDeliveryPreferences;
    use paddock_db::MemoryStore;

    fn service(store: Arc<MemoryStore>) -> (NotificationService, Arc<NotificationHub>) {
        let hub = Arc::new(NotificationHub::default());
        let svc = NotificationService::new(store, hub.clone(), &EngineConfig::default());
        (svc, hub)
    }

    async fn seed_farm_with_members(
        store: &MemoryStore,
        member_count: usize,
    ) -> (DbId, DbId, Vec<DbId>) {
        let owner = store.seed_user("Owner", None, None).await;
        let farm = store.seed_farm("Hillside", owner.id, "en").await;
        let mut members = Vec::new();
        for i in 0..member_count {
            let user = store
                .seed_user(&format!("Member {i}"), None, None)
                .await;
            store.seed_member(farm.id, user.id).await;
            members.push(user.id);
        }
        (farm.id, owner.id, members)
    }

    #[tokio::test]
    async fn farm_recipients_contain_the_owner_exactly_once() {
        let store = Arc::new(MemoryStore::new());
        let (farm_id, owner_id, members) = seed_farm_with_members(&store, 2).await;
        // Owner is also listed as a member.
        store.seed_member(farm_id, owner_id).await;

        let (svc, _) = service(store);
        let recipients = svc.farm_recipients(farm_id).await.unwrap();

        assert_eq!(
            recipients.iter().filter(|&&id| id == owner_id).count(),
            1
        );
        assert_eq!(recipients.len(), 1 + members.len());
    }

    #[tokio::test]
    async fn create_persists_then_publishes() {
        let store = Arc::new(MemoryStore::new());
        let user = store.seed_user("Solo", None, None).await;
        let (svc, hub) = service(store.clone());
        let mut rx = hub.subscribe();

        let row = svc
            .create(NewNotification {
                user_id: user.id,
                farm_id: None,
                kind: NotificationKind::SystemAnnouncement,
                title: "Maintenance tonight".to_string(),
                message: "Expect a short outage".to_string(),
                payload: serde_json::json!({}),
                priority: Priority::High,
                related: None,
            })
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.action, paddock_events::FeedAction::Insert);
        assert_eq!(event.record.id, row.id);
        assert_eq!(store.unread_count(user.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mark_read_publishes_update_once() {
        let store = Arc::new(MemoryStore::new());
        let user = store.seed_user("Reader", None, None).await;
        let (svc, hub) = service(store.clone());
        let row = svc
            .create(NewNotification {
                user_id: user.id,
                farm_id: None,
                kind: NotificationKind::SystemAnnouncement,
                title: "Ping".to_string(),
                message: "Pong".to_string(),
                payload: serde_json::json!({}),
                priority: Priority::Normal,
                related: None,
            })
            .await
            .unwrap();

        let mut rx = hub.subscribe();
        let updated = svc.mark_read(row.id, user.id).await.unwrap();
        assert!(updated.is_some_and(|n| n.is_read));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.action, paddock_events::FeedAction::Update);
        assert!(event.record.is_read);

        // Second flip is a no-op with no event.
        let again = svc.mark_read(row.id, user.id).await.unwrap();
        assert!(again.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn clear_all_publishes_a_deletion_per_row() {
        let store = Arc::new(MemoryStore::new());
        let user = store.seed_user("Leaver", None, None).await;
        let (svc, hub) = service(store.clone());
        svc.announce(&[user.id], "One", "First").await.unwrap();
        svc.announce(&[user.id], "Two", "Second").await.unwrap();

        let mut rx = hub.subscribe();
        let removed = svc.clear_all(user.id).await.unwrap();
        assert_eq!(removed, 2);

        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.action, paddock_events::FeedAction::Delete);
        }
        assert_eq!(store.unread_count(user.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn member_joined_excludes_the_new_member() {
        let store = Arc::new(MemoryStore::new());
        let (farm_id, owner_id, members) = seed_farm_with_members(&store, 2).await;
        let joiner = members[0];

        let (svc, _) = service(store.clone());
        let created = svc.notify_member_joined(farm_id, joiner).await.unwrap();

        // Owner and the other member, never the joiner.
        assert_eq!(created, 2);
        assert_eq!(store.unread_count(joiner).await.unwrap(), 0);
        assert_eq!(store.unread_count(owner_id).await.unwrap(), 1);
        assert_eq!(store.unread_count(members[1]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn category_opt_out_removes_a_recipient() {
        let store = Arc::new(MemoryStore::new());
        let (farm_id, _owner_id, members) = seed_farm_with_members(&store, 2).await;
        store
            .update_preferences(
                members[1],
                &UpdateDeliveryPreferences {
                    member_joined: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let (svc, _) = service(store.clone());
        let created = svc.notify_member_joined(farm_id, members[0]).await.unwrap();

        assert_eq!(created, 1);
        assert_eq!(store.unread_count(members[1]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn overdue_composer_escalates_priority_with_age() {
        let store = Arc::new(MemoryStore::new());
        let (farm_id, owner_id, _) = seed_farm_with_members(&store, 0).await;
        let animal = store.seed_animal(farm_id, "Daisy").await;
        let activity = store
            .seed_activity(NewActivity {
                animal_id: animal.id,
                kind: "medical".to_string(),
                title: "Worming".to_string(),
                notes: None,
                scheduled_at: Utc::now() - Duration::days(10),
                created_by: None,
            })
            .await;

        let (svc, _) = service(store.clone());
        svc.notify_activity_overdue(&activity, 10).await.unwrap();

        let rows = store
            .list_notifications(owner_id, NotificationFilter::default(), 50, 0)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].priority, Priority::Urgent);
        assert_eq!(rows[0].kind, NotificationKind::ActivityOverdue);
        assert_eq!(rows[0].payload["days_overdue"], 10);
    }

    #[tokio::test]
    async fn announcement_ignores_opt_outs() {
        let store = Arc::new(MemoryStore::new());
        let user = store.seed_user("Quiet", None, None).await;
        store
            .update_preferences(
                user.id,
                &UpdateDeliveryPreferences {
                    activity_reminders: Some(false),
                    overdue_alerts: Some(false),
                    farm_invitations: Some(false),
                    member_joined: Some(false),
                    new_activity: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let (svc, _) = service(store.clone());
        let created = svc
            .announce(&[user.id], "Scheduled maintenance", "Back at 06:00 UTC")
            .await
            .unwrap();

        assert_eq!(created, 1);
        assert_eq!(store.unread_count(user.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn bulk_fanout_writes_identical_content_per_recipient() {
        let store = Arc::new(MemoryStore::new());
        let (farm_id, owner_id, members) = seed_farm_with_members(&store, 3).await;
        let animal = store.seed_animal(farm_id, "Bella").await;
        let activity = store
            .seed_activity(NewActivity {
                animal_id: animal.id,
                kind: "feeding".to_string(),
                title: "Evening feed".to_string(),
                notes: None,
                scheduled_at: Utc::now() + Duration::hours(2),
                created_by: None,
            })
            .await;

        let (svc, _) = service(store.clone());
        let created = svc.notify_activity_reminder(&activity).await.unwrap();
        assert_eq!(created, 4);

        let owner_rows = store
            .list_notifications(owner_id, NotificationFilter::default(), 50, 0)
            .await
            .unwrap();
        let member_rows = store
            .list_notifications(members[2], NotificationFilter::default(), 50, 0)
            .await
            .unwrap();
        assert_eq!(owner_rows[0].title, member_rows[0].title);
        assert_eq!(owner_rows[0].message, member_rows[0].message);
        assert_eq!(
            owner_rows[0].message,
            "\"Evening feed\" for Bella is due soon."
        );
    }

    #[tokio::test]
    async fn missing_animal_surfaces_as_missing_entity() {
        let store = Arc::new(MemoryStore::new());
        let (svc, _) = service(store.clone());
        let activity = Activity {
            id: 1,
            animal_id: 999,
            kind: "feeding".to_string(),
            title: "Feed".to_string(),
            notes: None,
            scheduled_at: Utc::now(),
            status: paddock_core::WorkStatus::Pending,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let err = svc.notify_activity_reminder(&activity).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::MissingEntity {
                entity: "animal",
                id: 999
            }
        ));
    }
}
