//! In-memory implementation of [`Store`] for tests.
//!
//! Mirrors the PostgreSQL implementation's observable behavior (ordering,
//! read-flip semantics, lazy preference defaults) over plain maps guarded
//! by a [`tokio::sync::RwLock`]. Seed helpers cover the tables the engine
//! only reads in production; they are inherent methods, invisible behind
//! `Arc<dyn Store>`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use paddock_core::types::{DbId, Timestamp};
use paddock_core::{NotificationKind, RelatedEntity, WorkStatus};

use crate::error::StoreError;
use crate::models::activity::{Activity, NewActivity};
use crate::models::farm::{Animal, Farm, FarmMember};
use crate::models::invitation::{FarmInvitation, InvitationStatus};
use crate::models::notification::{NewNotification, Notification, NotificationFilter};
use crate::models::preferences::{
    DeliveryPreferences, UpdateDeliveryPreferences, DEFAULT_REMINDER_LEAD_MINUTES,
};
use crate::models::scheduled_activity::{NewScheduledActivity, ScheduledActivity};
use crate::models::user::User;
use crate::store::Store;

#[derive(Default)]
struct Inner {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    farms: BTreeMap<DbId, Farm>,
    members: Vec<FarmMember>,
    animals: BTreeMap<DbId, Animal>,
    activities: BTreeMap<DbId, Activity>,
    schedules: BTreeMap<DbId, ScheduledActivity>,
    invitations: BTreeMap<DbId, FarmInvitation>,
    notifications: Vec<Notification>,
    preferences: BTreeMap<DbId, DeliveryPreferences>,
}

impl Inner {
    fn alloc_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn default_preferences(&mut self, user_id: DbId) -> DeliveryPreferences {
        let now = Utc::now();
        DeliveryPreferences {
            id: self.alloc_id(),
            user_id,
            activity_reminders: true,
            overdue_alerts: true,
            farm_invitations: true,
            member_joined: true,
            new_activity: true,
            push_enabled: false,
            email_enabled: false,
            reminder_lead_minutes: DEFAULT_REMINDER_LEAD_MINUTES,
            quiet_start: None,
            quiet_end: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Map-backed store for engine and API tests. No database required.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Seed helpers (test setup for tables the engine only reads)
    // -----------------------------------------------------------------------

    pub async fn seed_user(
        &self,
        display_name: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> User {
        let mut inner = self.inner.write().await;
        let user = User {
            id: inner.alloc_id(),
            display_name: display_name.to_string(),
            phone: phone.map(str::to_string),
            email: email.map(str::to_string),
            is_active: true,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        user
    }

    pub async fn seed_farm(&self, name: &str, owner_id: DbId, locale: &str) -> Farm {
        let mut inner = self.inner.write().await;
        let farm = Farm {
            id: inner.alloc_id(),
            name: name.to_string(),
            owner_id,
            locale: locale.to_string(),
            created_at: Utc::now(),
        };
        inner.farms.insert(farm.id, farm.clone());
        farm
    }

    pub async fn seed_member(&self, farm_id: DbId, user_id: DbId) -> FarmMember {
        let mut inner = self.inner.write().await;
        let member = FarmMember {
            id: inner.alloc_id(),
            farm_id,
            user_id,
            role: "MEMBER".to_string(),
            created_at: Utc::now(),
        };
        inner.members.push(member.clone());
        member
    }

    pub async fn seed_animal(&self, farm_id: DbId, name: &str) -> Animal {
        let mut inner = self.inner.write().await;
        let animal = Animal {
            id: inner.alloc_id(),
            farm_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        inner.animals.insert(animal.id, animal.clone());
        animal
    }

    pub async fn seed_activity(&self, new: NewActivity) -> Activity {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let activity = Activity {
            id: inner.alloc_id(),
            animal_id: new.animal_id,
            kind: new.kind,
            title: new.title,
            notes: new.notes,
            scheduled_at: new.scheduled_at,
            status: WorkStatus::Pending,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        inner.activities.insert(activity.id, activity.clone());
        activity
    }

    pub async fn set_activity_status(&self, id: DbId, status: WorkStatus) -> bool {
        let mut inner = self.inner.write().await;
        match inner.activities.get_mut(&id) {
            Some(activity) => {
                activity.status = status;
                activity.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    pub async fn seed_invitation(
        &self,
        farm_id: DbId,
        phone: &str,
        expires_at: Option<Timestamp>,
    ) -> FarmInvitation {
        let mut inner = self.inner.write().await;
        let invitation = FarmInvitation {
            id: inner.alloc_id(),
            farm_id,
            phone: phone.to_string(),
            invited_by: None,
            status: InvitationStatus::Pending,
            expires_at,
            created_at: Utc::now(),
        };
        inner.invitations.insert(invitation.id, invitation.clone());
        invitation
    }

    /// Rewrite an invitation's creation instant so stale-age cleanup can be
    /// exercised without waiting.
    pub async fn backdate_invitation(&self, id: DbId, created_at: Timestamp) -> bool {
        let mut inner = self.inner.write().await;
        match inner.invitations.get_mut(&id) {
            Some(invitation) => {
                invitation.created_at = created_at;
                true
            }
            None => false,
        }
    }

    /// Rewrite a notification's creation instant so retention cleanup can be
    /// exercised without waiting.
    pub async fn backdate_notification(&self, id: DbId, created_at: Timestamp) -> bool {
        let mut inner = self.inner.write().await;
        match inner.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.created_at = created_at;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    // -----------------------------------------------------------------------
    // Health
    // -----------------------------------------------------------------------

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Users, farms, animals
    // -----------------------------------------------------------------------

    async fn user(&self, id: DbId) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn user_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.is_active && u.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn farm(&self, id: DbId) -> Result<Option<Farm>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.farms.get(&id).cloned())
    }

    async fn farm_member_user_ids(&self, farm_id: DbId) -> Result<Vec<DbId>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .members
            .iter()
            .filter(|m| m.farm_id == farm_id)
            .map(|m| m.user_id)
            .collect())
    }

    async fn animal(&self, id: DbId) -> Result<Option<Animal>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.animals.get(&id).cloned())
    }

    // -----------------------------------------------------------------------
    // Activities
    // -----------------------------------------------------------------------

    async fn activity(&self, id: DbId) -> Result<Option<Activity>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.activities.get(&id).cloned())
    }

    async fn pending_activities_due_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Activity>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Activity> = inner
            .activities
            .values()
            .filter(|a| {
                a.status == WorkStatus::Pending && a.scheduled_at >= from && a.scheduled_at <= to
            })
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.scheduled_at);
        Ok(rows)
    }

    async fn pending_activities_due_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<Activity>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Activity> = inner
            .activities
            .values()
            .filter(|a| a.status == WorkStatus::Pending && a.scheduled_at < cutoff)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.scheduled_at);
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Scheduled activities
    // -----------------------------------------------------------------------

    async fn scheduled_activity(&self, id: DbId) -> Result<Option<ScheduledActivity>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.schedules.get(&id).cloned())
    }

    async fn insert_scheduled_activity(
        &self,
        new: &NewScheduledActivity,
    ) -> Result<ScheduledActivity, StoreError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let schedule = ScheduledActivity {
            id: inner.alloc_id(),
            animal_id: new.animal_id,
            title: new.title.clone(),
            notes: new.notes.clone(),
            scheduled_at: new.scheduled_at,
            status: WorkStatus::Pending,
            is_recurring: new.is_recurring,
            recurrence_rule: new.recurrence_rule,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        inner.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn set_scheduled_activity_status(
        &self,
        id: DbId,
        status: WorkStatus,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.schedules.get_mut(&id) {
            Some(schedule) => {
                schedule.status = status;
                schedule.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn due_recurring_schedules(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<ScheduledActivity>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<ScheduledActivity> = inner
            .schedules
            .values()
            .filter(|s| {
                s.status == WorkStatus::Pending && s.is_recurring && s.scheduled_at <= cutoff
            })
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.scheduled_at);
        Ok(rows)
    }

    async fn pending_schedules_due_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<ScheduledActivity>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<ScheduledActivity> = inner
            .schedules
            .values()
            .filter(|s| {
                s.status == WorkStatus::Pending && s.scheduled_at >= from && s.scheduled_at <= to
            })
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.scheduled_at);
        Ok(rows)
    }

    async fn pending_schedules_due_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<ScheduledActivity>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<ScheduledActivity> = inner
            .schedules
            .values()
            .filter(|s| s.status == WorkStatus::Pending && s.scheduled_at < cutoff)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.scheduled_at);
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Invitations
    // -----------------------------------------------------------------------

    async fn pending_invitations(
        &self,
        now: Timestamp,
    ) -> Result<Vec<FarmInvitation>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<FarmInvitation> = inner
            .invitations
            .values()
            .filter(|i| i.status == InvitationStatus::Pending && !i.is_expired(now))
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.created_at);
        Ok(rows)
    }

    async fn delete_stale_pending_invitations(
        &self,
        cutoff: Timestamp,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let stale: Vec<DbId> = inner
            .invitations
            .values()
            .filter(|i| i.status == InvitationStatus::Pending && i.created_at < cutoff)
            .map(|i| i.id)
            .collect();
        for id in &stale {
            inner.invitations.remove(id);
        }
        Ok(stale.len() as u64)
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    async fn insert_notification(
        &self,
        new: &NewNotification,
    ) -> Result<Notification, StoreError> {
        let mut inner = self.inner.write().await;
        let row = materialize(&mut inner, new);
        inner.notifications.push(row.clone());
        Ok(row)
    }

    async fn notification(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .notifications
            .iter()
            .find(|n| n.id == id && n.user_id == user_id)
            .cloned())
    }

    async fn insert_notifications(
        &self,
        batch: &[NewNotification],
    ) -> Result<Vec<Notification>, StoreError> {
        let mut inner = self.inner.write().await;
        let mut rows = Vec::with_capacity(batch.len());
        for new in batch {
            let row = materialize(&mut inner, new);
            inner.notifications.push(row.clone());
            rows.push(row);
        }
        Ok(rows)
    }

    async fn list_notifications(
        &self,
        user_id: DbId,
        filter: NotificationFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Notification> = inner
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .filter(|n| !filter.unread_only || !n.is_read)
            .filter(|n| filter.kind.is_none_or(|k| n.kind == k))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn unread_count(&self, user_id: DbId) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as i64)
    }

    async fn mark_notification_read(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id && !n.is_read)
        {
            Some(notification) => {
                notification.is_read = true;
                notification.read_at = Some(Utc::now());
                Ok(Some(notification.clone()))
            }
            None => Ok(None),
        }
    }

    async fn mark_all_notifications_read(
        &self,
        user_id: DbId,
    ) -> Result<Vec<Notification>, StoreError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let mut updated = Vec::new();
        for notification in inner
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            notification.read_at = Some(now);
            updated.push(notification.clone());
        }
        Ok(updated)
    }

    async fn delete_notification(
        &self,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner
            .notifications
            .iter()
            .position(|n| n.id == id && n.user_id == user_id)
        {
            Some(index) => Ok(Some(inner.notifications.remove(index))),
            None => Ok(None),
        }
    }

    async fn delete_all_notifications(
        &self,
        user_id: DbId,
    ) -> Result<Vec<Notification>, StoreError> {
        let mut inner = self.inner.write().await;
        let (deleted, kept): (Vec<Notification>, Vec<Notification>) = inner
            .notifications
            .drain(..)
            .partition(|n| n.user_id == user_id);
        inner.notifications = kept;
        Ok(deleted)
    }

    async fn notification_exists_for_entity(
        &self,
        kind: NotificationKind,
        related: RelatedEntity,
    ) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .notifications
            .iter()
            .any(|n| n.kind == kind && n.related() == Some(related)))
    }

    async fn invitation_notification_exists(
        &self,
        farm_id: DbId,
        user_id: DbId,
    ) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.notifications.iter().any(|n| {
            n.kind == NotificationKind::FarmInvitation
                && n.farm_id == Some(farm_id)
                && n.user_id == user_id
        }))
    }

    async fn delete_read_notifications_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.notifications.len();
        inner
            .notifications
            .retain(|n| !(n.is_read && n.created_at < cutoff));
        Ok((before - inner.notifications.len()) as u64)
    }

    // -----------------------------------------------------------------------
    // Delivery preferences
    // -----------------------------------------------------------------------

    async fn get_or_create_preferences(
        &self,
        user_id: DbId,
    ) -> Result<DeliveryPreferences, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(prefs) = inner.preferences.get(&user_id) {
            return Ok(prefs.clone());
        }
        let prefs = inner.default_preferences(user_id);
        inner.preferences.insert(user_id, prefs.clone());
        Ok(prefs)
    }

    async fn update_preferences(
        &self,
        user_id: DbId,
        update: &UpdateDeliveryPreferences,
    ) -> Result<DeliveryPreferences, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.preferences.contains_key(&user_id) {
            let defaults = inner.default_preferences(user_id);
            inner.preferences.insert(user_id, defaults);
        }
        let prefs = inner
            .preferences
            .get_mut(&user_id)
            .ok_or(StoreError::NotFound)?;
        if let Some(v) = update.activity_reminders {
            prefs.activity_reminders = v;
        }
        if let Some(v) = update.overdue_alerts {
            prefs.overdue_alerts = v;
        }
        if let Some(v) = update.farm_invitations {
            prefs.farm_invitations = v;
        }
        if let Some(v) = update.member_joined {
            prefs.member_joined = v;
        }
        if let Some(v) = update.new_activity {
            prefs.new_activity = v;
        }
        if let Some(v) = update.push_enabled {
            prefs.push_enabled = v;
        }
        if let Some(v) = update.email_enabled {
            prefs.email_enabled = v;
        }
        if let Some(v) = update.reminder_lead_minutes {
            prefs.reminder_lead_minutes = v;
        }
        if let Some(v) = update.quiet_start {
            prefs.quiet_start = Some(v);
        }
        if let Some(v) = update.quiet_end {
            prefs.quiet_end = Some(v);
        }
        prefs.updated_at = Utc::now();
        Ok(prefs.clone())
    }
}

/// Build a stored row from a create DTO, allocating an id.
fn materialize(inner: &mut Inner, new: &NewNotification) -> Notification {
    Notification {
        id: inner.alloc_id(),
        user_id: new.user_id,
        farm_id: new.farm_id,
        kind: new.kind,
        title: new.title.clone(),
        message: new.message.clone(),
        payload: new.payload.clone(),
        priority: new.priority,
        related_entity_type: new.related.map(|r| r.kind),
        related_entity_id: new.related.map(|r| r.id),
        is_read: false,
        read_at: None,
        created_at: Utc::now(),
    }
}
