//! Scheduled scans that turn due work into notifications.
//!
//! Each scan walks one table, skips entities that already have a matching
//! notification, and hands the rest to [`NotificationService`]. A failure on
//! one entity is logged and recorded, never aborting the rest of the scan:
//!
//! - [`reminder_scan`](Triggers::reminder_scan) covers work due within the
//!   reminder lead window.
//! - [`overdue_scan`](Triggers::overdue_scan) covers work past its due
//!   instant, with priority escalating by age.
//! - [`invitation_scan`](Triggers::invitation_scan) resolves pending
//!   invitations to registered users by phone number.
//! - The cleanup methods enforce notification retention and invitation
//!   staleness limits.

use std::sync::Arc;

use chrono::Duration;

use paddock_core::phone;
use paddock_core::types::Timestamp;
use paddock_core::{NotificationKind, RelatedEntity};
use paddock_db::models::activity::Activity;
use paddock_db::models::invitation::FarmInvitation;
use paddock_db::models::scheduled_activity::ScheduledActivity;
use paddock_db::{Store, StoreError};

use crate::config::EngineConfig;
use crate::service::{NotificationService, ServiceError};

/// What one scan did: rows created plus per-entity failures.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub created: usize,
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Triggers {
    store: Arc<dyn Store>,
    service: NotificationService,
    config: EngineConfig,
}

impl Triggers {
    pub fn new(store: Arc<dyn Store>, service: NotificationService, config: EngineConfig) -> Self {
        Self {
            store,
            service,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Reminders
    // -----------------------------------------------------------------------

    /// Notify about pending work due between `now` and `now` plus the
    /// reminder lead. Work already past due belongs to the overdue scan.
    pub async fn reminder_scan(&self, now: Timestamp) -> Result<ScanOutcome, ServiceError> {
        let until = now + Duration::minutes(self.config.reminder_lead_minutes);
        let mut outcome = ScanOutcome::default();

        for activity in self.store.pending_activities_due_between(now, until).await? {
            match self.remind_activity(&activity).await {
                Ok(created) => outcome.created += created,
                Err(error) => {
                    tracing::error!(activity_id = activity.id, %error, "Activity reminder failed");
                    outcome.errors.push(format!("activity {}: {error}", activity.id));
                }
            }
        }

        for schedule in self.store.pending_schedules_due_between(now, until).await? {
            match self.remind_schedule(&schedule).await {
                Ok(created) => outcome.created += created,
                Err(error) => {
                    tracing::error!(schedule_id = schedule.id, %error, "Schedule reminder failed");
                    outcome.errors.push(format!("schedule {}: {error}", schedule.id));
                }
            }
        }

        Ok(outcome)
    }

    async fn remind_activity(&self, activity: &Activity) -> Result<usize, ServiceError> {
        let related = RelatedEntity::activity(activity.id);
        if self
            .store
            .notification_exists_for_entity(NotificationKind::ActivityReminder, related)
            .await?
        {
            return Ok(0);
        }
        self.service.notify_activity_reminder(activity).await
    }

    async fn remind_schedule(&self, schedule: &ScheduledActivity) -> Result<usize, ServiceError> {
        let related = RelatedEntity::scheduled_activity(schedule.id);
        if self
            .store
            .notification_exists_for_entity(NotificationKind::ScheduleReminder, related)
            .await?
        {
            return Ok(0);
        }
        self.service.notify_schedule_reminder(schedule).await
    }

    // -----------------------------------------------------------------------
    // Overdue alerts
    // -----------------------------------------------------------------------

    /// Notify about pending work whose due instant has passed.
    pub async fn overdue_scan(&self, now: Timestamp) -> Result<ScanOutcome, ServiceError> {
        let mut outcome = ScanOutcome::default();

        for activity in self.store.pending_activities_due_before(now).await? {
            match self.alert_overdue_activity(&activity, now).await {
                Ok(created) => outcome.created += created,
                Err(error) => {
                    tracing::error!(activity_id = activity.id, %error, "Overdue alert failed");
                    outcome.errors.push(format!("activity {}: {error}", activity.id));
                }
            }
        }

        for schedule in self.store.pending_schedules_due_before(now).await? {
            match self.alert_overdue_schedule(&schedule, now).await {
                Ok(created) => outcome.created += created,
                Err(error) => {
                    tracing::error!(schedule_id = schedule.id, %error, "Overdue alert failed");
                    outcome.errors.push(format!("schedule {}: {error}", schedule.id));
                }
            }
        }

        Ok(outcome)
    }

    async fn alert_overdue_activity(
        &self,
        activity: &Activity,
        now: Timestamp,
    ) -> Result<usize, ServiceError> {
        let related = RelatedEntity::activity(activity.id);
        if self
            .store
            .notification_exists_for_entity(NotificationKind::ActivityOverdue, related)
            .await?
        {
            return Ok(0);
        }
        let days_overdue = (now - activity.scheduled_at).num_days();
        self.service
            .notify_activity_overdue(activity, days_overdue)
            .await
    }

    async fn alert_overdue_schedule(
        &self,
        schedule: &ScheduledActivity,
        now: Timestamp,
    ) -> Result<usize, ServiceError> {
        let related = RelatedEntity::scheduled_activity(schedule.id);
        if self
            .store
            .notification_exists_for_entity(NotificationKind::ActivityOverdue, related)
            .await?
        {
            return Ok(0);
        }
        let days_overdue = (now - schedule.scheduled_at).num_days();
        self.service
            .notify_schedule_overdue(schedule, days_overdue)
            .await
    }

    // -----------------------------------------------------------------------
    // Invitations
    // -----------------------------------------------------------------------

    /// Notify registered users about pending invitations addressed to their
    /// phone number. Numbers that do not resolve are skipped silently: the
    /// invitee may simply not have signed up yet, and the next scan will try
    /// again.
    pub async fn invitation_scan(&self, now: Timestamp) -> Result<ScanOutcome, ServiceError> {
        let mut outcome = ScanOutcome::default();

        for invitation in self.store.pending_invitations(now).await? {
            match self.notify_invitation(&invitation).await {
                Ok(created) => outcome.created += created,
                Err(error) => {
                    tracing::error!(
                        invitation_id = invitation.id,
                        %error,
                        "Invitation notification failed"
                    );
                    outcome
                        .errors
                        .push(format!("invitation {}: {error}", invitation.id));
                }
            }
        }

        Ok(outcome)
    }

    async fn notify_invitation(&self, invitation: &FarmInvitation) -> Result<usize, ServiceError> {
        let Some(normalized) = phone::normalize(&invitation.phone) else {
            return Ok(0);
        };
        let Some(recipient) = self.store.user_by_phone(&normalized).await? else {
            return Ok(0);
        };
        if self
            .store
            .invitation_notification_exists(invitation.farm_id, recipient.id)
            .await?
        {
            return Ok(0);
        }
        self.service
            .notify_farm_invitation(invitation, &recipient)
            .await
    }

    // -----------------------------------------------------------------------
    // Cleanups
    // -----------------------------------------------------------------------

    /// Delete read notifications older than the retention window. Unread
    /// rows are kept regardless of age.
    pub async fn cleanup_notifications(&self, now: Timestamp) -> Result<u64, StoreError> {
        let cutoff = now - Duration::days(self.config.retention_days);
        let deleted = self.store.delete_read_notifications_before(cutoff).await?;
        if deleted > 0 {
            tracing::info!(deleted, "Removed read notifications past retention");
        }
        Ok(deleted)
    }

    /// Delete pending invitations that have sat unanswered longer than the
    /// staleness limit.
    pub async fn cleanup_invitations(&self, now: Timestamp) -> Result<u64, StoreError> {
        let cutoff = now - Duration::days(self.config.invitation_max_age_days);
        let deleted = self.store.delete_stale_pending_invitations(cutoff).await?;
        if deleted > 0 {
            tracing::info!(deleted, "Removed stale pending invitations");
        }
        Ok(deleted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
