//! Daily maintenance run.
//!
//! [`Orchestrator::run_maintenance`] executes the whole nightly sequence:
//!
//! 1. Store connectivity check (the only failure that aborts the run).
//! 2. Rollover: spawn the next occurrence of each due recurring schedule.
//! 3. Reminder scan, overdue scan, invitation scan.
//! 4. Stale invitation cleanup and notification retention cleanup.
//!
//! Every step after the connectivity check degrades gracefully: failures are
//! collected into the [`MaintenanceSummary`] and the remaining steps still
//! run.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use paddock_core::recurrence;
use paddock_core::types::Timestamp;
use paddock_core::WorkStatus;
use paddock_db::models::scheduled_activity::NewScheduledActivity;
use paddock_db::{Store, StoreError};

use crate::triggers::Triggers;

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// What one maintenance run did, in API wire form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSummary {
    pub duration_ms: u64,
    pub recurring_schedules_processed: usize,
    pub notifications_sent: usize,
    pub notifications_cleaned_up: u64,
    pub invitations_cleaned_up: u64,
    pub errors_count: usize,
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn Store>,
    triggers: Triggers,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn Store>, triggers: Triggers) -> Self {
        Self { store, triggers }
    }

    /// Run the full maintenance sequence once.
    ///
    /// Returns `Err` only when the store is unreachable before any work
    /// starts; every later failure is recorded in the summary instead.
    pub async fn run_maintenance(&self) -> Result<MaintenanceSummary, StoreError> {
        let started = Instant::now();
        let now = Utc::now();
        tracing::info!("Maintenance run started");

        self.store.ping().await?;

        let mut errors = Vec::new();
        let mut notifications_sent = 0;

        let (recurring_schedules_processed, mut rollover_errors) =
            self.rollover_recurring(now).await;
        errors.append(&mut rollover_errors);

        match self.triggers.reminder_scan(now).await {
            Ok(mut outcome) => {
                notifications_sent += outcome.created;
                errors.append(&mut outcome.errors);
            }
            Err(error) => errors.push(format!("reminder scan: {error}")),
        }

        match self.triggers.overdue_scan(now).await {
            Ok(mut outcome) => {
                notifications_sent += outcome.created;
                errors.append(&mut outcome.errors);
            }
            Err(error) => errors.push(format!("overdue scan: {error}")),
        }

        match self.triggers.invitation_scan(now).await {
            Ok(mut outcome) => {
                notifications_sent += outcome.created;
                errors.append(&mut outcome.errors);
            }
            Err(error) => errors.push(format!("invitation scan: {error}")),
        }

        let invitations_cleaned_up = match self.triggers.cleanup_invitations(now).await {
            Ok(deleted) => deleted,
            Err(error) => {
                errors.push(format!("invitation cleanup: {error}"));
                0
            }
        };

        let notifications_cleaned_up = match self.triggers.cleanup_notifications(now).await {
            Ok(deleted) => deleted,
            Err(error) => {
                errors.push(format!("notification cleanup: {error}"));
                0
            }
        };

        let summary = MaintenanceSummary {
            duration_ms: started.elapsed().as_millis() as u64,
            recurring_schedules_processed,
            notifications_sent,
            notifications_cleaned_up,
            invitations_cleaned_up,
            errors_count: errors.len(),
            errors,
        };
        tracing::info!(
            duration_ms = summary.duration_ms,
            schedules = summary.recurring_schedules_processed,
            notifications = summary.notifications_sent,
            errors = summary.errors_count,
            "Maintenance run finished"
        );
        Ok(summary)
    }

    /// Advance every due recurring schedule to its next occurrence.
    ///
    /// The successor insert happens before the original is completed, so a
    /// failure between the two steps leaves a duplicate pending row rather
    /// than a broken chain. Occurrences missed across several days collapse
    /// into a single successor strictly in the future.
    async fn rollover_recurring(&self, now: Timestamp) -> (usize, Vec<String>) {
        let mut processed = 0;
        let mut errors = Vec::new();

        let due = match self.store.due_recurring_schedules(now).await {
            Ok(due) => due,
            Err(error) => {
                errors.push(format!("rollover listing: {error}"));
                return (processed, errors);
            }
        };

        for schedule in due {
            let Some(rule) = schedule.recurrence_rule else {
                errors.push(format!("schedule {}: recurring without a rule", schedule.id));
                continue;
            };
            let Some(next_at) = recurrence::next_occurrence_after(rule, schedule.scheduled_at, now)
            else {
                errors.push(format!("schedule {}: no next occurrence", schedule.id));
                continue;
            };

            let successor = NewScheduledActivity::successor_of(&schedule, next_at);
            if let Err(error) = self.store.insert_scheduled_activity(&successor).await {
                tracing::error!(schedule_id = schedule.id, %error, "Rollover insert failed");
                errors.push(format!("schedule {}: {error}", schedule.id));
                continue;
            }
            if let Err(error) = self
                .store
                .set_scheduled_activity_status(schedule.id, WorkStatus::Completed)
                .await
            {
                tracing::error!(schedule_id = schedule.id, %error, "Rollover completion failed");
                errors.push(format!("schedule {}: {error}", schedule.id));
                continue;
            }
            processed += 1;
        }

        (processed, errors)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use paddock_core::types::DbId;
    use paddock_core::{NotificationKind, RecurrenceRule};
    use paddock_db::models::activity::NewActivity;
    use paddock_db::models::notification::NotificationFilter;
    use paddock_db::MemoryStore;
    use paddock_events::NotificationHub;

    use crate::config::EngineConfig;
    use crate::service::NotificationService;

    fn orchestrator(store: Arc<MemoryStore>) -> Orchestrator {
        let config = EngineConfig::default();
        let hub = Arc::new(NotificationHub::default());
        let service = NotificationService::new(store.clone(), hub, &config);
        let triggers = Triggers::new(store.clone(), service, config);
        Orchestrator::new(store, triggers)
    }

    async fn farm_fixture(store: &MemoryStore) -> (DbId, DbId, DbId) {
        let owner = store.seed_user("Owner", None, None).await;
        let farm = store.seed_farm("Hillside", owner.id, "en").await;
        let animal = store.seed_animal(farm.id, "Daisy").await;
        (farm.id, owner.id, animal.id)
    }

    fn daily_schedule(animal_id: DbId, at: Timestamp) -> NewScheduledActivity {
        NewScheduledActivity {
            animal_id,
            title: "Morning feed".to_string(),
            notes: None,
            scheduled_at: at,
            is_recurring: true,
            recurrence_rule: Some(RecurrenceRule::Daily),
            created_by: None,
        }
    }

    #[tokio::test]
    async fn daily_rollover_spawns_the_next_occurrence() {
        let store = Arc::new(MemoryStore::new());
        let (_, _, animal_id) = farm_fixture(&store).await;
        let due_at = Utc::now() - Duration::hours(1);
        let original = store
            .insert_scheduled_activity(&daily_schedule(animal_id, due_at))
            .await
            .unwrap();

        let summary = orchestrator(store.clone()).run_maintenance().await.unwrap();
        assert_eq!(summary.recurring_schedules_processed, 1);
        assert!(summary.errors.is_empty());
        // The successor lands inside the reminder window, so one reminder
        // goes out in the same run.
        assert_eq!(summary.notifications_sent, 1);

        let rolled = store
            .scheduled_activity(original.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rolled.status, WorkStatus::Completed);

        let pending = store
            .pending_schedules_due_before(due_at + Duration::days(2))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        let successor = &pending[0];
        assert_eq!(successor.scheduled_at, due_at + Duration::days(1));
        assert_eq!(successor.title, original.title);
        assert!(successor.is_recurring);
        assert_eq!(successor.recurrence_rule, Some(RecurrenceRule::Daily));
        assert_eq!(successor.status, WorkStatus::Pending);
    }

    #[tokio::test]
    async fn rollover_collapses_missed_occurrences_into_one_future_successor() {
        let store = Arc::new(MemoryStore::new());
        let (_, _, animal_id) = farm_fixture(&store).await;
        // Due three times already; the next future occurrence is four days
        // after the original due instant.
        let due_at = Utc::now() - Duration::days(3) - Duration::hours(1);
        store
            .insert_scheduled_activity(&daily_schedule(animal_id, due_at))
            .await
            .unwrap();

        let summary = orchestrator(store.clone()).run_maintenance().await.unwrap();
        assert_eq!(summary.recurring_schedules_processed, 1);

        let pending = store
            .pending_schedules_due_before(due_at + Duration::days(30))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].scheduled_at, due_at + Duration::days(4));
    }

    #[tokio::test]
    async fn non_recurring_overdue_schedule_is_alerted_not_rolled_over() {
        let store = Arc::new(MemoryStore::new());
        let (_, owner_id, animal_id) = farm_fixture(&store).await;
        let schedule = store
            .insert_scheduled_activity(&NewScheduledActivity {
                animal_id,
                title: "Vet visit".to_string(),
                notes: None,
                scheduled_at: Utc::now() - Duration::days(2),
                is_recurring: false,
                recurrence_rule: None,
                created_by: None,
            })
            .await
            .unwrap();

        let summary = orchestrator(store.clone()).run_maintenance().await.unwrap();
        assert_eq!(summary.recurring_schedules_processed, 0);
        assert_eq!(summary.notifications_sent, 1);

        let unchanged = store
            .scheduled_activity(schedule.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.status, WorkStatus::Pending);

        let rows = store
            .list_notifications(owner_id, NotificationFilter::default(), 50, 0)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, NotificationKind::ActivityOverdue);
    }

    #[tokio::test]
    async fn second_run_creates_nothing_new() {
        let store = Arc::new(MemoryStore::new());
        let (_, owner_id, animal_id) = farm_fixture(&store).await;
        let now = Utc::now();
        store
            .insert_scheduled_activity(&daily_schedule(animal_id, now - Duration::hours(1)))
            .await
            .unwrap();
        store
            .seed_activity(NewActivity {
                animal_id,
                kind: "medical".to_string(),
                title: "Worming".to_string(),
                notes: None,
                scheduled_at: now - Duration::days(2),
                created_by: None,
            })
            .await;

        let orchestrator = orchestrator(store.clone());
        let first = orchestrator.run_maintenance().await.unwrap();
        assert!(first.notifications_sent > 0);
        let after_first = store.unread_count(owner_id).await.unwrap();

        let second = orchestrator.run_maintenance().await.unwrap();
        assert_eq!(second.recurring_schedules_processed, 0);
        assert_eq!(second.notifications_sent, 0);
        assert!(second.errors.is_empty());
        assert_eq!(store.unread_count(owner_id).await.unwrap(), after_first);
    }

    #[tokio::test]
    async fn summary_serializes_in_camel_case() {
        let store = Arc::new(MemoryStore::new());
        let summary = orchestrator(store).run_maintenance().await.unwrap();
        let json = serde_json::to_value(&summary).unwrap();

        for key in [
            "durationMs",
            "recurringSchedulesProcessed",
            "notificationsSent",
            "notificationsCleanedUp",
            "invitationsCleanedUp",
            "errorsCount",
            "errors",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
