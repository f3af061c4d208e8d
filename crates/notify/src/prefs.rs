//! Delivery preference resolution.
//!
//! [`PreferencesResolver`] answers the creation-time question: does this
//! recipient accept this kind of notification at all? Preferences are
//! lazily created with defaults on first read. Send-time gating for the
//! interruptive channels (toggles, quiet hours, the per-user reminder
//! window) happens in [`crate::dispatch`] against the resolved row.

use std::sync::Arc;

use paddock_core::types::DbId;
use paddock_core::NotificationKind;
use paddock_db::models::preferences::DeliveryPreferences;
use paddock_db::{Store, StoreError};

/// Store-backed preference checks.
#[derive(Clone)]
pub struct PreferencesResolver {
    store: Arc<dyn Store>,
}

impl PreferencesResolver {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The recipient's preferences, created with defaults on first access.
    pub async fn get_or_create(&self, user_id: DbId) -> Result<DeliveryPreferences, StoreError> {
        self.store.get_or_create_preferences(user_id).await
    }

    /// Whether a notification of `kind` should be created for this
    /// recipient at all.
    ///
    /// [`NotificationKind::SystemAnnouncement`] is always accepted,
    /// regardless of stored preferences.
    pub async fn should_notify(
        &self,
        user_id: DbId,
        kind: NotificationKind,
    ) -> Result<bool, StoreError> {
        if kind.category().is_none() {
            return Ok(true);
        }
        let prefs = self.store.get_or_create_preferences(user_id).await?;
        Ok(prefs.accepts(kind))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_db::models::preferences::UpdateDeliveryPreferences;
    use paddock_db::MemoryStore;

    fn resolver(store: Arc<MemoryStore>) -> PreferencesResolver {
        PreferencesResolver::new(store)
    }

    #[tokio::test]
    async fn defaults_accept_every_category() {
        let store = Arc::new(MemoryStore::new());
        let prefs = resolver(store);

        for kind in [
            NotificationKind::ActivityReminder,
            NotificationKind::ActivityOverdue,
            NotificationKind::FarmInvitation,
            NotificationKind::MemberJoined,
            NotificationKind::ActivityCreated,
        ] {
            assert!(prefs.should_notify(1, kind).await.unwrap(), "{kind}");
        }
    }

    #[tokio::test]
    async fn category_opt_out_blocks_creation() {
        let store = Arc::new(MemoryStore::new());
        store
            .update_preferences(
                1,
                &UpdateDeliveryPreferences {
                    overdue_alerts: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let prefs = resolver(store);
        assert!(!prefs
            .should_notify(1, NotificationKind::ActivityOverdue)
            .await
            .unwrap());
        // Sibling categories are untouched.
        assert!(prefs
            .should_notify(1, NotificationKind::ActivityReminder)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn announcements_bypass_every_opt_out() {
        let store = Arc::new(MemoryStore::new());
        store
            .update_preferences(
                1,
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

        let prefs = resolver(store);
        assert!(prefs
            .should_notify(1, NotificationKind::SystemAnnouncement)
            .await
            .unwrap());
    }
}
