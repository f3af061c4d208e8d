//! Delivery preference entity model and DTOs.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use paddock_core::types::{DbId, Timestamp};
use paddock_core::{NotificationKind, PreferenceCategory};

/// Smallest accepted reminder lead (5 minutes).
pub const MIN_REMINDER_LEAD_MINUTES: i32 = 5;

/// Largest accepted reminder lead (7 days).
pub const MAX_REMINDER_LEAD_MINUTES: i32 = 10_080;

/// Default reminder lead (24 hours).
pub const DEFAULT_REMINDER_LEAD_MINUTES: i32 = 1_440;

/// A row from the `delivery_preferences` table. Exactly one per user,
/// created lazily with defaults (all categories on, push/email off) on
/// first access.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeliveryPreferences {
    pub id: DbId,
    pub user_id: DbId,
    pub activity_reminders: bool,
    pub overdue_alerts: bool,
    pub farm_invitations: bool,
    pub member_joined: bool,
    pub new_activity: bool,
    pub push_enabled: bool,
    pub email_enabled: bool,
    pub reminder_lead_minutes: i32,
    pub quiet_start: Option<NaiveTime>,
    pub quiet_end: Option<NaiveTime>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DeliveryPreferences {
    /// Whether this recipient accepts `kind` at all.
    ///
    /// [`NotificationKind::SystemAnnouncement`] has no category and is
    /// always accepted (administrative override).
    pub fn accepts(&self, kind: NotificationKind) -> bool {
        match kind.category() {
            Some(PreferenceCategory::ActivityReminders) => self.activity_reminders,
            Some(PreferenceCategory::OverdueAlerts) => self.overdue_alerts,
            Some(PreferenceCategory::FarmInvitations) => self.farm_invitations,
            Some(PreferenceCategory::MemberJoined) => self.member_joined,
            Some(PreferenceCategory::NewActivity) => self.new_activity,
            None => true,
        }
    }

    /// Whether `at` falls inside this recipient's quiet window.
    pub fn is_quiet_at(&self, at: NaiveTime) -> bool {
        paddock_core::quiet_hours::is_quiet(self.quiet_start, self.quiet_end, at)
    }
}

/// DTO for partially updating delivery preferences. Absent fields keep
/// their stored values.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDeliveryPreferences {
    pub activity_reminders: Option<bool>,
    pub overdue_alerts: Option<bool>,
    pub farm_invitations: Option<bool>,
    pub member_joined: Option<bool>,
    pub new_activity: Option<bool>,
    pub push_enabled: Option<bool>,
    pub email_enabled: Option<bool>,
    #[validate(range(min = 5, max = 10_080))]
    pub reminder_lead_minutes: Option<i32>,
    pub quiet_start: Option<NaiveTime>,
    pub quiet_end: Option<NaiveTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use paddock_core::NotificationKind;

    fn prefs() -> DeliveryPreferences {
        DeliveryPreferences {
            id: 1,
            user_id: 1,
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
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn category_toggle_gates_matching_kinds() {
        let mut p = prefs();
        p.overdue_alerts = false;
        assert!(!p.accepts(NotificationKind::ActivityOverdue));
        assert!(p.accepts(NotificationKind::ActivityReminder));
    }

    #[test]
    fn system_announcement_ignores_every_toggle() {
        let mut p = prefs();
        p.activity_reminders = false;
        p.overdue_alerts = false;
        p.farm_invitations = false;
        p.member_joined = false;
        p.new_activity = false;
        assert!(p.accepts(NotificationKind::SystemAnnouncement));
    }

    #[test]
    fn reminder_lead_range_is_validated() {
        let ok = UpdateDeliveryPreferences {
            reminder_lead_minutes: Some(60),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let too_small = UpdateDeliveryPreferences {
            reminder_lead_minutes: Some(1),
            ..Default::default()
        };
        assert!(too_small.validate().is_err());

        let absent = UpdateDeliveryPreferences::default();
        assert!(absent.validate().is_ok());
    }
}
