//! The closed notification vocabulary: kinds, priorities, and the
//! related-entity linkage carried by every trigger-generated notification.
//!
//! Wire strings (JSON and the `notifications.kind`/`priority` TEXT columns)
//! are SCREAMING_SNAKE_CASE and must not drift — clients switch on them.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

/// Every kind of notification the engine can produce. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// A one-off activity is due soon.
    ActivityReminder,
    /// A pending activity or schedule slipped past its due instant.
    ActivityOverdue,
    /// A recurring care schedule occurrence is due soon.
    ScheduleReminder,
    /// The recipient has a pending invitation to join a farm.
    FarmInvitation,
    /// Someone accepted an invitation and joined the farm.
    MemberJoined,
    /// An activity was marked completed.
    ActivityCompleted,
    /// A new activity was logged on the farm.
    ActivityCreated,
    /// Administrative broadcast. Ignores per-category opt-outs.
    SystemAnnouncement,
}

/// Preference categories a recipient can toggle. Several kinds share one
/// toggle; [`NotificationKind::SystemAnnouncement`] has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceCategory {
    ActivityReminders,
    OverdueAlerts,
    FarmInvitations,
    MemberJoined,
    NewActivity,
}

impl NotificationKind {
    /// The wire string, identical to the stored TEXT value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActivityReminder => "ACTIVITY_REMINDER",
            Self::ActivityOverdue => "ACTIVITY_OVERDUE",
            Self::ScheduleReminder => "SCHEDULE_REMINDER",
            Self::FarmInvitation => "FARM_INVITATION",
            Self::MemberJoined => "MEMBER_JOINED",
            Self::ActivityCompleted => "ACTIVITY_COMPLETED",
            Self::ActivityCreated => "ACTIVITY_CREATED",
            Self::SystemAnnouncement => "SYSTEM_ANNOUNCEMENT",
        }
    }

    /// The preference toggle governing this kind, or `None` for
    /// administrative kinds that are always delivered.
    pub fn category(self) -> Option<PreferenceCategory> {
        match self {
            Self::ActivityReminder | Self::ScheduleReminder => {
                Some(PreferenceCategory::ActivityReminders)
            }
            Self::ActivityOverdue => Some(PreferenceCategory::OverdueAlerts),
            Self::FarmInvitation => Some(PreferenceCategory::FarmInvitations),
            Self::MemberJoined => Some(PreferenceCategory::MemberJoined),
            Self::ActivityCreated | Self::ActivityCompleted => {
                Some(PreferenceCategory::NewActivity)
            }
            Self::SystemAnnouncement => None,
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVITY_REMINDER" => Ok(Self::ActivityReminder),
            "ACTIVITY_OVERDUE" => Ok(Self::ActivityOverdue),
            "SCHEDULE_REMINDER" => Ok(Self::ScheduleReminder),
            "FARM_INVITATION" => Ok(Self::FarmInvitation),
            "MEMBER_JOINED" => Ok(Self::MemberJoined),
            "ACTIVITY_COMPLETED" => Ok(Self::ActivityCompleted),
            "ACTIVITY_CREATED" => Ok(Self::ActivityCreated),
            "SYSTEM_ANNOUNCEMENT" => Ok(Self::SystemAnnouncement),
            other => Err(format!("Unknown notification kind: {other}")),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Notification priority. `Ord` follows urgency so escalation can be
/// asserted monotonic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Priority {
    /// The wire string, identical to the stored TEXT value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Related entity linkage
// ---------------------------------------------------------------------------

/// Entity families a notification can point back to for deep-linking and
/// dedup checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelatedEntityKind {
    Activity,
    ScheduledActivity,
    Farm,
    Invitation,
}

impl RelatedEntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "ACTIVITY",
            Self::ScheduledActivity => "SCHEDULED_ACTIVITY",
            Self::Farm => "FARM",
            Self::Invitation => "INVITATION",
        }
    }
}

/// The triggering entity behind a notification.
///
/// Kind and id travel together by construction; a notification either has
/// both or neither (`Option<RelatedEntity>`), which is how the both-or-absent
/// column invariant is enforced without a CHECK at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub kind: RelatedEntityKind,
    pub id: DbId,
}

impl RelatedEntity {
    pub fn activity(id: DbId) -> Self {
        Self {
            kind: RelatedEntityKind::Activity,
            id,
        }
    }

    pub fn scheduled_activity(id: DbId) -> Self {
        Self {
            kind: RelatedEntityKind::ScheduledActivity,
            id,
        }
    }

    pub fn farm(id: DbId) -> Self {
        Self {
            kind: RelatedEntityKind::Farm,
            id,
        }
    }

    pub fn invitation(id: DbId) -> Self {
        Self {
            kind: RelatedEntityKind::Invitation,
            id,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_strings_are_exact() {
        assert_eq!(NotificationKind::ActivityReminder.as_str(), "ACTIVITY_REMINDER");
        assert_eq!(NotificationKind::ActivityOverdue.as_str(), "ACTIVITY_OVERDUE");
        assert_eq!(NotificationKind::ScheduleReminder.as_str(), "SCHEDULE_REMINDER");
        assert_eq!(NotificationKind::FarmInvitation.as_str(), "FARM_INVITATION");
        assert_eq!(NotificationKind::MemberJoined.as_str(), "MEMBER_JOINED");
        assert_eq!(NotificationKind::ActivityCompleted.as_str(), "ACTIVITY_COMPLETED");
        assert_eq!(NotificationKind::ActivityCreated.as_str(), "ACTIVITY_CREATED");
        assert_eq!(
            NotificationKind::SystemAnnouncement.as_str(),
            "SYSTEM_ANNOUNCEMENT"
        );
    }

    #[test]
    fn kind_round_trips_through_from_str() {
        let kinds = [
            NotificationKind::ActivityReminder,
            NotificationKind::ActivityOverdue,
            NotificationKind::ScheduleReminder,
            NotificationKind::FarmInvitation,
            NotificationKind::MemberJoined,
            NotificationKind::ActivityCompleted,
            NotificationKind::ActivityCreated,
            NotificationKind::SystemAnnouncement,
        ];
        for kind in kinds {
            assert_eq!(kind.as_str().parse::<NotificationKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_string_is_rejected() {
        assert!("ACTIVITY_SNOOZED".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&NotificationKind::FarmInvitation).unwrap();
        assert_eq!(json, "\"FARM_INVITATION\"");
        let json = serde_json::to_string(&Priority::Urgent).unwrap();
        assert_eq!(json, "\"URGENT\"");
    }

    #[test]
    fn priority_orders_by_urgency() {
        assert!(Priority::Low < Priority::Normal);
        assert!(Priority::Normal < Priority::High);
        assert!(Priority::High < Priority::Urgent);
    }

    #[test]
    fn system_announcement_has_no_category() {
        assert_eq!(NotificationKind::SystemAnnouncement.category(), None);
    }

    #[test]
    fn reminders_share_one_category() {
        assert_eq!(
            NotificationKind::ActivityReminder.category(),
            NotificationKind::ScheduleReminder.category(),
        );
    }
}
