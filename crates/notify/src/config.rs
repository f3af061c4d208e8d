//! Engine configuration loaded from environment variables.

use paddock_core::OverduePolicy;

/// Default reminder lead window: 24 hours.
const DEFAULT_REMINDER_LEAD_MINUTES: i64 = 1440;

/// Default retention window for read notifications.
const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Default maximum age for an unanswered pending invitation.
const DEFAULT_INVITATION_MAX_AGE_DAYS: i64 = 7;

/// Tunables for the scan and cleanup routines.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How far ahead the reminder scan looks, in minutes.
    pub reminder_lead_minutes: i64,
    /// Read notifications older than this many days are purged.
    pub retention_days: i64,
    /// Pending invitations older than this many days are purged.
    pub invitation_max_age_days: i64,
    /// Day thresholds for overdue priority escalation.
    pub overdue_policy: OverduePolicy,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// Malformed values fall back to the default rather than aborting.
    ///
    /// | Env Var                       | Default |
    /// |-------------------------------|---------|
    /// | `REMINDER_LEAD_MINUTES`       | `1440`  |
    /// | `NOTIFICATION_RETENTION_DAYS` | `30`    |
    /// | `INVITATION_MAX_AGE_DAYS`     | `7`     |
    /// | `OVERDUE_NORMAL_UNDER_DAYS`   | `3`     |
    /// | `OVERDUE_HIGH_MAX_DAYS`       | `7`     |
    pub fn from_env() -> Self {
        let defaults = OverduePolicy::default();
        Self {
            reminder_lead_minutes: env_i64("REMINDER_LEAD_MINUTES", DEFAULT_REMINDER_LEAD_MINUTES),
            retention_days: env_i64("NOTIFICATION_RETENTION_DAYS", DEFAULT_RETENTION_DAYS),
            invitation_max_age_days: env_i64(
                "INVITATION_MAX_AGE_DAYS",
                DEFAULT_INVITATION_MAX_AGE_DAYS,
            ),
            overdue_policy: OverduePolicy {
                normal_under_days: env_i64("OVERDUE_NORMAL_UNDER_DAYS", defaults.normal_under_days),
                high_max_days: env_i64("OVERDUE_HIGH_MAX_DAYS", defaults.high_max_days),
            },
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reminder_lead_minutes: DEFAULT_REMINDER_LEAD_MINUTES,
            retention_days: DEFAULT_RETENTION_DAYS,
            invitation_max_age_days: DEFAULT_INVITATION_MAX_AGE_DAYS,
            overdue_policy: OverduePolicy::default(),
        }
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.reminder_lead_minutes, 1440);
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.invitation_max_age_days, 7);
        assert_eq!(config.overdue_policy.normal_under_days, 3);
        assert_eq!(config.overdue_policy.high_max_days, 7);
    }

    #[test]
    fn from_env_falls_back_when_unset() {
        // These variables are not set in the test environment.
        std::env::remove_var("REMINDER_LEAD_MINUTES");
        std::env::remove_var("NOTIFICATION_RETENTION_DAYS");
        let config = EngineConfig::from_env();
        assert_eq!(config.reminder_lead_minutes, 1440);
        assert_eq!(config.retention_days, 30);
    }
}
