//! Overdue priority escalation.
//!
//! The longer a pending work item sits past its due instant, the louder the
//! notification: Normal under [`OverduePolicy::normal_under_days`] days, High
//! up to and including [`OverduePolicy::high_max_days`] days, Urgent beyond.
//! The thresholds are configuration, but the mapping must stay monotonic
//! non-decreasing in elapsed time.

use crate::notification::Priority;

/// Day thresholds for overdue escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverduePolicy {
    /// Strictly below this many days overdue: [`Priority::Normal`].
    pub normal_under_days: i64,
    /// Up to and including this many days overdue: [`Priority::High`].
    pub high_max_days: i64,
}

impl Default for OverduePolicy {
    fn default() -> Self {
        Self {
            normal_under_days: 3,
            high_max_days: 7,
        }
    }
}

impl OverduePolicy {
    /// Priority for an item `days_overdue` days past due. Negative input
    /// (not yet due) is clamped into the Normal band.
    pub fn priority_for(&self, days_overdue: i64) -> Priority {
        if days_overdue < self.normal_under_days {
            Priority::Normal
        } else if days_overdue <= self.high_max_days {
            Priority::High
        } else {
            Priority::Urgent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bands() {
        let policy = OverduePolicy::default();
        assert_eq!(policy.priority_for(0), Priority::Normal);
        assert_eq!(policy.priority_for(1), Priority::Normal);
        assert_eq!(policy.priority_for(2), Priority::Normal);
        assert_eq!(policy.priority_for(3), Priority::High);
        assert_eq!(policy.priority_for(7), Priority::High);
        assert_eq!(policy.priority_for(8), Priority::Urgent);
        assert_eq!(policy.priority_for(365), Priority::Urgent);
    }

    #[test]
    fn negative_days_stay_normal() {
        let policy = OverduePolicy::default();
        assert_eq!(policy.priority_for(-1), Priority::Normal);
    }

    #[test]
    fn priority_is_monotonic_in_elapsed_days() {
        let policy = OverduePolicy::default();
        let mut prev = policy.priority_for(0);
        for days in 1..30 {
            let next = policy.priority_for(days);
            assert!(next >= prev, "priority dropped at day {days}");
            prev = next;
        }
    }

    #[test]
    fn custom_thresholds_shift_the_bands() {
        let policy = OverduePolicy {
            normal_under_days: 1,
            high_max_days: 2,
        };
        assert_eq!(policy.priority_for(0), Priority::Normal);
        assert_eq!(policy.priority_for(1), Priority::High);
        assert_eq!(policy.priority_for(2), Priority::High);
        assert_eq!(policy.priority_for(3), Priority::Urgent);
    }
}
