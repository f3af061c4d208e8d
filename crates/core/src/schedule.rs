//! Work item lifecycle state machine.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the API/store layer and the maintenance engine. One-off activities and
//! recurring schedule occurrences share the same status vocabulary.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WorkStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of an activity or schedule occurrence. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkStatus {
    /// The wire string, identical to the stored TEXT value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns the set of valid target statuses reachable from `self`.
    ///
    /// Terminal states (Completed, Cancelled) return an empty slice because
    /// no further transitions are allowed.
    pub fn valid_transitions(self) -> &'static [WorkStatus] {
        match self {
            Self::Pending => &[Self::InProgress, Self::Completed, Self::Cancelled],
            Self::InProgress => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(self, to: WorkStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a state transition, returning an error message for invalid ones.
    pub fn validate_transition(self, to: WorkStatus) -> Result<(), String> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(format!("Invalid transition: {self} -> {to}"))
        }
    }

    /// Whether a reminder or overdue scan should still consider this item.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(format!("Unknown work status: {other}")),
        }
    }
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::WorkStatus::*;

    // -----------------------------------------------------------------------
    // Valid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn pending_to_in_progress() {
        assert!(Pending.can_transition(InProgress));
    }

    #[test]
    fn pending_to_completed() {
        assert!(Pending.can_transition(Completed));
    }

    #[test]
    fn pending_to_cancelled() {
        assert!(Pending.can_transition(Cancelled));
    }

    #[test]
    fn in_progress_to_completed() {
        assert!(InProgress.can_transition(Completed));
    }

    #[test]
    fn in_progress_to_cancelled() {
        assert!(InProgress.can_transition(Cancelled));
    }

    // -----------------------------------------------------------------------
    // Terminal states have no outgoing transitions
    // -----------------------------------------------------------------------

    #[test]
    fn completed_has_no_transitions() {
        assert!(Completed.valid_transitions().is_empty());
    }

    #[test]
    fn cancelled_has_no_transitions() {
        assert!(Cancelled.valid_transitions().is_empty());
    }

    // -----------------------------------------------------------------------
    // Invalid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn completed_to_pending_invalid() {
        assert!(!Completed.can_transition(Pending));
    }

    #[test]
    fn cancelled_to_in_progress_invalid() {
        assert!(!Cancelled.can_transition(InProgress));
    }

    #[test]
    fn in_progress_to_pending_invalid() {
        assert!(!InProgress.can_transition(Pending));
    }

    // -----------------------------------------------------------------------
    // validate_transition returns descriptive error
    // -----------------------------------------------------------------------

    #[test]
    fn validate_transition_ok() {
        assert!(Pending.validate_transition(InProgress).is_ok());
    }

    #[test]
    fn validate_transition_err() {
        let err = Completed.validate_transition(Pending).unwrap_err();
        assert!(err.contains("COMPLETED"));
        assert!(err.contains("PENDING"));
    }

    // -----------------------------------------------------------------------
    // Scan visibility
    // -----------------------------------------------------------------------

    #[test]
    fn open_statuses_are_scannable() {
        assert!(Pending.is_open());
        assert!(InProgress.is_open());
        assert!(!Completed.is_open());
        assert!(!Cancelled.is_open());
    }
}
