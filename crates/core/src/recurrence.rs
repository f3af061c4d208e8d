//! Calendar-correct recurrence for care schedules.
//!
//! [`next_occurrence`] advances a due instant by one period, preserving the
//! time of day. Month and year steps clamp to the last valid day of the
//! target month (Jan 31 -> Feb 28/29, Feb 29 -> Feb 28 on non-leap years)
//! rather than overflowing into the following month.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RecurrenceRule
// ---------------------------------------------------------------------------

/// How often a recurring schedule repeats. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceRule {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceRule {
    /// The wire string, identical to the stored TEXT value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

impl std::str::FromStr for RecurrenceRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            other => Err(format!("Unknown recurrence rule: {other}")),
        }
    }
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Occurrence math
// ---------------------------------------------------------------------------

/// The due instant one period after `anchor`.
///
/// Returns `None` only if the step would overflow chrono's representable
/// range, which no realistic schedule reaches.
pub fn next_occurrence(rule: RecurrenceRule, anchor: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match rule {
        RecurrenceRule::Daily => anchor.checked_add_signed(Duration::days(1)),
        RecurrenceRule::Weekly => anchor.checked_add_signed(Duration::days(7)),
        RecurrenceRule::Monthly => anchor.checked_add_months(Months::new(1)),
        RecurrenceRule::Yearly => anchor.checked_add_months(Months::new(12)),
    }
}

/// Advance `anchor` period by period until it lands strictly after `now`.
///
/// Used when rolling over a schedule that sat unprocessed for several
/// periods, so the next due instant is always in the future instead of
/// immediately due again.
pub fn next_occurrence_after(
    rule: RecurrenceRule,
    anchor: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let mut next = next_occurrence(rule, anchor)?;
    while next <= now {
        next = next_occurrence(rule, next)?;
    }
    Some(next)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
