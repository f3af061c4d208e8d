//! Pure domain logic for the Paddock notification & scheduling engine.
//!
//! This crate has no internal dependencies so it can be used from the
//! store layer, the engine, the API server, and any future CLI tooling:
//!
//! - [`types`] — shared id/timestamp aliases.
//! - [`error`] — the domain error taxonomy.
//! - [`notification`] — the closed notification kind/priority vocabulary.
//! - [`recurrence`] — calendar-correct next-occurrence computation.
//! - [`schedule`] — work item lifecycle state machine.
//! - [`quiet_hours`] — wrap-aware quiet-hour window evaluation.
//! - [`escalation`] — overdue priority escalation policy.
//! - [`phone`] — phone normalization for invitation matching.

pub mod error;
pub mod escalation;
pub mod notification;
pub mod pagination;
pub mod phone;
pub mod quiet_hours;
pub mod recurrence;
pub mod schedule;
pub mod types;

pub use error::CoreError;
pub use escalation::OverduePolicy;
pub use notification::{
    NotificationKind, PreferenceCategory, Priority, RelatedEntity, RelatedEntityKind,
};
pub use recurrence::RecurrenceRule;
pub use schedule::WorkStatus;
