//! Notification engine: composition, fan-out, scans, and maintenance.
//!
//! - [`service`]: the write path. [`NotificationService`] composes localized
//!   notifications, fans them out to farm recipients, and publishes feed
//!   events.
//! - [`triggers`]: scheduled scans over due work, overdue work, and pending
//!   invitations, plus the retention cleanups.
//! - [`orchestrator`]: the daily maintenance sequence and its summary.
//! - [`dispatch`]: feed-driven forwarding to push and email channels.
//! - [`prefs`]: per-user delivery preference resolution.
//! - [`locale`]: notification text templates, English and Indonesian.
//! - [`config`]: engine tuning knobs read from the environment.

pub mod config;
pub mod dispatch;
pub mod locale;
pub mod orchestrator;
pub mod prefs;
pub mod service;
pub mod triggers;

pub use config::EngineConfig;
pub use dispatch::DeliveryDispatcher;
pub use locale::{Locale, NotificationText};
pub use orchestrator::{MaintenanceSummary, Orchestrator};
pub use prefs::PreferencesResolver;
pub use service::{NotificationService, ServiceError};
pub use triggers::{ScanOutcome, Triggers};
