//! Interruptive delivery dispatch.
//!
//! [`DeliveryDispatcher`] consumes the feed and forwards newly inserted
//! notifications to the configured external channels. Persistence and the
//! live feed never wait on it: a push gateway outage or an unset SMTP host
//! degrades delivery to in-app only.
//!
//! Gating happens at send time against the recipient's resolved
//! preferences: the category toggle must be on, the quiet window must not
//! cover the current instant, reminders must have entered the recipient's
//! own lead window, and each channel fires only when its toggle is on.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use paddock_core::types::Timestamp;
use paddock_core::NotificationKind;
use paddock_db::models::notification::Notification;
use paddock_db::models::preferences::DeliveryPreferences;
use paddock_db::Store;
use paddock_events::{EmailConfig, EmailDelivery, FeedAction, FeedEvent, PushConfig, PushDelivery};

use crate::prefs::PreferencesResolver;

/// Forwards inserted notifications to push and email channels.
pub struct DeliveryDispatcher {
    store: Arc<dyn Store>,
    prefs: PreferencesResolver,
    push: Option<PushDelivery>,
    email: Option<EmailDelivery>,
}

impl DeliveryDispatcher {
    /// Build a dispatcher from environment configuration.
    ///
    /// Unconfigured channels are reported once here and skipped on every
    /// subsequent event.
    pub fn from_env(store: Arc<dyn Store>) -> Self {
        let push = match PushConfig::from_env() {
            Some(config) => {
                tracing::info!(gateway = %config.gateway_url, "Push delivery enabled");
                Some(PushDelivery::new(config))
            }
            None => {
                tracing::info!("Push delivery disabled (PUSH_GATEWAY_URL not set)");
                None
            }
        };
        let email = match EmailConfig::from_env() {
            Some(config) => {
                tracing::info!(host = %config.smtp_host, "Email delivery enabled");
                Some(EmailDelivery::new(config))
            }
            None => {
                tracing::info!("Email delivery disabled (SMTP_HOST not set)");
                None
            }
        };
        Self {
            prefs: PreferencesResolver::new(Arc::clone(&store)),
            store,
            push,
            email,
        }
    }

    /// Consume feed events until cancelled.
    ///
    /// On cancellation, events already queued on the receiver are drained
    /// and dispatched before returning.
    pub async fn run(self, mut rx: broadcast::Receiver<FeedEvent>, cancel: CancellationToken) {
        tracing::info!("Delivery dispatcher started");
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    loop {
                        match rx.try_recv() {
                            Ok(event) => self.handle(&event).await,
                            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                                tracing::warn!(skipped, "Delivery dispatcher lagged during drain");
                            }
                            Err(_) => break,
                        }
                    }
                    tracing::info!("Delivery dispatcher stopping");
                    break;
                }
                result = rx.recv() => {
                    match result {
                        Ok(event) => self.handle(&event).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Delivery dispatcher lagged, notifications not delivered externally");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Feed closed, delivery dispatcher stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Dispatch one feed event. Only inserts leave the process.
    async fn handle(&self, event: &FeedEvent) {
        if event.action != FeedAction::Insert {
            return;
        }
        self.dispatch(&event.record, Utc::now()).await;
    }

    async fn dispatch(&self, notification: &Notification, now: DateTime<Utc>) {
        if self.push.is_none() && self.email.is_none() {
            return;
        }
        let Some(prefs) = self.send_gate(notification, now).await else {
            return;
        };

        if prefs.push_enabled {
            if let Some(push) = &self.push {
                if let Err(error) = push.deliver(notification).await {
                    tracing::warn!(
                        notification_id = notification.id,
                        %error,
                        "Push delivery failed"
                    );
                }
            }
        }

        if prefs.email_enabled {
            if let Some(email) = &self.email {
                if let Some(address) = self.email_address(notification).await {
                    if let Err(error) = email.deliver(&address, notification).await {
                        tracing::warn!(
                            notification_id = notification.id,
                            %error,
                            "Email delivery failed"
                        );
                    }
                }
            }
        }
    }

    /// Resolve the recipient's preferences when interruptive delivery may
    /// proceed right now.
    ///
    /// `None` when the category is off, the quiet window covers `now`, or
    /// a reminder's due instant is still outside the recipient's own lead
    /// window. The channel toggles are left to the caller.
    async fn send_gate(
        &self,
        notification: &Notification,
        now: DateTime<Utc>,
    ) -> Option<DeliveryPreferences> {
        let prefs = match self.prefs.get_or_create(notification.user_id).await {
            Ok(prefs) => prefs,
            Err(error) => {
                tracing::warn!(
                    user_id = notification.user_id,
                    %error,
                    "Preference lookup failed, skipping interruptive delivery"
                );
                return None;
            }
        };
        if !prefs.accepts(notification.kind) {
            return None;
        }
        if prefs.is_quiet_at(now.time()) {
            return None;
        }
        if !within_reminder_window(&prefs, notification, now) {
            return None;
        }
        Some(prefs)
    }

    /// The address to email this notification to, when the recipient has
    /// one on file.
    async fn email_address(&self, notification: &Notification) -> Option<String> {
        match self.store.user(notification.user_id).await {
            Ok(Some(user)) => user.email,
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(
                    user_id = notification.user_id,
                    %error,
                    "User lookup failed, skipping email"
                );
                None
            }
        }
    }
}

/// Reminders carry their due instant in the payload; they are pushed only
/// once the recipient's own lead window reaches it. The scan's wider
/// engine-level window decides when the row is created, not when it
/// interrupts. Every other kind is immediate, as is a reminder whose
/// payload lacks a parseable due instant.
fn within_reminder_window(
    prefs: &DeliveryPreferences,
    notification: &Notification,
    now: DateTime<Utc>,
) -> bool {
    if !matches!(
        notification.kind,
        NotificationKind::ActivityReminder | NotificationKind::ScheduleReminder
    ) {
        return true;
    }
    let Some(due_at) = reminder_due_at(notification) else {
        return true;
    };
    due_at - now <= Duration::minutes(i64::from(prefs.reminder_lead_minutes))
}

fn reminder_due_at(notification: &Notification) -> Option<Timestamp> {
    let value = notification.payload.get("due_at")?.clone();
    serde_json::from_value(value).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
