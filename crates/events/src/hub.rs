//! In-process notification fan-out backed by a `tokio::sync::broadcast` channel.
//!
//! [`NotificationHub`] is the central publish/subscribe hub for [`FeedEvent`]s.
//! It is shared via `Arc<NotificationHub>` across the application; every store
//! mutation publishes here, and each connected client holds a
//! [`FeedSubscription`] filtered to its own rows.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use paddock_core::types::DbId;
use paddock_db::models::notification::Notification;

// ---------------------------------------------------------------------------
// FeedEvent
// ---------------------------------------------------------------------------

/// The kind of store mutation an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedAction {
    Insert,
    Update,
    Delete,
}

/// A notification store mutation, published once per affected row.
///
/// Delete events carry the row as it was at deletion time so clients can
/// adjust derived state (e.g. unread counts) without a refetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEvent {
    #[serde(rename = "type")]
    pub action: FeedAction,
    pub record: Notification,
}

impl FeedEvent {
    pub fn insert(record: Notification) -> Self {
        Self {
            action: FeedAction::Insert,
            record,
        }
    }

    pub fn update(record: Notification) -> Self {
        Self {
            action: FeedAction::Update,
            record,
        }
    }

    pub fn delete(record: Notification) -> Self {
        Self {
            action: FeedAction::Delete,
            record,
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationHub
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out hub for notification mutations.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`FeedEvent`]. Delivery is
/// best-effort: slow receivers that overflow the buffer lose the oldest
/// events and are expected to recover with a pull-based refresh.
pub struct NotificationHub {
    sender: broadcast::Sender<FeedEvent>,
}

impl NotificationHub {
    /// Create a hub with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// the row is already persisted, so nothing is lost.
    pub fn publish(&self, event: FeedEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to the raw, unfiltered event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.sender.subscribe()
    }

    /// Subscribe on behalf of one recipient, optionally widened to every
    /// event tagged with one farm.
    pub fn subscribe_for(&self, user_id: DbId, farm_id: Option<DbId>) -> FeedSubscription {
        FeedSubscription {
            rx: self.sender.subscribe(),
            user_id,
            farm_id,
        }
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// FeedSubscription
// ---------------------------------------------------------------------------

/// A filtered view of the hub's event stream for one connected client.
///
/// An event passes the filter when it is addressed to the subscriber, or
/// when the subscription is farm-scoped and the event is tagged with that
/// farm.
pub struct FeedSubscription {
    rx: broadcast::Receiver<FeedEvent>,
    user_id: DbId,
    farm_id: Option<DbId>,
}

impl FeedSubscription {
    fn matches(&self, event: &FeedEvent) -> bool {
        if event.record.user_id == self.user_id {
            return true;
        }
        self.farm_id.is_some() && event.record.farm_id == self.farm_id
    }

    /// Receive the next event that passes this subscription's filter.
    ///
    /// Returns `None` once the hub is dropped. Lagged stretches are logged
    /// and skipped; the client refetches on its next full refresh.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Feed subscriber lagged, dropped events");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use paddock_core::{NotificationKind, Priority};

    fn notification(id: DbId, user_id: DbId, farm_id: Option<DbId>) -> Notification {
        Notification {
            id,
            user_id,
            farm_id,
            kind: NotificationKind::MemberJoined,
            title: "New member".to_string(),
            message: "Someone joined the farm".to_string(),
            payload: serde_json::json!({}),
            priority: Priority::Normal,
            related_entity_type: None,
            related_entity_id: None,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscriber_receives_own_events_only() {
        let hub = NotificationHub::default();
        let mut sub = hub.subscribe_for(1, None);

        hub.publish(FeedEvent::insert(notification(10, 2, Some(5))));
        hub.publish(FeedEvent::insert(notification(11, 1, Some(5))));

        let event = sub.recv().await.expect("should receive the own-row event");
        assert_eq!(event.action, FeedAction::Insert);
        assert_eq!(event.record.id, 11);
    }

    #[tokio::test]
    async fn farm_scoped_subscription_sees_farm_tagged_events() {
        let hub = NotificationHub::default();
        let mut sub = hub.subscribe_for(1, Some(5));

        // Addressed to another member, but tagged with the watched farm.
        hub.publish(FeedEvent::update(notification(20, 2, Some(5))));

        let event = sub.recv().await.expect("farm-tagged event should pass");
        assert_eq!(event.action, FeedAction::Update);
        assert_eq!(event.record.id, 20);
    }

    #[tokio::test]
    async fn unscoped_subscription_ignores_other_farms() {
        let hub = NotificationHub::default();
        let mut sub = hub.subscribe_for(1, None);

        hub.publish(FeedEvent::insert(notification(30, 2, None)));
        hub.publish(FeedEvent::delete(notification(31, 1, None)));

        let event = sub.recv().await.expect("own delete should pass");
        assert_eq!(event.action, FeedAction::Delete);
        assert_eq!(event.record.id, 31);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let hub = NotificationHub::default();
        // No subscribers — this must not panic.
        hub.publish(FeedEvent::insert(notification(1, 1, None)));
    }

    #[test]
    fn event_serializes_with_wire_field_names() {
        let event = FeedEvent::insert(notification(1, 1, None));
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "Insert");
        assert!(json["record"]["id"].is_number());
    }
}
