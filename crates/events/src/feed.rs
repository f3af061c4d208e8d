//! Client-side notification cache with optimistic mutations.
//!
//! [`NotificationFeed`] holds the session's notifications ordered newest
//! first, plus a derived unread count. Realtime [`FeedEvent`]s are layered
//! onto the cache as incremental hints, deduplicated by id; a pull-based
//! [`refresh`](NotificationFeed::refresh) through the [`FeedBackend`] is the
//! source of truth on reconnect.
//!
//! Mutations are optimistic: local state changes first, then the backend
//! call runs. A failed call is surfaced to the caller but the local change
//! is kept; consistency is restored by the next full refresh.

use async_trait::async_trait;
use chrono::NaiveTime;

use paddock_core::types::DbId;
use paddock_db::models::notification::Notification;
use paddock_db::models::preferences::DeliveryPreferences;

use crate::hub::{FeedAction, FeedEvent};

// ---------------------------------------------------------------------------
// FeedBackend
// ---------------------------------------------------------------------------

/// Error from a backend call, carried as a display string.
#[derive(Debug, thiserror::Error)]
#[error("feed backend error: {0}")]
pub struct FeedError(pub String);

/// Server operations the feed mirrors.
///
/// The production implementation calls the notification HTTP endpoints;
/// tests substitute a recording fake.
#[async_trait]
pub trait FeedBackend: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Notification>, FeedError>;
    async fn mark_read(&self, id: DbId) -> Result<(), FeedError>;
    async fn mark_all_read(&self) -> Result<(), FeedError>;
    async fn delete(&self, id: DbId) -> Result<(), FeedError>;
    async fn clear_all(&self) -> Result<(), FeedError>;
}

// ---------------------------------------------------------------------------
// NotificationFeed
// ---------------------------------------------------------------------------

/// Ordered cache of one recipient's notifications.
pub struct NotificationFeed<B> {
    backend: B,
    items: Vec<Notification>,
    preferences: Option<DeliveryPreferences>,
}

impl<B: FeedBackend> NotificationFeed<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            items: Vec::new(),
            preferences: None,
        }
    }

    /// Install the preferences snapshot used to gate interruptive
    /// presentation. Until set, nothing interrupts.
    pub fn set_preferences(&mut self, preferences: DeliveryPreferences) {
        self.preferences = Some(preferences);
    }

    /// Current items, newest first.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Derived unread count.
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    /// Replace the cache with the server's full list.
    pub async fn refresh(&mut self) -> Result<(), FeedError> {
        self.items = self.backend.fetch().await?;
        Ok(())
    }

    /// Layer one realtime event onto the cache.
    ///
    /// Inserts are deduplicated by id to tolerate duplicate delivery;
    /// updates for unknown ids are ignored (the next refresh catches up).
    pub fn apply(&mut self, event: FeedEvent) {
        match event.action {
            FeedAction::Insert => {
                if !self.items.iter().any(|n| n.id == event.record.id) {
                    self.items.insert(0, event.record);
                }
            }
            FeedAction::Update => {
                if let Some(existing) =
                    self.items.iter_mut().find(|n| n.id == event.record.id)
                {
                    *existing = event.record;
                }
            }
            FeedAction::Delete => {
                self.items.retain(|n| n.id != event.record.id);
            }
        }
    }

    /// Whether an incoming notification should interrupt (toast/sound) at
    /// the given local time-of-day.
    pub fn should_interrupt(&self, incoming: &Notification, at: NaiveTime) -> bool {
        match &self.preferences {
            Some(prefs) => prefs.accepts(incoming.kind) && !prefs.is_quiet_at(at),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Optimistic mutations
    // -----------------------------------------------------------------------

    /// Mark one item read locally, then on the server.
    pub async fn mark_read(&mut self, id: DbId) -> Result<(), FeedError> {
        if let Some(item) = self.items.iter_mut().find(|n| n.id == id) {
            item.is_read = true;
        }
        self.backend.mark_read(id).await.map_err(|error| {
            tracing::warn!(id, %error, "mark-read failed, keeping local state");
            error
        })
    }

    /// Mark every item read locally, then on the server.
    pub async fn mark_all_read(&mut self) -> Result<(), FeedError> {
        for item in &mut self.items {
            item.is_read = true;
        }
        self.backend.mark_all_read().await.map_err(|error| {
            tracing::warn!(%error, "mark-all-read failed, keeping local state");
            error
        })
    }

    /// Remove one item locally, then on the server.
    pub async fn delete(&mut self, id: DbId) -> Result<(), FeedError> {
        self.items.retain(|n| n.id != id);
        self.backend.delete(id).await.map_err(|error| {
            tracing::warn!(id, %error, "delete failed, keeping local state");
            error
        })
    }

    /// Clear the cache locally, then on the server.
    pub async fn clear_all(&mut self) -> Result<(), FeedError> {
        self.items.clear();
        self.backend.clear_all().await.map_err(|error| {
            tracing::warn!(%error, "clear-all failed, keeping local state");
            error
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
