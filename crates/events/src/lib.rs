//! Paddock realtime fan-out and delivery infrastructure.
//!
//! This crate provides the building blocks that move notifications from the
//! store to connected clients and external channels:
//!
//! - [`NotificationHub`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, with per-recipient filtered subscriptions.
//! - [`FeedEvent`] — the mutation envelope (insert/update/delete plus the
//!   affected row) published on every notification store change.
//! - [`NotificationFeed`] — client-side ordered cache with a derived unread
//!   count and optimistic mutations.
//! - [`delivery`] — interruptive delivery channels (push gateway, email).

pub mod delivery;
pub mod feed;
pub mod hub;

pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::push::{PushConfig, PushDelivery};
pub use feed::{FeedBackend, FeedError, NotificationFeed};
pub use hub::{FeedAction, FeedEvent, FeedSubscription, NotificationHub};
