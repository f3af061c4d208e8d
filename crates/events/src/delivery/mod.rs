//! Interruptive delivery channels for notifications.
//!
//! This module provides the push-gateway and email senders used when a
//! notification should reach the recipient immediately. Both are optional:
//! unconfigured channels degrade to persistence-only delivery.

pub mod email;
pub mod push;
