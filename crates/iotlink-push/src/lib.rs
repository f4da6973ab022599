//! Push notification module
//!
//! Broadcasts Web Push notifications to the subscriptions web clients left in the store.
//!
//! # Features
//!
//! - Decoding of flat and enveloped subscription entries
//! - VAPID authentication (RFC 8292)
//! - Web Push encryption (RFC 8188, 8291)
//! - Best-effort broadcast with per-entry outcome counters
//! - Optional pruning of subscriptions the push service reports as gone

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod broadcast;
pub mod send;
pub mod subscription;

mod prelude;

pub use broadcast::{BroadcastOpts, SUBSCRIPTIONS_PATH, broadcast, fetch_subscriptions};
pub use send::{WebPushSender, validate_vapid_keys};
pub use subscription::{DecodedSubscription, InvalidSubscription};

// vim: ts=4
