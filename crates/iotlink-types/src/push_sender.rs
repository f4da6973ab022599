//! Push Sender
//!
//! Trait for delivering a notification payload to a single push subscription.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::types::{NotificationPayload, PushSubscription};

/// Result of sending a push notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushResult {
	/// Successfully sent
	Success,
	/// Subscription is no longer valid (404/410 from the push service)
	SubscriptionGone,
	/// Temporary error (network, 5xx)
	TemporaryError(String),
	/// Permanent error (bad keys, 4xx)
	PermanentError(String),
}

#[async_trait]
pub trait PushSender: Debug + Send + Sync {
	async fn send(&self, subscription: &PushSubscription, payload: &NotificationPayload)
	-> PushResult;
}

// vim: ts=4
