//! Common data types

use serde::{Deserialize, Serialize};

/// Browser push subscription as stored by the web client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
	/// Push service endpoint URL
	pub endpoint: String,
	/// Expiration time reported by the browser (Unix timestamp in ms)
	#[serde(rename = "expirationTime", default, skip_serializing_if = "Option::is_none")]
	pub expiration_time: Option<i64>,
	pub keys: PushSubscriptionKeys,
}

/// Subscription keys (both base64url encoded)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscriptionKeys {
	/// P-256 ECDH public key of the user agent
	pub p256dh: String,
	/// Authentication secret
	pub auth: String,
}

impl PushSubscription {
	/// Names of the required fields that are empty
	pub fn missing_fields(&self) -> Vec<&'static str> {
		let mut missing = Vec::new();
		if self.endpoint.is_empty() {
			missing.push("endpoint");
		}
		if self.keys.p256dh.is_empty() {
			missing.push("keys.p256dh");
		}
		if self.keys.auth.is_empty() {
			missing.push("keys.auth");
		}
		missing
	}

	/// All of `endpoint`, `keys.p256dh` and `keys.auth` are non-empty
	pub fn is_complete(&self) -> bool {
		self.missing_fields().is_empty()
	}
}

/// Notification payload delivered to every subscription of a broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
	pub title: String,
	pub body: String,
}

impl NotificationPayload {
	pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
		Self { title: title.into(), body: body.into() }
	}
}

/// Outcome counters of a single broadcast pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
	/// Entries found under `subscriptions`
	pub total: usize,
	/// Valid entries handed to the push sender
	pub attempted: usize,
	/// Deliveries accepted by the push service
	pub sent: usize,
	/// Entries that failed to decode or validate
	pub skipped: usize,
	/// Deliveries that failed with a temporary or permanent error
	pub failed: usize,
	/// Deliveries rejected because the subscription no longer exists
	pub gone: usize,
}


// vim: ts=4
