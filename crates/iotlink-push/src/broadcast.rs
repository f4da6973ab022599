//! Broadcast a notification to every stored push subscription
//!
//! One linear pass over `subscriptions`: decode, validate, deliver. A bad or
//! failing entry is logged and skipped; it never stops the pass and is never
//! written back.

use serde_json::{Map, Value};

use crate::prelude::*;
use crate::subscription::DecodedSubscription;
use iotlink_types::push_sender::{PushResult, PushSender};
use iotlink_types::store_adapter::{StoreAdapter, join_path};
use iotlink_types::types::BroadcastReport;

/// Store node holding the subscriptions, keyed by client id
pub const SUBSCRIPTIONS_PATH: &str = "subscriptions";

#[derive(Debug, Clone, Copy, Default)]
pub struct BroadcastOpts {
	/// Delete subscriptions the push service reports as gone (404/410)
	pub prune_gone: bool,
}

/// Read all subscriptions as raw values
///
/// An absent node is an empty mapping. Anything but an object is an error.
pub async fn fetch_subscriptions(store: &dyn StoreAdapter) -> IlResult<Map<String, Value>> {
	match store.get(SUBSCRIPTIONS_PATH).await? {
		Value::Null => Ok(Map::new()),
		Value::Object(map) => Ok(map),
		other => Err(Error::ValidationError(format!(
			"'{}' is not an object: {}",
			SUBSCRIPTIONS_PATH, other
		))),
	}
}

/// Send `payload` to all valid subscriptions
///
/// Fails only if the subscriptions cannot be fetched or no sender is configured;
/// both are checked before any delivery. Per-entry outcomes are in the report.
pub async fn broadcast(
	store: &dyn StoreAdapter,
	sender: Option<&dyn PushSender>,
	payload: &NotificationPayload,
	opts: BroadcastOpts,
) -> IlResult<BroadcastReport> {
	let subscriptions = fetch_subscriptions(store).await.inspect_err(|e| {
		error!(error = %e, "Reading subscriptions failed");
	})?;

	let Some(sender) = sender else {
		error!("VAPID credentials not configured, not sending push notifications");
		return Err(Error::ConfigError("VAPID credentials not configured".into()));
	};

	let mut report = BroadcastReport { total: subscriptions.len(), ..BroadcastReport::default() };

	for (id, raw) in &subscriptions {
		let subscription = match DecodedSubscription::decode(raw).into_subscription() {
			Ok(subscription) => subscription,
			Err(reason) => {
				warn!(subscription_id = %id, reason = %reason, raw = %raw, "Invalid push subscription");
				report.skipped += 1;
				continue;
			}
		};

		report.attempted += 1;
		match sender.send(&subscription, payload).await {
			PushResult::Success => {
				report.sent += 1;
				debug!(subscription_id = %id, "Push notification sent");
			}
			PushResult::SubscriptionGone => {
				report.gone += 1;
				info!(subscription_id = %id, endpoint = %subscription.endpoint, "Push subscription gone");
				if opts.prune_gone {
					prune_subscription(store, id).await;
				}
			}
			PushResult::TemporaryError(e) => {
				report.failed += 1;
				warn!(subscription_id = %id, error = %e, raw = %raw, "Temporary push notification error");
			}
			PushResult::PermanentError(e) => {
				report.failed += 1;
				warn!(subscription_id = %id, error = %e, raw = %raw, "Permanent push notification error");
			}
		}
	}

	info!(
		total = report.total,
		sent = report.sent,
		skipped = report.skipped,
		failed = report.failed,
		gone = report.gone,
		"Broadcast finished"
	);

	Ok(report)
}

async fn prune_subscription(store: &dyn StoreAdapter, id: &str) {
	let path = join_path(&[SUBSCRIPTIONS_PATH, id]);
	match store.delete(&path).await {
		Ok(()) => info!(subscription_id = %id, "Deleted gone push subscription"),
		Err(e) => warn!(subscription_id = %id, error = %e, "Failed to delete gone push subscription"),
	}
}

// vim: ts=4
