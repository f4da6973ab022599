//! Notification broadcast

use iotlink_push::BroadcastOpts;
use iotlink_types::types::{BroadcastReport, NotificationPayload};

use crate::app::IotLinkState;
use crate::prelude::*;

impl IotLinkState {
	/// Send `{title, body}` to every stored subscription
	///
	/// Returns `false` only if the subscriptions could not be read or push is not
	/// configured. Individual delivery failures are logged and do not change the
	/// result; see [`broadcast`](Self::broadcast) for the per-entry counters.
	pub async fn push_message(&self, title: &str, body: &str) -> bool {
		self.broadcast(title, body).await.is_ok()
	}

	pub async fn broadcast(&self, title: &str, body: &str) -> IlResult<BroadcastReport> {
		let payload = NotificationPayload::new(title, body);
		let opts = BroadcastOpts { prune_gone: self.opts.prune_gone_subscriptions };

		iotlink_push::broadcast(self.store.as_ref(), self.push_sender.as_deref(), &payload, opts)
			.await
	}
}

// vim: ts=4
