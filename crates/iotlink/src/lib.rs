//! iotlink connects a home-automation device registry to two external services:
//! a realtime document store holding device state, and Web Push for user
//! notifications.
//!
//! ```no_run
//! # async fn run() -> iotlink::IlResult<()> {
//! let link = iotlink::IotLinkState::from_env().await?;
//! link.set_data("thermostat", &serde_json::json!({ "temp": 21.5 })).await;
//! link.push_message("Hello", "Test push from home server").await;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod device;
pub mod push;

mod prelude;

pub use app::{IotLink, IotLinkBuilder, IotLinkOpts, IotLinkState};
pub use device::DEVICES_PATH;
pub use iotlink_push::SUBSCRIPTIONS_PATH;
pub use iotlink_types::config::{StoreConfig, VapidConfig};
pub use iotlink_types::error::{Error, IlResult};
pub use iotlink_types::push_sender::{PushResult, PushSender};
pub use iotlink_types::store_adapter::StoreAdapter;
pub use iotlink_types::types::{
	BroadcastReport, NotificationPayload, PushSubscription, PushSubscriptionKeys,
};

/// Install the global tracing subscriber, filtered by `RUST_LOG`
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.try_init();
}

// vim: ts=4
