pub use iotlink_types::prelude::*;
pub use iotlink_types::types::{NotificationPayload, PushSubscription, PushSubscriptionKeys};

// vim: ts=4
