//! Device state persistence
//!
//! Each device owns the node `devices/{name}`. A write replaces the whole node;
//! nothing is kept locally.

use serde::Serialize;
use serde_json::Value;

use crate::app::IotLinkState;
use crate::prelude::*;
use iotlink_types::store_adapter::join_path;

/// Store node holding device records, keyed by device name
pub const DEVICES_PATH: &str = "devices";

impl IotLinkState {
	/// Write `data` as the state of device `name`, `true` if the store accepted it
	///
	/// Failures are logged; use [`try_set_data`](Self::try_set_data) to get the error.
	pub async fn set_data<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> bool {
		match self.try_set_data(name, data).await {
			Ok(()) => true,
			Err(e) => {
				error!(device = %name, error = %e, "Writing device state failed");
				false
			}
		}
	}

	pub async fn try_set_data<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> IlResult<()> {
		if name.is_empty() {
			// Resolves to the whole devices node
			warn!("Device name is empty, overwriting '{}'", DEVICES_PATH);
		}
		let value = serde_json::to_value(data)?;
		self.store.set(&join_path(&[DEVICES_PATH, name]), &value).await?;
		debug!(device = %name, "Device state written");
		Ok(())
	}

	/// Current state of device `name`, `Value::Null` if it was never written
	pub async fn get_data(&self, name: &str) -> IlResult<Value> {
		self.store.get(&join_path(&[DEVICES_PATH, name])).await
	}
}

// vim: ts=4
