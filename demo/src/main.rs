//! Writes one device record and broadcasts a test notification
//!
//! Reads its configuration from the environment, see `iotlink::StoreConfig` and
//! `iotlink::VapidConfig`.

use serde_json::json;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
	iotlink::init_tracing();

	let link = match iotlink::IotLinkState::from_env().await {
		Ok(link) => link,
		Err(e) => {
			error!(error = %e, "Cannot connect to the store");
			std::process::exit(1);
		}
	};

	let thermostat = json!({
		"icon": "thermostat",
		"temp": 21.5,
		"last": chrono::Utc::now().to_rfc3339(),
	});
	if link.set_data("thermostat", &thermostat).await {
		info!("Thermostat state written");
	} else {
		warn!("Thermostat state not written");
	}

	match link.broadcast("Hello", "Test push from home server").await {
		Ok(report) => info!(
			sent = report.sent,
			skipped = report.skipped,
			failed = report.failed,
			"Test notification broadcast"
		),
		Err(e) => warn!(error = %e, "Test notification not sent"),
	}
}

// vim: ts=4
