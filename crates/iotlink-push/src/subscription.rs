//! Decoding of stored push subscriptions
//!
//! Web clients store their subscription under `subscriptions/{id}` in one of two layouts:
//!
//! - flat: `{"endpoint": "...", "keys": {"p256dh": "...", "auth": "..."}}`
//! - enveloped: `{"subscription": {<flat>}, "createdAt": "..."}`
//!
//! An entry carrying `endpoint` or `keys` at the top level is treated as flat and must be
//! complete on its own. It never falls back to the envelope.

use serde::Deserialize;
use serde_json::Value;

use crate::prelude::*;

/// Result of decoding one stored subscription entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedSubscription {
	Flat(PushSubscription),
	Enveloped(PushSubscription),
	Invalid(InvalidSubscription),
}

impl DecodedSubscription {
	pub fn decode(raw: &Value) -> Self {
		let Some(obj) = raw.as_object() else {
			return Self::Invalid(InvalidSubscription::NotAnObject);
		};

		if obj.contains_key("endpoint") || obj.contains_key("keys") {
			return match decode_flat(raw) {
				Ok(sub) => Self::Flat(sub),
				Err(reason) => Self::Invalid(reason),
			};
		}

		match obj.get("subscription") {
			None | Some(Value::Null) => Self::Invalid(InvalidSubscription::NoSubscription),
			Some(inner) if !inner.is_object() => Self::Invalid(InvalidSubscription::Envelope(
				Box::new(InvalidSubscription::NotAnObject),
			)),
			Some(inner) => match decode_flat(inner) {
				Ok(sub) => Self::Enveloped(sub),
				Err(reason) => Self::Invalid(InvalidSubscription::Envelope(Box::new(reason))),
			},
		}
	}

	/// The usable subscription, if any
	pub fn into_subscription(self) -> Result<PushSubscription, InvalidSubscription> {
		match self {
			Self::Flat(sub) | Self::Enveloped(sub) => Ok(sub),
			Self::Invalid(reason) => Err(reason),
		}
	}
}

/// Why a stored entry could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSubscription {
	/// The entry is not a JSON object
	NotAnObject,
	/// A field has the wrong JSON type
	Malformed(String),
	/// Required fields are absent or empty
	MissingFields(Vec<&'static str>),
	/// Neither flat fields nor a `subscription` envelope present
	NoSubscription,
	/// The envelope was found but its inner subscription is invalid
	Envelope(Box<InvalidSubscription>),
}

impl std::fmt::Display for InvalidSubscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NotAnObject => write!(f, "not an object"),
			Self::Malformed(msg) => write!(f, "malformed: {}", msg),
			Self::MissingFields(fields) => write!(f, "missing fields: {}", fields.join(", ")),
			Self::NoSubscription => write!(f, "no subscription field"),
			Self::Envelope(inner) => write!(f, "envelope: {}", inner),
		}
	}
}

#[derive(Deserialize)]
struct RawSubscription {
	endpoint: Option<String>,
	#[serde(rename = "expirationTime")]
	expiration_time: Option<Value>,
	keys: Option<RawKeys>,
}

#[derive(Deserialize)]
struct RawKeys {
	p256dh: Option<String>,
	auth: Option<String>,
}

fn decode_flat(raw: &Value) -> Result<PushSubscription, InvalidSubscription> {
	let parsed = RawSubscription::deserialize(raw)
		.map_err(|e| InvalidSubscription::Malformed(e.to_string()))?;

	let (p256dh, auth) = parsed
		.keys
		.map(|k| (k.p256dh.unwrap_or_default(), k.auth.unwrap_or_default()))
		.unwrap_or_default();
	let subscription = PushSubscription {
		endpoint: parsed.endpoint.unwrap_or_default(),
		expiration_time: parsed.expiration_time.as_ref().and_then(Value::as_i64),
		keys: PushSubscriptionKeys { p256dh, auth },
	};

	if subscription.is_complete() {
		Ok(subscription)
	} else {
		Err(InvalidSubscription::MissingFields(subscription.missing_fields()))
	}
}


// vim: ts=4
