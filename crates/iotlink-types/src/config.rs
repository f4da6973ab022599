//! Environment based configuration
//!
//! Two groups of settings are read from the process environment:
//!
//! - store settings (`GOOGLE_APPLICATION_CREDENTIALS`, `FIREBASE_DATABASE_URL`), required
//!   to construct any store handle
//! - VAPID settings (`VAPID_PUBLIC_KEY`, `VAPID_PRIVATE_KEY`, `VAPID_SUBJECT`), required
//!   only for broadcasting notifications
//!
//! Every loader also has a `from_lookup` variant taking an arbitrary key lookup, so
//! configuration can come from somewhere other than `std::env`.

use std::path::PathBuf;

use crate::prelude::*;

pub const ENV_CREDENTIALS_FILE: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const ENV_DATABASE_URL: &str = "FIREBASE_DATABASE_URL";
pub const ENV_VAPID_PUBLIC_KEY: &str = "VAPID_PUBLIC_KEY";
pub const ENV_VAPID_PRIVATE_KEY: &str = "VAPID_PRIVATE_KEY";
pub const ENV_VAPID_SUBJECT: &str = "VAPID_SUBJECT";

/// Lookup backed by the process environment
pub fn env_lookup(key: &str) -> Option<String> {
	std::env::var(key).ok()
}

/// Read a required value, treating blank strings as missing
fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> IlResult<String> {
	match lookup(key) {
		Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
		_ => Err(Error::ConfigError(format!("{} is not set", key))),
	}
}

/// Realtime store connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
	/// Path of the service account credential file
	pub credentials_file: PathBuf,
	/// Base URL of the database, e.g. `https://my-project.firebaseio.com`
	pub database_url: Box<str>,
}

impl StoreConfig {
	pub fn from_env() -> IlResult<Self> {
		Self::from_lookup(env_lookup)
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> IlResult<Self> {
		let credentials_file = required(&lookup, ENV_CREDENTIALS_FILE)?;
		let database_url = required(&lookup, ENV_DATABASE_URL)?;

		if !database_url.starts_with("https://") && !database_url.starts_with("http://") {
			return Err(Error::ConfigError(format!(
				"{} must be an http(s) URL, got '{}'",
				ENV_DATABASE_URL, database_url
			)));
		}

		Ok(Self {
			credentials_file: PathBuf::from(credentials_file),
			database_url: database_url.trim_end_matches('/').into(),
		})
	}
}

/// VAPID credentials used to authenticate against push services (RFC 8292)
#[derive(Clone, PartialEq, Eq)]
pub struct VapidConfig {
	/// Uncompressed P-256 public key, base64url encoded
	pub public_key: Box<str>,
	/// Raw 32-byte P-256 private scalar, base64url encoded
	pub private_key: Box<str>,
	/// Contact URI sent as the JWT `sub` claim
	pub subject: Box<str>,
}

impl VapidConfig {
	pub fn from_env() -> IlResult<Self> {
		Self::from_lookup(env_lookup)
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> IlResult<Self> {
		let public_key = required(&lookup, ENV_VAPID_PUBLIC_KEY)?;
		let private_key = required(&lookup, ENV_VAPID_PRIVATE_KEY)?;
		let subject = required(&lookup, ENV_VAPID_SUBJECT)?;

		Ok(Self {
			public_key: public_key.into(),
			private_key: private_key.into(),
			subject: normalize_subject(&subject).into(),
		})
	}
}

// The private key must never end up in logs
impl std::fmt::Debug for VapidConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VapidConfig")
			.field("public_key", &self.public_key)
			.field("private_key", &"<redacted>")
			.field("subject", &self.subject)
			.finish()
	}
}

/// Push services expect a `mailto:` or `https:` URI as subject
fn normalize_subject(subject: &str) -> String {
	if subject.starts_with("mailto:") || subject.starts_with("https:") || !subject.contains('@') {
		subject.to_string()
	} else {
		format!("mailto:{}", subject)
	}
}


// vim: ts=4
