//! Realtime Store Adapter
//!
//! Trait for path-addressed JSON document stores (e.g. `devices/thermostat`).
//! Paths are slash separated and never start or end with a slash.
//!
//! A node that does not exist reads as `Value::Null`. Writes replace the whole node.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	/// Reads the node at `path`, `Value::Null` if absent
	async fn get(&self, path: &str) -> IlResult<Value>;

	/// Replaces the node at `path` with `value`
	async fn set(&self, path: &str, value: &Value) -> IlResult<()>;

	/// Removes the node at `path`. Removing an absent node is not an error.
	async fn delete(&self, path: &str) -> IlResult<()>;
}

/// Joins path segments, dropping empty ones and stray slashes
pub fn join_path(segments: &[&str]) -> String {
	segments
		.iter()
		.map(|s| s.trim_matches('/'))
		.filter(|s| !s.is_empty())
		.collect::<Vec<_>>()
		.join("/")
}


// vim: ts=4
