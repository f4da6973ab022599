//! Test doubles for the store and the push service

#![allow(dead_code, clippy::panic, clippy::expect_used, clippy::unwrap_used)]

use async_trait::async_trait;
use iotlink::{
	Error, IlResult, IotLink, IotLinkState, NotificationPayload, PushResult, PushSender,
	PushSubscription, StoreAdapter,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

/// In-memory JSON tree addressed by slash separated paths
#[derive(Debug, Default)]
pub struct MemoryStore {
	root: Mutex<Value>,
	fail_reads: AtomicBool,
	fail_writes: AtomicBool,
	deleted: Mutex<Vec<String>>,
}

impl MemoryStore {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn with_root(root: Value) -> Arc<Self> {
		let store = Self::default();
		*store.root.lock().expect("lock") = root;
		Arc::new(store)
	}

	pub fn fail_reads(&self, fail: bool) {
		self.fail_reads.store(fail, Ordering::SeqCst);
	}

	pub fn fail_writes(&self, fail: bool) {
		self.fail_writes.store(fail, Ordering::SeqCst);
	}

	pub fn snapshot(&self) -> Value {
		self.root.lock().expect("lock").clone()
	}

	pub fn deleted(&self) -> Vec<String> {
		self.deleted.lock().expect("lock").clone()
	}
}

fn segments(path: &str) -> Vec<&str> {
	path.split('/').filter(|s| !s.is_empty()).collect()
}

fn set_node(root: &mut Value, segments: &[&str], value: Value) {
	let Some((first, rest)) = segments.split_first() else {
		*root = value;
		return;
	};
	if !root.is_object() {
		*root = json!({});
	}
	if let Some(obj) = root.as_object_mut() {
		let child = obj.entry((*first).to_string()).or_insert(Value::Null);
		set_node(child, rest, value);
	}
}

#[async_trait]
impl StoreAdapter for MemoryStore {
	async fn get(&self, path: &str) -> IlResult<Value> {
		if self.fail_reads.load(Ordering::SeqCst) {
			return Err(Error::NetworkError("connection refused".into()));
		}
		let root = self.root.lock().expect("lock");
		let mut cur = &*root;
		for segment in segments(path) {
			match cur.get(segment) {
				Some(child) => cur = child,
				None => return Ok(Value::Null),
			}
		}
		Ok(cur.clone())
	}

	async fn set(&self, path: &str, value: &Value) -> IlResult<()> {
		if self.fail_writes.load(Ordering::SeqCst) {
			return Err(Error::Unauthorized);
		}
		let mut root = self.root.lock().expect("lock");
		set_node(&mut root, &segments(path), value.clone());
		Ok(())
	}

	async fn delete(&self, path: &str) -> IlResult<()> {
		let segs = segments(path);
		if let Some((last, parents)) = segs.split_last() {
			let mut root = self.root.lock().expect("lock");
			let mut cur = &mut *root;
			for segment in parents {
				match cur.get_mut(*segment) {
					Some(child) => cur = child,
					None => return Ok(()),
				}
			}
			if let Some(obj) = cur.as_object_mut() {
				obj.remove(*last);
			}
		}
		self.deleted.lock().expect("lock").push(path.to_string());
		Ok(())
	}
}

/// Push sender recording every delivery attempt
#[derive(Debug, Default)]
pub struct RecordingSender {
	results: HashMap<String, PushResult>,
	sent: Mutex<Vec<(String, NotificationPayload)>>,
}

impl RecordingSender {
	/// Every endpoint succeeds
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Endpoints listed in `results` answer with the given result, others succeed
	pub fn with_results(results: &[(&str, PushResult)]) -> Arc<Self> {
		Arc::new(Self {
			results: results.iter().map(|(e, r)| ((*e).to_string(), r.clone())).collect(),
			sent: Mutex::new(Vec::new()),
		})
	}

	pub fn endpoints(&self) -> Vec<String> {
		let mut endpoints: Vec<String> =
			self.sent.lock().expect("lock").iter().map(|(e, _)| e.clone()).collect();
		endpoints.sort();
		endpoints
	}

	pub fn payloads(&self) -> Vec<NotificationPayload> {
		self.sent.lock().expect("lock").iter().map(|(_, p)| p.clone()).collect()
	}
}

#[async_trait]
impl PushSender for RecordingSender {
	async fn send(
		&self,
		subscription: &PushSubscription,
		payload: &NotificationPayload,
	) -> PushResult {
		self.sent.lock().expect("lock").push((subscription.endpoint.clone(), payload.clone()));
		self.results.get(&subscription.endpoint).cloned().unwrap_or(PushResult::Success)
	}
}

pub fn flat_subscription(endpoint: &str) -> Value {
	json!({
		"endpoint": endpoint,
		"expirationTime": null,
		"keys": {
			"p256dh": "BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM",
			"auth": "tBHItJI5svbpez7KI4CCXg"
		}
	})
}

pub fn enveloped_subscription(endpoint: &str) -> Value {
	json!({
		"subscription": flat_subscription(endpoint),
		"createdAt": "2025-01-04T10:00:00.000Z"
	})
}

pub fn link_with(store: Arc<MemoryStore>, sender: Option<Arc<RecordingSender>>) -> IotLink {
	let mut builder = IotLinkState::builder();
	builder.store(store);
	if let Some(sender) = sender {
		builder.push_sender(sender);
	}
	builder.build().expect("link")
}

// vim: ts=4
