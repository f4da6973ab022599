//! App builder - constructs the iotlink handle
//!
//! The handle is built once at startup and passed to every call site. There is
//! no global client: without a store no handle exists, so no operation can run
//! against a half-configured process.

use std::sync::Arc;

use crate::prelude::*;
use iotlink_push::{WebPushSender, validate_vapid_keys};
use iotlink_store_adapter_firebase::FirebaseStore;
use iotlink_types::config::{StoreConfig, VapidConfig, env_lookup};
use iotlink_types::push_sender::PushSender;
use iotlink_types::store_adapter::StoreAdapter;

#[derive(Debug, Clone, Copy, Default)]
pub struct IotLinkOpts {
	/// Delete subscriptions the push service reports as gone
	pub prune_gone_subscriptions: bool,
}

#[derive(Debug)]
pub struct IotLinkState {
	pub(crate) store: Arc<dyn StoreAdapter>,
	pub(crate) push_sender: Option<Arc<dyn PushSender>>,
	pub(crate) opts: IotLinkOpts,
}

impl IotLinkState {
	/// Whether VAPID credentials were available at startup
	pub fn push_enabled(&self) -> bool {
		self.push_sender.is_some()
	}
}

pub type IotLink = Arc<IotLinkState>;

pub struct IotLinkBuilder {
	store: Option<Arc<dyn StoreAdapter>>,
	push_sender: Option<Arc<dyn PushSender>>,
	opts: IotLinkOpts,
}

impl IotLinkBuilder {
	pub fn new() -> Self {
		IotLinkBuilder { store: None, push_sender: None, opts: IotLinkOpts::default() }
	}

	// Adapters
	pub fn store(&mut self, store: Arc<dyn StoreAdapter>) -> &mut Self {
		self.store = Some(store);
		self
	}
	pub fn push_sender(&mut self, push_sender: Arc<dyn PushSender>) -> &mut Self {
		self.push_sender = Some(push_sender);
		self
	}

	// Opts
	pub fn prune_gone_subscriptions(&mut self, prune: bool) -> &mut Self {
		self.opts.prune_gone_subscriptions = prune;
		self
	}

	/// Firebase store from `StoreConfig`, push sender from `VapidConfig`
	///
	/// Store configuration is mandatory. Missing VAPID credentials only disable
	/// broadcasting, which then reports failure on every call.
	pub async fn from_env(&mut self) -> IlResult<&mut Self> {
		self.from_lookup(env_lookup).await
	}

	/// Like [`from_env`](Self::from_env), reading settings through `lookup`
	pub async fn from_lookup(
		&mut self,
		lookup: impl Fn(&str) -> Option<String>,
	) -> IlResult<&mut Self> {
		let store_config = StoreConfig::from_lookup(&lookup)?;
		let store = FirebaseStore::new(&store_config).await?;
		self.store(Arc::new(store));
		self.vapid_from_lookup(&lookup);
		Ok(self)
	}

	/// Install a Web Push sender if all VAPID settings are present
	///
	/// Keys that are set but unusable are logged and still installed; each
	/// delivery then fails on its own.
	pub fn vapid_from_lookup(&mut self, lookup: impl Fn(&str) -> Option<String>) -> &mut Self {
		match VapidConfig::from_lookup(lookup) {
			Ok(vapid) => {
				if let Err(e) = validate_vapid_keys(&vapid) {
					warn!(error = %e, "VAPID keys unusable, push deliveries will fail");
				}
				self.push_sender(Arc::new(WebPushSender::new(vapid)));
			}
			Err(e) => warn!(error = %e, "Push notifications disabled"),
		}
		self
	}

	pub fn build(&mut self) -> IlResult<IotLink> {
		let store = self
			.store
			.take()
			.ok_or_else(|| Error::ConfigError("no store adapter configured".into()))?;

		if self.push_sender.is_none() {
			info!("No push sender configured, broadcasts will fail");
		}

		Ok(Arc::new(IotLinkState { store, push_sender: self.push_sender.take(), opts: self.opts }))
	}
}

impl Default for IotLinkBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl IotLinkState {
	pub fn builder() -> IotLinkBuilder {
		IotLinkBuilder::new()
	}

	/// Build a handle from the process environment
	pub async fn from_env() -> IlResult<IotLink> {
		let mut builder = IotLinkBuilder::new();
		builder.from_env().await?;
		builder.build()
	}
}

// vim: ts=4
