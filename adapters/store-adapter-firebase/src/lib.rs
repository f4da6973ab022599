//! Firebase Realtime Database adapter
//!
//! Speaks the database's REST protocol: every node is addressable as
//! `{database_url}/{path}.json`, read with `GET`, replaced with `PUT`
//! and removed with `DELETE`.

#![forbid(unsafe_code)]

mod auth;
mod error;

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, StatusCode};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use serde_json::Value;
use url::Url;

use iotlink::config::StoreConfig;
use iotlink::prelude::*;
use iotlink::store_adapter::StoreAdapter;

pub use auth::{Credentials, ServiceAccountKey, TokenProvider};
pub use error::Error as FirebaseError;

pub(crate) type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Characters the database does not allow in keys
const FORBIDDEN_KEY_CHARS: &[char] = &['.', '$', '#', '[', ']'];

pub struct FirebaseStore {
	database_url: Url,
	tokens: TokenProvider,
	client: HttpsClient,
}

impl std::fmt::Debug for FirebaseStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FirebaseStore").field("database_url", &self.database_url.as_str()).finish()
	}
}

impl FirebaseStore {
	/// Connect using a service account credential file
	pub async fn new(config: &StoreConfig) -> IlResult<Self> {
		let key = ServiceAccountKey::from_file(&config.credentials_file).await?;
		info!(
			project_id = %key.project_id,
			client_email = %key.client_email,
			database_url = %config.database_url,
			"Firebase store configured"
		);
		Self::with_credentials(&config.database_url, Credentials::ServiceAccount(key))
	}

	pub fn with_credentials(database_url: &str, credentials: Credentials) -> IlResult<Self> {
		let database_url = Url::parse(database_url)
			.map_err(|e| Error::ConfigError(format!("invalid database URL '{}': {}", database_url, e)))?;
		if database_url.cannot_be_a_base() {
			return Err(Error::ConfigError(format!("invalid database URL '{}'", database_url)));
		}

		// Plain http is accepted for the local emulator
		let connector = HttpsConnectorBuilder::new()
			.with_webpki_roots()
			.https_or_http()
			.enable_http1()
			.enable_http2()
			.build();
		let client: HttpsClient = Client::builder(TokioExecutor::new()).build(connector);

		Ok(Self { database_url, tokens: TokenProvider::new(credentials), client })
	}

	/// REST URL of the node at `path`
	fn node_url(&self, path: &str) -> Result<Url, error::Error> {
		let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
		if let Some(bad) = segments.iter().find(|s| s.contains(FORBIDDEN_KEY_CHARS)) {
			return Err(error::Error::InvalidPath(format!(
				"'{}' contains one of . $ # [ ] in segment '{}'",
				path, bad
			)));
		}

		let mut url = self.database_url.clone();
		{
			let mut url_path = url
				.path_segments_mut()
				.map_err(|()| error::Error::InvalidPath("database URL cannot be a base".into()))?;
			url_path.pop_if_empty();
			match segments.split_last() {
				Some((last, parents)) => {
					url_path.extend(parents);
					url_path.push(&format!("{}.json", last));
				}
				None => {
					url_path.push(".json");
				}
			}
		}
		Ok(url)
	}

	async fn request(
		&self,
		method: Method,
		path: &str,
		body: Option<Vec<u8>>,
	) -> Result<Bytes, error::Error> {
		let mut url = self.node_url(path)?;
		if method != Method::GET {
			url.query_pairs_mut().append_pair("print", "silent");
		}

		let token = self.tokens.access_token(&self.client).await?;

		let request = hyper::Request::builder()
			.method(method.clone())
			.uri(url.as_str())
			.header("Authorization", format!("Bearer {}", token))
			.header("Content-Type", "application/json")
			.body(Full::new(body.map(Bytes::from).unwrap_or_default()))
			.map_err(|e| error::Error::Http(format!("request build error: {}", e)))?;

		let response = self.client.request(request).await?;
		let status = response.status();
		let bytes = response
			.into_body()
			.collect()
			.await
			.map_err(|e| error::Error::Http(e.to_string()))?
			.to_bytes();

		if !status.is_success() {
			return Err(error::Error::Status(status, response_error(&bytes)));
		}
		debug!(method = %method, path = %path, status = %status, "Store request done");
		Ok(bytes)
	}
}

/// Extract the `error` field the database puts in failure responses
fn response_error(body: &[u8]) -> String {
	serde_json::from_slice::<Value>(body)
		.ok()
		.and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
		.unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}

#[async_trait]
impl StoreAdapter for FirebaseStore {
	async fn get(&self, path: &str) -> IlResult<Value> {
		let bytes = self.request(Method::GET, path, None).await?;
		if bytes.is_empty() {
			return Ok(Value::Null);
		}
		Ok(serde_json::from_slice(&bytes)?)
	}

	async fn set(&self, path: &str, value: &Value) -> IlResult<()> {
		let body = serde_json::to_vec(value)?;
		self.request(Method::PUT, path, Some(body)).await?;
		Ok(())
	}

	async fn delete(&self, path: &str) -> IlResult<()> {
		match self.request(Method::DELETE, path, None).await {
			Ok(_) => Ok(()),
			Err(error::Error::Status(status, _)) if status == StatusCode::NOT_FOUND => Ok(()),
			Err(e) => Err(e.into()),
		}
	}
}


// vim: ts=4
