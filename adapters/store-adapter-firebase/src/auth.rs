//! Service account credentials and OAuth2 access tokens
//!
//! The database accepts Google OAuth2 access tokens. They are obtained with the
//! JWT-bearer grant: a JWT signed with the service account's RSA key is exchanged
//! at the account's `token_uri` for a short-lived bearer token, which is cached
//! until shortly before it expires.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::HttpsClient;
use crate::error::Error;
use iotlink::prelude::{debug, warn};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth2 scopes required by the Realtime Database REST API
const DATABASE_SCOPES: &str =
	"https://www.googleapis.com/auth/firebase.database https://www.googleapis.com/auth/userinfo.email";

/// Requested token lifetime (Google caps this at one hour)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh a cached token when less than this remains
const REFRESH_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
	DEFAULT_TOKEN_URI.to_string()
}

/// Google service account key file
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
	#[serde(default)]
	pub project_id: String,
	#[serde(default)]
	pub private_key_id: String,
	pub private_key: String,
	pub client_email: String,
	#[serde(default = "default_token_uri")]
	pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ServiceAccountKey")
			.field("project_id", &self.project_id)
			.field("client_email", &self.client_email)
			.field("token_uri", &self.token_uri)
			.finish_non_exhaustive()
	}
}

impl ServiceAccountKey {
	pub fn from_json(json: &str) -> Result<Self, Error> {
		serde_json::from_str(json)
			.map_err(|e| Error::Credentials(format!("invalid service account key: {}", e)))
	}

	pub async fn from_file(path: &Path) -> Result<Self, Error> {
		let json = tokio::fs::read_to_string(path).await.map_err(|e| {
			Error::Credentials(format!("cannot read credentials file {}: {}", path.display(), e))
		})?;
		Self::from_json(&json)
	}
}

/// How requests to the database are authorized
#[derive(Debug, Clone)]
pub enum Credentials {
	/// Exchange a signed JWT for access tokens
	ServiceAccount(ServiceAccountKey),
	/// Fixed bearer token (emulator, or a token issued elsewhere)
	Static(Box<str>),
}

#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
	iss: &'a str,
	sub: &'a str,
	scope: &'a str,
	aud: &'a str,
	iat: i64,
	exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
	expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
	access_token: Box<str>,
	expires_at: i64,
}

fn now_secs() -> i64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
		.unwrap_or(0)
}

/// Hands out bearer tokens, refreshing them as needed
#[derive(Debug)]
pub struct TokenProvider {
	credentials: Credentials,
	cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
	pub fn new(credentials: Credentials) -> Self {
		Self { credentials, cache: Mutex::new(None) }
	}

	/// Current bearer token
	///
	/// The cache lock is held during a refresh, so concurrent callers wait for a
	/// single token exchange.
	pub async fn access_token(&self, client: &HttpsClient) -> Result<Box<str>, Error> {
		let key = match &self.credentials {
			Credentials::Static(token) => return Ok(token.clone()),
			Credentials::ServiceAccount(key) => key,
		};

		let mut cache = self.cache.lock().await;
		if let Some(cached) = cache.as_ref() {
			if cached.expires_at > now_secs() + REFRESH_MARGIN_SECS {
				return Ok(cached.access_token.clone());
			}
		}

		let fresh = fetch_token(client, key).await.inspect_err(|e| {
			warn!(client_email = %key.client_email, error = %e, "Access token exchange failed");
		})?;
		debug!(client_email = %key.client_email, expires_at = fresh.expires_at, "Access token refreshed");

		let token = fresh.access_token.clone();
		*cache = Some(fresh);
		Ok(token)
	}
}

fn signed_assertion(key: &ServiceAccountKey, now: i64) -> Result<String, Error> {
	let claims = JwtClaims {
		iss: &key.client_email,
		sub: &key.client_email,
		scope: DATABASE_SCOPES,
		aud: &key.token_uri,
		iat: now,
		exp: now + ASSERTION_LIFETIME_SECS,
	};

	let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
		.map_err(|e| Error::Credentials(format!("failed to parse private key: {}", e)))?;

	let mut header = Header::new(Algorithm::RS256);
	if !key.private_key_id.is_empty() {
		header.kid = Some(key.private_key_id.clone());
	}

	encode(&header, &claims, &encoding_key).map_err(|e| Error::Token(format!("failed to sign JWT: {}", e)))
}

async fn fetch_token(client: &HttpsClient, key: &ServiceAccountKey) -> Result<CachedToken, Error> {
	let now = now_secs();
	let assertion = signed_assertion(key, now)?;

	let form = url::form_urlencoded::Serializer::new(String::new())
		.append_pair("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer")
		.append_pair("assertion", &assertion)
		.finish();

	let request = hyper::Request::builder()
		.method(hyper::Method::POST)
		.uri(key.token_uri.as_str())
		.header("Content-Type", "application/x-www-form-urlencoded")
		.body(Full::new(Bytes::from(form)))
		.map_err(|e| Error::Token(format!("request build error: {}", e)))?;

	let response = client.request(request).await?;
	let status = response.status();
	let body = response
		.into_body()
		.collect()
		.await
		.map_err(|e| Error::Http(e.to_string()))?
		.to_bytes();

	if !status.is_success() {
		return Err(Error::Token(format!(
			"token request failed with status {}: {}",
			status,
			String::from_utf8_lossy(&body)
		)));
	}

	let token: TokenResponse = serde_json::from_slice(&body)
		.map_err(|e| Error::Token(format!("failed to parse token response: {}", e)))?;

	Ok(CachedToken { access_token: token.access_token.into(), expires_at: now + token.expires_in })
}


// vim: ts=4
