//! Web Push notification sending
//!
//! Implements RFC 8030 (HTTP Push), RFC 8188 (Encrypted Content-Encoding),
//! RFC 8291 (Message Encryption for Web Push), and RFC 8292 (VAPID).

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::prelude::*;
use iotlink_types::config::VapidConfig;
use iotlink_types::push_sender::{PushResult, PushSender};

/// How long the push service keeps an undelivered message
const MESSAGE_TTL_SECS: u32 = 24 * 3600;

/// VAPID JWT lifetime (push services reject more than 24 hours)
const VAPID_JWT_VALIDITY_SECS: u64 = 12 * 3600;

type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Push sender delivering through the browser vendors' Web Push services
pub struct WebPushSender {
	vapid: VapidConfig,
	client: HttpsClient,
}

impl std::fmt::Debug for WebPushSender {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WebPushSender").field("vapid", &self.vapid).finish()
	}
}

impl WebPushSender {
	/// Create a sender for the given VAPID credentials
	///
	/// The keys are not checked here, see [`validate_vapid_keys`]. A sender with
	/// unusable keys reports a `PermanentError` for every delivery.
	pub fn new(vapid: VapidConfig) -> Self {
		let builder = match HttpsConnectorBuilder::new().with_native_roots() {
			Ok(builder) => builder,
			Err(e) => {
				warn!(error = %e, "No native root certificates, using bundled roots");
				HttpsConnectorBuilder::new().with_webpki_roots()
			}
		};
		let connector = builder.https_only().enable_http1().enable_http2().build();

		let client: HttpsClient = Client::builder(TokioExecutor::new()).build(connector);

		Self { vapid, client }
	}
}

#[async_trait]
impl PushSender for WebPushSender {
	async fn send(
		&self,
		subscription: &PushSubscription,
		payload: &NotificationPayload,
	) -> PushResult {
		// Serialize payload
		let payload_json = match serde_json::to_string(payload) {
			Ok(json) => json,
			Err(e) => {
				return PushResult::PermanentError(format!("Payload serialization error: {}", e));
			}
		};

		// Encrypt the payload using ECE (Encrypted Content-Encoding)
		let body =
			match encrypt_payload(&payload_json, &subscription.keys.p256dh, &subscription.keys.auth)
			{
				Ok(enc) => enc,
				Err(e) => return PushResult::PermanentError(format!("Encryption error: {}", e)),
			};

		let vapid_jwt = match create_vapid_jwt(
			&subscription.endpoint,
			&self.vapid.subject,
			&self.vapid.private_key,
		) {
			Ok(jwt) => jwt,
			Err(e) => return PushResult::PermanentError(format!("VAPID JWT error: {}", e)),
		};

		let request = match build_push_request(
			&subscription.endpoint,
			body,
			&vapid_jwt,
			&self.vapid.public_key,
			MESSAGE_TTL_SECS,
		) {
			Ok(req) => req,
			Err(e) => return PushResult::PermanentError(format!("Request build error: {}", e)),
		};

		let response = match self.client.request(request).await {
			Ok(response) => response,
			Err(e) => return PushResult::TemporaryError(format!("Network error: {}", e)),
		};

		let status = response.status();
		// Drain the body so the connection goes back to the pool
		let body_bytes = response.into_body().collect().await.map(|b| b.to_bytes()).unwrap_or_default();

		push_result(status, &body_bytes)
	}
}

/// Encrypted push message request (RFC 8030)
fn build_push_request(
	endpoint: &str,
	body: Vec<u8>,
	vapid_jwt: &str,
	public_key: &str,
	ttl: u32,
) -> Result<hyper::Request<Full<Bytes>>, hyper::http::Error> {
	hyper::Request::builder()
		.method(hyper::Method::POST)
		.uri(endpoint)
		.header("Content-Type", "application/octet-stream")
		.header("Content-Encoding", "aes128gcm")
		.header("TTL", ttl.to_string())
		.header("Authorization", format!("vapid t={},k={}", vapid_jwt, public_key))
		.body(Full::new(Bytes::from(body)))
}

/// Map the push service response to a delivery outcome
fn push_result(status: hyper::StatusCode, body: &[u8]) -> PushResult {
	if status.is_success() {
		PushResult::Success
	} else if status == hyper::StatusCode::GONE || status == hyper::StatusCode::NOT_FOUND {
		PushResult::SubscriptionGone
	} else if status.is_client_error() {
		PushResult::PermanentError(format!("HTTP {}: {}", status, String::from_utf8_lossy(body)))
	} else {
		PushResult::TemporaryError(format!("HTTP {}", status))
	}
}

/// Encrypt payload using ECE (RFC 8188, 8291)
///
/// The result is a complete aes128gcm body: salt, record size and the
/// sender's ephemeral public key are carried in its header.
fn encrypt_payload(payload: &str, p256dh_base64: &str, auth_base64: &str) -> Result<Vec<u8>, String> {
	let p256dh = URL_SAFE_NO_PAD
		.decode(p256dh_base64.trim_end_matches('='))
		.map_err(|e| format!("Invalid p256dh: {}", e))?;
	let auth = URL_SAFE_NO_PAD
		.decode(auth_base64.trim_end_matches('='))
		.map_err(|e| format!("Invalid auth: {}", e))?;

	ece::encrypt(&p256dh, &auth, payload.as_bytes())
		.map_err(|e| format!("ECE encryption failed: {:?}", e))
}

/// Decode the raw VAPID private scalar
fn decode_private_key(private_key_raw: &str) -> Result<p256::SecretKey, String> {
	let bytes = URL_SAFE_NO_PAD
		.decode(private_key_raw.trim_end_matches('='))
		.map_err(|e| format!("Invalid base64url private key: {}", e))?;
	if bytes.len() != 32 {
		return Err(format!("Private key must be 32 bytes, got {}", bytes.len()));
	}
	p256::SecretKey::from_slice(&bytes).map_err(|e| format!("Invalid P-256 private key: {:?}", e))
}

/// Check that the private key is a P-256 scalar and the public key is its point
pub fn validate_vapid_keys(vapid: &VapidConfig) -> IlResult<()> {
	use p256::elliptic_curve::sec1::ToEncodedPoint;

	let secret = decode_private_key(&vapid.private_key).map_err(Error::ConfigError)?;
	let public = URL_SAFE_NO_PAD
		.decode(vapid.public_key.trim_end_matches('='))
		.map_err(|e| Error::ConfigError(format!("Invalid base64url public key: {}", e)))?;

	let derived = secret.public_key().to_encoded_point(false);
	if derived.as_bytes() != public.as_slice() {
		return Err(Error::ConfigError(
			"VAPID public key does not match the private key".into(),
		));
	}
	Ok(())
}

/// Create VAPID JWT (RFC 8292)
///
/// private_key_raw is the raw 32-byte P-256 scalar, base64url encoded
/// (the format produced by common web-push key generators)
fn create_vapid_jwt(endpoint: &str, subject: &str, private_key_raw: &str) -> Result<String, String> {
	use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
	use p256::pkcs8::EncodePrivateKey;
	use p256::pkcs8::LineEnding;

	#[derive(Serialize)]
	struct VapidClaims<'a> {
		aud: String,
		exp: u64,
		sub: &'a str,
	}

	let secret_key = decode_private_key(private_key_raw)?;

	// Convert to PEM format for jsonwebtoken
	let pem = secret_key
		.to_pkcs8_pem(LineEnding::LF)
		.map_err(|e| format!("Failed to encode private key: {:?}", e))?;

	// Audience is the origin of the push service
	let url = url::Url::parse(endpoint).map_err(|e| format!("Invalid endpoint URL: {}", e))?;
	if url.host_str().is_none() {
		return Err(format!("Endpoint has no host: {}", endpoint));
	}
	let audience = url.origin().ascii_serialization();

	let exp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO).as_secs()
		+ VAPID_JWT_VALIDITY_SECS;

	let claims = VapidClaims { aud: audience, exp, sub: subject };

	// VAPID uses ES256 (P-256 curve, SHA-256)
	let encoding_key = EncodingKey::from_ec_pem(pem.as_bytes())
		.map_err(|e| format!("Invalid VAPID private key: {}", e))?;

	let header = Header::new(Algorithm::ES256);
	encode(&header, &claims, &encoding_key).map_err(|e| format!("JWT encoding failed: {}", e))
}


// vim: ts=4
