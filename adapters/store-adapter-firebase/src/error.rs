use hyper::StatusCode;
use iotlink::error::Error as IotlinkError;
use std::fmt;

/// Internal error type for the firebase adapter
#[derive(Debug)]
pub enum Error {
	Http(String),
	Status(StatusCode, String),
	Json(String),
	Token(String),
	Credentials(String),
	InvalidPath(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::Http(msg) => write!(f, "http error: {}", msg),
			Error::Status(status, body) => write!(f, "HTTP {}: {}", status, body),
			Error::Json(msg) => write!(f, "json error: {}", msg),
			Error::Token(msg) => write!(f, "token error: {}", msg),
			Error::Credentials(msg) => write!(f, "credentials error: {}", msg),
			Error::InvalidPath(msg) => write!(f, "invalid path: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
	fn from(e: serde_json::Error) -> Self {
		Error::Json(e.to_string())
	}
}

impl From<hyper_util::client::legacy::Error> for Error {
	fn from(e: hyper_util::client::legacy::Error) -> Self {
		Error::Http(e.to_string())
	}
}

impl From<Error> for IotlinkError {
	fn from(e: Error) -> Self {
		match e {
			Error::Status(status, _)
				if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
			{
				IotlinkError::Unauthorized
			}
			Error::Status(status, _) if status == StatusCode::NOT_FOUND => IotlinkError::NotFound,
			Error::Status(status, _) if status.is_server_error() => {
				IotlinkError::ServiceUnavailable
			}
			Error::Status(..) | Error::Http(_) => IotlinkError::NetworkError(e.to_string()),
			Error::Json(msg) => IotlinkError::SerializationError(msg),
			Error::Token(_) => IotlinkError::Unauthorized,
			Error::Credentials(msg) => IotlinkError::ConfigError(msg),
			Error::InvalidPath(msg) => IotlinkError::ValidationError(msg),
		}
	}
}


// vim: ts=4
