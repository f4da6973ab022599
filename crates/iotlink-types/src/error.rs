//! Error type shared by all iotlink crates

pub type IlResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	Unauthorized,
	ServiceUnavailable,
	ConfigError(String),
	SerializationError(String),
	NetworkError(String),
	ValidationError(String),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::ServiceUnavailable => write!(f, "service unavailable"),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
			Error::NetworkError(msg) => write!(f, "network error: {}", msg),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::SerializationError(err.to_string())
	}
}


// vim: ts=4
