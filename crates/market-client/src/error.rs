//! Error types and result handling for the marketplace client
//!
//! Errors fall into four families: client-side validation, transport
//! failures, authorization failures (expired or unrecoverable sessions)
//! and server errors carrying the backend's message.

use market_storage::StorageError;
use market_types::ValidationError;

/// Convenience Result type alias using the local Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Fallback shown when the server gives no usable message.
pub const GENERIC_SERVER_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Shown for transport failures.
pub const NETWORK_MESSAGE: &str = "Could not reach the server. Check your connection and try again.";

/// Shown when the user has to authenticate again.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

#[derive(thiserror::Error, Debug)]
pub enum Error {
	// Transport errors
	#[error("Network error: {0}")]
	Network(#[source] reqwest::Error),

	// Server errors
	#[error("HTTP {status}: {message}")]
	Http { status: u16, message: String },

	#[error("Invalid API response: {0}")]
	Decode(String),

	// Authorization errors
	#[error("Session expired")]
	SessionExpired,

	#[error("Token refresh failed: {0}")]
	RefreshFailed(String),

	#[error("Not logged in")]
	NotAuthenticated,

	// Client-side errors
	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),

	#[error("Configuration error: {0}")]
	Config(#[from] crate::config::ConfigError),

	#[error("Invalid URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			Error::Decode(err.to_string())
		} else {
			Error::Network(err)
		}
	}
}

impl Error {
	/// Text to show the user for this error.
	///
	/// Server messages are shown verbatim. Everything else maps to a fixed
	/// prompt so that internals never leak into the interface.
	pub fn user_message(&self) -> String {
		match self {
			Error::Network(_) => NETWORK_MESSAGE.to_string(),
			Error::Http { message, .. } if !message.trim().is_empty() => message.clone(),
			Error::Http { .. } | Error::Decode(_) => GENERIC_SERVER_MESSAGE.to_string(),
			Error::SessionExpired | Error::RefreshFailed(_) => SESSION_EXPIRED_MESSAGE.to_string(),
			Error::NotAuthenticated => "You need to log in first.".to_string(),
			Error::Validation(err) => err.to_string(),
			other => other.to_string(),
		}
	}

	/// True when the only way forward is a fresh login.
	pub fn requires_login(&self) -> bool {
		matches!(
			self,
			Error::SessionExpired | Error::RefreshFailed(_) | Error::NotAuthenticated
		)
	}

	/// HTTP status of a server error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Error::Http { status, .. } => Some(*status),
			_ => None,
		}
	}
}
