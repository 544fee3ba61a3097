//! Envelope types shared by every endpoint.

use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-success responses.
///
/// The backend reports validation failures with a list of messages and
/// everything else with a single string, so `message` accepts both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
	#[serde(default)]
	pub message: Option<ErrorMessage>,
	#[serde(default)]
	pub status_code: Option<u16>,
	#[serde(default)]
	pub error: Option<String>,
}

impl ApiErrorBody {
	/// Returns the most specific human-readable message in the body, if any.
	pub fn message_text(&self) -> Option<String> {
		let text = match &self.message {
			Some(ErrorMessage::Single(message)) => message.trim().to_string(),
			Some(ErrorMessage::Many(messages)) => messages
				.iter()
				.map(|m| m.trim())
				.filter(|m| !m.is_empty())
				.collect::<Vec<_>>()
				.join("; "),
			None => String::new(),
		};

		if !text.is_empty() {
			return Some(text);
		}

		self.error
			.as_deref()
			.map(str::trim)
			.filter(|e| !e.is_empty())
			.map(str::to_string)
	}
}

/// Error message payload, either a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
	Single(String),
	Many(Vec<String>),
}

/// Plain acknowledgement returned by delete and reject endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
	pub message: String,
}

/// Paginated listing envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
	pub data: Vec<T>,
	pub total: u64,
	pub page: u64,
	pub limit: u64,
}
