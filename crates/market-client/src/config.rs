//! Configuration for the marketplace client.
//!
//! Configuration is read from a TOML file. Values may reference environment
//! variables as `${VAR}` or `${VAR:-default}`; they are substituted before
//! parsing. Every section is optional and falls back to defaults, so an
//! empty file is a valid configuration.

use market_storage::{create_storage, KeyValueStore, StorageError, StorageKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Environment variable that overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "MARKET_API_URL";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
	#[serde(default)]
	pub api: ApiSettings,
	#[serde(default)]
	pub auth: AuthSettings,
	#[serde(default)]
	pub storage: StorageSettings,
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
	#[serde(default = "default_base_url")]
	pub base_url: String,
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			base_url: default_base_url(),
			timeout_seconds: default_timeout_seconds(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
	/// Token refreshes allowed per request. Values above one are clamped.
	#[serde(default = "default_max_refresh_attempts")]
	pub max_refresh_attempts: u32,
}

impl Default for AuthSettings {
	fn default() -> Self {
		Self {
			max_refresh_attempts: default_max_refresh_attempts(),
		}
	}
}

/// Where the session is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
	#[serde(default)]
	pub backend: StorageKind,
	#[serde(default = "default_storage_path")]
	pub path: PathBuf,
}

impl Default for StorageSettings {
	fn default() -> Self {
		Self {
			backend: StorageKind::default(),
			path: default_storage_path(),
		}
	}
}

fn default_base_url() -> String {
	DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
	30
}

fn default_max_refresh_attempts() -> u32 {
	1
}

fn default_storage_path() -> PathBuf {
	PathBuf::from(".market/session")
}

impl ClientConfig {
	/// Loads configuration from a TOML file.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path.as_ref()).await?;
		content.parse()
	}

	/// Applies overrides taken from the process environment.
	pub fn with_env_overrides(mut self) -> Self {
		if let Ok(url) = std::env::var(BASE_URL_ENV) {
			if !url.trim().is_empty() {
				self.api.base_url = url;
			}
		}
		self
	}

	/// Checks that the configuration can be used to build a client.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let url = Url::parse(&self.api.base_url).map_err(|e| {
			ConfigError::Validation(format!("Invalid api.base_url '{}': {e}", self.api.base_url))
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::Validation(format!(
				"api.base_url must use http or https, got '{}'",
				url.scheme()
			)));
		}
		if url.cannot_be_a_base() {
			return Err(ConfigError::Validation(format!(
				"api.base_url cannot be used as a base: {}",
				self.api.base_url
			)));
		}

		if self.api.timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"api.timeout_seconds must be greater than zero".to_string(),
			));
		}

		if self.storage.backend == StorageKind::File && self.storage.path.as_os_str().is_empty() {
			return Err(ConfigError::Validation(
				"storage.path is required for the file backend".to_string(),
			));
		}

		Ok(())
	}

	/// Parsed base URL.
	pub fn base_url(&self) -> Result<Url, ConfigError> {
		Url::parse(&self.api.base_url).map_err(|e| ConfigError::Validation(e.to_string()))
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.api.timeout_seconds)
	}

	/// Builds the storage backend named in the configuration.
	pub fn open_storage(&self) -> Result<Arc<dyn KeyValueStore>, StorageError> {
		create_storage(self.storage.backend, Some(self.storage.path.clone()))
	}
}

impl FromStr for ClientConfig {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: ClientConfig = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

/// Replaces `${VAR}` and `${VAR:-default}` with values from the environment.
///
/// A variable that is unset and has no default is an error.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};

		let value = match std::env::var(name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}
	result.push_str(&input[last..]);

	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_config_uses_defaults() {
		let config: ClientConfig = "".parse().unwrap();
		assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
		assert_eq!(config.timeout(), Duration::from_secs(30));
		assert_eq!(config.auth.max_refresh_attempts, 1);
		assert_eq!(config.storage.backend, StorageKind::File);
		assert_eq!(config.storage.path, PathBuf::from(".market/session"));
	}

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("MARKET_TEST_HOST", "api.example.org");

		let input = r#"
[api]
base_url = "https://${MARKET_TEST_HOST}/v1"
timeout_seconds = ${MARKET_TEST_TIMEOUT:-15}
"#;
		let config: ClientConfig = input.parse().unwrap();
		assert_eq!(config.api.base_url, "https://api.example.org/v1");
		assert_eq!(config.api.timeout_seconds, 15);

		std::env::remove_var("MARKET_TEST_HOST");
	}

	#[test]
	fn test_missing_env_var_without_default_fails() {
		let result = resolve_env_vars("url = \"${MARKET_TEST_DEFINITELY_UNSET}\"");
		assert!(matches!(result, Err(ConfigError::Validation(msg)) if msg.contains("MARKET_TEST_DEFINITELY_UNSET")));
	}

	#[test]
	fn test_validation_rejects_bad_values() {
		let non_http = "[api]\nbase_url = \"ftp://example.org\"";
		assert!(matches!(
			non_http.parse::<ClientConfig>(),
			Err(ConfigError::Validation(_))
		));

		let zero_timeout = "[api]\ntimeout_seconds = 0";
		assert!(matches!(
			zero_timeout.parse::<ClientConfig>(),
			Err(ConfigError::Validation(_))
		));

		let bad_toml = "[api\nbase_url = 1";
		assert!(matches!(
			bad_toml.parse::<ClientConfig>(),
			Err(ConfigError::Parse(_))
		));
	}

	#[test]
	fn test_memory_backend_from_toml() {
		let config: ClientConfig = "[storage]\nbackend = \"memory\"".parse().unwrap();
		assert_eq!(config.storage.backend, StorageKind::Memory);
		assert!(config.open_storage().is_ok());
	}

	#[tokio::test]
	async fn test_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("market.toml");
		tokio::fs::write(
			&path,
			"[api]\nbase_url = \"http://127.0.0.1:4000\"\n[auth]\nmax_refresh_attempts = 3\n",
		)
		.await
		.unwrap();

		let config = ClientConfig::from_file(&path).await.unwrap();
		assert_eq!(config.api.base_url, "http://127.0.0.1:4000");
		assert_eq!(config.auth.max_refresh_attempts, 3);

		assert!(matches!(
			ClientConfig::from_file(dir.path().join("missing.toml")).await,
			Err(ConfigError::Io(_))
		));
	}
}
