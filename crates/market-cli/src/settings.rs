//! Locating and loading the client configuration.

use anyhow::{Context as _, Result};
use market_client::ClientConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "market.toml";

/// Loads the configuration used by every command
///
/// Resolution order: the explicit `path`, else `market.toml` in the working
/// directory if present, else built-in defaults. Environment overrides are
/// applied next and `api_url` from the command line wins over everything.
pub async fn load_config(path: Option<&Path>, api_url: Option<&str>) -> Result<ClientConfig> {
	let config = match path {
		Some(path) => ClientConfig::from_file(path)
			.await
			.with_context(|| format!("Failed to load configuration from {}", path.display()))?,
		None => {
			let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
			if tokio::fs::try_exists(&default_path).await.unwrap_or(false) {
				debug!(path = %default_path.display(), "Using configuration from working directory");
				ClientConfig::from_file(&default_path)
					.await
					.with_context(|| format!("Failed to load {DEFAULT_CONFIG_FILE}"))?
			} else {
				ClientConfig::default()
			}
		},
	};

	let mut config = config.with_env_overrides();
	if let Some(url) = api_url {
		config.api.base_url = url.to_string();
	}
	config.validate()?;
	Ok(config)
}
