//! Client library for the event merchandise marketplace.
//!
//! Event organisers publish events with product requirements, companies bid
//! on them in reverse auctions, and an accepted offer becomes an order. All
//! of that logic lives in the backend; this crate provides the typed REST
//! client, the persisted login session and the multi-call flows built on top.

pub mod api;
pub mod config;
pub mod error;
pub mod operations;
pub mod services;
pub mod session;
pub mod token;

pub use api::{ApiClient, ApiRequest, AuthRetryPolicy};
pub use config::{ClientConfig, ConfigError};
pub use error::{Error, Result};
pub use session::{SessionEvent, SessionStore};

use market_storage::KeyValueStore;
use services::{AuthService, CompaniesService, EventsService, OrdersService};
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs: configuration, the session and the services.
#[derive(Debug, Clone)]
pub struct Context {
	pub config: ClientConfig,
	pub session: SessionStore,
	pub api: ApiClient,
	pub auth: AuthService,
	pub events: EventsService,
	pub companies: CompaniesService,
	pub orders: OrdersService,
}

impl Context {
	/// Builds a context using the storage backend named in `config`.
	pub async fn init(config: ClientConfig) -> Result<Self> {
		let storage = config.open_storage()?;
		Self::with_storage(config, storage).await
	}

	/// Builds a context on top of an existing storage backend.
	pub async fn with_storage(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
		config.validate()?;

		let session = SessionStore::load(storage).await?;
		let api = ApiClient::from_config(&config, session.clone())?;
		debug!(base_url = %api.base_url(), active = session.is_active(), "Context initialised");

		Ok(Self {
			auth: AuthService::new(api.clone()),
			events: EventsService::new(api.clone()),
			companies: CompaniesService::new(api.clone()),
			orders: OrdersService::new(api.clone()),
			config,
			session,
			api,
		})
	}

	/// The logged-in user, or `Error::NotAuthenticated`.
	///
	/// A cached profile without an access token does not count as logged in.
	pub fn require_user(&self) -> Result<market_types::User> {
		self.session.active_user().ok_or(Error::NotAuthenticated)
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use market_storage::MemoryStorage;

	#[tokio::test]
	async fn test_context_shares_one_session() {
		let ctx = Context::with_storage(ClientConfig::default(), Arc::new(MemoryStorage::new()))
			.await
			.unwrap();

		assert!(!ctx.auth.is_authenticated());
		assert!(matches!(ctx.require_user(), Err(Error::NotAuthenticated)));
		assert_eq!(ctx.api.base_url().as_str(), "http://localhost:3000/");
	}

	#[tokio::test]
	async fn test_stored_user_without_token_is_not_authenticated() {
		let storage = MemoryStorage::with_entries([(
			session::keys::USER,
			r#"{"id":"u-1","email":"ana@example.org","name":"Ana","roleId":"client"}"#,
		)]);
		let ctx = Context::with_storage(ClientConfig::default(), Arc::new(storage))
			.await
			.unwrap();

		assert!(ctx.session.current().is_some());
		assert!(!ctx.session.is_active());
		assert!(matches!(ctx.require_user(), Err(Error::NotAuthenticated)));
	}

	#[tokio::test]
	async fn test_invalid_config_is_rejected() {
		let mut config = ClientConfig::default();
		config.api.timeout_seconds = 0;

		let result = Context::with_storage(config, Arc::new(MemoryStorage::new())).await;
		assert!(matches!(result, Err(Error::Config(_))));
	}
}
