//! Session state management and persistent storage
//!
//! The session holds the access token, the refresh token and a cached copy
//! of the logged-in user's profile. It is loaded from a key-value store on
//! start-up and written back whenever it changes. An absent access token
//! means the user is logged out, whatever else is stored.

use crate::error::Result;
use crate::token::decode_claims;
use chrono::{DateTime, Utc};
use market_storage::KeyValueStore;
use market_types::{TokenPair, User};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::debug;

/// Storage keys used by the session.
pub mod keys {
	pub const ACCESS_TOKEN: &str = "accessToken";
	pub const REFRESH_TOKEN: &str = "refreshToken";
	pub const USER: &str = "user";

	/// Keys written by earlier client versions. They are dropped on load.
	pub const LEGACY: [&str; 7] = [
		"isLoggedIn",
		"userId",
		"userOrders",
		"username",
		"userName",
		"userEmail",
		"userRole",
	];
}

const EVENT_CAPACITY: usize = 16;

/// Notification sent whenever the logged-in state may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
	LoginStatusChanged { active: bool },
}

#[derive(Debug, Clone, Default)]
struct SessionState {
	access_token: Option<String>,
	refresh_token: Option<String>,
	/// Raw JSON as stored. Parsed on demand so bad data never blocks loading.
	user: Option<String>,
}

/// Thread-safe session state backed by persistent storage
///
/// Cloning yields another handle to the same session. Reads are served from
/// memory; every mutation is written to storage before it becomes visible.
#[derive(Clone)]
pub struct SessionStore {
	state: Arc<RwLock<SessionState>>,
	storage: Arc<dyn KeyValueStore>,
	events: broadcast::Sender<SessionEvent>,
}

impl fmt::Debug for SessionStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionStore")
			.field("active", &self.is_active())
			.finish_non_exhaustive()
	}
}

impl SessionStore {
	/// Load the session from storage
	///
	/// Missing keys produce a logged-out session. Legacy keys left behind by
	/// earlier clients are removed so only `accessToken`, `refreshToken` and
	/// `user` remain.
	///
	/// # Errors
	/// Returns error if the storage backend fails
	pub async fn load(storage: Arc<dyn KeyValueStore>) -> Result<Self> {
		for key in keys::LEGACY {
			storage.remove(key).await?;
		}

		let (events, _) = broadcast::channel(EVENT_CAPACITY);
		let store = Self {
			state: Arc::new(RwLock::new(SessionState::default())),
			storage,
			events,
		};
		store.reload().await?;
		Ok(store)
	}

	/// Re-read the session from storage
	///
	/// Used when another process may have logged in or out in the meantime.
	pub async fn reload(&self) -> Result<()> {
		let access_token = self.storage.get(keys::ACCESS_TOKEN).await?;
		let refresh_token = self.storage.get(keys::REFRESH_TOKEN).await?;
		let user = self.storage.get(keys::USER).await?;

		*self.write() = SessionState {
			access_token,
			refresh_token,
			user,
		};
		Ok(())
	}

	/// Persist a new session, replacing any previous one
	pub async fn save(&self, tokens: &TokenPair, user: &User) -> Result<()> {
		let user_json = serde_json::to_string(user)?;

		self.storage
			.set(keys::ACCESS_TOKEN, &tokens.access_token)
			.await?;
		self.storage
			.set(keys::REFRESH_TOKEN, &tokens.refresh_token)
			.await?;
		self.storage.set(keys::USER, &user_json).await?;

		*self.write() = SessionState {
			access_token: Some(tokens.access_token.clone()),
			refresh_token: Some(tokens.refresh_token.clone()),
			user: Some(user_json),
		};
		debug!(user_id = %user.id, "Session saved");
		self.notify();
		Ok(())
	}

	/// Persist a refreshed token pair, keeping the cached user.
	pub async fn update_tokens(&self, tokens: &TokenPair) -> Result<()> {
		self.storage
			.set(keys::ACCESS_TOKEN, &tokens.access_token)
			.await?;
		self.storage
			.set(keys::REFRESH_TOKEN, &tokens.refresh_token)
			.await?;

		{
			let mut state = self.write();
			state.access_token = Some(tokens.access_token.clone());
			state.refresh_token = Some(tokens.refresh_token.clone());
		}
		debug!("Session tokens refreshed");
		self.notify();
		Ok(())
	}

	/// Remove every session key
	///
	/// The in-memory session is cleared first, so the user reads as logged
	/// out even if the backend then fails to delete a key.
	pub async fn clear(&self) -> Result<()> {
		*self.write() = SessionState::default();
		self.notify();

		for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
			self.storage.remove(key).await?;
		}
		debug!("Session cleared");
		Ok(())
	}

	/// The cached user profile.
	///
	/// Returns `None` when nothing is stored or the stored value is not a
	/// valid profile.
	pub fn current(&self) -> Option<User> {
		let raw = self.read().user.clone()?;
		match serde_json::from_str::<User>(&raw) {
			Ok(user) => Some(user),
			Err(e) => {
				debug!(error = %e, "Ignoring malformed cached user");
				None
			},
		}
	}

	/// The cached user, but only while the session holds an access token.
	pub fn active_user(&self) -> Option<User> {
		if !self.is_active() {
			return None;
		}
		self.current()
	}

	/// True when a non-empty access token is present.
	pub fn is_active(&self) -> bool {
		self.read()
			.access_token
			.as_deref()
			.is_some_and(|token| !token.is_empty())
	}

	pub fn access_token(&self) -> Option<String> {
		self.read()
			.access_token
			.clone()
			.filter(|token| !token.is_empty())
	}

	pub fn refresh_token(&self) -> Option<String> {
		self.read()
			.refresh_token
			.clone()
			.filter(|token| !token.is_empty())
	}

	/// Expiry of the access token, when it is a JWT carrying `exp`.
	pub fn access_token_expiry(&self) -> Option<DateTime<Utc>> {
		self.access_token()
			.and_then(|token| decode_claims(&token))
			.and_then(|claims| claims.expires_at())
	}

	/// Subscribe to login status changes.
	pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
		self.events.subscribe()
	}

	fn notify(&self) {
		// No subscribers is fine
		let _ = self.events.send(SessionEvent::LoginStatusChanged {
			active: self.is_active(),
		});
	}

	fn read(&self) -> RwLockReadGuard<'_, SessionState> {
		self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
		self.state
			.write()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}
