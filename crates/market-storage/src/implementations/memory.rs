//! In-memory storage backend.
//!
//! Useful for tests and for runs where the session should not outlive the
//! process. Data is lost when the backend is dropped.

use crate::{KeyValueStore, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage implementation.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
	store: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
	/// Creates a new, empty MemoryStorage instance.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a MemoryStorage pre-populated with `entries`.
	pub fn with_entries<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let map = entries
			.into_iter()
			.map(|(k, v)| (k.into(), v.into()))
			.collect();
		Self {
			store: Arc::new(RwLock::new(map)),
		}
	}
}

#[async_trait]
impl KeyValueStore for MemoryStorage {
	async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		let store = self.store.read().await;
		Ok(store.get(key).cloned())
	}

	async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		store.insert(key.to_string(), value.to_string());
		Ok(())
	}

	async fn remove(&self, key: &str) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		store.remove(key);
		Ok(())
	}

	async fn keys(&self) -> Result<Vec<String>, StorageError> {
		let store = self.store.read().await;
		let mut keys: Vec<String> = store.keys().cloned().collect();
		keys.sort();
		Ok(keys)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_basic_operations() {
		let storage = MemoryStorage::new();

		assert!(storage.get("user").await.unwrap().is_none());

		storage.set("user", "{}").await.unwrap();
		assert_eq!(storage.get("user").await.unwrap().as_deref(), Some("{}"));

		storage.set("user", "{\"id\":\"1\"}").await.unwrap();
		assert_eq!(
			storage.get("user").await.unwrap().as_deref(),
			Some("{\"id\":\"1\"}")
		);

		storage.remove("user").await.unwrap();
		assert!(storage.get("user").await.unwrap().is_none());

		// Removing again is fine
		storage.remove("user").await.unwrap();
	}

	#[tokio::test]
	async fn test_clones_share_state() {
		let storage = MemoryStorage::with_entries([("refreshToken", "r-1")]);
		let other = storage.clone();

		other.set("accessToken", "a-1").await.unwrap();

		assert_eq!(
			storage.keys().await.unwrap(),
			vec!["accessToken".to_string(), "refreshToken".to_string()]
		);
	}
}
