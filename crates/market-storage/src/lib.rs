//! Storage module for the marketplace client.
//!
//! The client persists its session the way a browser keeps data in local
//! storage: a flat map of string keys to string values. This crate defines
//! that interface and provides an in-memory backend (tests, one-shot runs)
//! and a file-backed backend (sessions that survive between invocations).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub mod implementations {
	pub mod file;
	pub mod memory;
}

pub use implementations::file::FileStorage;
pub use implementations::memory::MemoryStorage;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// The key cannot be used by this backend.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during backend configuration.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Low-level interface for session storage backends.
///
/// Values are opaque strings; callers encode structured data themselves.
/// Reading a missing key is not an error.
#[async_trait]
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait KeyValueStore: Send + Sync {
	/// Returns the value stored under `key`, if any.
	async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

	/// Stores `value` under `key`, replacing any previous value.
	async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

	/// Removes `key`. Removing a missing key succeeds.
	async fn remove(&self, key: &str) -> Result<(), StorageError>;

	/// Lists every key currently stored.
	async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Which backend to build from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
	Memory,
	#[default]
	File,
}

/// Creates a storage backend.
///
/// The file backend requires a directory path; the memory backend ignores it.
pub fn create_storage(
	kind: StorageKind,
	path: Option<PathBuf>,
) -> Result<Arc<dyn KeyValueStore>, StorageError> {
	match kind {
		StorageKind::Memory => {
			tracing::debug!("Using in-memory session storage");
			Ok(Arc::new(MemoryStorage::new()))
		},
		StorageKind::File => {
			let path = path.ok_or_else(|| {
				StorageError::Configuration("file storage requires a path".to_string())
			})?;
			tracing::debug!(path = %path.display(), "Using file session storage");
			Ok(Arc::new(FileStorage::new(path)))
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_create_memory_storage() {
		let storage = create_storage(StorageKind::Memory, None).unwrap();
		storage.set("accessToken", "abc").await.unwrap();
		assert_eq!(
			storage.get("accessToken").await.unwrap().as_deref(),
			Some("abc")
		);
	}

	#[test]
	fn test_file_storage_requires_path() {
		let result = create_storage(StorageKind::File, None);
		assert!(matches!(result, Err(StorageError::Configuration(_))));
	}

	#[test]
	fn test_storage_kind_from_config_value() {
		#[derive(Deserialize)]
		struct Wrapper {
			backend: StorageKind,
		}

		let parsed: Wrapper = serde_json::from_str(r#"{"backend":"memory"}"#).unwrap();
		assert_eq!(parsed.backend, StorageKind::Memory);
		assert_eq!(StorageKind::default(), StorageKind::File);
	}
}
