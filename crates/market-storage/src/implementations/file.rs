//! File-based storage backend.
//!
//! Each key is stored as its own file under a base directory. Writes go to
//! a temporary file first and are renamed into place, so a crash never
//! leaves a half-written value behind.

use crate::{KeyValueStore, StorageError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File storage implementation.
#[derive(Debug, Clone)]
pub struct FileStorage {
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage rooted at `base_path`.
	///
	/// The directory is created lazily on the first write.
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	/// Returns the base directory of this storage.
	pub fn base_path(&self) -> &Path {
		&self.base_path
	}

	/// Resolves the file path for a key.
	///
	/// Keys are limited to ASCII letters, digits, `_` and `-` so they can never
	/// escape the base directory or collide with temporary files.
	fn get_file_path(&self, key: &str) -> Result<PathBuf, StorageError> {
		let valid = !key.is_empty()
			&& key
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
		if !valid {
			return Err(StorageError::InvalidKey(key.to_string()));
		}
		Ok(self.base_path.join(key))
	}
}

#[async_trait]
impl KeyValueStore for FileStorage {
	async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		let path = self.get_file_path(key)?;

		match fs::read_to_string(&path).await {
			Ok(value) => Ok(Some(value)),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(StorageError::Backend(format!("Failed to read {key}: {e}"))),
		}
	}

	async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		let path = self.get_file_path(key)?;

		fs::create_dir_all(&self.base_path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		// Write atomically by writing to temp file then renaming
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, value)
			.await
			.map_err(|e| StorageError::Backend(format!("Failed to write {key}: {e}")))?;

		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(format!("Failed to write {key}: {e}")))?;

		Ok(())
	}

	async fn remove(&self, key: &str) -> Result<(), StorageError> {
		let path = self.get_file_path(key)?;

		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(format!("Failed to delete {key}: {e}"))),
		}
	}

	async fn keys(&self) -> Result<Vec<String>, StorageError> {
		let mut entries = match fs::read_dir(&self.base_path).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		let mut keys = Vec::new();
		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if !path.is_file() {
				continue;
			}
			if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
				// Temporary files carry an extension, real keys never do
				if self.get_file_path(name).is_ok() {
					keys.push(name.to_string());
				} else {
					tracing::debug!(file = name, "Skipping non-key file in session directory");
				}
			}
		}

		keys.sort();
		Ok(keys)
	}
}
