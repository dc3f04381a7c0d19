use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::{Storage, StorageError, StorageResult};

/// Local filesystem storage rooted at a base directory.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create the backend, creating the root directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        Ok(LocalStorage { base_path })
    }

    /// Convert a storage key to a filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty()
            || key.starts_with('/')
            || key.split('/').any(|part| part.is_empty() || part == "." || part == "..")
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key))
    }

    async fn ensure_parent_dir(path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        Self::ensure_parent_dir(&path).await?;
        fs::write(&path, data).await?;
        tracing::debug!(key = %key, bytes = data.len(), "Stored file");
        Ok(())
    }

    async fn load(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::new(dir.path()).await.expect("storage");
        (dir, storage)
    }

    #[tokio::test]
    async fn test_store_load_delete_round_trip() {
        let (_dir, storage) = storage().await;
        storage
            .store("converted/a.jpeg", b"jpeg bytes")
            .await
            .expect("store");
        assert!(storage.exists("converted/a.jpeg").await.expect("exists"));
        assert_eq!(
            storage.load("converted/a.jpeg").await.expect("load"),
            b"jpeg bytes"
        );

        storage.delete("converted/a.jpeg").await.expect("delete");
        assert!(!storage.exists("converted/a.jpeg").await.expect("exists"));
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found() {
        let (_dir, storage) = storage().await;
        match storage.delete("converted/missing.png").await {
            Err(StorageError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_traversal_keys_are_rejected() {
        let (_dir, storage) = storage().await;
        for key in ["../escape", "/abs", "a/../b", "", "a//b"] {
            assert!(
                matches!(storage.store(key, b"x").await, Err(StorageError::InvalidKey(_))),
                "key {key:?} should be invalid"
            );
        }
    }
}
