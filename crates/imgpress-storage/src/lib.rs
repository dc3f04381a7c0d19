//! Storage abstraction for converted output files.
//!
//! The batch path writes each successful conversion here so history records
//! can be deleted together with their backing file. Only a local-filesystem
//! backend exists; the trait keeps the ledger decoupled from it.

mod local;

use async_trait::async_trait;
use thiserror::Error;

pub use local::LocalStorage;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend contract. Keys are relative, slash-separated paths assigned by
/// the caller (e.g. `converted/{uuid}.jpeg`).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a file under the given key, creating parent directories.
    async fn store(&self, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Read a file back by key.
    async fn load(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Remove a file. Returns `NotFound` when the file is already absent;
    /// callers that treat deletion as idempotent ignore that variant.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Whether a file exists under the key.
    async fn exists(&self, key: &str) -> StorageResult<bool>;
}
