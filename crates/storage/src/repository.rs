use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::records::RecordStore;
use crate::registry::StudentRegistry;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt data under {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Durable string key → string value persistence.
///
/// This is the only contract the record store needs from its backend; each
/// `set` replaces the whole value atomically.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the write fails.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Aggregates the key-value backend and the stores layered on it.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
    pub records: Arc<RecordStore>,
    pub students: Arc<StudentRegistry>,
}

impl Storage {
    #[must_use]
    pub fn from_kv(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            records: Arc::new(RecordStore::new(Arc::clone(&kv))),
            students: Arc::new(StudentRegistry::new(Arc::clone(&kv))),
            kv,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_kv(Arc::new(InMemoryRepository::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get("student_list").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_replaces_previous_value() {
        let repo = InMemoryRepository::new();
        repo.set("k", "[1]").await.unwrap();
        repo.set("k", "[2]").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let repo = InMemoryRepository::new();
        let other = repo.clone();
        repo.set("k", "v").await.unwrap();
        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
