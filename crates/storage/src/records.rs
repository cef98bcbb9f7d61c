//! Partitioned progress-entry store.

use std::sync::Arc;

use tracing::debug;
use tracker_core::model::{Category, EntryId, ProgressEntry, StudentName};

use crate::codec::{decode_entries, encode_entries};
use crate::keys::partition_key;
use crate::locks::KeyLocks;
use crate::repository::{KeyValueStore, StorageError};

/// Append/list/delete of progress entries keyed by (student, category).
///
/// Each partition is stored as one JSON array whose order is the insertion
/// order. Mutations are read-modify-write cycles over the whole array and are
/// serialized per partition, but only within this process: two processes
/// writing the same database can still lose each other's updates.
pub struct RecordStore {
    kv: Arc<dyn KeyValueStore>,
    locks: KeyLocks,
}

impl RecordStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            locks: KeyLocks::default(),
        }
    }

    /// Append `entry` at the end of the partition.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id already exists in the
    /// partition or the entry belongs to another category,
    /// `StorageError::Corrupt` if the stored partition is malformed, and the
    /// backend's error unchanged if the read or write fails.
    pub async fn append(
        &self,
        student: &StudentName,
        category: Category,
        entry: ProgressEntry,
    ) -> Result<(), StorageError> {
        if entry.category() != category {
            return Err(StorageError::Conflict);
        }

        let key = partition_key(student, category);
        let _guard = self.locks.acquire(&key).await?;

        let mut entries = self.read(&key, category).await?;
        if entries.iter().any(|existing| existing.id() == entry.id()) {
            return Err(StorageError::Conflict);
        }
        entries.push(entry);

        self.kv.set(&key, &encode_entries(&entries)?).await?;
        debug!(%key, len = entries.len(), "appended entry");
        Ok(())
    }

    /// Entries of the partition in insertion order; empty if never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the stored partition is malformed, or
    /// the backend's error if the read fails.
    pub async fn list(
        &self,
        student: &StudentName,
        category: Category,
    ) -> Result<Vec<ProgressEntry>, StorageError> {
        self.read(&partition_key(student, category), category).await
    }

    /// Remove the entry with `id`, keeping the order of the rest.
    ///
    /// Returns whether an entry was removed. Deleting an absent id is a no-op
    /// and issues no write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the stored partition is malformed, or
    /// the backend's error if the read or write fails.
    pub async fn delete(
        &self,
        student: &StudentName,
        category: Category,
        id: &EntryId,
    ) -> Result<bool, StorageError> {
        let key = partition_key(student, category);
        let _guard = self.locks.acquire(&key).await?;

        let entries = self.read(&key, category).await?;
        let before = entries.len();
        let remaining: Vec<ProgressEntry> = entries
            .into_iter()
            .filter(|entry| entry.id() != id)
            .collect();
        if remaining.len() == before {
            return Ok(false);
        }

        self.kv.set(&key, &encode_entries(&remaining)?).await?;
        debug!(%key, %id, "deleted entry");
        Ok(true)
    }

    async fn read(&self, key: &str, category: Category) -> Result<Vec<ProgressEntry>, StorageError> {
        match self.kv.get(key).await? {
            Some(raw) => decode_entries(key, category, &raw),
            None => Ok(Vec::new()),
        }
    }
}
