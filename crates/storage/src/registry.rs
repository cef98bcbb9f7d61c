//! Ordered list of known students.

use std::sync::Arc;

use tracing::debug;
use tracker_core::model::StudentName;

use crate::codec::{decode_names, encode_names};
use crate::keys::STUDENT_LIST_KEY;
use crate::locks::KeyLocks;
use crate::repository::{KeyValueStore, StorageError};

/// Name listed before any student has been registered.
pub const DEFAULT_STUDENT: &str = "Default";

/// Append-only registry of student names.
///
/// Names are not deduplicated: adding an existing name appends it again.
pub struct StudentRegistry {
    kv: Arc<dyn KeyValueStore>,
    locks: KeyLocks,
}

impl StudentRegistry {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            locks: KeyLocks::default(),
        }
    }

    /// Registered names in insertion order, or `["Default"]` if none were saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the stored list is malformed, or the
    /// backend's error if the read fails.
    pub async fn list(&self) -> Result<Vec<String>, StorageError> {
        match self.kv.get(STUDENT_LIST_KEY).await? {
            Some(raw) => decode_names(STUDENT_LIST_KEY, &raw),
            None => Ok(vec![DEFAULT_STUDENT.to_string()]),
        }
    }

    /// Append `name` and return the updated list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the stored list is malformed, or the
    /// backend's error if the read or write fails.
    pub async fn add(&self, name: &StudentName) -> Result<Vec<String>, StorageError> {
        let _guard = self.locks.acquire(STUDENT_LIST_KEY).await?;

        let mut names = self.list().await?;
        names.push(name.as_str().to_string());
        self.kv.set(STUDENT_LIST_KEY, &encode_names(&names)?).await?;
        debug!(student = %name, total = names.len(), "registered student");
        Ok(names)
    }
}
