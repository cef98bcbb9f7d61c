use std::collections::HashSet;

use tracing::warn;
use tracker_core::model::{Category, EntryId, ProgressEntry};

use crate::repository::StorageError;

fn corrupt(key: &str, reason: impl Into<String>) -> StorageError {
    let reason = reason.into();
    warn!(key, %reason, "persisted data failed validation");
    StorageError::Corrupt {
        key: key.to_string(),
        reason,
    }
}

/// Decode and validate a partition payload.
///
/// Every element must be a complete entry whose category matches the
/// partition; ids must be unique.
pub(crate) fn decode_entries(
    key: &str,
    category: Category,
    raw: &str,
) -> Result<Vec<ProgressEntry>, StorageError> {
    let entries: Vec<ProgressEntry> =
        serde_json::from_str(raw).map_err(|e| corrupt(key, e.to_string()))?;

    let mut seen: HashSet<&EntryId> = HashSet::with_capacity(entries.len());
    for entry in &entries {
        if entry.category() != category {
            return Err(corrupt(
                key,
                format!("entry {} has category {}", entry.id(), entry.category()),
            ));
        }
        if !seen.insert(entry.id()) {
            return Err(corrupt(key, format!("duplicate entry id {}", entry.id())));
        }
    }

    Ok(entries)
}

pub(crate) fn encode_entries(entries: &[ProgressEntry]) -> Result<String, StorageError> {
    serde_json::to_string(entries).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn decode_names(key: &str, raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw).map_err(|e| corrupt(key, e.to_string()))
}

pub(crate) fn encode_names(names: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(names).map_err(|e| StorageError::Serialization(e.to_string()))
}
