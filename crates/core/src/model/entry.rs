use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Category, EntryId};

//
// ─── ENTRY DRAFT ───────────────────────────────────────────────────────────────
//

/// Unvalidated form input for a new progress entry.
///
/// `level` and `book` usually start out as extraction candidates and are
/// confirmed or overridden by the tutor before the draft is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub level: String,
    pub book: String,
    pub errors: Option<i64>,
    pub date: Option<String>,
}

impl EntryDraft {
    /// Validate the draft and build an immutable entry.
    ///
    /// `default_date` is used when the draft carries no date (or a blank one).
    ///
    /// # Errors
    ///
    /// Returns `EntryError` when level, book or error count is missing, or when
    /// the error count is negative or too large.
    pub fn validate(
        self,
        id: EntryId,
        category: Category,
        default_date: impl Into<String>,
    ) -> Result<ProgressEntry, EntryError> {
        let level = self.level.trim();
        if level.is_empty() {
            return Err(EntryError::MissingLevel);
        }
        let book = self.book.trim();
        if book.is_empty() {
            return Err(EntryError::MissingBook);
        }
        let errors = self.errors.ok_or(EntryError::MissingErrors)?;
        let value = u32::try_from(errors).map_err(|_| EntryError::InvalidErrors(errors))?;

        let date = match self.date {
            Some(date) if !date.trim().is_empty() => date,
            _ => default_date.into(),
        };

        Ok(ProgressEntry {
            id,
            value,
            label: ProgressEntry::label_for(&level.to_uppercase(), book),
            date,
            category,
        })
    }
}

//
// ─── PROGRESS ENTRY ────────────────────────────────────────────────────────────
//

/// One recorded workbook result: how many errors a student made on a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    id: EntryId,
    value: u32,
    label: String,
    date: String,
    category: Category,
}

impl ProgressEntry {
    /// Rehydrate an entry exactly as it was persisted.
    #[must_use]
    pub fn from_persisted(
        id: EntryId,
        value: u32,
        label: impl Into<String>,
        date: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id,
            value,
            label: label.into(),
            date: date.into(),
            category,
        }
    }

    /// Chart label for a level/book pair, e.g. `LB-B12`.
    #[must_use]
    pub fn label_for(level: &str, book: &str) -> String {
        format!("L{level}-B{book}")
    }

    #[must_use]
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// Error count.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("level is required")]
    MissingLevel,
    #[error("book is required")]
    MissingBook,
    #[error("error count is required")]
    MissingErrors,
    #[error("invalid error count: {0}")]
    InvalidErrors(i64),
}
