use std::sync::Arc;

use serde::Serialize;
use storage::records::RecordStore;
use tracing::info;
use tracker_core::Clock;
use tracker_core::chart::{ChartSeries, project};
use tracker_core::model::{Category, EntryDraft, EntryId, ProgressEntry, StudentName};

use crate::error::ProgressServiceError;

/// One subject section of a student's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectProgress {
    pub category: Category,
    pub title: &'static str,
    /// `None` until the subject has at least two entries.
    pub series: Option<ChartSeries>,
    /// Entries newest first.
    pub history: Vec<ProgressEntry>,
}

/// Records, lists and removes progress entries for a student.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    records: Arc<RecordStore>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, records: Arc<RecordStore>) -> Self {
        Self { clock, records }
    }

    /// Validate a confirmed draft and append it to the student's partition.
    ///
    /// A missing date defaults to today's date.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Entry` for incomplete drafts,
    /// `ProgressServiceError::Student` for a blank student name, and
    /// `ProgressServiceError::Storage` if persistence fails.
    pub async fn record_entry(
        &self,
        student: &str,
        category: Category,
        draft: EntryDraft,
    ) -> Result<ProgressEntry, ProgressServiceError> {
        let student = StudentName::new(student)?;
        let entry = draft.validate(EntryId::generate(), category, self.clock.today_label())?;

        self.records
            .append(&student, category, entry.clone())
            .await?;
        info!(
            student = %student,
            %category,
            id = %entry.id(),
            label = entry.label(),
            "recorded progress entry"
        );
        Ok(entry)
    }

    /// Entries of one subject in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the partition cannot be read.
    pub async fn list_entries(
        &self,
        student: &str,
        category: Category,
    ) -> Result<Vec<ProgressEntry>, ProgressServiceError> {
        let student = StudentName::new(student)?;
        Ok(self.records.list(&student, category).await?)
    }

    /// Remove one entry. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn delete_entry(
        &self,
        student: &str,
        category: Category,
        id: &EntryId,
    ) -> Result<bool, ProgressServiceError> {
        let student = StudentName::new(student)?;
        let removed = self.records.delete(&student, category, id).await?;
        if removed {
            info!(student = %student, %category, %id, "deleted progress entry");
        }
        Ok(removed)
    }

    /// Chart series and history for every subject of a student.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if any partition cannot be read.
    pub async fn dashboard(
        &self,
        student: &str,
    ) -> Result<Vec<SubjectProgress>, ProgressServiceError> {
        let student = StudentName::new(student)?;
        let mut sections = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let entries = self.records.list(&student, category).await?;
            let series = project(&entries);
            let history = entries.into_iter().rev().collect();
            sections.push(SubjectProgress {
                category,
                title: category.title(),
                series,
                history,
            });
        }
        Ok(sections)
    }
}
