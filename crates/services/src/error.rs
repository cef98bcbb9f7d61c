//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use tracker_core::model::{EntryError, StudentNameError};

/// Errors emitted by `AnalyzeService` and text recognizers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalyzeError {
    #[error("no image provided")]
    MissingImage,
    #[error("text recognition is not configured")]
    Disabled,
    #[error("text recognition failed: {message}")]
    Upstream { message: String },
    #[error("text recognition returned no results")]
    EmptyResponse,
    #[error("text recognition request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Entry(#[from] EntryError),
    #[error(transparent)]
    Student(#[from] StudentNameError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StudentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudentServiceError {
    #[error(transparent)]
    Name(#[from] StudentNameError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
