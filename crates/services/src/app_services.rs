use std::sync::Arc;

use storage::repository::Storage;

use crate::analyze_service::AnalyzeService;
use crate::error::AppServicesError;
use crate::ocr::{OcrConfig, OcrSpaceClient, TextRecognizer};
use crate::progress_service::ProgressService;
use crate::student_service::StudentService;
use crate::Clock;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    analyze: Arc<AnalyzeService>,
    progress: Arc<ProgressService>,
    students: Arc<StudentService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the OCR.space recognizer.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        ocr: Option<OcrConfig>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let recognizer: Arc<dyn TextRecognizer> = Arc::new(OcrSpaceClient::new(ocr));
        Ok(Self::from_parts(&storage, clock, recognizer))
    }

    /// Build services over an existing storage and recognizer.
    #[must_use]
    pub fn from_parts(
        storage: &Storage,
        clock: Clock,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        Self {
            analyze: Arc::new(AnalyzeService::new(recognizer)),
            progress: Arc::new(ProgressService::new(clock, Arc::clone(&storage.records))),
            students: Arc::new(StudentService::new(Arc::clone(&storage.students))),
        }
    }

    #[must_use]
    pub fn analyze(&self) -> Arc<AnalyzeService> {
        Arc::clone(&self.analyze)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn students(&self) -> Arc<StudentService> {
        Arc::clone(&self.students)
    }
}
