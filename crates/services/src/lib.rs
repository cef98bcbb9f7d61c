#![forbid(unsafe_code)]

pub mod analyze_service;
pub mod app_services;
pub mod error;
pub mod ocr;
pub mod progress_service;
pub mod student_service;

pub use tracker_core::Clock;

pub use analyze_service::{AnalyzeResult, AnalyzeService};
pub use app_services::AppServices;
pub use error::{AnalyzeError, AppServicesError, ProgressServiceError, StudentServiceError};
pub use ocr::{DEFAULT_OCR_API_URL, OcrConfig, OcrSpaceClient, TextRecognizer};
pub use progress_service::{ProgressService, SubjectProgress};
pub use student_service::StudentService;
