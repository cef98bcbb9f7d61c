use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use services::{AnalyzeError, ProgressServiceError, StudentServiceError};
use storage::repository::StorageError;
use tracing::{error, warn};
use tracker_core::model::{CategoryError, ParseIdError};

/// Body of the 400 returned when a scan request carries no image.
pub const NO_IMAGE_MESSAGE: &str = "No image provided";

/// Body of the 400 returned for JSON that does not fit the request shape.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Error returned by handlers, rendered as `{"error": "..."}`.
///
/// Messages are short and user-facing; details only go to the log.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Conflict(String),
    Upstream(String),
    Corrupt,
    Storage,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Corrupt => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Stored data is corrupted".to_string(),
            ),
            ApiError::Storage => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Operation failed".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        error!(error = %err, "storage operation failed");
        match err {
            StorageError::Corrupt { .. } => ApiError::Corrupt,
            StorageError::Conflict => ApiError::Conflict("Entry already exists".to_string()),
            _ => ApiError::Storage,
        }
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        match err {
            AnalyzeError::MissingImage => ApiError::BadRequest(NO_IMAGE_MESSAGE.to_string()),
            AnalyzeError::Upstream { message } => ApiError::Upstream(message),
            other => {
                error!(error = %other, "analyze failed");
                ApiError::Upstream("Server Error".to_string())
            }
        }
    }
}

impl From<ProgressServiceError> for ApiError {
    fn from(err: ProgressServiceError) -> Self {
        match err {
            ProgressServiceError::Entry(e) => ApiError::BadRequest(e.to_string()),
            ProgressServiceError::Student(e) => ApiError::BadRequest(e.to_string()),
            ProgressServiceError::Storage(e) => e.into(),
            other => {
                error!(error = %other, "progress operation failed");
                ApiError::Storage
            }
        }
    }
}

impl From<StudentServiceError> for ApiError {
    fn from(err: StudentServiceError) -> Self {
        match err {
            StudentServiceError::Name(e) => ApiError::BadRequest(e.to_string()),
            StudentServiceError::Storage(e) => e.into(),
            other => {
                error!(error = %other, "student operation failed");
                ApiError::Storage
            }
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ParseIdError> for ApiError {
    fn from(err: ParseIdError) -> Self {
        warn!(error = %err, "rejected entry id");
        ApiError::BadRequest("Invalid entry id".to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), detail = %rejection.body_text(), "rejected request body");
        ApiError::BadRequest(INVALID_BODY_MESSAGE.to_string())
    }
}
