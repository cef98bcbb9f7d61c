use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use services::SubjectProgress;
use tracker_core::model::{Category, EntryDraft, EntryId, ProgressEntry};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NewEntryRequest {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub errors: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
}

impl From<NewEntryRequest> for EntryDraft {
    fn from(body: NewEntryRequest) -> Self {
        Self {
            level: body.level,
            book: body.book,
            errors: body.errors,
            date: body.date,
        }
    }
}

/// GET /students/:student/:category/entries
pub async fn list_entries(
    State(state): State<AppState>,
    Path((student, category)): Path<(String, String)>,
) -> Result<Json<Vec<ProgressEntry>>, ApiError> {
    let category: Category = category.parse()?;
    let entries = state
        .services
        .progress()
        .list_entries(&student, category)
        .await?;
    Ok(Json(entries))
}

/// POST /students/:student/:category/entries
pub async fn create_entry(
    State(state): State<AppState>,
    Path((student, category)): Path<(String, String)>,
    payload: Result<Json<NewEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProgressEntry>), ApiError> {
    let category: Category = category.parse()?;
    let Json(body) = payload?;
    let entry = state
        .services
        .progress()
        .record_entry(&student, category, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /students/:student/:category/entries/:id
///
/// Succeeds whether or not the entry existed. A blank id is rejected.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path((student, category, id)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let category: Category = category.parse()?;
    let id: EntryId = id.parse()?;
    state
        .services
        .progress()
        .delete_entry(&student, category, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /students/:student/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Path(student): Path<String>,
) -> Result<Json<Vec<SubjectProgress>>, ApiError> {
    Ok(Json(state.services.progress().dashboard(&student).await?))
}
