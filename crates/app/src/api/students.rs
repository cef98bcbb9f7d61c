use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NewStudentRequest {
    pub name: String,
}

/// GET /students
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.services.students().list().await?))
}

/// POST /students
pub async fn add_student(
    State(state): State<AppState>,
    payload: Result<Json<NewStudentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<String>>), ApiError> {
    let Json(body) = payload?;
    let names = state.services.students().add(&body.name).await?;
    Ok((StatusCode::CREATED, Json(names)))
}
