use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use services::AnalyzeResult;

use crate::AppState;
use crate::error::{ApiError, NO_IMAGE_MESSAGE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// POST /analyze
///
/// A body that is not JSON, or has no `imageBase64`, is treated as a request
/// without an image.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResult>, ApiError> {
    let image = payload
        .ok()
        .and_then(|Json(body)| body.image_base64)
        .ok_or_else(|| ApiError::BadRequest(NO_IMAGE_MESSAGE.to_string()))?;

    let result = state.services.analyze().analyze(&image).await?;
    Ok(Json(result))
}
