// crates/server/src/routes/predict.rs
//! Prediction API routes.
//!
//! - POST /predict      — Classify an uploaded image (multipart `file` part)
//! - POST /predict-text — Classify a free-text item description

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sortcycle_core::{Prediction, TextClassification};

use crate::error::{ApiError, ApiResult};
use crate::pipeline;
use crate::state::AppState;

/// Cap uploads at 10 MiB (axum's default 2 MiB is too small for photos).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Response for POST /api/predict: the provider's prediction list, passed
/// through in provider field names and provider order.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct PredictResponse {
    pub predictions: Vec<Prediction>,
}

/// Request body for POST /api/predict-text.
#[derive(Debug, Deserialize)]
pub struct PredictTextRequest {
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/predict - classify an uploaded image.
pub async fn predict_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<PredictResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("Failed to read upload: {e}")))?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let Some((filename, bytes)) = upload else {
        return Err(ApiError::Validation(
            "No file part in the request".to_string(),
        ));
    };

    let predictions = pipeline::classify_image(&state, &bytes, &filename).await?;
    Ok(Json(PredictResponse { predictions }))
}

/// POST /api/predict-text - classify a free-text item description.
pub async fn predict_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictTextRequest>,
) -> ApiResult<Json<TextClassification>> {
    let description = request.description.unwrap_or_default();
    let classification = pipeline::classify_text(&state, &description).await?;
    Ok(Json(classification))
}

/// Create the prediction routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/predict", post(predict_image))
        .route("/predict-text", post(predict_text))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
