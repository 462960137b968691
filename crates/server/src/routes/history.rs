// crates/server/src/routes/history.rs
//! Prediction-history API routes.
//!
//! - GET /history                — Full history, most recent first
//! - GET /history/{id}/thumbnail — Stored JPEG thumbnail for one prediction

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use sortcycle_db::HistoryEntry;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/history - list all predictions, reverse chronological.
pub async fn list_history(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let history = state.db.list_history().await?;
    Ok(Json(history))
}

/// GET /api/history/{id}/thumbnail - raw JPEG bytes for one prediction.
///
/// 404 when the id is unknown, 409 when the record exists but is
/// text-origin (created without a thumbnail).
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let bytes = state.db.get_thumbnail(id).await?;
    Ok(([(CONTENT_TYPE, "image/jpeg")], bytes))
}

/// Create the history routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/history", get(list_history))
        .route("/history/{id}/thumbnail", get(get_thumbnail))
}
