//! API route handlers for the sortcycle server.

pub mod health;
pub mod history;
pub mod predict;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET  /api/health - Health check
/// - POST /api/predict - Classify an uploaded image (multipart `file` part)
/// - POST /api/predict-text - Classify a free-text item description
/// - GET  /api/history - Full prediction history, most recent first
/// - GET  /api/history/{id}/thumbnail - Stored thumbnail for one prediction
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", predict::router())
        .nest("/api", history::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortcycle_core::{ImageClassifier, VisionConfig};

    #[tokio::test]
    async fn test_api_routes_creation() {
        let db = sortcycle_db::Database::new_in_memory().await.expect("in-memory DB");
        let vision = ImageClassifier::new(VisionConfig {
            endpoint: "http://127.0.0.1:1/predict".to_string(),
            key: "test".to_string(),
        });
        let state = AppState::new(db, vision, None);
        let _router = api_routes(state);
    }
}
