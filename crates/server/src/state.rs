// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use sortcycle_core::{ImageClassifier, TextClassifier};
use sortcycle_db::Database;

/// Shared application state accessible from all route handlers.
///
/// Per-request work owns everything else; the only shared mutable resource
/// is the database pool inside `db`.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Database handle for prediction-history queries.
    pub db: Database,
    /// Client for the binary image classifier (always configured).
    pub vision: ImageClassifier,
    /// Client for the language-model text classifier. `None` when the
    /// operator provided no API key; resolved once at startup, never
    /// re-checked from the environment per request.
    pub text: Option<TextClassifier>,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(db: Database, vision: ImageClassifier, text: Option<TextClassifier>) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            db,
            vision,
            text,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortcycle_core::VisionConfig;

    async fn test_state() -> Arc<AppState> {
        let db = Database::new_in_memory().await.expect("in-memory DB");
        let vision = ImageClassifier::new(VisionConfig {
            endpoint: "http://127.0.0.1:1/predict".to_string(),
            key: "test".to_string(),
        });
        AppState::new(db, vision, None)
    }

    #[tokio::test]
    async fn test_app_state_new() {
        let state = test_state().await;
        assert!(state.uptime_secs() < 5);
        assert!(state.text.is_none());
    }
}
