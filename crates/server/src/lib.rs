// crates/server/src/lib.rs
//! Sortcycle server library.
//!
//! Axum-based HTTP server for the sortcycle waste-classification service:
//! image and text prediction endpoints backed by external classifiers, and a
//! persisted prediction history.

pub mod error;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, predict, history)
/// - CORS for development (allows any origin, as the original deployment did)
/// - Request tracing
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================
