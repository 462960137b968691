// crates/server/src/main.rs
//! Sortcycle server binary.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use sortcycle_core::{Config, ImageClassifier, TextClassifier};
use sortcycle_db::Database;
use sortcycle_server::{create_app, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env first, so the filter and config both see it.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Sanity check: the image classifier is mandatory. Refuse to start with a
    // clear message rather than failing on the first request.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Please create a .env file and add the variables there.");
            std::process::exit(1);
        }
    };

    let db = Database::new(Path::new(&config.database_path)).await?;

    let vision = ImageClassifier::new(config.vision.clone());
    let text = config.text.clone().map(TextClassifier::new);
    if text.is_some() {
        tracing::info!("text classification enabled");
    } else {
        tracing::warn!("OPENAI_API_KEY not set; /api/predict-text will answer 503");
    }

    let state = AppState::new(db, vision, text);
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
