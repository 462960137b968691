// crates/core/src/lib.rs
//! Core logic for the sortcycle prediction service.
//!
//! Leaf crate with no database dependency: process configuration, the
//! thumbnail codec, and the two upstream classifier clients (binary image
//! classifier + language-model text classifier).

pub mod config;
pub mod llm;
pub mod thumbnail;
pub mod vision;

pub use config::{Config, ConfigError, TextClassifierConfig, VisionConfig};
pub use llm::{Category, TextClassification, TextClassifier};
pub use thumbnail::{compress_thumbnail, ThumbnailError, THUMBNAIL_MAX_DIM};
pub use vision::{ImageClassifier, Prediction};

use thiserror::Error;

/// Errors from the upstream classifier clients.
///
/// Shared by the image and text clients: both speak HTTP to an opaque
/// provider and fail in the same three ways.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The provider answered with a non-success status. The raw body is kept
    /// for operator diagnostics; clients must not parse it.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Network-level failure (timeout, DNS, connection reset). Potentially
    /// transient, but this crate never retries.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered 2xx but the body did not match the expected
    /// shape. Not retryable without changed input.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}
