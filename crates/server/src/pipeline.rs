// crates/server/src/pipeline.rs
//! Prediction pipeline: dispatch to the matching upstream classifier,
//! normalize the result, and perform the synchronous history write.
//!
//! Kept out of the route handlers so the persistence policy (what gets
//! written, and when nothing does) is testable without HTTP plumbing.

use sortcycle_core::{compress_thumbnail, Prediction, TextClassification};
use sortcycle_db::NewPrediction;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Classify an uploaded image and record the winning prediction.
///
/// Persistence happens only after a successful, non-empty classification:
/// failed calls and empty prediction lists leave history untouched. An empty
/// list is still a success ("no detections" is not an error). The returned
/// list is exactly what the provider reported, in provider order.
pub async fn classify_image(
    state: &AppState,
    bytes: &[u8],
    filename: &str,
) -> ApiResult<Vec<Prediction>> {
    if filename.is_empty() {
        return Err(ApiError::Validation(
            "No image selected for uploading".to_string(),
        ));
    }
    if bytes.is_empty() {
        return Err(ApiError::Validation("Uploaded file is empty".to_string()));
    }

    let predictions = state.vision.classify(bytes).await?;

    if let Some(top) = top_prediction(&predictions) {
        // Thumbnail comes from the original upload bytes, not any copy the
        // classifier saw. A corrupt image fails the request here, before
        // anything is persisted.
        let thumbnail = compress_thumbnail(bytes)?;

        let record = state
            .db
            .insert_prediction(NewPrediction {
                thumbnail: Some(thumbnail),
                predicted_tag: top.tag_name.clone(),
                probability: Some(top.probability),
            })
            .await?;

        tracing::info!(
            id = record.id,
            tag = %record.predicted_tag,
            probability = top.probability,
            "image prediction recorded"
        );
    } else {
        tracing::info!(filename = %filename, "image produced no predictions; nothing recorded");
    }

    Ok(predictions)
}

/// Classify a free-text description and record the result.
///
/// Text-origin records carry neither thumbnail nor probability; the record
/// schema tolerates that asymmetry rather than forcing placeholders.
pub async fn classify_text(state: &AppState, description: &str) -> ApiResult<TextClassification> {
    if description.trim().is_empty() {
        return Err(ApiError::Validation(
            "A non-empty description is required".to_string(),
        ));
    }

    let Some(classifier) = state.text.as_ref() else {
        return Err(ApiError::TextClassifierUnavailable);
    };

    let classification = classifier.classify(description).await?;

    // The model may omit the item name; fall back to the caller's own
    // description, which validation guarantees is non-empty.
    let predicted_tag = classification
        .item
        .clone()
        .unwrap_or_else(|| description.to_string());

    let record = state
        .db
        .insert_prediction(NewPrediction {
            thumbnail: None,
            predicted_tag,
            probability: None,
        })
        .await?;

    tracing::info!(
        id = record.id,
        tag = %record.predicted_tag,
        category = ?classification.category,
        "text prediction recorded"
    );

    Ok(classification)
}

/// Highest-confidence prediction, ties broken by first-seen order.
///
/// Strict `>` keeps the comparison stable: a later entry only wins when it is
/// strictly better.
fn top_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    let mut best: Option<&Prediction> = None;
    for p in predictions {
        match best {
            Some(b) if p.probability > b.probability => best = Some(p),
            None => best = Some(p),
            _ => {}
        }
    }
    best
}
