// crates/core/src/vision.rs
//! Client for the binary image-classification service (Azure Custom Vision
//! prediction API).
//!
//! The image is posted as an opaque octet-stream with a `Prediction-Key`
//! credential header; the provider answers with a JSON prediction list.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::VisionConfig;
use crate::ClassifierError;

/// Outbound request timeout. Expiry surfaces as a transport error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One labeled prediction as reported by the provider.
///
/// Serialized with the provider's field names so API responses pass the
/// result through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "tagName")]
    pub tag_name: String,
    pub probability: f64,
}

/// Provider response envelope. A missing prediction list is valid and means
/// "no detections".
#[derive(Debug, Deserialize)]
struct PredictionEnvelope {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

/// Client for the upstream image classifier.
#[derive(Debug, Clone)]
pub struct ImageClassifier {
    client: Client,
    cfg: VisionConfig,
}

impl ImageClassifier {
    pub fn new(cfg: VisionConfig) -> Self {
        Self {
            client: Client::new(),
            cfg,
        }
    }

    /// Classify raw image bytes.
    ///
    /// Returns the provider's prediction list in the order received (not
    /// guaranteed sorted by probability). An empty list is a valid outcome;
    /// callers decide how to handle "no predictions".
    pub async fn classify(&self, raw: &[u8]) -> Result<Vec<Prediction>, ClassifierError> {
        let response = self
            .client
            .post(&self.cfg.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .header("Prediction-Key", &self.cfg.key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(raw.to_vec())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClassifierError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: PredictionEnvelope = serde_json::from_str(&body)
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            count = envelope.predictions.len(),
            "image classification complete"
        );

        Ok(envelope.predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classifier_for(server: &mockito::ServerGuard) -> ImageClassifier {
        ImageClassifier::new(VisionConfig {
            endpoint: format!("{}/predict", server.url()),
            key: "test-key".to_string(),
        })
    }

    #[tokio::test]
    async fn test_classify_preserves_provider_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_header("Prediction-Key", "test-key")
            .match_header("content-type", "application/octet-stream")
            .with_status(200)
            .with_body(
                r#"{"predictions":[
                    {"tagName":"glass","probability":0.12},
                    {"tagName":"plastic_bottle","probability":0.91},
                    {"tagName":"cardboard","probability":0.45}
                ]}"#,
            )
            .create_async()
            .await;

        let result = classifier_for(&server).classify(b"fake-jpeg").await.unwrap();
        mock.assert_async().await;

        let tags: Vec<&str> = result.iter().map(|p| p.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["glass", "plastic_bottle", "cardboard"]);
        assert!((result[1].probability - 0.91).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_prediction_list_is_empty_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predict")
            .with_status(200)
            .with_body(r#"{"id":"abc","iteration":"v3"}"#)
            .create_async()
            .await;

        let result = classifier_for(&server).classify(b"img").await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_empty_prediction_list_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predict")
            .with_status(200)
            .with_body(r#"{"predictions":[]}"#)
            .create_async()
            .await;

        let result = classifier_for(&server).classify(b"img").await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_non_2xx_maps_to_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predict")
            .with_status(401)
            .with_body("Access denied")
            .create_async()
            .await;

        let err = classifier_for(&server).classify(b"img").await.unwrap_err();
        match err {
            ClassifierError::Upstream { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Access denied");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparsable_body_maps_to_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predict")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = classifier_for(&server).classify(b"img").await.unwrap_err();
        assert!(matches!(err, ClassifierError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_transport() {
        // Port 1 is never listening.
        let classifier = ImageClassifier::new(VisionConfig {
            endpoint: "http://127.0.0.1:1/predict".to_string(),
            key: "k".to_string(),
        });
        let err = classifier.classify(b"img").await.unwrap_err();
        assert!(matches!(err, ClassifierError::Transport(_)));
    }
}
