// crates/core/src/llm.rs
//! Language-model text classifier.
//!
//! Sends a fixed system instruction plus the user's item description to an
//! OpenAI-style chat-completions endpoint with a constrained JSON response
//! format, and parses the model output into (item, category).

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::TextClassifierConfig;
use crate::ClassifierError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// System instruction pinning the output contract.
const SYSTEM_PROMPT: &str = "You are a waste-sorting assistant. Classify the item the user \
describes into exactly one disposal category: \"recyclable\", \"compostable\", or \"landfill\". \
Respond with a JSON object of the form {\"category\": <category>, \"item\": <short item name>} \
and nothing else.";

/// Normalized disposal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Recyclable,
    Compostable,
    Landfill,
}

/// Parsed model output.
///
/// Fields the model omitted are tolerated as `None`; syntactically invalid
/// output is rejected as [`ClassifierError::MalformedResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextClassification {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

// Chat-completions wire types (request side borrows, response side owns).

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Client for the upstream language model.
#[derive(Debug, Clone)]
pub struct TextClassifier {
    client: Client,
    cfg: TextClassifierConfig,
}

impl TextClassifier {
    pub fn new(cfg: TextClassifierConfig) -> Self {
        Self {
            client: Client::new(),
            cfg,
        }
    }

    /// Classify a free-text item description.
    pub async fn classify(&self, description: &str) -> Result<TextClassification, ClassifierError> {
        let messages = [
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: description,
            },
        ];
        let body = json!({
            "model": self.cfg.model,
            "messages": messages,
            "temperature": 0,
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.cfg.base_url))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.cfg.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            return Err(ClassifierError::Upstream {
                status: status.as_u16(),
                body: raw,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&raw)
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| {
                ClassifierError::MalformedResponse("completion had no choices".to_string())
            })?;

        let classification: TextClassification = serde_json::from_str(content).map_err(|e| {
            ClassifierError::MalformedResponse(format!("model output is not valid JSON: {e}"))
        })?;

        tracing::debug!(
            item = ?classification.item,
            category = ?classification.category,
            "text classification complete"
        );

        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classifier_for(server: &mockito::ServerGuard) -> TextClassifier {
        TextClassifier::new(TextClassifierConfig {
            api_key: "sk-test".to_string(),
            base_url: server.url(),
            model: "gpt-4o-mini".to_string(),
        })
    }

    fn completion_body(content: &str) -> String {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_classify_parses_structured_output() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_body(completion_body(
                r#"{"category":"compostable","item":"banana peel"}"#,
            ))
            .create_async()
            .await;

        let result = classifier_for(&server).classify("banana peel").await.unwrap();
        mock.assert_async().await;

        assert_eq!(result.item.as_deref(), Some("banana peel"));
        assert_eq!(result.category, Some(Category::Compostable));
    }

    #[tokio::test]
    async fn test_missing_fields_substitute_null() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(completion_body(r#"{"category":"landfill"}"#))
            .create_async()
            .await;

        let result = classifier_for(&server).classify("greasy pizza box").await.unwrap();
        assert_eq!(result.item, None);
        assert_eq!(result.category, Some(Category::Landfill));
    }

    #[tokio::test]
    async fn test_unparsable_model_output_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(completion_body("It's probably recyclable!"))
            .create_async()
            .await;

        let err = classifier_for(&server).classify("soda can").await.unwrap_err();
        assert!(matches!(err, ClassifierError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unknown_category_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(completion_body(r#"{"category":"hazardous","item":"battery"}"#))
            .create_async()
            .await;

        let err = classifier_for(&server).classify("battery").await.unwrap_err();
        assert!(matches!(err, ClassifierError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_no_choices_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = classifier_for(&server).classify("soda can").await.unwrap_err();
        assert!(matches!(err, ClassifierError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_provider_error_maps_to_upstream() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"rate limited"}}"#)
            .create_async()
            .await;

        let err = classifier_for(&server).classify("soda can").await.unwrap_err();
        assert!(matches!(err, ClassifierError::Upstream { status: 429, .. }));
    }

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Recyclable).unwrap(), "\"recyclable\"");
        assert_eq!(serde_json::to_string(&Category::Compostable).unwrap(), "\"compostable\"");
        assert_eq!(serde_json::to_string(&Category::Landfill).unwrap(), "\"landfill\"");
    }
}
