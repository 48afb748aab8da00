use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use shared_config::AppConfig;

use crate::models::{ConsultationError, ModelReply};

/// Generates one reply for one composed prompt. No retries.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<ModelReply, ConsultationError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the Generative Language `generateContent` endpoint.
/// Based on: https://ai.google.dev/api/generate-content
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: &AppConfig, client: Client) -> Result<Self, ConsultationError> {
        if config.gemini_api_key.trim().is_empty() {
            return Err(ConsultationError::NotConfigured {
                missing: "GOOGLE_GEMINI_API_KEY".to_string(),
            });
        }

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.llm_timeout_secs),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    fn transport_error(&self, err: reqwest::Error) -> ConsultationError {
        if err.is_timeout() {
            ConsultationError::LanguageModelTimeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            // without_url keeps the key out of the message
            ConsultationError::LanguageModelTransport(err.without_url().to_string())
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_chars = prompt.chars().count()))]
    async fn generate(&self, prompt: &str) -> Result<ModelReply, ConsultationError> {
        if prompt.trim().is_empty() {
            return Err(ConsultationError::EmptyComposedPrompt);
        }

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!("Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            error!("Gemini API error: {} - {}", status, response_text);
            let detail = serde_json::from_str::<ErrorEnvelope>(&response_text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(response_text);
            return Err(ConsultationError::LanguageModelStatus {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| ConsultationError::InvalidModelResponse(e.to_string()))?;

        if let Some(reason) = parsed.prompt_feedback.and_then(|feedback| feedback.block_reason) {
            warn!("Gemini blocked the prompt: {}", reason);
        }

        let candidate = parsed.candidates.and_then(|candidates| candidates.into_iter().next());
        if let Some(reason) = candidate.as_ref().and_then(|c| c.finish_reason.as_deref()) {
            debug!("Gemini finish reason: {}", reason);
        }

        let text = candidate
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(ConsultationError::EmptyModelReply)?;

        debug!("AI reply: {}", text);
        Ok(ModelReply { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_utils::test_utils::TestConfig;

    #[test]
    fn test_client_requires_api_key() {
        let mut config = TestConfig::default().to_app_config();
        config.gemini_api_key = String::new();

        let client = GeminiClient::new(&config, Client::new());
        assert_matches!(client.err(), Some(ConsultationError::NotConfigured { ref missing }) if missing == "GOOGLE_GEMINI_API_KEY");
    }

    #[test]
    fn test_endpoint_format() {
        let mut config = TestConfig::default().to_app_config();
        config.gemini_base_url = "https://example.test/".to_string();

        let client = GeminiClient::new(&config, Client::new()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "contents": [{ "parts": [{ "text": "hello" }] }] })
        );
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_without_call() {
        let config = TestConfig::default().to_app_config();
        let client = GeminiClient::new(&config, Client::new()).unwrap();

        let result = client.generate("   ").await;
        assert_matches!(result, Err(ConsultationError::EmptyComposedPrompt));
    }
}
