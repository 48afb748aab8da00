use std::sync::Arc;
use serde_json::json;

use shared_config::AppConfig;

pub struct TestConfig {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub tts_host: String,
    pub tts_credentials_path: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: "test-gemini-key".to_string(),
            gemini_base_url: "http://localhost:54320".to_string(),
            tts_host: "http://localhost:54321".to_string(),
            tts_credentials_path: "/tmp/test-tts-service-account.json".to_string(),
        }
    }
}

impl TestConfig {
    /// Points both upstreams at the same mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            gemini_base_url: uri.to_string(),
            tts_host: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_model: shared_config::DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: self.gemini_base_url.clone(),
            tts_credentials_path: self.tts_credentials_path.clone(),
            tts_host: self.tts_host.clone(),
            tts_language: shared_config::DEFAULT_TTS_LANGUAGE.to_string(),
            tts_slow: false,
            tts_max_segment_chars: shared_config::DEFAULT_TTS_MAX_SEGMENT_CHARS,
            tts_max_concurrent_segments: shared_config::DEFAULT_TTS_MAX_CONCURRENT_SEGMENTS,
            llm_timeout_secs: 5,
            tts_timeout_secs: 5,
            port: 0,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockGeminiResponses;

impl MockGeminiResponses {
    pub fn reply(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": text }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 96,
                "candidatesTokenCount": 24,
                "totalTokenCount": 120
            }
        })
    }

    pub fn no_candidates() -> serde_json::Value {
        json!({ "candidates": [] })
    }

    pub fn blocked(reason: &str) -> serde_json::Value {
        json!({
            "promptFeedback": { "blockReason": reason }
        })
    }

    pub fn error_response(message: &str, code: u16) -> serde_json::Value {
        json!({
            "error": {
                "code": code,
                "message": message,
                "status": "INVALID_ARGUMENT"
            }
        })
    }
}
