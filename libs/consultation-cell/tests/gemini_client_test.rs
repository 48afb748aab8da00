use assert_matches::assert_matches;
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use consultation_cell::{ConsultationError, GeminiClient, LanguageModel};
use shared_config::AppConfig;
use shared_utils::test_utils::{MockGeminiResponses, TestConfig};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn config_for(server: &MockServer) -> AppConfig {
    TestConfig::with_mock_server(&server.uri()).to_app_config()
}

#[tokio::test]
async fn test_generate_returns_trimmed_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-gemini-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "composed prompt" }] }]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockGeminiResponses::reply("  Good morning, aaram karein.\n")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new(&config_for(&mock_server), Client::new()).unwrap();
    let reply = client.generate("composed prompt").await.unwrap();

    assert_eq!(reply.text, "Good morning, aaram karein.");
}

#[tokio::test]
async fn test_non_success_status_carries_service_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(MockGeminiResponses::error_response("API key not valid.", 400)),
        )
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new(&config_for(&mock_server), Client::new()).unwrap();
    let result = client.generate("prompt").await;

    assert_matches!(
        result,
        Err(ConsultationError::LanguageModelStatus { status: 400, ref detail }) if detail == "API key not valid."
    );
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_raw() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new(&config_for(&mock_server), Client::new()).unwrap();
    let result = client.generate("prompt").await;

    assert_matches!(
        result,
        Err(ConsultationError::LanguageModelStatus { status: 503, ref detail }) if detail == "upstream overloaded"
    );
}

#[tokio::test]
async fn test_success_without_candidates_is_contract_violation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGeminiResponses::no_candidates()))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new(&config_for(&mock_server), Client::new()).unwrap();
    assert_matches!(client.generate("prompt").await, Err(ConsultationError::EmptyModelReply));
}

#[tokio::test]
async fn test_blank_reply_text_is_contract_violation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGeminiResponses::reply("   ")))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new(&config_for(&mock_server), Client::new()).unwrap();
    assert_matches!(client.generate("prompt").await, Err(ConsultationError::EmptyModelReply));
}

#[tokio::test]
async fn test_blocked_prompt_is_contract_violation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGeminiResponses::blocked("SAFETY")))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new(&config_for(&mock_server), Client::new()).unwrap();
    assert_matches!(client.generate("prompt").await, Err(ConsultationError::EmptyModelReply));
}

#[tokio::test]
async fn test_unparseable_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new(&config_for(&mock_server), Client::new()).unwrap();
    assert_matches!(client.generate("prompt").await, Err(ConsultationError::InvalidModelResponse(_)));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockGeminiResponses::reply("late"))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.llm_timeout_secs = 1;

    let client = GeminiClient::new(&config, Client::new()).unwrap();
    assert_matches!(
        client.generate("prompt").await,
        Err(ConsultationError::LanguageModelTimeout { timeout_secs: 1 })
    );
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let mut config = TestConfig::default().to_app_config();
    // nothing listens on the discard port
    config.gemini_base_url = "http://127.0.0.1:9".to_string();

    let client = GeminiClient::new(&config, Client::new()).unwrap();
    let result = client.generate("prompt").await;

    assert_matches!(result, Err(ConsultationError::LanguageModelTransport(ref message)) if !message.contains("test-gemini-key"));
}
