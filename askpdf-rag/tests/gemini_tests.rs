//! Gemini generator tests against a mock Generative Language endpoint.

use askpdf_rag::gemini::GeminiGenerator;
use askpdf_rag::{GenerationParams, RagError, TextGenerator};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn generator(server: &MockServer) -> GeminiGenerator {
    GeminiGenerator::new("test-key").expect("key is non-empty").with_base_url(server.uri())
}

fn candidate(parts: &[&str]) -> serde_json::Value {
    let parts: Vec<_> = parts.iter().map(|t| json!({ "text": t })).collect();
    json!({ "candidates": [{ "content": { "role": "model", "parts": parts } }] })
}

#[tokio::test]
async fn sends_prompt_and_params_and_joins_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Why do cats purr?" }] }],
            "generationConfig": { "temperature": 0.5, "maxOutputTokens": 64 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(&["Cats purr ", "when content."])))
        .expect(1)
        .mount(&server)
        .await;

    let params = GenerationParams { temperature: 0.5, max_output_tokens: 64 };
    let text = generator(&server).generate("Why do cats purr?", params).await.unwrap();

    assert_eq!(text, "Cats purr when content.");
}

#[tokio::test]
async fn model_prefix_is_stripped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(&["ok"])))
        .expect(1)
        .mount(&server)
        .await;

    let generator = generator(&server).with_model("models/gemini-2.5-flash");
    assert_eq!(generator.model(), "gemini-2.5-flash");

    let text = generator.generate("hi", GenerationParams::default()).await.unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn api_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let err = generator(&server).generate("hi", GenerationParams::default()).await.unwrap_err();

    match err {
        RagError::GenerationError { provider, message } => {
            assert_eq!(provider, "Gemini");
            assert!(message.contains("429"), "{message}");
            assert!(message.contains("Quota exceeded"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn response_without_candidates_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = generator(&server).generate("hi", GenerationParams::default()).await.unwrap_err();

    assert!(matches!(err, RagError::GenerationError { .. }));
}

#[test]
fn empty_api_key_is_rejected() {
    assert!(matches!(GeminiGenerator::new("  "), Err(RagError::GenerationError { .. })));
}
