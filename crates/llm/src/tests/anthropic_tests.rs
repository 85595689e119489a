#![expect(clippy::unwrap_used, reason = "test code")]

use serde_json::json;
use therapy_core::ChatMessage;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{
    ANTHROPIC_VERSION, ChatProvider, GenerationOptions, LlmError, LlmProvider, LlmSettings,
    ProviderKind, to_anthropic_body,
};

#[test]
fn test_system_message_lifted_to_top_level() {
    let messages = vec![ChatMessage::system("S"), ChatMessage::user("U")];
    let body = to_anthropic_body("claude-test", &messages, &GenerationOptions::default());

    assert_eq!(body["messages"], json!([{"role": "user", "content": "U"}]));
    assert_eq!(body["system"], json!("S"));
}

#[test]
fn test_multiple_system_messages_joined() {
    let messages = vec![
        ChatMessage::system("first"),
        ChatMessage::user("U"),
        ChatMessage::system("second"),
        ChatMessage::assistant("A"),
    ];
    let body = to_anthropic_body("claude-test", &messages, &GenerationOptions::default());

    assert_eq!(body["system"], json!("first\n\nsecond"));
    assert_eq!(
        body["messages"],
        json!([{"role": "user", "content": "U"}, {"role": "assistant", "content": "A"}])
    );
}

#[test]
fn test_no_system_field_without_system_messages() {
    let body = to_anthropic_body("m", &[ChatMessage::user("U")], &GenerationOptions::default());
    assert!(body.get("system").is_none());
    assert!(body.get("frequency_penalty").is_none());
    assert!(body.get("presence_penalty").is_none());
}

#[tokio::test]
async fn test_generate_sends_headers_and_reads_text_blocks() {
    let server = MockServer::start().await;
    let provider = LlmProvider::new(
        LlmSettings::new(ProviderKind::Anthropic, "ant-key").with_base_url(server.uri()),
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "ant-key"))
        .and(header("anthropic-version", ANTHROPIC_VERSION))
        .and(body_partial_json(json!({"system": "S", "messages": [{"role": "user", "content": "U"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"type": "text", "text": "Hello, "},
                {"type": "text", "text": "friend."}
            ],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let messages = vec![ChatMessage::system("S"), ChatMessage::user("U")];
    let response = provider
        .generate(provider.default_model(), &messages, &GenerationOptions::default())
        .await
        .unwrap();
    assert_eq!(provider.reply_text(&response).unwrap(), "Hello, friend.");
}

#[tokio::test]
async fn test_provider_error_surfaces_message() {
    let server = MockServer::start().await;
    let provider = LlmProvider::new(
        LlmSettings::new(ProviderKind::Anthropic, "ant-key").with_base_url(server.uri()),
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "type": "error",
            "error": {"type": "invalid_request_error", "message": "max_tokens: too large"}
        })))
        .mount(&server)
        .await;

    let err = provider
        .generate("m", &[ChatMessage::user("U")], &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(
        matches!(&err, LlmError::Provider { status: 400, message } if message == "max_tokens: too large"),
        "unexpected error: {err:?}"
    );
}
