use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use marknote_core::summarize::messages;
use marknote_server::{
    router, ApiKeySource, AppState, ChatCompletionClient, ProviderConfig, StaticApiKey,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(provider_url: &str, api_key: Option<&str>) -> Router {
    let state = AppState::new(
        ChatCompletionClient::new(ProviderConfig::with_base_url(provider_url)),
        StaticApiKey(api_key.map(str::to_string)),
    );
    router(Arc::new(state))
}

async fn post_summarize(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/summarize")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn empty_content_is_rejected_with_400() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    for body in [r#"{"content":""}"#, r#"{"content":"   "}"#, r#"{"content":7}"#, "{}"] {
        let (status, json) = post_summarize(app(&provider.uri(), Some("key")), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], messages::CONTENT_REQUIRED);
    }
}

#[tokio::test]
async fn unreadable_body_returns_generic_500_without_calling_provider() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    for body in ["not json", "null", ""] {
        let (status, json) = post_summarize(app(&provider.uri(), Some("key")), body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body: {body:?}");
        assert_eq!(json["error"], messages::UNEXPECTED);
    }
}

#[tokio::test]
async fn notes_larger_than_two_megabytes_are_summarized() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Long note.")))
        .expect(1)
        .mount(&provider)
        .await;

    let body = json!({ "content": "x".repeat(3 * 1024 * 1024) }).to_string();
    let (status, json) = post_summarize(app(&provider.uri(), Some("key")), &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"], "Long note.");
}

#[tokio::test]
async fn missing_api_key_returns_configuration_error_without_calling_provider() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    let (status, json) = post_summarize(app(&provider.uri(), None), r#"{"content":"hello"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], messages::NOT_CONFIGURED);
}

#[tokio::test]
async fn success_returns_trimmed_summary_and_sends_fixed_prompt() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "llama-3.3-70b-versatile",
            "temperature": 0.7,
            "max_tokens": 200
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Two sentences. ")))
        .expect(1)
        .mount(&provider)
        .await;

    let (status, json) = post_summarize(
        app(&provider.uri(), Some("test-key")),
        r#"{"content":"Launch checklist for Friday"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "summary": "Two sentences." }));

    let requests = provider.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["messages"][0]["role"], "system");
    assert!(sent["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains("2-4 sentences"));
    assert_eq!(
        sent["messages"][1]["content"],
        "Please summarize the following note:\n\nLaunch checklist for Friday"
    );
}

#[tokio::test]
async fn provider_statuses_are_mapped() {
    let cases: [(u16, StatusCode, &str); 5] = [
        (401, StatusCode::UNAUTHORIZED, messages::INVALID_API_KEY),
        (429, StatusCode::TOO_MANY_REQUESTS, messages::RATE_LIMITED),
        (500, StatusCode::INTERNAL_SERVER_ERROR, messages::PROVIDER_UNAVAILABLE),
        (404, StatusCode::NOT_FOUND, "AI service error: Not Found"),
        (503, StatusCode::SERVICE_UNAVAILABLE, "AI service error: Service Unavailable"),
    ];

    for (provider_status, expected_status, expected_message) in cases {
        let provider = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(provider_status)
                    .set_body_json(json!({ "error": { "message": "upstream" } })),
            )
            .mount(&provider)
            .await;

        let (status, json) =
            post_summarize(app(&provider.uri(), Some("key")), r#"{"content":"text"}"#).await;
        assert_eq!(status, expected_status, "provider status {provider_status}");
        assert_eq!(json["error"], expected_message);
    }
}

#[tokio::test]
async fn empty_completion_returns_500() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&provider)
        .await;

    let (status, json) =
        post_summarize(app(&provider.uri(), Some("key")), r#"{"content":"text"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], messages::SUMMARY_FAILED);
}

#[tokio::test]
async fn null_choices_returns_summary_failure() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": null })))
        .mount(&provider)
        .await;

    let (status, json) =
        post_summarize(app(&provider.uri(), Some("key")), r#"{"content":"text"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], messages::SUMMARY_FAILED);
}

#[tokio::test]
async fn unreachable_provider_returns_generic_500() {
    let provider = MockServer::start().await;
    let provider_url = provider.uri();
    drop(provider);

    let (status, json) =
        post_summarize(app(&provider_url, Some("key")), r#"{"content":"text"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], messages::UNEXPECTED);
}

#[tokio::test]
async fn undecodable_provider_body_returns_generic_500() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&provider)
        .await;

    let (status, json) =
        post_summarize(app(&provider.uri(), Some("key")), r#"{"content":"text"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], messages::UNEXPECTED);
}

struct PanickingKey;

impl ApiKeySource for PanickingKey {
    fn api_key(&self) -> Option<String> {
        panic!("secret backend exploded");
    }
}

#[tokio::test]
async fn handler_panic_becomes_generic_500() {
    let state = AppState::new(
        ChatCompletionClient::new(ProviderConfig::with_base_url("http://127.0.0.1:9")),
        PanickingKey,
    );
    let (status, json) = post_summarize(router(Arc::new(state)), r#"{"content":"text"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], messages::UNEXPECTED);
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app("http://127.0.0.1:9", None)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
}
