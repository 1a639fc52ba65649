use std::time::Duration;

use axum::http::StatusCode;

use lawdesk_core::{AppConfig, ModelGateway, ModelResult, ResponseMode};
use lawdesk_gateway::OllamaGateway;
use lawdesk_tests::{test_config, FakeUpstream};

fn gateway_for(upstream: &FakeUpstream, mode: ResponseMode) -> OllamaGateway {
    let config = AppConfig {
        upstream_endpoint: upstream.endpoint.clone(),
        response_mode: mode,
        ..test_config()
    };
    OllamaGateway::new(&config).expect("gateway")
}

// ---------------------------------------------------------------------------
// Successful responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn buffered_object_yields_message_content() {
    let upstream = FakeUpstream::start(
        StatusCode::OK,
        r#"{"model":"tinyllama","message":{"role":"assistant","content":"Contest the notice in court."},"done":true}"#,
    )
    .await;
    let gateway = gateway_for(&upstream, ResponseMode::Buffered);

    let result = gateway.generate("prompt").await;

    assert_eq!(result, ModelResult::text("Contest the notice in court."));
}

#[tokio::test]
async fn streaming_body_uses_only_the_last_line() {
    let body = concat!(
        r#"{"message":{"role":"assistant","content":"Con"},"done":false}"#,
        "\n",
        r#"{"message":{"role":"assistant","content":"test"},"done":false}"#,
        "\n",
        r#"{"message":{"role":"assistant","content":"Final complete answer."},"done":true}"#,
        "\n",
    );
    let upstream = FakeUpstream::start(StatusCode::OK, body).await;
    let gateway = gateway_for(&upstream, ResponseMode::Streaming);

    let result = gateway.generate("prompt").await;

    assert_eq!(result.text.as_deref(), Some("Final complete answer."));
}

#[tokio::test]
async fn request_carries_model_messages_and_stream_flag() {
    let upstream = FakeUpstream::start(StatusCode::OK, r#"{"message":{"content":"ok"}}"#).await;
    let gateway = gateway_for(&upstream, ResponseMode::Buffered);

    gateway.generate("User question: hi").await;

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request["model"], "tinyllama");
    assert_eq!(request["stream"], false);
    assert_eq!(request["messages"][0]["role"], "system");
    assert_eq!(request["messages"][0]["content"], "You are a legal advisor.");
    assert_eq!(request["messages"][1]["role"], "user");
    assert_eq!(request["messages"][1]["content"], "User question: hi");
}

#[tokio::test]
async fn streaming_mode_requests_a_stream() {
    let upstream = FakeUpstream::start(StatusCode::OK, r#"{"message":{"content":"ok"}}"#).await;
    let gateway = gateway_for(&upstream, ResponseMode::Streaming);

    gateway.generate("p").await;

    assert_eq!(upstream.requests()[0]["stream"], true);
}

// ---------------------------------------------------------------------------
// Failures collapse to an empty result
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_error_status_yields_none() {
    let upstream = FakeUpstream::start(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"message":{"content":"should be ignored"}}"#,
    )
    .await;
    let gateway = gateway_for(&upstream, ResponseMode::Buffered);

    assert_eq!(gateway.generate("prompt").await, ModelResult::none());
}

#[tokio::test]
async fn invalid_json_yields_none() {
    let upstream = FakeUpstream::start(StatusCode::OK, "<html>bad gateway</html>").await;
    let gateway = gateway_for(&upstream, ResponseMode::Buffered);

    assert_eq!(gateway.generate("prompt").await, ModelResult::none());
}

#[tokio::test]
async fn missing_text_field_yields_none() {
    let upstream = FakeUpstream::start(StatusCode::OK, r#"{"done":true}"#).await;
    let gateway = gateway_for(&upstream, ResponseMode::Streaming);

    assert_eq!(gateway.generate("prompt").await, ModelResult::none());
}

#[tokio::test]
async fn empty_body_yields_none() {
    let upstream = FakeUpstream::start(StatusCode::OK, "").await;
    let gateway = gateway_for(&upstream, ResponseMode::Streaming);

    assert_eq!(gateway.generate("prompt").await, ModelResult::none());
}

#[tokio::test]
async fn slow_upstream_times_out_to_none() {
    let upstream = FakeUpstream::start_delayed(
        StatusCode::OK,
        r#"{"message":{"content":"too late"}}"#,
        Duration::from_secs(3),
    )
    .await;
    let config = AppConfig {
        upstream_endpoint: upstream.endpoint.clone(),
        request_timeout_seconds: 1,
        ..test_config()
    };
    let gateway = OllamaGateway::new(&config).unwrap();

    assert_eq!(gateway.generate("prompt").await, ModelResult::none());
}
