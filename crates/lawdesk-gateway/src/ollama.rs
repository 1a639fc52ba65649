use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use lawdesk_core::config::{AppConfig, ResponseMode};
use lawdesk_core::error::{LawDeskError, Result};
use lawdesk_core::gateway::{ModelGateway, ModelResult};

// ---------------------------------------------------------------------------
// Upstream chat API types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Raw bodies are cut to this many bytes before they are logged.
const MAX_LOGGED_BODY: usize = 500;

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

/// Why an upstream call produced no usable text. Never leaves this crate as
/// an error; `generate` logs it and returns an empty `ModelResult`.
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    /// Connection refused, DNS failure, timeout before headers.
    #[error("request failed before any response was received: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned {status}")]
    Status { status: StatusCode, body: String },

    #[error("failed to read upstream body: {error}")]
    Body {
        status: StatusCode,
        #[source]
        error: reqwest::Error,
    },

    #[error("upstream returned an empty body")]
    EmptyBody,

    #[error("upstream body is not valid JSON: {error}")]
    MalformedJson { error: serde_json::Error, body: String },

    #[error("upstream response has no generated text")]
    MissingText { body: String },
}

impl UpstreamFailure {
    /// True when the failure happened after a response was received.
    pub fn has_response(&self) -> bool {
        !matches!(self, Self::Transport(_))
    }

    fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Body { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. }
            | Self::MalformedJson { body, .. }
            | Self::MissingText { body } => Some(body),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// OllamaGateway
// ---------------------------------------------------------------------------

/// Model Gateway for an Ollama-style chat endpoint.
///
/// Both delivery strategies send the same chat request and differ only in
/// the `stream` flag and in how the body is read back: `Buffered` parses the
/// whole body as one JSON object, `Streaming` keeps only the last line of a
/// newline-delimited body.
pub struct OllamaGateway {
    client: Client,
    endpoint: String,
    model: String,
    system_prompt: String,
    mode: ResponseMode,
}

impl OllamaGateway {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| LawDeskError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.upstream_endpoint.clone(),
            model: config.model_name.clone(),
            system_prompt: config.system_prompt.clone(),
            mode: config.response_mode,
        })
    }

    // ------------------------------------------------------------------
    // Call the upstream chat API
    // ------------------------------------------------------------------

    async fn call_upstream(&self, prompt: &str) -> std::result::Result<String, UpstreamFailure> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: self.mode == ResponseMode::Streaming,
        };

        debug!(model = %self.model, mode = %self.mode, "sending request to upstream");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(UpstreamFailure::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".into());
            return Err(UpstreamFailure::Status { status, body });
        }

        let body = resp
            .text()
            .await
            .map_err(|error| UpstreamFailure::Body { status, error })?;

        parse_body(self.mode, &body)
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Extracts the generated text from an upstream body.
///
/// In streaming mode every line but the last is discarded; the last line
/// carries the complete message.
pub fn parse_body(mode: ResponseMode, body: &str) -> std::result::Result<String, UpstreamFailure> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(UpstreamFailure::EmptyBody);
    }

    let payload = match mode {
        ResponseMode::Buffered => trimmed,
        ResponseMode::Streaming => trimmed.lines().last().unwrap_or(trimmed),
    };

    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|error| UpstreamFailure::MalformedJson {
            error,
            body: body.to_string(),
        })?;

    extract_text(&value).ok_or_else(|| UpstreamFailure::MissingText {
        body: body.to_string(),
    })
}

/// Reads the generated text from a single response object. Chat replies put
/// it under `message.content`; generate/completion style replies use a
/// top-level `response`, `output` or `text` field.
fn extract_text(value: &serde_json::Value) -> Option<String> {
    value
        .get("message")
        .and_then(|m| m.get("content"))
        .or_else(|| value.get("response"))
        .or_else(|| value.get("output"))
        .or_else(|| value.get("text"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn truncate(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

// ---------------------------------------------------------------------------
// ModelGateway trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl ModelGateway for OllamaGateway {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> ModelResult {
        match self.call_upstream(prompt).await {
            Ok(text) => {
                info!(response_len = text.len(), "upstream returned generated text");
                ModelResult::text(text)
            }
            Err(failure) if !failure.has_response() => {
                let timed_out = matches!(&failure, UpstreamFailure::Transport(e) if e.is_timeout());
                error!(
                    endpoint = %self.endpoint,
                    prompt_len = prompt.len(),
                    timed_out,
                    error = %failure,
                    "upstream unavailable, no response received"
                );
                ModelResult::none()
            }
            Err(failure) => {
                let status = failure.status().map(|s| s.as_u16());
                error!(
                    endpoint = %self.endpoint,
                    prompt_len = prompt.len(),
                    status = ?status,
                    raw_body = failure.raw_body().map(|b| truncate(b, MAX_LOGGED_BODY)).unwrap_or(""),
                    error = %failure,
                    "upstream returned an unusable response"
                );
                ModelResult::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_buffered_chat_object() {
        let body = r#"{"model":"tinyllama","message":{"role":"assistant","content":"You may appeal."},"done":true}"#;
        let text = parse_body(ResponseMode::Buffered, body).unwrap();
        assert_eq!(text, "You may appeal.");
    }

    #[test]
    fn test_parse_buffered_top_level_field() {
        let body = r#"{"response": "Generated reply", "done": true}"#;
        assert_eq!(parse_body(ResponseMode::Buffered, body).unwrap(), "Generated reply");

        let body = r#"{"output": "Together style"}"#;
        assert_eq!(parse_body(ResponseMode::Buffered, body).unwrap(), "Together style");
    }

    #[test]
    fn test_parse_streaming_uses_last_line_only() {
        let body = concat!(
            r#"{"message":{"role":"assistant","content":"partial"},"done":false}"#,
            "\n",
            "this line is not even json\n",
            r#"{"message":{"role":"assistant","content":"final answer"},"done":true}"#,
            "\n\n",
        );
        let text = parse_body(ResponseMode::Streaming, body).unwrap();
        assert_eq!(text, "final answer");
    }

    #[test]
    fn test_parse_streaming_single_line() {
        let body = r#"{"message":{"content":"only line"}}"#;
        assert_eq!(parse_body(ResponseMode::Streaming, body).unwrap(), "only line");
    }

    #[test]
    fn test_parse_streaming_bad_last_line_fails() {
        let body = "{\"message\":{\"content\":\"good\"}}\n{truncated";
        assert!(matches!(
            parse_body(ResponseMode::Streaming, body),
            Err(UpstreamFailure::MalformedJson { .. })
        ));
    }

    #[test]
    fn test_parse_missing_text_field() {
        let body = r#"{"done": true}"#;
        assert!(matches!(
            parse_body(ResponseMode::Buffered, body),
            Err(UpstreamFailure::MissingText { .. })
        ));
    }

    #[test]
    fn test_parse_empty_content_is_missing() {
        let body = r#"{"message":{"content":""}}"#;
        assert!(matches!(
            parse_body(ResponseMode::Buffered, body),
            Err(UpstreamFailure::MissingText { .. })
        ));
    }

    #[test]
    fn test_parse_whitespace_content_is_kept() {
        let body = r#"{"message":{"content":" "}}"#;
        assert_eq!(parse_body(ResponseMode::Buffered, body).unwrap(), " ");
    }

    #[test]
    fn test_parse_streaming_done_line_with_empty_content() {
        // Ollama's closing line carries `done: true` and no content.
        let body = concat!(
            r#"{"message":{"role":"assistant","content":"Tenants have rights."},"done":false}"#,
            "\n",
            r#"{"message":{"role":"assistant","content":""},"done":true}"#,
            "\n",
        );
        assert!(matches!(
            parse_body(ResponseMode::Streaming, body),
            Err(UpstreamFailure::MissingText { .. })
        ));
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(matches!(
            parse_body(ResponseMode::Streaming, "  \n "),
            Err(UpstreamFailure::EmptyBody)
        ));
    }

    #[test]
    fn test_failure_response_classification() {
        assert!(UpstreamFailure::EmptyBody.has_response());
        assert!(UpstreamFailure::MissingText { body: String::new() }.has_response());

        let failure = UpstreamFailure::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "down".into(),
        };
        assert!(failure.has_response());
        assert_eq!(failure.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(UpstreamFailure::EmptyBody.status(), None);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "ééé";
        assert_eq!(truncate(body, 3), "é");
        assert_eq!(truncate("short", 100), "short");
    }

    #[tokio::test]
    async fn test_generate_connection_refused_returns_none() {
        // Port 9 (discard) is not served on test hosts.
        let config = AppConfig {
            upstream_endpoint: "http://127.0.0.1:9/api/chat".into(),
            request_timeout_seconds: 2,
            ..AppConfig::default()
        };
        let gateway = OllamaGateway::new(&config).unwrap();
        let result = gateway.generate("hello").await;
        assert_eq!(result, ModelResult::none());
    }
}
