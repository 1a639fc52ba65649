//! Shared fixtures for the cross-crate tests: the scripted model gateway, a
//! fake upstream chat server, canned OCR, and request builders.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    routing::post,
    Json, Router,
};

use lawdesk_core::{AppConfig, LawDeskError, ModelGateway, Result, TextExtractor};
use lawdesk_server::credentials::SledCredentialStore;
use lawdesk_server::sessions::SESSION_COOKIE;
use lawdesk_server::AppState;

pub use lawdesk_pipeline::testing::ScriptedGateway;

// ---------------------------------------------------------------------------
// OCR doubles
// ---------------------------------------------------------------------------

pub struct CannedExtractor(pub &'static str);

#[async_trait]
impl TextExtractor for CannedExtractor {
    async fn extract_text(&self, _image: &[u8]) -> Result<String> {
        Ok(self.0.to_string())
    }
}

pub struct BrokenExtractor;

#[async_trait]
impl TextExtractor for BrokenExtractor {
    async fn extract_text(&self, _image: &[u8]) -> Result<String> {
        Err(LawDeskError::Extraction("ocr engine crashed".into()))
    }
}

// ---------------------------------------------------------------------------
// Fake upstream chat server
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct UpstreamScript {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

/// A running fake upstream. `endpoint` is the URL to configure the gateway with.
pub struct FakeUpstream {
    pub endpoint: String,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl FakeUpstream {
    pub async fn start(status: StatusCode, body: &str) -> Self {
        Self::start_delayed(status, body, Duration::ZERO).await
    }

    pub async fn start_delayed(status: StatusCode, body: &str, delay: Duration) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let script = UpstreamScript {
            status,
            body: body.to_string(),
            delay,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/api/chat", post(chat))
            .with_state(script);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake upstream");
        let addr = listener.local_addr().expect("fake upstream address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake upstream crashed");
        });

        Self {
            endpoint: format!("http://{addr}/api/chat"),
            requests,
        }
    }

    /// JSON bodies received so far.
    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }
}

async fn chat(
    State(script): State<UpstreamScript>,
    Json(request): Json<serde_json::Value>,
) -> (StatusCode, String) {
    script.requests.lock().unwrap().push(request);
    if !script.delay.is_zero() {
        tokio::time::sleep(script.delay).await;
    }
    (script.status, script.body.clone())
}

// ---------------------------------------------------------------------------
// App wiring and requests
// ---------------------------------------------------------------------------

pub fn test_config() -> AppConfig {
    AppConfig {
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../../static").to_string(),
        request_timeout_seconds: 5,
        ..AppConfig::default()
    }
}

pub fn test_state(gateway: Arc<dyn ModelGateway>, extractor: Arc<dyn TextExtractor>) -> AppState {
    let credentials = Arc::new(SledCredentialStore::temporary().expect("temporary sled store"));
    AppState::new(test_config(), gateway, extractor, credentials)
}

/// Cookie header value for a fresh session.
pub async fn session_cookie(state: &AppState) -> String {
    let token = state.sessions.issue("tester").await;
    format!("{SESSION_COOKIE}={token}")
}

pub fn ask_request(cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn upload_request(cookie: Option<&str>, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "lawdesk-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"scan\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload-doc")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn form_request(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
