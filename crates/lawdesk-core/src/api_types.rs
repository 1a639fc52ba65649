use serde::{Deserialize, Serialize};

use crate::config::ResponseMode;

// --- Health ---

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub upstream_endpoint: String,
    pub model: String,
    pub response_mode: ResponseMode,
}

// --- Questions ---

#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    /// Missing and blank questions are both rejected by the resolver.
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerPayload {
    pub answer: String,
}

// --- Documents ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryPayload {
    pub summary: String,
}

// --- Errors ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// --- Accounts ---

#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
