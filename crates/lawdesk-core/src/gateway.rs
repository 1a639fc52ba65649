use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a Model Gateway call. `text: None` covers every failure mode;
/// callers never see a transport error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelResult {
    pub text: Option<String>,
}

impl ModelResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn none() -> Self {
        Self { text: None }
    }

    /// The generated text, if present and non-empty. Whitespace counts as text.
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn generate(&self, prompt: &str) -> ModelResult;
}
