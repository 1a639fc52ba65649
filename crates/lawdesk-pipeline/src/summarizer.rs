use std::sync::Arc;

use tracing::{info, instrument};

use lawdesk_core::api_types::SummaryPayload;
use lawdesk_core::gateway::ModelGateway;

pub const SUMMARY_PROMPT_PREFIX: &str = "Summarize this legal document in simple terms:\n\n";

pub const FALLBACK_SUMMARY: &str =
    "Unable to summarize the document right now. Please consult a legal advisor for a detailed review.";

/// Summarizes extracted document text. Model output or the fixed fallback;
/// there is no knowledge-base tier here.
#[derive(Clone)]
pub struct DocumentSummarizer {
    gateway: Arc<dyn ModelGateway>,
}

impl DocumentSummarizer {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self, document_text), fields(text_len = document_text.len()))]
    pub async fn summarize(&self, document_text: &str) -> SummaryPayload {
        // Nothing was extracted, so there is nothing to send upstream.
        if document_text.is_empty() {
            info!("extracted text is empty, using fallback summary");
            return fallback();
        }

        let prompt = format!("{SUMMARY_PROMPT_PREFIX}{document_text}");
        let result = self.gateway.generate(&prompt).await;

        match result.usable_text() {
            Some(text) => {
                info!(summary_len = text.len(), "document summarized by model");
                SummaryPayload {
                    summary: text.to_string(),
                }
            }
            None => {
                info!("using fallback summary");
                fallback()
            }
        }
    }
}

fn fallback() -> SummaryPayload {
    SummaryPayload {
        summary: FALLBACK_SUMMARY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;

    #[tokio::test]
    async fn builds_summary_prompt_from_raw_text() {
        let gateway = ScriptedGateway::answering("A lease for one year.");
        let summarizer = DocumentSummarizer::new(gateway.clone());

        let payload = summarizer.summarize("THIS LEASE is made on ...\n§4 eviction").await;

        assert_eq!(payload.summary, "A lease for one year.");
        assert_eq!(
            gateway.prompts(),
            vec!["Summarize this legal document in simple terms:\n\nTHIS LEASE is made on ...\n§4 eviction".to_string()]
        );
    }

    #[tokio::test]
    async fn model_failure_gives_fixed_summary_without_kb_tier() {
        let summarizer = DocumentSummarizer::new(ScriptedGateway::failing());
        let payload = summarizer.summarize("Notice of eviction").await;
        assert_eq!(payload.summary, FALLBACK_SUMMARY);
    }

    #[tokio::test]
    async fn empty_text_skips_the_model() {
        let gateway = ScriptedGateway::answering("unused");
        let summarizer = DocumentSummarizer::new(gateway.clone());
        let payload = summarizer.summarize("").await;
        assert_eq!(payload.summary, FALLBACK_SUMMARY);
        assert!(gateway.prompts().is_empty());
    }

    #[tokio::test]
    async fn whitespace_only_text_is_sent_as_is() {
        // Tesseract emits a lone form feed for a page with no text.
        let gateway = ScriptedGateway::answering("The page is blank.");
        let summarizer = DocumentSummarizer::new(gateway.clone());

        let payload = summarizer.summarize("\u{c}\n").await;

        assert_eq!(payload.summary, "The page is blank.");
        assert_eq!(gateway.prompts(), vec![format!("{SUMMARY_PROMPT_PREFIX}\u{c}\n")]);
    }
}
