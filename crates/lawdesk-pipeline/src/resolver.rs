use std::sync::Arc;

use tracing::{info, instrument, warn};

use lawdesk_core::api_types::AnswerPayload;
use lawdesk_core::context::resolve_context;
use lawdesk_core::error::{LawDeskError, Result};
use lawdesk_core::gateway::ModelGateway;
use lawdesk_core::knowledge::KnowledgeBase;

/// Prefix marking a canned knowledge-base answer served because the model
/// produced nothing.
pub const FALLBACK_LABEL: &str = "[Offline answer] ";

pub const GENERIC_FALLBACK_ANSWER: &str =
    "Unable to process the question. Please consult a legal advisor or refer to local laws.";

/// Which fallback tier produced an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerSource {
    Model,
    KnowledgeBase { keyword: String },
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub payload: AnswerPayload,
    pub source: AnswerSource,
}

/// Answers a question: knowledge-base context, one model call, then the
/// model -> keyword answer -> generic message fallback chain.
#[derive(Clone)]
pub struct AnswerResolver {
    kb: Arc<KnowledgeBase>,
    gateway: Arc<dyn ModelGateway>,
}

impl AnswerResolver {
    pub fn new(kb: Arc<KnowledgeBase>, gateway: Arc<dyn ModelGateway>) -> Self {
        Self { kb, gateway }
    }

    pub async fn resolve(&self, question: &str) -> Result<AnswerPayload> {
        self.resolve_detailed(question).await.map(|r| r.payload)
    }

    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn resolve_detailed(&self, question: &str) -> Result<Resolution> {
        if question.trim().is_empty() {
            return Err(LawDeskError::validation("No question provided."));
        }

        let prepared = resolve_context(&self.kb, question);
        let result = self.gateway.generate(&prepared.prompt).await;

        if let Some(text) = result.usable_text() {
            info!(keyword = ?prepared.context.matched_keyword, "answered by model");
            return Ok(Resolution {
                payload: AnswerPayload {
                    answer: text.to_string(),
                },
                source: AnswerSource::Model,
            });
        }

        if let Some(keyword) = prepared.context.matched_keyword {
            if let Some(canned) = self.kb.answer_for(&keyword) {
                info!(keyword = %keyword, "using fallback answer for keyword");
                return Ok(Resolution {
                    payload: AnswerPayload {
                        answer: format!("{FALLBACK_LABEL}{canned}"),
                    },
                    source: AnswerSource::KnowledgeBase { keyword },
                });
            }
            warn!(keyword = %keyword, "matched keyword has no canned answer");
        }

        info!("using generic fallback response");
        Ok(Resolution {
            payload: AnswerPayload {
                answer: GENERIC_FALLBACK_ANSWER.to_string(),
            },
            source: AnswerSource::Generic,
        })
    }
}
