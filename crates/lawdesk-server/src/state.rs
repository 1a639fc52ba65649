use std::sync::Arc;

use chrono::Duration;

use lawdesk_core::{
    AppConfig, CredentialStore, KnowledgeBase, ModelGateway, Result, TextExtractor,
};
use lawdesk_gateway::OllamaGateway;
use lawdesk_pipeline::{AnswerResolver, DocumentSummarizer};

use crate::credentials::SledCredentialStore;
use crate::ocr::TesseractExtractor;
use crate::sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub resolver: AnswerResolver,
    pub summarizer: DocumentSummarizer,
    pub extractor: Arc<dyn TextExtractor>,
    pub credentials: Arc<dyn CredentialStore>,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wires the pipeline around the given collaborators.
    pub fn new(
        config: AppConfig,
        gateway: Arc<dyn ModelGateway>,
        extractor: Arc<dyn TextExtractor>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let kb = Arc::new(KnowledgeBase::legal_faq());
        let sessions = SessionStore::new(Duration::minutes(config.session_ttl_minutes));

        Self {
            resolver: AnswerResolver::new(kb, gateway.clone()),
            summarizer: DocumentSummarizer::new(gateway),
            extractor,
            credentials,
            sessions,
            config: Arc::new(config),
        }
    }

    /// Production wiring: Ollama upstream, tesseract OCR, sled user store.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let gateway = Arc::new(OllamaGateway::new(&config)?);
        let extractor = Arc::new(TesseractExtractor::new(config.tesseract_cmd.clone()));
        let credentials = Arc::new(SledCredentialStore::open(&config.users_db_path)?);
        Ok(Self::new(config, gateway, extractor, credentials))
    }
}
