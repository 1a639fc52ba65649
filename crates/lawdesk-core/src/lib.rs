pub mod api_types;
pub mod config;
pub mod context;
pub mod credentials;
pub mod error;
pub mod extraction;
pub mod gateway;
pub mod knowledge;

pub use config::{AppConfig, ResponseMode};
pub use context::{build_prompt, resolve_context, PreparedPrompt};
pub use credentials::{CredentialStore, Registration};
pub use error::{LawDeskError, Result};
pub use extraction::TextExtractor;
pub use gateway::{ModelGateway, ModelResult};
pub use knowledge::{KnowledgeBase, KnowledgeEntry, ResolvedContext, GENERIC_CONTEXT};
