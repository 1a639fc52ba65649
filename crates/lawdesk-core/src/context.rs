use crate::knowledge::{KnowledgeBase, ResolvedContext};

/// A resolved context together with the prompt built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPrompt {
    pub context: ResolvedContext,
    pub prompt: String,
}

pub fn build_prompt(context: &str, question: &str) -> String {
    format!("{context}\n\nUser question: {question}\n\nAnswer:")
}

/// Matches the trimmed question against the knowledge base and builds the
/// model prompt. Callers reject blank questions before getting here.
pub fn resolve_context(kb: &KnowledgeBase, question: &str) -> PreparedPrompt {
    let question = question.trim();
    let context = kb.lookup(question);
    let prompt = build_prompt(&context.context_text, question);
    PreparedPrompt { context, prompt }
}
