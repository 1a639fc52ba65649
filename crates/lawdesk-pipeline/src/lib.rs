mod resolver;
mod summarizer;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use resolver::{
    AnswerResolver, AnswerSource, Resolution, FALLBACK_LABEL, GENERIC_FALLBACK_ANSWER,
};
pub use summarizer::{DocumentSummarizer, FALLBACK_SUMMARY, SUMMARY_PROMPT_PREFIX};
