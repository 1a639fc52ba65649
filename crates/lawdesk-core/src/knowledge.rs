use serde::{Deserialize, Serialize};

use crate::error::{LawDeskError, Result};

/// Context used to prime the model when no keyword matches the question.
pub const GENERIC_CONTEXT: &str =
    "Refer to the Indian Constitution and local civil laws for more details.";

const LEGAL_FAQ: [(&str, &str); 5] = [
    (
        "eviction",
        "If you are being evicted, ensure the landlord has given a proper notice (typically 30 days). You have the right to contest it in court if it's unjust.",
    ),
    (
        "termination",
        "You may be entitled to severance or notice depending on your contract. Termination without cause may be challengeable under labor laws.",
    ),
    (
        "rent",
        "Rent increases must follow your state laws and usually require 30 days’ notice.",
    ),
    (
        "security deposit",
        "Landlords must return your security deposit within a certain time after you move out, often 30 days.",
    ),
    (
        "notice period",
        "The standard notice period for resignation or eviction depends on state law or your contract—typically 30 days.",
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeEntry {
    pub keyword: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedContext {
    pub matched_keyword: Option<String>,
    pub context_text: String,
}

/// Ordered keyword -> canned answer list.
///
/// Lookup is a case-insensitive substring scan in insertion order, so when a
/// question contains several keywords the earliest registered one wins. The
/// list is never mutated after construction and is shared across requests.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// The built-in legal FAQ.
    pub fn legal_faq() -> Self {
        Self {
            entries: LEGAL_FAQ
                .iter()
                .map(|(keyword, answer)| KnowledgeEntry {
                    keyword: (*keyword).to_string(),
                    answer: (*answer).to_string(),
                })
                .collect(),
        }
    }

    /// Builds a knowledge base from custom entries. Keywords are lowercased;
    /// empty or duplicate keywords are rejected.
    pub fn from_entries(entries: impl IntoIterator<Item = KnowledgeEntry>) -> Result<Self> {
        let mut kept: Vec<KnowledgeEntry> = Vec::new();
        for entry in entries {
            let keyword = entry.keyword.trim().to_lowercase();
            if keyword.is_empty() {
                return Err(LawDeskError::Config("knowledge keyword must not be empty".into()));
            }
            if kept.iter().any(|e| e.keyword == keyword) {
                return Err(LawDeskError::Config(format!(
                    "duplicate knowledge keyword '{keyword}'"
                )));
            }
            kept.push(KnowledgeEntry {
                keyword,
                answer: entry.answer,
            });
        }
        Ok(Self { entries: kept })
    }

    /// Canned answer registered for `keyword`, if any.
    pub fn answer_for(&self, keyword: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.keyword == keyword)
            .map(|e| e.answer.as_str())
    }

    pub fn lookup(&self, question: &str) -> ResolvedContext {
        let lowered = question.to_lowercase();
        match self
            .entries
            .iter()
            .find(|e| lowered.contains(e.keyword.as_str()))
        {
            Some(entry) => ResolvedContext {
                matched_keyword: Some(entry.keyword.clone()),
                context_text: entry.answer.clone(),
            },
            None => ResolvedContext {
                matched_keyword: None,
                context_text: GENERIC_CONTEXT.to_string(),
            },
        }
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::legal_faq()
    }
}
