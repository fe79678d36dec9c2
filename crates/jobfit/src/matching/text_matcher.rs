//! Text Matcher: case-insensitive, word-boundary-aware phrase matching of tracked terms.
//!
//! A boundary is the edge of the text or any character that is neither a letter nor a
//! digit, so "ai" never matches inside "mail" while "c++" still matches "C++ developer".
//! Multi-word terms match as a contiguous phrase with any run of whitespace between words.

use std::collections::HashSet;

use regex::Regex;
use uuid::Uuid;

use crate::models::keyword::{normalize_text, Keyword};

/// A single term compiled into a boundary-aware pattern.
#[derive(Debug, Clone)]
pub struct CompiledTerm {
    term: String,
    pattern: Option<Regex>,
}

impl CompiledTerm {
    pub fn new(raw: &str) -> Self {
        let term = normalize_text(raw);
        let pattern = if term.is_empty() {
            None
        } else {
            let body = term
                .split(' ')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+");
            Regex::new(&format!(r"(?i)(?:^|[^\p{{L}}\p{{N}}]){body}(?:$|[^\p{{L}}\p{{N}}])"))
                .map_err(|e| tracing::warn!(term = %term, error = %e, "term pattern rejected"))
                .ok()
        };
        Self { term, pattern }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|p| p.is_match(text))
            .unwrap_or(false)
    }
}

/// A keyword list compiled once and matched against many texts.
#[derive(Debug, Clone, Default)]
pub struct KeywordMatcher {
    terms: Vec<(Uuid, CompiledTerm)>,
}

impl KeywordMatcher {
    pub fn new(keywords: &[Keyword]) -> Self {
        Self {
            terms: keywords
                .iter()
                .map(|kw| (kw.id, CompiledTerm::new(&kw.text)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Ids of every compiled keyword occurring in `text`.
    pub fn matches(&self, text: &str) -> HashSet<Uuid> {
        if text.trim().is_empty() {
            return HashSet::new();
        }
        self.terms
            .iter()
            .filter(|(_, term)| term.is_match(text))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Per keyword, in construction order: how many of `texts` mention it.
    pub fn hit_counts<I>(&self, texts: I) -> Vec<usize>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut hits = vec![0usize; self.terms.len()];
        for text in texts {
            let text = text.as_ref();
            for (slot, (_, term)) in hits.iter_mut().zip(&self.terms) {
                if term.is_match(text) {
                    *slot += 1;
                }
            }
        }
        hits
    }
}

/// Returns the ids of every keyword whose text occurs in `text`.
/// Empty text or an empty keyword slice yields an empty set.
pub fn find_matches(text: &str, keywords: &[Keyword]) -> HashSet<Uuid> {
    if text.trim().is_empty() || keywords.is_empty() {
        return HashSet::new();
    }
    KeywordMatcher::new(keywords).matches(text)
}

/// Whether a single term occurs in `text`.
pub fn contains_term(text: &str, term: &str) -> bool {
    CompiledTerm::new(term).is_match(text)
}

/// The first term of `terms` that occurs in `text`, in list order.
pub fn first_match<'a>(text: &str, terms: &'a [String]) -> Option<&'a str> {
    terms
        .iter()
        .find(|t| contains_term(text, t))
        .map(String::as_str)
}
