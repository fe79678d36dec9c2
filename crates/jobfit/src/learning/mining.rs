//! Term mining over free-text feedback and dismissal notes.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::keywords::KeywordStore;
use crate::models::application::Feedback;
use crate::models::keyword::normalize_text;

static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}+#\-]*").expect("Valid word regex")
});

static CLAUSE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;.\n]+").expect("Valid clause regex"));

pub(crate) const STOPWORDS: &[&str] = &[
    "i", "me", "my", "the", "a", "an", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "do", "does", "did", "will", "would", "could", "should", "may",
    "might", "can", "shall", "to", "of", "in", "for", "on", "with", "at", "by", "from", "as",
    "into", "through", "during", "before", "after", "above", "below", "between", "out", "off",
    "over", "under", "again", "further", "then", "once", "here", "there", "when", "where",
    "why", "how", "all", "each", "every", "both", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "just",
    "don", "don't", "that", "this", "it", "its", "and", "but", "or", "if", "because", "about",
    "up", "down", "job", "role", "position", "work", "want", "like", "think", "look",
    "looking", "really", "much", "also", "get",
];

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Meaningful single words: lower-cased, longer than three characters, not a stopword,
/// not purely numeric.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    WORD_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().trim_end_matches('-'))
        .filter(|w| w.chars().count() > 3)
        .filter(|w| !is_stopword(w))
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

/// A feedback-derived term that is not tracked yet.
#[derive(Debug, Clone, PartialEq)]
pub struct MinedTerm {
    pub text: String,
    /// Number of feedback records that contributed the term.
    pub count: usize,
    pub mentioned: bool,
}

/// Counts candidate terms across feedback records, each record contributing a term at most
/// once. A term qualifies when it is untracked in both categories and either reaches
/// `min_frequency` or was explicitly mentioned. Ordered by count desc then text, capped
/// at `limit`.
pub fn mine_feedback_terms(
    feedbacks: &[Feedback],
    store: &KeywordStore,
    min_frequency: usize,
    limit: usize,
) -> Vec<MinedTerm> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut mentioned: HashSet<String> = HashSet::new();

    for feedback in feedbacks {
        let mut terms = tokenize(&feedback.feedback_text);
        for raw in &feedback.keywords_mentioned {
            let term = normalize_text(raw);
            if !term.is_empty() {
                mentioned.insert(term.clone());
                terms.insert(term);
            }
        }
        for term in terms {
            *counts.entry(term).or_default() += 1;
        }
    }

    let mut mined: Vec<MinedTerm> = counts
        .into_iter()
        .filter(|(text, _)| !store.contains_text(text))
        .map(|(text, count)| MinedTerm {
            mentioned: mentioned.contains(&text),
            text,
            count,
        })
        .filter(|t| t.count >= min_frequency || t.mentioned)
        .collect();

    mined.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    mined.truncate(limit);
    mined
}

/// Words and short phrases worth offering as exclude keywords from a dismissal note.
/// Each clause yields its meaningful words (longer than three characters) and, when it
/// holds two to four meaningful words, the phrase joining them.
pub fn extract_phrases(notes: &str) -> Vec<String> {
    let lowered = notes.to_lowercase();
    let mut phrases = BTreeSet::new();

    for clause in CLAUSE_SPLIT.split(&lowered) {
        let meaningful: Vec<&str> = WORD_PATTERN
            .find_iter(clause)
            .map(|m| m.as_str().trim_end_matches('-'))
            .filter(|w| w.chars().count() > 2 && !is_stopword(w))
            .collect();

        if (2..=4).contains(&meaningful.len()) {
            phrases.insert(meaningful.join(" "));
        }
        for word in meaningful {
            if word.chars().count() > 3 {
                phrases.insert(word.to_string());
            }
        }
    }

    phrases.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::FeedbackType;
    use crate::models::keyword::{Category, KeywordSource};
    use uuid::Uuid;

    fn feedback(text: &str, mentioned: &[&str]) -> Feedback {
        Feedback::new(Uuid::new_v4(), FeedbackType::WhyApplied, text).mentioning(mentioned)
    }

    #[test]
    fn test_tokenize_drops_short_stop_and_numeric_words() {
        let tokens = tokenize("I really like the Fintech domain, 2024 roadmap and SQL");
        let expected: BTreeSet<String> = ["fintech", "domain", "roadmap"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_tokenize_keeps_hyphenated_words() {
        let tokens = tokenize("Data-driven, cross-functional team");
        assert!(tokens.contains("data-driven"));
        assert!(tokens.contains("cross-functional"));
    }

    #[test]
    fn test_each_feedback_counts_a_term_once() {
        let feedbacks = vec![feedback("fintech fintech fintech", &[])];
        let mined = mine_feedback_terms(&feedbacks, &KeywordStore::new(), 2, 10);
        assert!(mined.is_empty());
    }

    #[test]
    fn test_cross_feedback_frequency_and_mentions() {
        let feedbacks = vec![
            feedback("Great fintech mission", &[]),
            feedback("Fintech again, remote friendly", &["dbt"]),
        ];
        let mined = mine_feedback_terms(&feedbacks, &KeywordStore::new(), 2, 10);
        let texts: Vec<&str> = mined.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["fintech", "dbt"]);
        assert_eq!(mined[0].count, 2);
        assert!(mined[1].mentioned);
    }

    #[test]
    fn test_tracked_terms_are_not_candidates() {
        let mut store = KeywordStore::new();
        store
            .add("fintech", Category::Exclude, None, KeywordSource::Manual)
            .unwrap();
        let feedbacks = vec![feedback("fintech", &["fintech"]), feedback("fintech", &[])];
        assert!(mine_feedback_terms(&feedbacks, &store, 2, 10).is_empty());
    }

    #[test]
    fn test_mining_respects_limit() {
        let feedbacks = vec![
            feedback("alpha bravo charlie delta", &[]),
            feedback("alpha bravo charlie delta", &[]),
        ];
        let mined = mine_feedback_terms(&feedbacks, &KeywordStore::new(), 2, 2);
        let texts: Vec<&str> = mined.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["alpha", "bravo"]);
    }

    #[test]
    fn test_extract_phrases_from_notes() {
        let phrases = extract_phrases("Too much travel required. Gambling industry");
        assert!(phrases.contains(&"travel required".to_string()));
        assert!(phrases.contains(&"gambling industry".to_string()));
        assert!(phrases.contains(&"gambling".to_string()));
        assert!(phrases.contains(&"travel".to_string()));
        assert!(!phrases.iter().any(|p| p == "much" || p == "too"));
    }

    #[test]
    fn test_extract_phrases_empty_notes() {
        assert!(extract_phrases("").is_empty());
        assert!(extract_phrases(" , ; ").is_empty());
    }
}
