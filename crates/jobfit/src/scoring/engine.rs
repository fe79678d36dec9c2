//! Scoring Engine: pluggable, trait-based scorer for admitted jobs.
//!
//! Default: `KeywordWeightScorer` (deterministic sum of matched boost weights).
//!
//! Callers hold an `Arc<dyn RelevanceScorer>` and never depend on the backend.

use serde::{Deserialize, Serialize};

use crate::keywords::KeywordStore;
use crate::matching::KeywordMatcher;
use crate::models::job::Job;
use crate::models::keyword::{Category, Keyword};

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobScore {
    /// Σ weight of matched boost keywords. Exclude matches never change it.
    pub match_score: f64,
    /// Matched boost texts, heaviest first, ties alphabetical.
    pub match_tags: Vec<String>,
    /// Matched exclude texts, alphabetical. Annotation only.
    pub excluded_tags: Vec<String>,
    pub experience_ok: bool,
    pub scorer_backend: String, // "keyword_weight", for transparency
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the pipeline or service.
pub trait RelevanceScorer: Send + Sync {
    fn score(&self, job: &Job, store: &KeywordStore, experience_ok: bool) -> JobScore;

    /// Scores admitted jobs against one store snapshot, in input order.
    /// Backends with per-store setup override this to do that work once.
    fn score_batch(&self, jobs: &[(&Job, bool)], store: &KeywordStore) -> Vec<JobScore> {
        jobs.iter()
            .map(|(job, experience_ok)| self.score(job, store, *experience_ok))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordWeightScorer (default implementation)
// ────────────────────────────────────────────────────────────────────────────

/// Algorithm:
/// 1. Match boost and exclude keywords separately over `title + " " + description`
/// 2. match_score = Σ weight over matched boost keywords (presence, not frequency)
/// 3. Tags: boost texts by weight desc then text; exclude texts alphabetical
pub struct KeywordWeightScorer;

impl RelevanceScorer for KeywordWeightScorer {
    fn score(&self, job: &Job, store: &KeywordStore, experience_ok: bool) -> JobScore {
        CompiledProfile::new(store).score(job, experience_ok)
    }

    fn score_batch(&self, jobs: &[(&Job, bool)], store: &KeywordStore) -> Vec<JobScore> {
        let profile = CompiledProfile::new(store);
        jobs.iter()
            .map(|(job, experience_ok)| profile.score(job, *experience_ok))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core scoring algorithm
// ────────────────────────────────────────────────────────────────────────────

/// A store's boost and exclude lists with their patterns compiled.
struct CompiledProfile {
    boosts: Vec<Keyword>,
    boost_matcher: KeywordMatcher,
    excludes: Vec<Keyword>,
    exclude_matcher: KeywordMatcher,
}

impl CompiledProfile {
    fn new(store: &KeywordStore) -> Self {
        let boosts = store.list_by_category(Category::Boost);
        let excludes = store.list_by_category(Category::Exclude);
        Self {
            boost_matcher: KeywordMatcher::new(&boosts),
            exclude_matcher: KeywordMatcher::new(&excludes),
            boosts,
            excludes,
        }
    }

    fn score(&self, job: &Job, experience_ok: bool) -> JobScore {
        let text = job.searchable_text();

        let mut matched_boosts = matched(&self.boost_matcher, &text, &self.boosts);
        matched_boosts.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.text.cmp(&b.text))
        });

        let mut excluded_tags: Vec<String> = matched(&self.exclude_matcher, &text, &self.excludes)
            .into_iter()
            .map(|k| k.text.clone())
            .collect();
        excluded_tags.sort();

        let match_score = matched_boosts.iter().map(|k| k.weight).sum();
        let match_tags = matched_boosts.iter().map(|k| k.text.clone()).collect();

        JobScore {
            match_score,
            match_tags,
            excluded_tags,
            experience_ok,
            scorer_backend: "keyword_weight".to_string(),
        }
    }
}

fn matched<'a>(matcher: &KeywordMatcher, text: &str, keywords: &'a [Keyword]) -> Vec<&'a Keyword> {
    let hits = matcher.matches(text);
    keywords.iter().filter(|k| hits.contains(&k.id)).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
