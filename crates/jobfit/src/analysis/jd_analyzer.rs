//! JD Analyzer: diffs the skills found in a pasted job description against the user's
//! tracked keywords.
//!
//! Two phases: `analyze` is pure and only classifies; `apply` performs the user-approved
//! mutations on the store.

use serde::{Deserialize, Serialize};

use crate::analysis::lexicon::SkillLexicon;
use crate::errors::EngineResult;
use crate::keywords::KeywordStore;
use crate::matching::CompiledTerm;
use crate::models::keyword::{normalize_text, Category, KeywordSource};

/// Classification of every lexicon term found in a description.
/// Each term lands in exactly one list; every list is sorted alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JdAnalysis {
    pub new_suggestions: Vec<String>,
    pub already_tracking: Vec<String>,
    /// Tracked as exclude. Wins over a boost with the same text.
    pub conflicts: Vec<String>,
}

impl JdAnalysis {
    pub fn is_empty(&self) -> bool {
        self.new_suggestions.is_empty() && self.already_tracking.is_empty() && self.conflicts.is_empty()
    }
}

/// What `apply` actually changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedAnalysis {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Lexicon terms occurring in `text`, alphabetically.
pub fn find_skills(text: &str, lexicon: &dyn SkillLexicon) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let mut found: Vec<String> = lexicon
        .terms()
        .iter()
        .map(|t| CompiledTerm::new(t))
        .filter(|t| t.is_match(text))
        .map(|t| t.term().to_string())
        .collect();
    found.sort();
    found.dedup();
    found
}

pub fn analyze(text: &str, store: &KeywordStore, lexicon: &dyn SkillLexicon) -> JdAnalysis {
    let mut analysis = JdAnalysis::default();

    for skill in find_skills(text, lexicon) {
        if store.find(&skill, Category::Exclude).is_some() {
            analysis.conflicts.push(skill);
        } else if store.find(&skill, Category::Boost).is_some() {
            analysis.already_tracking.push(skill);
        } else {
            analysis.new_suggestions.push(skill);
        }
    }

    tracing::debug!(
        new = analysis.new_suggestions.len(),
        tracking = analysis.already_tracking.len(),
        conflicts = analysis.conflicts.len(),
        "analyzed job description"
    );
    analysis
}

/// Adds each `add_boost` term as a manual boost keyword when absent and deletes each
/// `remove_exclude` term's exclude keyword when present. Re-applying is a no-op.
pub fn apply(
    store: &mut KeywordStore,
    add_boost: &[String],
    remove_exclude: &[String],
) -> EngineResult<AppliedAnalysis> {
    let mut applied = AppliedAnalysis::default();

    for raw in add_boost {
        let term = normalize_text(raw);
        if term.is_empty() || store.find(&term, Category::Boost).is_some() {
            continue;
        }
        let keyword = store.add(&term, Category::Boost, None, KeywordSource::Manual)?;
        applied.added.push(keyword.text);
    }

    for raw in remove_exclude {
        let term = normalize_text(raw);
        if term.is_empty() {
            continue;
        }
        if let Some(id) = store.find(&term, Category::Exclude).map(|k| k.id) {
            store.remove(id)?;
            applied.removed.push(term);
        }
    }

    Ok(applied)
}
